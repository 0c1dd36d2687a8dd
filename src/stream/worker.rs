//! Frame loop for a single feed.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{BoxError, StreamError};
use crate::integration::{DetectionSource, FeedSource, TrackerPipeline};
use crate::tracker::FrameStamp;

use super::{CancelToken, FrameRecord, Record, RecordSink, TrackRecord};

/// How a feed finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub feed_id: String,
    /// Frames pulled from the feed and processed
    pub frames: u64,
    /// Tracks created over the whole feed
    pub tracks: u64,
    /// Frames on which the detector failed
    pub detection_failures: u64,
    /// The loop stopped because cancellation was requested
    pub cancelled: bool,
}

/// Drives one feed end to end, strictly one frame at a time.
pub struct StreamWorker<F, D: DetectionSource> {
    feed_id: String,
    feed: F,
    pipeline: TrackerPipeline<D>,
    sink: RecordSink,
    cancel: CancelToken,
}

impl<F, D> StreamWorker<F, D>
where
    F: FeedSource,
    F::Error: Into<BoxError>,
    D: DetectionSource,
    D::Error: Display,
{
    pub fn new(
        feed_id: impl Into<String>,
        feed: F,
        pipeline: TrackerPipeline<D>,
        sink: RecordSink,
    ) -> Self {
        Self {
            feed_id: feed_id.into(),
            feed,
            pipeline,
            sink,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the feed until it ends, fails, or cancellation is requested.
    ///
    /// Whatever the reason, a track record for every track ever created is
    /// appended before returning.
    pub fn run(mut self) -> Result<StreamSummary, StreamError> {
        info!(feed = %self.feed_id, "stream worker started");

        let mut frames = 0u64;
        let mut cancelled = false;
        let mut last_time: Option<DateTime<Utc>> = None;

        let failure: Option<BoxError> = loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break None;
            }

            let frame = match self.feed.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break None,
                Err(err) => break Some(err.into()),
            };
            frames += 1;

            let index = frame.index.unwrap_or(frames);
            let mut time = frame.timestamp.unwrap_or_else(Utc::now);
            if let Some(prev) = last_time {
                if time < prev {
                    warn!(
                        feed = %self.feed_id,
                        frame = index,
                        %time,
                        previous = %prev,
                        "feed timestamp went backwards, clamped"
                    );
                    time = prev;
                }
            }
            last_time = Some(time);

            let now = FrameStamp::new(index, time);
            let outcome = self.pipeline.process_frame(&frame, now);
            debug!(
                feed = %self.feed_id,
                frame = now.index,
                detections = outcome.detections.len(),
                tracked = outcome.tracked.len(),
                live_tracks = self.pipeline.registry().len(),
                "frame processed"
            );

            self.sink
                .append(Record::Frame(FrameRecord::new(&self.feed_id, now, outcome)));
        };

        self.flush();

        let detection_failures = self.pipeline.detection_failures();
        if detection_failures > 0 {
            warn!(
                feed = %self.feed_id,
                detection_failures,
                "detector failed on some frames"
            );
        }

        if let Some(source) = failure {
            warn!(feed = %self.feed_id, frames, error = %source, "feed unavailable");
            return Err(StreamError::FeedUnavailable {
                feed_id: self.feed_id,
                frames,
                source,
            });
        }

        let summary = StreamSummary {
            tracks: self.pipeline.registry().created(),
            feed_id: self.feed_id,
            frames,
            detection_failures,
            cancelled,
        };
        info!(
            feed = %summary.feed_id,
            frames = summary.frames,
            tracks = summary.tracks,
            cancelled = summary.cancelled,
            "stream worker finished"
        );
        Ok(summary)
    }

    fn flush(&self) {
        for summary in self.pipeline.registry().summaries() {
            self.sink
                .append(Record::Track(TrackRecord::new(&self.feed_id, summary)));
        }
    }
}
