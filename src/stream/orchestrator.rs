//! Runs one worker thread per feed and merges their records.

use std::fmt::Display;
use std::thread;

use tracing::{error, info};

use crate::error::{BoxError, StreamError};
use crate::integration::{DetectionSource, FeedSource, TrackerPipeline};
use crate::tracker::{ClassFilter, TrackerConfig};

use super::{Aggregator, CancelToken, Record, RecordSink, StreamSummary, StreamWorker};

type Job = Box<dyn FnOnce(RecordSink, CancelToken) -> Result<StreamSummary, StreamError> + Send>;

/// Result of one feed's worker.
#[derive(Debug)]
pub struct FeedOutcome {
    pub feed_id: String,
    pub result: Result<StreamSummary, StreamError>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    /// All records from all feeds in arrival order
    pub records: Vec<Record>,
    /// One entry per registered feed, in registration order
    pub outcomes: Vec<FeedOutcome>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &StreamError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Owns the feed list and the shared cancellation flag.
pub struct Orchestrator {
    config: TrackerConfig,
    filter: ClassFilter,
    feeds: Vec<(String, Job)>,
    cancel: CancelToken,
}

impl Orchestrator {
    pub fn new(config: TrackerConfig, filter: ClassFilter) -> Self {
        Self {
            config,
            filter,
            feeds: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Register a feed. Each feed gets its own detector and track registry.
    pub fn add_feed<F, D>(&mut self, feed_id: impl Into<String>, feed: F, detector: D) -> &mut Self
    where
        F: FeedSource + Send + 'static,
        F::Error: Into<BoxError>,
        D: DetectionSource + Send + 'static,
        D::Error: Display,
    {
        let feed_id = feed_id.into();
        let config = self.config.clone();
        let filter = self.filter.clone();
        let id = feed_id.clone();

        let job: Job = Box::new(move |sink: RecordSink, cancel: CancelToken| {
            let pipeline = TrackerPipeline::new(detector, config, filter);
            StreamWorker::new(id, feed, pipeline, sink)
                .with_cancel(cancel)
                .run()
        });
        self.feeds.push((feed_id, job));
        self
    }

    /// Token that stops every worker at its next frame boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn feed_count(&self) -> usize {
        self.feeds.len()
    }

    /// Run all feeds in parallel and wait for every one of them.
    pub fn run(self) -> RunReport {
        let aggregator = Aggregator::new();
        info!(feeds = self.feeds.len(), "starting stream workers");

        let mut outcomes: Vec<Option<FeedOutcome>> = Vec::with_capacity(self.feeds.len());
        let mut handles = Vec::with_capacity(self.feeds.len());

        for (slot, (feed_id, job)) in self.feeds.into_iter().enumerate() {
            let sink = aggregator.sink();
            let cancel = self.cancel.clone();
            let spawned = thread::Builder::new()
                .name(format!("feed-{feed_id}"))
                .spawn(move || job(sink, cancel));

            match spawned {
                Ok(handle) => {
                    outcomes.push(None);
                    handles.push((slot, feed_id, handle));
                }
                Err(source) => {
                    error!(feed = %feed_id, error = %source, "failed to spawn worker");
                    outcomes.push(Some(FeedOutcome {
                        feed_id: feed_id.clone(),
                        result: Err(StreamError::Spawn { feed_id, source }),
                    }));
                }
            }
        }

        for (slot, feed_id, handle) in handles {
            let result = handle.join().unwrap_or_else(|_| {
                error!(feed = %feed_id, "worker panicked");
                Err(StreamError::WorkerPanicked {
                    feed_id: feed_id.clone(),
                })
            });
            outcomes[slot] = Some(FeedOutcome { feed_id, result });
        }

        let records = aggregator.drain();
        info!(records = records.len(), "all stream workers finished");

        RunReport {
            records,
            outcomes: outcomes.into_iter().flatten().collect(),
        }
    }
}
