use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use centroidtrack_rs::integration::FrameOutcome;
use centroidtrack_rs::stream::{FrameRecord, TrackRecord};
use centroidtrack_rs::tracker::TrackSummary;
use centroidtrack_rs::{
    Aggregator, ClassFilter, Detection, DetectionBuilder, DetectionSource, FeedSource, Frame,
    FrameStamp, Orchestrator, Record, StreamError, TrackerConfig,
};

/// Yields `remaining` frames, then ends or fails.
struct SyntheticFeed {
    remaining: u64,
    fail: bool,
}

impl FeedSource for SyntheticFeed {
    type Error = std::io::Error;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        if self.remaining == 0 {
            return if self.fail {
                Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed"))
            } else {
                Ok(None)
            };
        }
        self.remaining -= 1;
        Ok(Some(Frame::new(Vec::new(), 640, 480)))
    }
}

/// One stationary person in every frame.
struct Stationary;

impl DetectionSource for Stationary {
    type Error = std::convert::Infallible;

    fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
        Ok(vec![DetectionBuilder::new().xywh(320.0, 240.0, 40.0, 90.0).build()])
    }
}

/// Fails every third call.
struct Flaky {
    calls: u32,
}

impl DetectionSource for Flaky {
    type Error = String;

    fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
        self.calls += 1;
        if self.calls % 3 == 0 {
            Err(format!("inference error on call {}", self.calls))
        } else {
            Ok(vec![DetectionBuilder::new().xywh(50.0, 50.0, 10.0, 10.0).build()])
        }
    }
}

/// Stops the orchestrator once a feed has produced `after` frames.
struct CancellingFeed {
    produced: u64,
    after: u64,
    cancel: centroidtrack_rs::CancelToken,
}

impl FeedSource for CancellingFeed {
    type Error = std::io::Error;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        self.produced += 1;
        if self.produced == self.after {
            self.cancel.cancel();
        }
        Ok(Some(Frame::default()))
    }
}

fn frame_record(source: &str, index: u64) -> Record {
    Record::Frame(FrameRecord::new(
        source,
        FrameStamp::now(index),
        FrameOutcome::default(),
    ))
}

fn track_record(source: &str) -> Record {
    Record::Track(TrackRecord::new(
        source,
        TrackSummary {
            track_id: 1,
            duration: chrono::TimeDelta::zero(),
            first_frame: 1,
            last_frame: 1,
            hits: 1,
        },
    ))
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    const WORKERS: usize = 100;
    const FRAMES: u64 = 10_000;

    let aggregator = Aggregator::new();
    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let sink = aggregator.sink();
            thread::spawn(move || {
                let source = format!("feed-{w}");
                for i in 1..=FRAMES {
                    sink.append(frame_record(&source, i));
                }
                sink.append(track_record(&source));
            })
        })
        .collect();

    let records = aggregator.drain();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(records.len(), WORKERS * FRAMES as usize + WORKERS);

    // Per worker: frames 1..=N in order, then exactly one summary last.
    let mut next_frame: HashMap<&str, u64> = HashMap::new();
    let mut finished: HashSet<&str> = HashSet::new();
    for record in &records {
        let source = record.source_id();
        assert!(!finished.contains(source), "record after summary for {source}");
        match record {
            Record::Frame(f) => {
                let expected = next_frame.entry(source).or_insert(1);
                assert_eq!(f.frame_index, *expected);
                *expected += 1;
            }
            Record::Track(_) => {
                assert_eq!(next_frame.get(source), Some(&(FRAMES + 1)));
                finished.insert(source);
            }
        }
    }
    assert_eq!(finished.len(), WORKERS);
}

#[test]
fn test_orchestrator_runs_feeds_in_parallel() {
    const FEEDS: u64 = 8;
    const FRAMES: u64 = 250;

    let mut orchestrator = Orchestrator::new(TrackerConfig::default(), ClassFilter::default());
    for f in 0..FEEDS {
        orchestrator.add_feed(
            format!("cam-{f}"),
            SyntheticFeed {
                remaining: FRAMES,
                fail: false,
            },
            Stationary,
        );
    }
    assert_eq!(orchestrator.feed_count(), FEEDS as usize);

    let report = orchestrator.run();
    assert!(report.is_success());
    assert_eq!(report.records.len() as u64, FEEDS * (FRAMES + 1));

    for outcome in &report.outcomes {
        let summary = outcome.result.as_ref().unwrap();
        assert_eq!(summary.feed_id, outcome.feed_id);
        assert_eq!(summary.frames, FRAMES);
        // Each feed has its own id namespace.
        assert_eq!(summary.tracks, 1);
    }
}

#[test]
fn test_failing_feed_does_not_stop_siblings() {
    let mut orchestrator = Orchestrator::new(TrackerConfig::default(), ClassFilter::default());
    orchestrator
        .add_feed(
            "healthy",
            SyntheticFeed {
                remaining: 50,
                fail: false,
            },
            Stationary,
        )
        .add_feed(
            "broken",
            SyntheticFeed {
                remaining: 10,
                fail: true,
            },
            Stationary,
        );

    let report = orchestrator.run();
    assert!(!report.is_success());

    let failed: Vec<&StreamError> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].feed_id(), "broken");
    assert!(matches!(failed[0], StreamError::FeedUnavailable { frames: 10, .. }));

    let broken = report
        .records
        .iter()
        .filter(|r| r.source_id() == "broken")
        .count();
    // Ten frame records plus the flushed track summary.
    assert_eq!(broken, 11);

    let healthy = &report.outcomes[0];
    assert_eq!(healthy.feed_id, "healthy");
    assert_eq!(healthy.result.as_ref().unwrap().frames, 50);
}

#[test]
fn test_detection_failures_are_counted_not_fatal() {
    let mut orchestrator = Orchestrator::new(TrackerConfig::default(), ClassFilter::default());
    orchestrator.add_feed(
        "flaky",
        SyntheticFeed {
            remaining: 9,
            fail: false,
        },
        Flaky { calls: 0 },
    );

    let report = orchestrator.run();
    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(summary.frames, 9);
    assert_eq!(summary.detection_failures, 3);
    // One miss at a time never reaches the replacement threshold.
    assert_eq!(summary.tracks, 1);

    let failed_frames = report
        .records
        .iter()
        .filter(|r| matches!(r, Record::Frame(f) if f.detection_failed))
        .count();
    assert_eq!(failed_frames, 3);
}

#[test]
fn test_cancellation_flushes_and_stops() {
    let mut orchestrator = Orchestrator::new(TrackerConfig::default(), ClassFilter::default());
    let cancel = orchestrator.cancel_token();
    orchestrator.add_feed(
        "endless",
        CancellingFeed {
            produced: 0,
            after: 20,
            cancel,
        },
        Stationary,
    );

    let report = orchestrator.run();
    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.frames, 20);
    assert!(matches!(report.records.last(), Some(Record::Track(_))));
}

#[test]
fn test_shared_detector_instance() {
    // A thread-safe detector shared by several workers.
    #[derive(Clone)]
    struct Shared(Arc<AtomicUsize>);

    impl DetectionSource for Shared {
        type Error = std::convert::Infallible;

        fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(Vec::new())
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut orchestrator = Orchestrator::new(TrackerConfig::default(), ClassFilter::any());
    for f in 0..4 {
        orchestrator.add_feed(
            format!("cam-{f}"),
            SyntheticFeed {
                remaining: 25,
                fail: false,
            },
            Shared(Arc::clone(&calls)),
        );
    }

    let report = orchestrator.run();
    assert!(report.is_success());
    assert_eq!(calls.load(Ordering::Relaxed), 100);
    assert_eq!(report.records.len(), 100);
}

#[test]
fn test_demo_config_end_to_end() {
    use centroidtrack_rs::{AppConfig, ReplayDetector, ReplayFeed};

    let config = AppConfig::load("demos/feeds.json").unwrap();
    let mut orchestrator = Orchestrator::new(config.tracker.clone(), config.class_filter());
    for feed in &config.feeds {
        let replay = ReplayFeed::open(&feed.path).unwrap();
        orchestrator.add_feed(feed.id.clone(), replay, ReplayDetector);
    }

    let report = orchestrator.run();
    assert!(report.is_success());
    assert_eq!(report.records.len(), 17);

    let cam1 = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!((cam1.frames, cam1.tracks, cam1.detection_failures), (5, 2, 1));

    // Cam-2's person vanishes for five frames, so it comes back as track 2.
    let cam2 = report.outcomes[1].result.as_ref().unwrap();
    assert_eq!((cam2.frames, cam2.tracks), (8, 2));
    let last_cam2_frame = report
        .records
        .iter()
        .filter_map(|r| match r {
            Record::Frame(f) if f.source_id == "Cam-2" => Some(f),
            _ => None,
        })
        .last()
        .unwrap();
    assert_eq!(last_cam2_frame.tracks[0].track_id, 2);
}
