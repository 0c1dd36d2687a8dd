//! Concurrent multi-feed processing.
//!
//! Every feed runs on its own OS thread with its own pipeline and registry.
//! The only state shared between threads is the record funnel and the
//! cancellation flag.

mod aggregator;
mod cancel;
mod orchestrator;
mod record;
mod worker;

pub use aggregator::{Aggregator, RecordSink};
pub use cancel::CancelToken;
pub use orchestrator::{FeedOutcome, Orchestrator, RunReport};
pub use record::{FrameRecord, Record, TrackAssignment, TrackRecord};
pub use worker::{StreamSummary, StreamWorker};
