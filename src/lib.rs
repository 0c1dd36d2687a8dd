//! Centroid-based multi-object tracking over concurrent detection feeds.
//!
//! Each feed owns a [`TrackRegistry`] that assigns persistent ids by
//! first-match on a per-axis pixel box. Feeds run on separate threads via
//! the [`Orchestrator`] and their records merge in an [`Aggregator`].

pub mod config;
pub mod error;
pub mod integration;
pub mod output;
pub mod stream;
pub mod tracker;

pub use config::{AppConfig, FeedConfig};
pub use error::{ConfigError, ReplayError, StreamError};
pub use integration::{
    DetectionBuilder, DetectionSource, FeedSource, Frame, IntoDetections, ReplayDetector,
    ReplayFeed, TrackerPipeline,
};
pub use stream::{
    Aggregator, CancelToken, Orchestrator, Record, RecordSink, RunReport, StreamSummary,
    StreamWorker,
};
pub use tracker::{
    Centroid, ClassFilter, Detection, FrameStamp, Rect, Retention, Track, TrackId, TrackRegistry,
    TrackState, TrackerConfig,
};
