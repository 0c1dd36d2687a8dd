//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error from an external feed or detector implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a feed's worker did not finish normally.
///
/// Each variant names the feed; sibling workers are unaffected.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("feed `{feed_id}` became unavailable after {frames} frames")]
    FeedUnavailable {
        feed_id: String,
        frames: u64,
        #[source]
        source: BoxError,
    },
    #[error("worker for feed `{feed_id}` panicked")]
    WorkerPanicked { feed_id: String },
    #[error("failed to spawn worker for feed `{feed_id}`")]
    Spawn {
        feed_id: String,
        #[source]
        source: std::io::Error,
    },
}

impl StreamError {
    pub fn feed_id(&self) -> &str {
        match self {
            Self::FeedUnavailable { feed_id, .. }
            | Self::WorkerPanicked { feed_id }
            | Self::Spawn { feed_id, .. } => feed_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay I/O failure")]
    Io(#[from] std::io::Error),
    #[error("malformed replay record on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed replay frame payload")]
    Payload(#[source] serde_json::Error),
    #[error("no detections recorded for frame")]
    NoDetections,
}
