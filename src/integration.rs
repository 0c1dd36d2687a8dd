//! Integration module for connecting detection backends and frame sources
//! with the tracker.
//!
//! This module provides the traits a feed and a detector implement, the
//! per-frame pipeline tying them to a track registry, and a replay backend
//! for pre-computed detections.

mod builder;
mod detector;
mod feed;
mod pipeline;
mod replay;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use feed::{FeedSource, Frame};
pub use pipeline::{FrameOutcome, TrackerPipeline};
pub use replay::{ReplayDetector, ReplayFeed};
