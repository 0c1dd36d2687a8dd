//! TrackerPipeline for combining detection with tracking.

use std::collections::HashSet;
use std::fmt::Display;

use tracing::warn;

use crate::tracker::{ClassFilter, Detection, FrameStamp, TrackId, TrackRegistry, TrackerConfig};

use super::{DetectionSource, Frame};

/// Result of pushing one frame through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    /// Everything the detector returned, in detector order
    pub detections: Vec<Detection>,
    /// Detections that passed the class filter
    pub tracked: Vec<Detection>,
    /// Track id for each entry of `tracked`
    pub assignments: Vec<TrackId>,
    /// The detector errored and the frame was treated as empty
    pub detection_failed: bool,
}

/// A combined tracker that bundles detection inference with a track registry.
///
/// This struct runs one frame step end to end: detect, filter by class,
/// match every centroid, then age whatever went unmatched.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    registry: TrackRegistry,
    filter: ClassFilter,
    detection_failures: u64,
}

impl<D: DetectionSource> TrackerPipeline<D>
where
    D::Error: Display,
{
    /// Create a new tracking pipeline with the given detector, config and class filter.
    pub fn new(detector: D, config: TrackerConfig, filter: ClassFilter) -> Self {
        Self {
            detector,
            registry: TrackRegistry::new(config),
            filter,
            detection_failures: 0,
        }
    }

    /// Create a new tracking pipeline tracking people with the default config.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default(), ClassFilter::default())
    }

    /// Process a single frame.
    ///
    /// A detector error does not abort the step: the frame counts as having
    /// no detections, so every track still accrues a miss.
    pub fn process_frame(&mut self, frame: &Frame, now: FrameStamp) -> FrameOutcome {
        let (detections, detection_failed) =
            match self.detector.detect(&frame.data, frame.width, frame.height) {
                Ok(detections) => (detections, false),
                Err(err) => {
                    self.detection_failures += 1;
                    warn!(frame = now.index, error = %err, "detection failed, frame skipped");
                    (Vec::new(), true)
                }
            };

        let tracked: Vec<Detection> = detections
            .iter()
            .filter(|det| self.filter.accepts(det))
            .cloned()
            .collect();

        let assignments: Vec<TrackId> = tracked
            .iter()
            .map(|det| self.registry.match_and_update(det.centroid(), now))
            .collect();

        let matched: HashSet<TrackId> = assignments.iter().copied().collect();
        self.registry.age_unmatched(&matched, now);

        FrameOutcome {
            detections,
            tracked,
            assignments,
            detection_failed,
        }
    }

    /// Number of frames on which the detector errored.
    pub fn detection_failures(&self) -> u64 {
        self.detection_failures
    }

    /// Get a reference to the underlying registry.
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }
}
