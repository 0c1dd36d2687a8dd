//! Detection input and matching utilities for centroid tracking.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tracker::rect::{Centroid, Rect, within_distance};
use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;

/// Detection input for the tracker.
///
/// On the wire a detection is the 6-element array
/// `[x1, y1, x2, y2, confidence, class_id]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 6]", into = "[f32; 6]")]
pub struct Detection {
    /// Bounding box (stored TLWH, constructed from TLBR)
    pub bbox: Rect,
    /// Label index assigned by the detector
    pub class_id: u32,
    /// Detection confidence score
    pub confidence: f32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: u32) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            class_id,
            confidence,
        }
    }

    pub fn from_rect(bbox: Rect, confidence: f32, class_id: u32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }

    #[inline]
    pub fn centroid(&self) -> Centroid {
        self.bbox.centroid()
    }
}

impl From<[f32; 6]> for Detection {
    fn from(raw: [f32; 6]) -> Self {
        let [x1, y1, x2, y2, confidence, class_id] = raw;
        Self::new(x1, y1, x2, y2, confidence, class_id.max(0.0) as u32)
    }
}

impl From<Detection> for [f32; 6] {
    fn from(det: Detection) -> Self {
        let [x1, y1, x2, y2] = det.bbox.to_tlbr();
        [x1, y1, x2, y2, det.confidence, det.class_id as f32]
    }
}

/// Predicate deciding which detector classes are tracked.
#[derive(Clone)]
pub struct ClassFilter {
    predicate: Arc<dyn Fn(u32) -> bool + Send + Sync>,
}

impl ClassFilter {
    /// Keep only the listed class ids.
    pub fn only<I: IntoIterator<Item = u32>>(classes: I) -> Self {
        let classes: Vec<u32> = classes.into_iter().collect();
        Self::from_fn(move |class_id| classes.contains(&class_id))
    }

    /// Keep every detection.
    pub fn any() -> Self {
        Self::from_fn(|_| true)
    }

    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(u32) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    #[inline]
    pub fn accepts(&self, detection: &Detection) -> bool {
        (self.predicate)(detection.class_id)
    }
}

/// COCO class 0 ("person").
impl Default for ClassFilter {
    fn default() -> Self {
        Self::only([0])
    }
}

impl fmt::Debug for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFilter").finish_non_exhaustive()
    }
}

/// Index of the first non-replaced track whose centroid lies inside the
/// per-axis `distance` box around `centroid`.
///
/// Tracks are scanned in slice order; the registry keeps them in id order,
/// so ties always go to the oldest track.
pub fn first_match(tracks: &[Track], centroid: &Centroid, distance: i32) -> Option<usize> {
    tracks.iter().position(|track| {
        track.state != TrackState::Replaced && within_distance(&track.centroid, centroid, distance)
    })
}
