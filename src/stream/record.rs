//! Output records produced by stream workers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::integration::FrameOutcome;
use crate::tracker::{Detection, FrameStamp, TrackId, TrackSummary};

/// One entry of the merged output collection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    Frame(FrameRecord),
    Track(TrackRecord),
}

impl Record {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Frame(frame) => &frame.source_id,
            Self::Track(track) => &track.source_id,
        }
    }
}

/// Where a detection of this frame was attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackAssignment {
    pub track_id: TrackId,
    pub centroid: [i32; 2],
}

/// Per-frame record. Key names follow the established `output.json` layout.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    #[serde(rename = "Frame-Count")]
    pub frame_index: u64,
    /// Every box the detector returned, whatever its class
    #[serde(rename = "output boxes")]
    pub detections: Vec<Detection>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Device ID")]
    pub source_id: String,
    /// Detections that passed the class filter
    pub count: usize,
    pub tracks: Vec<TrackAssignment>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub detection_failed: bool,
}

impl FrameRecord {
    pub fn new(source_id: &str, now: FrameStamp, outcome: FrameOutcome) -> Self {
        let tracks = outcome
            .tracked
            .iter()
            .zip(&outcome.assignments)
            .map(|(det, &track_id)| {
                let c = det.centroid();
                TrackAssignment {
                    track_id,
                    centroid: [c.x, c.y],
                }
            })
            .collect();

        Self {
            frame_index: now.index,
            count: outcome.tracked.len(),
            detections: outcome.detections,
            timestamp: now.time,
            source_id: source_id.to_owned(),
            tracks,
            detection_failed: outcome.detection_failed,
        }
    }
}

/// Final per-track summary, emitted once per track when a feed ends.
#[derive(Debug, Clone, Serialize)]
pub struct TrackRecord {
    pub track_id: TrackId,
    /// Seconds between first and last sighting
    pub duration: f64,
    pub first_frame: u64,
    pub last_frame: u64,
    pub hits: u32,
    #[serde(rename = "Device ID")]
    pub source_id: String,
}

impl TrackRecord {
    pub fn new(source_id: &str, summary: TrackSummary) -> Self {
        let duration = summary.duration.num_seconds() as f64
            + f64::from(summary.duration.subsec_nanos()) / 1e9;
        Self {
            track_id: summary.track_id,
            duration,
            first_frame: summary.first_frame,
            last_frame: summary.last_frame,
            hits: summary.hits,
            source_id: source_id.to_owned(),
        }
    }
}
