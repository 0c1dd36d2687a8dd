//! Single object track for centroid tracking.

use chrono::{DateTime, TimeDelta, Utc};

use crate::tracker::rect::Centroid;
use crate::tracker::track_state::TrackState;

/// Track identifier, unique and strictly increasing within one registry.
pub type TrackId = u64;

/// When a frame was observed: its 1-based position in the feed and its time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStamp {
    pub index: u64,
    pub time: DateTime<Utc>,
}

impl FrameStamp {
    pub fn new(index: u64, time: DateTime<Utc>) -> Self {
        Self { index, time }
    }

    /// Stamp frame `index` with the current wall-clock time.
    pub fn now(index: u64) -> Self {
        Self::new(index, Utc::now())
    }
}

/// Single object track.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,
    /// Last known centre position
    pub centroid: Centroid,
    /// Frame at which the track was created
    pub first_seen: FrameStamp,
    /// Frame at which the track last matched a detection
    pub last_seen: FrameStamp,
    /// Frames elapsed since the last successful match
    pub consecutive_misses: u32,
    /// Current track state
    pub state: TrackState,
    /// Number of detections attributed to this track
    pub hits: u32,
}

impl Track {
    pub fn new(id: TrackId, centroid: Centroid, now: FrameStamp) -> Self {
        Self {
            id,
            centroid,
            first_seen: now,
            last_seen: now,
            consecutive_misses: 0,
            state: TrackState::Tracked,
            hits: 1,
        }
    }

    /// Attribute a detection at `centroid` to this track.
    pub fn update(&mut self, centroid: Centroid, now: FrameStamp) {
        self.centroid = centroid;
        self.last_seen = now;
        self.consecutive_misses = 0;
        self.state = TrackState::Tracked;
        self.hits += 1;
    }

    pub fn mark_missed(&mut self) {
        self.consecutive_misses = self.consecutive_misses.saturating_add(1);
        if self.state == TrackState::Tracked {
            self.state = TrackState::Lost;
        }
    }

    pub fn mark_replaced(&mut self) {
        self.state = TrackState::Replaced;
    }

    /// Whether the miss counter has reached `max_misses`.
    #[inline]
    pub fn is_stale(&self, max_misses: u32) -> bool {
        self.consecutive_misses >= max_misses
    }

    /// `last_seen - first_seen`.
    pub fn duration(&self) -> TimeDelta {
        self.last_seen.time - self.first_seen.time
    }

    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            track_id: self.id,
            duration: self.duration(),
            first_frame: self.first_seen.index,
            last_frame: self.last_seen.index,
            hits: self.hits,
        }
    }
}

/// End-of-feed report for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSummary {
    pub track_id: TrackId,
    pub duration: TimeDelta,
    pub first_frame: u64,
    pub last_frame: u64,
    pub hits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(index: u64, millis: i64) -> FrameStamp {
        let base = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        FrameStamp::new(index, base + TimeDelta::milliseconds(millis))
    }

    #[test]
    fn test_update_resets_misses() {
        let mut track = Track::new(1, Centroid::new(10, 10), stamp(1, 0));
        track.mark_missed();
        track.mark_missed();
        assert_eq!(track.consecutive_misses, 2);
        assert_eq!(track.state, TrackState::Lost);

        track.update(Centroid::new(12, 11), stamp(4, 100));
        assert_eq!(track.consecutive_misses, 0);
        assert_eq!(track.state, TrackState::Tracked);
        assert_eq!(track.centroid, Centroid::new(12, 11));
        assert_eq!(track.hits, 2);
    }

    #[test]
    fn test_replaced_stays_replaced_when_missed() {
        let mut track = Track::new(1, Centroid::new(10, 10), stamp(1, 0));
        track.mark_replaced();
        track.mark_missed();
        assert_eq!(track.state, TrackState::Replaced);
        assert_eq!(track.consecutive_misses, 1);
    }

    #[test]
    fn test_summary_duration() {
        let mut track = Track::new(7, Centroid::new(0, 0), stamp(3, 0));
        track.update(Centroid::new(1, 1), stamp(5, 66));

        let summary = track.summary();
        assert_eq!(summary.track_id, 7);
        assert_eq!(summary.duration, TimeDelta::milliseconds(66));
        assert_eq!(summary.first_frame, 3);
        assert_eq!(summary.last_frame, 5);
    }
}
