//! Per-feed track registry: first-match centroid association.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::tracker::matching;
use crate::tracker::rect::Centroid;
use crate::tracker::track::{FrameStamp, Track, TrackId, TrackSummary};

/// How long tracks that stopped matching stay in the live scan set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Never drop a track; the registry grows with the feed.
    #[default]
    KeepAll,
    /// Drop tracks whose miss count exceeds the bound. Their summaries are kept.
    EvictAfter(u32),
}

/// Configuration for the TrackRegistry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Per-axis pixel distance within which a detection matches a track
    pub match_distance: i32,
    /// Miss count at which a matched track is replaced by a fresh id
    pub max_misses: u32,
    pub retention: Retention,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_distance: 20,
            max_misses: 5,
            retention: Retention::KeepAll,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "match_distance must be non-negative, got {}",
                self.match_distance
            )));
        }
        if self.max_misses == 0 {
            return Err(ConfigError::Invalid("max_misses must be at least 1".into()));
        }
        if let Retention::EvictAfter(bound) = self.retention {
            if bound < self.max_misses {
                return Err(ConfigError::Invalid(format!(
                    "eviction bound {bound} is below max_misses {}",
                    self.max_misses
                )));
            }
        }
        Ok(())
    }
}

/// Owns every track of a single feed.
///
/// Tracks are kept in creation order, which is also id order, and that is
/// the order in which matching scans them.
#[derive(Debug)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
    retired: Vec<TrackSummary>,
    next_id: TrackId,
    config: TrackerConfig,
}

impl TrackRegistry {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            retired: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Attribute one detection centroid to a track and return its id.
    ///
    /// The first live track within `match_distance` wins. If it has already
    /// missed `max_misses` frames it is frozen as replaced and a new track
    /// takes over the location.
    pub fn match_and_update(&mut self, centroid: Centroid, now: FrameStamp) -> TrackId {
        let matched = matching::first_match(&self.tracks, &centroid, self.config.match_distance);

        if let Some(idx) = matched {
            let track = &mut self.tracks[idx];
            if !track.is_stale(self.config.max_misses) {
                track.update(centroid, now);
                return track.id;
            }
            debug!(
                track_id = track.id,
                misses = track.consecutive_misses,
                "stale track replaced"
            );
            track.mark_replaced();
        }

        self.create(centroid, now)
    }

    /// Count a miss for every track not matched this frame.
    pub fn age_unmatched(&mut self, matched_ids: &HashSet<TrackId>, now: FrameStamp) {
        for track in self.tracks.iter_mut() {
            if !matched_ids.contains(&track.id) {
                track.mark_missed();
            }
        }

        if let Retention::EvictAfter(bound) = self.config.retention {
            let retired = &mut self.retired;
            self.tracks.retain(|track| {
                if track.consecutive_misses > bound {
                    debug!(track_id = track.id, frame = now.index, "track evicted");
                    retired.push(track.summary());
                    false
                } else {
                    true
                }
            });
        }
    }

    /// Live tracks in id order.
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    /// Summaries of every track ever created, evicted ones included, in id order.
    pub fn summaries(&self) -> Vec<TrackSummary> {
        let mut all: Vec<TrackSummary> = self
            .retired
            .iter()
            .copied()
            .chain(self.tracks.iter().map(Track::summary))
            .collect();
        all.sort_by_key(|s| s.track_id);
        all
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|idx| &self.tracks[idx])
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of tracks ever created.
    pub fn created(&self) -> u64 {
        self.next_id - 1
    }

    fn create(&mut self, centroid: Centroid, now: FrameStamp) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;
        debug!(track_id = id, x = centroid.x, y = centroid.y, frame = now.index, "new track");
        self.tracks.push(Track::new(id, centroid, now));
        id
    }
}
