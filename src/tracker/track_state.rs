/// Track state enumeration for the centroid tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Matched a detection in the most recent frame
    #[default]
    Tracked,
    /// Missed one or more consecutive frames
    Lost,
    /// Superseded by a newer track after going stale; never matched again
    Replaced,
}
