mod matching;
mod rect;
mod registry;
mod track;
mod track_state;

pub use matching::{ClassFilter, Detection, first_match};
pub use rect::{Centroid, Rect, within_distance};
pub use registry::{Retention, TrackRegistry, TrackerConfig};
pub use track::{FrameStamp, Track, TrackId, TrackSummary};
pub use track_state::TrackState;
