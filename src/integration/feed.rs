//! Trait for frame producers (video decoders, cameras, replay files).

use chrono::{DateTime, Utc};

/// One decoded frame as handed to a `DetectionSource`.
///
/// The tracker never inspects `data`; it is passed through to the detector.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Frame number reported by the source, if it has one
    pub index: Option<u64>,
    /// Capture time reported by the source, if it has one
    pub timestamp: Option<DateTime<Utc>>,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Source of frames for one feed.
pub trait FeedSource {
    type Error;

    /// Next frame in order, `Ok(None)` at end of stream.
    ///
    /// An `Err` means the feed can no longer be read; the worker stops.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

impl<F: FeedSource + ?Sized> FeedSource for Box<F> {
    type Error = F::Error;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        (**self).next_frame()
    }
}
