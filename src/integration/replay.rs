//! Replay of pre-computed detections from a JSON-lines file.
//!
//! Each non-blank line describes one frame:
//!
//! ```text
//! {"frame": 1, "timestamp": "2024-05-01T10:00:00Z", "boxes": [[10, 20, 50, 80, 0.91, 0]]}
//! ```
//!
//! `frame`, `timestamp`, `width` and `height` are optional. A frame whose
//! `boxes` is `null` or absent replays a detector failure.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ReplayError;
use crate::tracker::Detection;

use super::{DetectionSource, FeedSource, Frame};

#[derive(Debug, Deserialize)]
struct ReplayLine {
    frame: Option<u64>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    boxes: Option<Vec<Detection>>,
}

/// Feed that yields one frame per line of a replay file.
///
/// The frame payload is the line's detections re-encoded as JSON, which
/// [`ReplayDetector`] decodes again.
pub struct ReplayFeed<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl ReplayFeed<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayFeed<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> FeedSource for ReplayFeed<R> {
    type Error = ReplayError;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let record: ReplayLine =
                serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                    line: self.line_no,
                    source,
                })?;
            let data = serde_json::to_vec(&record.boxes).map_err(|source| ReplayError::Parse {
                line: self.line_no,
                source,
            })?;

            let mut frame = Frame::new(data, record.width, record.height);
            if let Some(index) = record.frame {
                frame = frame.with_index(index);
            }
            if let Some(timestamp) = record.timestamp {
                frame = frame.with_timestamp(timestamp);
            }
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

/// Detector counterpart of [`ReplayFeed`]: decodes the recorded boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayDetector;

impl DetectionSource for ReplayDetector {
    type Error = ReplayError;

    fn detect(
        &mut self,
        input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        let boxes: Option<Vec<Detection>> =
            serde_json::from_slice(input).map_err(ReplayError::Payload)?;
        boxes.ok_or(ReplayError::NoDetections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
{"frame": 1, "timestamp": "2024-05-01T10:00:00Z", "boxes": [[90, 80, 110, 120, 0.9, 0]]}

{"boxes": []}
{"frame": 3, "boxes": null}
"#;

    #[test]
    fn test_replay_frames() {
        let mut feed = ReplayFeed::from_reader(SAMPLE.as_bytes());
        let mut detector = ReplayDetector;

        let first = feed.next_frame().unwrap().unwrap();
        assert_eq!(first.index, Some(1));
        assert!(first.timestamp.is_some());
        let dets = detector.detect(&first.data, first.width, first.height).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].centroid().x, 100);

        let second = feed.next_frame().unwrap().unwrap();
        assert_eq!(second.index, None);
        assert!(detector.detect(&second.data, 0, 0).unwrap().is_empty());

        let third = feed.next_frame().unwrap().unwrap();
        assert!(matches!(
            detector.detect(&third.data, 0, 0),
            Err(ReplayError::NoDetections)
        ));

        assert!(feed.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_parse_error_reports_line() {
        let mut feed = ReplayFeed::from_reader("{\"boxes\": []}\nnot json\n".as_bytes());
        assert!(feed.next_frame().unwrap().is_some());
        match feed.next_frame() {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
