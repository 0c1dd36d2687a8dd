//! Builder for creating Detection objects from various box layouts.

use crate::tracker::{Detection, Rect};

/// Builder for `Detection` values.
///
/// Detector post-processors disagree on box layout; pick the setter that
/// matches yours. Class defaults to 0 and confidence to 0.0.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: Rect,
    confidence: f32,
    class_id: u32,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corners: (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Centre and size: (cx, cy, w, h), as YOLO heads emit it.
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(cx - w / 2.0, cy - h / 2.0, w, h);
        self
    }

    /// Top-left corner and size: (x, y, w, h).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn class(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn build(self) -> Detection {
        Detection::from_rect(self.bbox, self.confidence, self.class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Centroid;

    #[test]
    fn test_layouts_agree() {
        let a = DetectionBuilder::new().tlbr(10.0, 20.0, 50.0, 80.0).build();
        let b = DetectionBuilder::new().xywh(30.0, 50.0, 40.0, 60.0).build();
        let c = DetectionBuilder::new().tlwh(10.0, 20.0, 40.0, 60.0).build();

        assert_eq!(a.bbox, b.bbox);
        assert_eq!(a.bbox, c.bbox);
        assert_eq!(a.centroid(), Centroid::new(30, 50));
    }

    #[test]
    fn test_class_and_confidence() {
        let det = DetectionBuilder::new()
            .tlbr(0.0, 0.0, 4.0, 4.0)
            .confidence(0.95)
            .class(3)
            .build();

        assert_eq!(det.confidence, 0.95);
        assert_eq!(det.class_id, 3);
    }
}
