use nalgebra::Point2;

/// Integer pixel position of a bounding box centre.
pub type Centroid = Point2<i32>;

/// Bounding box representation with format conversion utilities.
///
/// Stored as TLWH (top-left x, top-left y, width, height); detectors
/// usually hand boxes over as TLBR (x1, y1, x2, y2).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Centre computed as `((x1 + x2) / 2, (y1 + y2) / 2)`, truncated toward zero.
    #[inline]
    pub fn centroid(&self) -> Centroid {
        let [x1, y1, x2, y2] = self.to_tlbr();
        Centroid::new(((x1 + x2) / 2.0) as i32, ((y1 + y2) / 2.0) as i32)
    }
}

/// Per-axis box test: `|dx| <= distance && |dy| <= distance`.
///
/// Differences are taken unsigned, so centroids at opposite ends of the
/// `i32` range compare without overflow. A negative distance matches nothing.
#[inline]
pub fn within_distance(a: &Centroid, b: &Centroid, distance: i32) -> bool {
    let Ok(distance) = u32::try_from(distance) else {
        return false;
    };
    a.x.abs_diff(b.x) <= distance && a.y.abs_diff(b.y) <= distance
}
