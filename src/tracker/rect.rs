//! Axis-aligned boxes in pixel coordinates.

use ndarray::Array2;

/// Box stored as top-left corner plus size (TLWH).
///
/// Conversions are provided to corner form (TLBR, `x1, y1, x2, y2`) and to
/// the Kalman measurement form (XYAH, `center_x, center_y, width / height,
/// height`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanning the corners `(x1, y1)` and `(x2, y2)`.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Box centered on `(cx, cy)` with `width = aspect_ratio * height`.
    #[inline]
    pub fn from_xyah(cx: f32, cy: f32, aspect_ratio: f32, height: f32) -> Self {
        let width = aspect_ratio * height;
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Kalman measurement vector. A zero-height box reports an aspect ratio
    /// of zero.
    #[inline]
    pub fn to_xyah(&self) -> [f32; 4] {
        let (cx, cy) = self.center();
        let aspect_ratio = if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        };
        [cx, cy, aspect_ratio, self.height]
    }

    /// Bottom-right x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom-right y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Intersection over union with edges taken as inclusive pixel
    /// coordinates: every extent counts one extra pixel.
    pub fn iou(&self, other: &Rect) -> f32 {
        let inter_width = self.right().min(other.right()) - self.x.max(other.x) + 1.0;
        if inter_width <= 0.0 {
            return 0.0;
        }

        let inter_height = self.bottom().min(other.bottom()) - self.y.max(other.y) + 1.0;
        if inter_height <= 0.0 {
            return 0.0;
        }

        let inter_area = inter_width * inter_height;
        let union_area = (self.width + 1.0) * (self.height + 1.0)
            + (other.width + 1.0) * (other.height + 1.0)
            - inter_area;

        inter_area / union_area
    }
}

/// Pairwise IoU, `boxes_a.len()` rows by `boxes_b.len()` columns.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f32> {
    Array2::from_shape_fn((boxes_a.len(), boxes_b.len()), |(i, j)| {
        boxes_a[i].iou(&boxes_b[j])
    })
}
