//! Builder for creating Object values from various box formats.

use crate::tracker::{Object, Rect};

/// Builder for creating [`Object`] values from various input formats.
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    label: i32,
    id: i64,
    feature: Option<Vec<f32>>,
}

impl ObjectBuilder {
    /// Create a new object builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the class label.
    pub fn label(mut self, label: i32) -> Self {
        self.label = label;
        self
    }

    /// Set the caller supplied detection ID.
    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Attach a ReID embedding.
    pub fn feature(mut self, feature: Vec<f32>) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Build the final [`Object`].
    pub fn build(self) -> Object {
        Object {
            rect: Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
            label: self.label,
            prob: self.score,
            id: self.id,
            feature: self.feature,
        }
    }
}
