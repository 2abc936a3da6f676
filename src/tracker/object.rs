//! Detector output consumed by the tracker.

use crate::tracker::rect::Rect;

/// A single detection for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    /// Bounding box in TLWH format
    pub rect: Rect,
    /// Class label reported by the detector
    pub label: i32,
    /// Detection confidence
    pub prob: f32,
    /// Caller supplied ID, copied onto the track that matches this detection
    pub id: i64,
    /// Optional ReID embedding
    pub feature: Option<Vec<f32>>,
}

impl Object {
    pub fn new(rect: Rect, label: i32, prob: f32, id: i64) -> Self {
        Self {
            rect,
            label,
            prob,
            id,
            feature: None,
        }
    }

    /// Attach a ReID embedding to this detection.
    pub fn with_feature(mut self, feature: Vec<f32>) -> Self {
        self.feature = Some(feature);
        self
    }
}
