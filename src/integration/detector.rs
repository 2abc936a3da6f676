//! Traits and types for feeding detector output into the tracker.

use crate::tracker::{Object, Rect};

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker.
///
/// # Example
///
/// ```
/// use bytetracker::{DetectionSource, Object};
///
/// struct MyDetector;
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, _input: &[u8], _width: u32, _height: u32) -> Result<Vec<Object>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return the frame's objects.
    fn detect(&mut self, input: &[u8], width: u32, height: u32)
    -> Result<Vec<Object>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to [`Object`].
pub trait IntoObjects {
    /// Convert the output into a vector of objects.
    fn into_objects(self) -> Vec<Object>;
}

impl IntoObjects for Vec<Object> {
    fn into_objects(self) -> Vec<Object> {
        self
    }
}

/// Post-processed detector box in pixel corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectResult {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub class: i32,
    pub probability: f32,
    pub id: i64,
}

impl From<&DetectResult> for Object {
    fn from(det: &DetectResult) -> Self {
        Object::new(
            Rect::new(
                det.left as f32,
                det.top as f32,
                (det.right - det.left) as f32,
                (det.bottom - det.top) as f32,
            ),
            det.class,
            det.probability,
            det.id,
        )
    }
}

impl IntoObjects for &[DetectResult] {
    fn into_objects(self) -> Vec<Object> {
        self.iter().map(Object::from).collect()
    }
}

impl IntoObjects for Vec<DetectResult> {
    fn into_objects(self) -> Vec<Object> {
        self.as_slice().into_objects()
    }
}
