//! Integration module for connecting object detection backends with the tracker.
//!
//! The tracker itself only consumes [`Object`](crate::Object) lists; this
//! module provides the glue to produce them from detector output and to run
//! detection and tracking frame by frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::ObjectBuilder;
pub use detector::{DetectResult, DetectionSource, IntoObjects};
pub use pipeline::{PipelineError, TrackerPipeline};
