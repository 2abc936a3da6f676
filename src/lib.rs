//! BYTE multi-object tracker.
//!
//! Turns per-frame object detections into tracks with stable identities using
//! a constant-velocity Kalman filter and cascaded IoU association solved with
//! the Jonker-Volgenant linear assignment algorithm.
//!
//! ```
//! use bytetracker::{BYTETracker, Object, Rect, TrackerConfig};
//!
//! let mut tracker = BYTETracker::new(TrackerConfig::default());
//! let objects = vec![Object::new(Rect::new(10.0, 20.0, 40.0, 80.0), 0, 0.9, 1)];
//! let tracks = tracker.update(&objects).unwrap();
//! assert_eq!(tracks[0].track_id, 1);
//! ```

pub mod integration;
pub mod tracker;

pub use integration::{
    DetectResult, DetectionSource, IntoObjects, ObjectBuilder, PipelineError, TrackerPipeline,
};
pub use tracker::{
    AssociationStage, BYTETracker, KalmanError, KalmanFilter, LapjvError, Object, Point, Rect,
    STrack, TrackState, TrackerConfig, TrackerError, Trail,
};
