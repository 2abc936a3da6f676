mod byte_tracker;
mod error;
mod kalman_filter;
pub mod lapjv;
pub mod matching;
mod object;
mod rect;
mod strack;
mod track_state;
mod trail;

pub use byte_tracker::{
    BYTETracker, TrackerConfig, joint_stracks, remove_duplicate_stracks, sub_stracks,
};
pub use error::{AssociationStage, TrackerError};
pub use kalman_filter::{KalmanError, KalmanFilter};
pub use lapjv::{Assignment, LapjvError};
pub use matching::AssignmentResult;
pub use object::Object;
pub use rect::{Rect, iou_batch};
pub use strack::STrack;
pub use track_state::TrackState;
pub use trail::{Point, Trail};
