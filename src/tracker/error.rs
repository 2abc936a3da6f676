//! Errors that abort a tracking step.

use std::fmt;

use thiserror::Error;

use crate::tracker::kalman_filter::KalmanError;
use crate::tracker::lapjv::LapjvError;

/// Association stage of a tracking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationStage {
    /// High-confidence detections against active and lost tracks.
    First,
    /// Low-confidence detections against still unmatched tracked tracks.
    Second,
    /// Remaining high-confidence detections against unconfirmed tracks.
    Unconfirmed,
}

impl fmt::Display for AssociationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "first association",
            Self::Second => "second association",
            Self::Unconfirmed => "unconfirmed association",
        };
        f.write_str(name)
    }
}

/// Error aborting a tracking step. The tracker keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("kalman update of track {track_id} failed in {stage}")]
    Kalman {
        stage: AssociationStage,
        track_id: u64,
        #[source]
        source: KalmanError,
    },
    #[error("linear assignment failed in {stage}")]
    Assignment {
        stage: AssociationStage,
        #[source]
        source: LapjvError,
    },
}
