//! Frame loop gluing a [`DetectionSource`] to a [`BYTETracker`].

use thiserror::Error;

use crate::tracker::{BYTETracker, STrack, TrackerConfig, TrackerError};

use super::DetectionSource;

/// Failure of one pipeline frame.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("detection failed: {0}")]
    Detection(E),
    #[error(transparent)]
    Tracking(#[from] TrackerError),
}

/// Owns a detector and a tracker and feeds one into the other per frame.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: BYTETracker,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    pub fn new(detector: D, config: TrackerConfig) -> Self {
        Self {
            detector,
            tracker: BYTETracker::new(config),
        }
    }

    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default())
    }

    /// Run detection on one frame and update the tracker with the result.
    ///
    /// Returns the confirmed tracks of the frame.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<STrack>, PipelineError<D::Error>> {
        let objects = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        Ok(self.tracker.update(&objects)?)
    }

    /// Restart tracking, e.g. when the input stream loops.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn tracker(&self) -> &BYTETracker {
        &self.tracker
    }

    /// Direct tracker access, e.g. to read the lost pool.
    pub fn tracker_mut(&mut self) -> &mut BYTETracker {
        &mut self.tracker
    }
}
