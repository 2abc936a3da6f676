//! Single object track (STrack) for multi-object tracking.

use ndarray::{Array1, Array2};

use crate::tracker::kalman_filter::{KalmanError, KalmanFilter};
use crate::tracker::object::Object;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Single object track.
#[derive(Debug, Clone)]
pub struct STrack {
    /// Unique track identifier, 0 until activated
    pub track_id: u64,
    /// Current track state
    pub state: TrackState,
    /// Whether the track has been activated (confirmed)
    pub is_activated: bool,
    /// Score of the most recently matched detection
    pub score: f32,
    /// Last frame this track was updated in
    pub frame_id: u32,
    /// Frame ID when track was started
    pub start_frame: u32,
    /// Number of consecutive successful updates
    pub tracklet_len: u32,
    /// Caller supplied ID of the most recently matched detection
    pub detection_id: i64,
    /// Class label
    pub label: i32,
    /// ReID embedding of the most recently matched detection
    pub feature: Option<Vec<f32>>,
    /// Kalman filter state mean (8-dim)
    pub mean: Option<Array1<f64>>,
    /// Kalman filter state covariance (8x8)
    pub covariance: Option<Array2<f64>>,
    /// Original detection bounding box (TLWH format)
    pub tlwh: Rect,
}

impl STrack {
    /// Create a new STrack from a detection.
    pub fn new(tlwh: Rect, score: f32, detection_id: i64, label: i32) -> Self {
        Self {
            track_id: 0,
            state: TrackState::New,
            is_activated: false,
            score,
            frame_id: 0,
            start_frame: 0,
            tracklet_len: 0,
            detection_id,
            label,
            feature: None,
            mean: None,
            covariance: None,
            tlwh,
        }
    }

    pub fn from_object(object: &Object) -> Self {
        let mut track = Self::new(object.rect, object.prob, object.id, object.label);
        track.feature = object.feature.clone();
        track
    }

    /// Get the current bounding box in TLWH format.
    ///
    /// Derived from the Kalman mean once the track has been activated.
    pub fn tlwh(&self) -> Rect {
        match &self.mean {
            Some(mean) => {
                let cx = mean[0] as f32;
                let cy = mean[1] as f32;
                let aspect = mean[2] as f32;
                let h = mean[3] as f32;
                Rect::from_xyah(cx, cy, aspect, h)
            }
            None => self.tlwh,
        }
    }

    pub fn rect(&self) -> Rect {
        self.tlwh()
    }

    pub fn end_frame(&self) -> u32 {
        self.frame_id
    }

    /// Number of frames since the track was started.
    pub fn age(&self) -> u32 {
        self.frame_id.saturating_sub(self.start_frame)
    }

    /// Start a new tracklet. Only tracks born on the first frame are
    /// confirmed immediately.
    pub fn activate(&mut self, kalman_filter: &KalmanFilter, frame_id: u32, track_id: u64) {
        let (mean, covariance) = kalman_filter.initiate(xyah_f64(&self.tlwh));

        self.mean = Some(mean);
        self.covariance = Some(covariance);
        self.tracklet_len = 0;
        self.state = TrackState::Tracked;

        if frame_id == 1 {
            self.is_activated = true;
        }

        self.track_id = track_id;
        self.frame_id = frame_id;
        self.start_frame = frame_id;
    }

    /// Resume a lost track. `new_track_id` replaces the identity when given.
    pub fn re_activate(
        &mut self,
        new_track: &STrack,
        kalman_filter: &KalmanFilter,
        frame_id: u32,
        new_track_id: Option<u64>,
    ) -> Result<(), KalmanError> {
        self.correct(kalman_filter, &new_track.rect())?;

        self.tracklet_len = 0;
        self.state = TrackState::Tracked;
        self.is_activated = true;
        self.frame_id = frame_id;
        self.take_detection(new_track);

        if let Some(track_id) = new_track_id {
            self.track_id = track_id;
        }

        Ok(())
    }

    pub fn update(
        &mut self,
        new_track: &STrack,
        kalman_filter: &KalmanFilter,
        frame_id: u32,
    ) -> Result<(), KalmanError> {
        self.correct(kalman_filter, &new_track.rect())?;

        self.frame_id = frame_id;
        self.tracklet_len += 1;
        self.state = TrackState::Tracked;
        self.is_activated = true;
        self.take_detection(new_track);

        Ok(())
    }

    pub fn predict(&mut self, kalman_filter: &KalmanFilter) {
        if let (Some(mean), Some(cov)) = (&self.mean, &self.covariance) {
            let mut mean_to_predict = mean.clone();
            if self.state != TrackState::Tracked {
                mean_to_predict[7] = 0.0;
            }
            let (new_mean, new_cov) = kalman_filter.predict(&mean_to_predict, cov);
            self.mean = Some(new_mean);
            self.covariance = Some(new_cov);
        }
    }

    pub fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
    }

    pub fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }

    pub fn multi_predict(stracks: &mut [STrack], kalman_filter: &KalmanFilter) {
        for strack in stracks.iter_mut() {
            strack.predict(kalman_filter);
        }
    }

    /// Kalman correction towards `measurement`. Leaves the state untouched
    /// on failure.
    fn correct(&mut self, kalman_filter: &KalmanFilter, measurement: &Rect) -> Result<(), KalmanError> {
        let xyah = xyah_f64(measurement);
        let (mean, covariance) = match (&self.mean, &self.covariance) {
            (Some(mean), Some(cov)) => kalman_filter.update(mean, cov, xyah)?,
            _ => kalman_filter.initiate(xyah),
        };

        self.mean = Some(mean);
        self.covariance = Some(covariance);
        Ok(())
    }

    fn take_detection(&mut self, new_track: &STrack) {
        self.score = new_track.score;
        self.detection_id = new_track.detection_id;
        if new_track.feature.is_some() {
            self.feature = new_track.feature.clone();
        }
    }
}

fn xyah_f64(rect: &Rect) -> [f64; 4] {
    rect.to_xyah().map(f64::from)
}
