//! Main BYTETracker algorithm implementation.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::tracker::error::{AssociationStage, TrackerError};
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::object::Object;
use crate::tracker::rect::Rect;
use crate::tracker::strack::STrack;
use crate::tracker::track_state::TrackState;

/// Cost limit when matching leftover tracked tracks with low-score detections.
const LOW_SCORE_MATCH_THRESH: f32 = 0.5;
/// Cost limit when matching unconfirmed tracks with leftover detections.
const UNCONFIRMED_MATCH_THRESH: f32 = 0.7;
/// Tracked and lost tracks closer than this IoU distance are duplicates.
const DUPLICATE_IOU_DISTANCE: f32 = 0.15;

/// Configuration for the BYTETracker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TrackerConfig {
    /// Frame rate of the input sequence
    pub frame_rate: u32,
    /// Frames a lost track is kept at 30 fps
    pub track_buffer: u32,
    /// Detections scoring at least this are high-confidence
    pub track_thresh: f32,
    /// Minimum score for an unmatched detection to start a new track
    pub high_thresh: f32,
    /// IoU distance limit of the first association
    pub match_thresh: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            track_buffer: 30,
            track_thresh: 0.5,
            high_thresh: 0.6,
            match_thresh: 0.8,
        }
    }
}

impl TrackerConfig {
    /// Frames a track may stay lost before it is removed.
    pub fn max_time_lost(&self) -> u32 {
        (self.frame_rate as f32 / 30.0 * self.track_buffer as f32) as u32
    }
}

#[derive(Debug, Clone)]
pub struct BYTETracker {
    tracked_stracks: Vec<STrack>,
    lost_stracks: Vec<STrack>,
    /// Tracks removed by the latest frame
    removed_stracks: Vec<STrack>,
    removed_track_ids: HashSet<u64>,
    frame_id: u32,
    track_id_count: u64,
    config: TrackerConfig,
    max_time_lost: u32,
    kalman_filter: KalmanFilter,
}

/// Pools produced by one tracking step, committed only when the step succeeds.
struct FrameOutcome {
    frame_id: u32,
    track_id_count: u64,
    tracked_stracks: Vec<STrack>,
    lost_stracks: Vec<STrack>,
    removed_stracks: Vec<STrack>,
}

impl BYTETracker {
    pub fn new(config: TrackerConfig) -> Self {
        let max_time_lost = config.max_time_lost();
        Self {
            tracked_stracks: Vec::new(),
            lost_stracks: Vec::new(),
            removed_stracks: Vec::new(),
            removed_track_ids: HashSet::new(),
            frame_id: 0,
            track_id_count: 0,
            config,
            max_time_lost,
            kalman_filter: KalmanFilter::default(),
        }
    }

    pub fn with_params(
        frame_rate: u32,
        track_buffer: u32,
        track_thresh: f32,
        high_thresh: f32,
        match_thresh: f32,
    ) -> Self {
        Self::new(TrackerConfig {
            frame_rate,
            track_buffer,
            track_thresh,
            high_thresh,
            match_thresh,
        })
    }

    /// Drop all tracks and restart frame and track ID counting, e.g. when a
    /// looping video starts over.
    pub fn reset(&mut self) {
        self.frame_id = 0;
        self.track_id_count = 0;
        self.tracked_stracks.clear();
        self.lost_stracks.clear();
        self.removed_stracks.clear();
        self.removed_track_ids.clear();
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn max_time_lost(&self) -> u32 {
        self.max_time_lost
    }

    /// Number of frames processed since creation or the last reset.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    pub fn tracked_stracks(&self) -> &[STrack] {
        &self.tracked_stracks
    }

    pub fn lost_stracks(&self) -> &[STrack] {
        &self.lost_stracks
    }

    /// Tracks removed during the most recent frame.
    pub fn removed_stracks(&self) -> &[STrack] {
        &self.removed_stracks
    }

    /// IDs of every track removed since creation or the last reset.
    pub fn removed_track_ids(&self) -> &HashSet<u64> {
        &self.removed_track_ids
    }

    pub fn is_removed(&self, track_id: u64) -> bool {
        self.removed_track_ids.contains(&track_id)
    }

    /// Run one tracking step and return the confirmed tracks.
    ///
    /// On error the tracker is left exactly as it was before the call.
    pub fn update(&mut self, objects: &[Object]) -> Result<Vec<STrack>, TrackerError> {
        let outcome = match self.step(objects) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("frame {} aborted: {err}", self.frame_id + 1);
                return Err(err);
            }
        };

        self.frame_id = outcome.frame_id;
        self.track_id_count = outcome.track_id_count;
        self.tracked_stracks = outcome.tracked_stracks;
        self.lost_stracks = outcome.lost_stracks;
        self.removed_track_ids
            .extend(outcome.removed_stracks.iter().map(|t| t.track_id));
        self.removed_stracks = outcome.removed_stracks;

        Ok(self
            .tracked_stracks
            .iter()
            .filter(|t| t.is_activated)
            .cloned()
            .collect())
    }

    fn step(&self, objects: &[Object]) -> Result<FrameOutcome, TrackerError> {
        let frame_id = self.frame_id + 1;
        let mut track_id_count = self.track_id_count;
        let kf = &self.kalman_filter;

        let mut activated_stracks = Vec::new();
        let mut refind_stracks = Vec::new();
        let mut lost_stracks = Vec::new();
        let mut removed_stracks = Vec::new();

        // Step 1: Split detections into high-score and low-score
        let (detections, detections_low): (Vec<STrack>, Vec<STrack>) = objects
            .iter()
            .map(STrack::from_object)
            .partition(|t| t.score >= self.config.track_thresh);

        // Create track pool
        let (mut unconfirmed, tracked_stracks): (Vec<STrack>, Vec<STrack>) = self
            .tracked_stracks
            .iter()
            .cloned()
            .partition(|t| !t.is_activated);

        // Entries past `n_active` come from the lost pool.
        let n_active = tracked_stracks.len();
        let mut strack_pool = joint_stracks(tracked_stracks, &self.lost_stracks);

        trace!(
            "frame {frame_id}: {} high / {} low detections, {} pooled, {} unconfirmed",
            detections.len(),
            detections_low.len(),
            strack_pool.len(),
            unconfirmed.len()
        );

        // Step 2: First association, with high score detections
        STrack::multi_predict(&mut strack_pool, kf);

        let dists = matching::iou_distance(&rects(&strack_pool), &rects(&detections));
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = assign(&dists, self.config.match_thresh, AssociationStage::First)?;

        trace!("frame {frame_id}: first association matched {}", matches.len());

        for (itracked, idet) in matches {
            associate(
                &mut strack_pool[itracked],
                &detections[idet],
                kf,
                frame_id,
                AssociationStage::First,
                &mut activated_stracks,
                &mut refind_stracks,
            )?;
        }

        // Step 3: Second association, with low score detection boxes
        let r_tracked: Vec<usize> = unmatched_tracks
            .into_iter()
            .filter(|&idx| strack_pool[idx].state == TrackState::Tracked)
            .collect();

        let r_rects: Vec<Rect> = r_tracked.iter().map(|&idx| strack_pool[idx].rect()).collect();
        let dists = matching::iou_distance(&r_rects, &rects(&detections_low));
        let AssignmentResult {
            matches,
            unmatched_tracks,
            ..
        } = assign(&dists, LOW_SCORE_MATCH_THRESH, AssociationStage::Second)?;

        trace!("frame {frame_id}: second association matched {}", matches.len());

        for (itracked, idet) in matches {
            associate(
                &mut strack_pool[r_tracked[itracked]],
                &detections_low[idet],
                kf,
                frame_id,
                AssociationStage::Second,
                &mut activated_stracks,
                &mut refind_stracks,
            )?;
        }

        for idx in unmatched_tracks {
            let track = &mut strack_pool[r_tracked[idx]];
            if track.state != TrackState::Lost {
                track.mark_lost();
                debug!("frame {frame_id}: track {} lost", track.track_id);
                lost_stracks.push(track.clone());
            }
        }

        // Deal with unconfirmed tracks, usually tracks with only one beginning frame
        let detections_rem: Vec<&STrack> = unmatched_detections
            .iter()
            .map(|&idx| &detections[idx])
            .collect();

        let unconfirmed_rects = rects(&unconfirmed);
        let det_rem_rects: Vec<Rect> = detections_rem.iter().map(|t| t.rect()).collect();
        let dists = matching::iou_distance(&unconfirmed_rects, &det_rem_rects);
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = assign(&dists, UNCONFIRMED_MATCH_THRESH, AssociationStage::Unconfirmed)?;

        for (itracked, idet) in matches {
            let track = &mut unconfirmed[itracked];
            let track_id = track.track_id;
            track
                .update(detections_rem[idet], kf, frame_id)
                .map_err(|source| TrackerError::Kalman {
                    stage: AssociationStage::Unconfirmed,
                    track_id,
                    source,
                })?;
            debug!("frame {frame_id}: track {track_id} confirmed");
            activated_stracks.push(track.clone());
        }

        for idx in unmatched_tracks {
            let mut track = unconfirmed[idx].clone();
            track.mark_removed();
            debug!("frame {frame_id}: unconfirmed track {} removed", track.track_id);
            removed_stracks.push(track);
        }

        // Step 4: Init new stracks
        for idx in unmatched_detections {
            let det = detections_rem[idx];
            if det.score < self.config.high_thresh {
                continue;
            }
            let mut track = det.clone();
            track_id_count += 1;
            track.activate(kf, frame_id, track_id_count);
            debug!("frame {frame_id}: track {track_id_count} started");
            activated_stracks.push(track);
        }

        // Step 5: Update state
        let mut previous_lost = strack_pool.split_off(n_active);
        for track in previous_lost.iter_mut() {
            if frame_id.saturating_sub(track.end_frame()) > self.max_time_lost {
                track.mark_removed();
                debug!("frame {frame_id}: track {} expired", track.track_id);
                removed_stracks.push(track.clone());
            }
        }

        let tracked_stracks = joint_stracks(activated_stracks, &refind_stracks);

        // Earlier removals never reach the lost pool, only this frame's can.
        let lost = joint_stracks(sub_stracks(previous_lost, &tracked_stracks), &lost_stracks);
        let lost = sub_stracks(lost, &removed_stracks);

        let (tracked_stracks, lost_stracks) = remove_duplicate_stracks(&tracked_stracks, &lost);

        Ok(FrameOutcome {
            frame_id,
            track_id_count,
            tracked_stracks,
            lost_stracks,
            removed_stracks,
        })
    }
}

fn rects(stracks: &[STrack]) -> Vec<Rect> {
    stracks.iter().map(|t| t.rect()).collect()
}

fn assign(
    dists: &ndarray::Array2<f32>,
    thresh: f32,
    stage: AssociationStage,
) -> Result<AssignmentResult, TrackerError> {
    matching::linear_assignment(dists, thresh)
        .map_err(|source| TrackerError::Assignment { stage, source })
}

/// Apply a pool match: tracked tracks are updated, lost ones re-found with
/// their original identity.
fn associate(
    track: &mut STrack,
    det: &STrack,
    kalman_filter: &KalmanFilter,
    frame_id: u32,
    stage: AssociationStage,
    activated: &mut Vec<STrack>,
    refind: &mut Vec<STrack>,
) -> Result<(), TrackerError> {
    let track_id = track.track_id;
    let to_error = |source| TrackerError::Kalman {
        stage,
        track_id,
        source,
    };

    if track.state == TrackState::Tracked {
        track.update(det, kalman_filter, frame_id).map_err(to_error)?;
        activated.push(track.clone());
    } else {
        track
            .re_activate(det, kalman_filter, frame_id, None)
            .map_err(to_error)?;
        debug!("frame {frame_id}: track {track_id} re-found");
        refind.push(track.clone());
    }

    Ok(())
}

/// Concatenate two track lists, skipping entries of `tlistb` whose ID is
/// already present.
pub fn joint_stracks(tlista: Vec<STrack>, tlistb: &[STrack]) -> Vec<STrack> {
    let mut exists = HashSet::new();
    let mut res = Vec::with_capacity(tlista.len() + tlistb.len());
    for t in tlista {
        exists.insert(t.track_id);
        res.push(t);
    }
    for t in tlistb {
        if exists.insert(t.track_id) {
            res.push(t.clone());
        }
    }
    res
}

/// Tracks of `tlista` whose ID does not appear in `tlistb`, in order.
pub fn sub_stracks(tlista: Vec<STrack>, tlistb: &[STrack]) -> Vec<STrack> {
    let b_ids: HashSet<u64> = tlistb.iter().map(|t| t.track_id).collect();
    tlista
        .into_iter()
        .filter(|t| !b_ids.contains(&t.track_id))
        .collect()
}

/// Resolve overlapping tracked/lost pairs, keeping the older tracklet.
pub fn remove_duplicate_stracks(
    stracksa: &[STrack],
    stracksb: &[STrack],
) -> (Vec<STrack>, Vec<STrack>) {
    if stracksa.is_empty() || stracksb.is_empty() {
        return (stracksa.to_vec(), stracksb.to_vec());
    }

    let dists = matching::iou_distance(&rects(stracksa), &rects(stracksb));

    let mut dupa = vec![false; stracksa.len()];
    let mut dupb = vec![false; stracksb.len()];

    for ((i, j), &dist) in dists.indexed_iter() {
        if dist < DUPLICATE_IOU_DISTANCE {
            if stracksa[i].age() > stracksb[j].age() {
                dupb[j] = true;
            } else {
                dupa[i] = true;
            }
        }
    }

    let resa = stracksa
        .iter()
        .zip(&dupa)
        .filter(|(_, dup)| !**dup)
        .map(|(t, _)| t.clone())
        .collect();
    let resb = stracksb
        .iter()
        .zip(&dupb)
        .filter(|(_, dup)| !**dup)
        .map(|(t, _)| t.clone())
        .collect();

    (resa, resb)
}
