//! Matching utilities for multi-object tracking.

use ndarray::Array2;

use crate::tracker::lapjv::{self, LapjvError};
use crate::tracker::rect::{Rect, iou_batch};

/// Compute IoU distance matrix between tracks and detections.
pub fn iou_distance(track_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    iou_batch(track_boxes, det_boxes).mapv_into(|iou| 1.0 - iou)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Pair rows (tracks) with columns (detections) at minimum total cost,
/// never accepting a pair that costs more than `thresh`.
pub fn linear_assignment(
    cost_matrix: &Array2<f32>,
    thresh: f32,
) -> Result<AssignmentResult, LapjvError> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return Ok(AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_rows).collect(),
            unmatched_detections: (0..num_cols).collect(),
        });
    }

    let solution = lapjv::exec_lapjv(cost_matrix, true, thresh)?;

    let mut matches = vec![];
    let mut unmatched_tracks = vec![];
    for (row_idx, col) in solution.row_solution.iter().enumerate() {
        match col {
            Some(col_idx) => matches.push((row_idx, *col_idx)),
            None => unmatched_tracks.push(row_idx),
        }
    }

    let unmatched_detections = solution
        .col_solution
        .iter()
        .enumerate()
        .filter_map(|(j, row)| row.is_none().then_some(j))
        .collect();

    Ok(AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    })
}
