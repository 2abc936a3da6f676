//! Bounded per-track history of box centers, used to draw trails.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::tracker::strack::STrack;

/// Integer center point of a tracked box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct Trail {
    size: usize,
    history: HashMap<u64, VecDeque<Point>>,
}

impl Trail {
    /// Keep at most `size` most recent points per track.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            history: HashMap::new(),
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Record the current center of `track`.
    pub fn add(&mut self, track: &STrack) {
        let (cx, cy) = track.rect().center();
        let points = self.history.entry(track.track_id).or_default();
        points.push_back(Point {
            x: cx as i32,
            y: cy as i32,
        });
        while points.len() > self.size {
            points.pop_front();
        }
    }

    /// Point history of `track_id`, oldest first.
    pub fn points(&self, track_id: u64) -> Option<&VecDeque<Point>> {
        self.history.get(&track_id)
    }

    /// Forget every track not present in `tracks`.
    pub fn retain_tracks(&mut self, tracks: &[STrack]) {
        let alive: HashSet<u64> = tracks.iter().map(|t| t.track_id).collect();
        self.history.retain(|id, _| alive.contains(id));
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
