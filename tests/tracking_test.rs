use bytetracker::{BYTETracker, Object, ObjectBuilder, Rect, STrack, TrackState, TrackerConfig};

fn det(x1: f32, y1: f32, x2: f32, y2: f32, score: f32, id: i64) -> Object {
    ObjectBuilder::new()
        .tlbr(x1, y1, x2, y2)
        .score(score)
        .id(id)
        .build()
}

fn ids(tracks: &[STrack]) -> Vec<u64> {
    tracks.iter().map(|t| t.track_id).collect()
}

#[test]
fn test_basic_tracking() {
    let mut tracker = BYTETracker::new(TrackerConfig::default());

    // Frame 1: tracks born on the first frame are confirmed immediately
    let tracks1 = tracker.update(&[det(100.0, 100.0, 200.0, 200.0, 0.9, 1)]).unwrap();
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;
    assert_eq!(id1, 1);

    // Frame 2: Same object moved slightly
    let tracks2 = tracker.update(&[det(105.0, 105.0, 205.0, 205.0, 0.9, 2)]).unwrap();
    assert_eq!(ids(&tracks2), vec![id1]);
    assert_eq!(tracks2[0].detection_id, 2);

    // Frame 3: Object occluded (low score), recovered by the second association
    let tracks3 = tracker.update(&[det(110.0, 110.0, 210.0, 210.0, 0.2, 3)]).unwrap();
    assert_eq!(ids(&tracks3), vec![id1]);
    assert_eq!(tracks3[0].score, 0.2);

    // Frame 4: Object disappears
    let tracks4 = tracker.update(&[]).unwrap();
    assert!(tracks4.is_empty());
    assert_eq!(ids(tracker.lost_stracks()), vec![id1]);
    assert_eq!(tracker.lost_stracks()[0].state, TrackState::Lost);

    // Frame 5: Object reappears and keeps its identity
    let tracks5 = tracker.update(&[det(115.0, 115.0, 215.0, 215.0, 0.9, 5)]).unwrap();
    assert_eq!(ids(&tracks5), vec![id1]);
    assert!(tracker.lost_stracks().is_empty());
}

#[test]
fn test_empty_frames() {
    let mut tracker = BYTETracker::new(TrackerConfig::default());
    for _ in 0..3 {
        assert!(tracker.update(&[]).unwrap().is_empty());
    }
    assert_eq!(tracker.frame_id(), 3);
}

struct Expected {
    track_id: u64,
    tlbr: [f32; 4],
    score: f32,
    detection_id: i64,
}

fn expected(track_id: u64, tlbr: [f32; 4], score: f32, detection_id: i64) -> Expected {
    Expected {
        track_id,
        tlbr,
        score,
        detection_id,
    }
}

fn assert_frame(frame: usize, tracks: &[STrack], expected: &[Expected]) {
    const TOLERANCE: f32 = 1e-2;

    assert_eq!(
        tracks.len(),
        expected.len(),
        "frame {frame}: expected tracks {:?}, got {:?}",
        expected.iter().map(|e| e.track_id).collect::<Vec<_>>(),
        ids(tracks)
    );

    for (track, exp) in tracks.iter().zip(expected) {
        let tlbr = track.rect().to_tlbr();
        assert_eq!(track.track_id, exp.track_id, "frame {frame}");
        assert_eq!(track.detection_id, exp.detection_id, "frame {frame}, track {}", exp.track_id);
        assert!(
            (track.score - exp.score).abs() <= TOLERANCE,
            "frame {frame}, track {}: score {} != {}",
            exp.track_id,
            track.score,
            exp.score
        );
        for k in 0..4 {
            assert!(
                (tlbr[k] - exp.tlbr[k]).abs() <= TOLERANCE,
                "frame {frame}, track {}: box {:?} != {:?}",
                exp.track_id,
                tlbr,
                exp.tlbr
            );
        }
    }
}

/// Three frames of person detections with the tracks a reference
/// implementation produced for them.
#[test]
fn test_reference_sequence() {
    let mut tracker = BYTETracker::with_params(30, 30, 0.5, 0.6, 0.8);

    let frame0 = [
        det(79.0, 205.0, 169.0, 609.0, 85.10, 1),
        det(196.0, 222.0, 258.0, 451.0, 83.98, 2),
        det(270.0, 247.0, 331.0, 456.0, 82.81, 3),
        det(471.0, 205.0, 584.0, 638.0, 82.61, 4),
        det(158.0, 302.0, 201.0, 506.0, 78.12, 5),
        det(328.0, 234.0, 381.0, 445.0, 76.65, 6),
        det(364.0, 218.0, 434.0, 450.0, 76.12, 7),
        det(347.0, 148.0, 378.0, 238.0, 46.30, 8),
        det(296.0, 184.0, 342.0, 408.0, 43.97, 9),
        det(132.0, 201.0, 176.0, 319.0, 41.19, 10),
        det(69.0, 191.0, 120.0, 391.0, 31.02, 11),
        det(627.0, 237.0, 640.0, 284.0, 24.46, 12),
    ];
    let tracks = tracker.update(&frame0).unwrap();
    assert_frame(
        0,
        &tracks,
        &[
            expected(1, [79.0, 205.0, 169.0, 609.0], 85.10, 1),
            expected(2, [196.0, 222.0, 258.0, 451.0], 83.98, 2),
            expected(3, [270.0, 247.0, 331.0, 456.0], 82.81, 3),
            expected(4, [471.0, 205.0, 584.0, 638.0], 82.61, 4),
            expected(5, [158.0, 302.0, 201.0, 506.0], 78.12, 5),
            expected(6, [328.0, 234.0, 381.0, 445.0], 76.65, 6),
            expected(7, [364.0, 218.0, 434.0, 450.0], 76.12, 7),
            expected(8, [347.0, 148.0, 378.0, 238.0], 46.30, 8),
            expected(9, [296.0, 184.0, 342.0, 408.0], 43.97, 9),
            expected(10, [132.0, 201.0, 176.0, 319.0], 41.19, 10),
            expected(11, [69.0, 191.0, 120.0, 391.0], 31.02, 11),
            expected(12, [627.0, 237.0, 640.0, 284.0], 24.46, 12),
        ],
    );

    let frame1 = [
        det(471.0, 212.0, 584.0, 633.0, 83.76, 13),
        det(197.0, 219.0, 259.0, 453.0, 83.59, 14),
        det(271.0, 242.0, 331.0, 457.0, 81.64, 15),
        det(83.0, 220.0, 166.0, 610.0, 78.91, 16),
        det(157.0, 303.0, 204.0, 502.0, 77.43, 17),
        det(364.0, 218.0, 434.0, 450.0, 74.97, 18),
        det(327.0, 232.0, 383.0, 446.0, 73.54, 19),
        det(346.0, 149.0, 377.0, 238.0, 50.58, 20),
        det(70.0, 181.0, 125.0, 397.0, 43.71, 21),
        det(297.0, 185.0, 343.0, 416.0, 42.02, 22),
        det(133.0, 206.0, 178.0, 319.0, 37.11, 23),
        det(589.0, 280.0, 639.0, 554.0, 34.46, 24),
    ];
    let tracks = tracker.update(&frame1).unwrap();
    assert_frame(
        1,
        &tracks,
        &[
            expected(1, [80.82532, 218.01653, 168.04245, 609.86774], 78.91, 16),
            expected(2, [196.29364, 219.39668, 259.44189, 452.73553], 83.59, 14),
            expected(3, [269.70096, 242.66116, 332.16684, 456.86777], 81.64, 15),
            expected(4, [472.32794, 211.07437, 582.67206, 633.66113], 83.76, 13),
            expected(5, [159.27533, 302.86774, 201.46021, 502.52890], 77.43, 17),
            expected(6, [328.08496, 232.26445, 381.78284, 445.86774], 73.54, 19),
            expected(7, [364.0, 218.0, 434.0, 450.0], 74.97, 18),
            expected(8, [346.27829, 148.86777, 376.98615, 238.0], 50.58, 20),
            expected(9, [296.25809, 184.86777, 343.47742, 414.94214], 42.02, 22),
            expected(10, [134.08234, 205.33885, 176.52097, 319.0], 37.11, 23),
            expected(11, [69.83383, 182.32233, 124.37277, 396.20660], 43.71, 21),
        ],
    );
    assert_eq!(ids(tracker.lost_stracks()), vec![12]);

    let frame2 = [
        det(472.0, 204.0, 584.0, 637.0, 85.21, 25),
        det(199.0, 221.0, 260.0, 450.0, 81.64, 26),
        det(158.0, 303.0, 205.0, 502.0, 78.59, 27),
        det(84.0, 228.0, 167.0, 609.0, 77.73, 28),
        det(269.0, 240.0, 332.0, 458.0, 77.34, 29),
        det(363.0, 218.0, 433.0, 450.0, 75.57, 30),
        det(329.0, 233.0, 381.0, 445.0, 73.63, 31),
        det(139.0, 206.0, 179.0, 321.0, 46.31, 32),
        det(78.0, 181.0, 134.0, 385.0, 44.66, 33),
        det(296.0, 185.0, 346.0, 411.0, 42.80, 34),
        det(589.0, 263.0, 640.0, 571.0, 38.81, 35),
        det(346.0, 149.0, 377.0, 236.0, 33.45, 36),
    ];
    let tracks = tracker.update(&frame2).unwrap();
    assert_frame(
        2,
        &tracks,
        &[
            expected(1, [82.73601, 226.55103, 167.85870, 609.22614], 77.73, 28),
            expected(2, [198.03925, 220.49619, 260.31458, 450.71359], 81.64, 26),
            expected(3, [268.93002, 240.37213, 332.31552, 457.78845], 77.34, 29),
            expected(4, [471.73502, 205.81052, 584.05249, 636.07104], 85.21, 25),
            expected(5, [160.21704, 303.01587, 202.38788, 501.93652], 78.59, 27),
            expected(6, [328.31689, 232.74213, 381.69986, 445.24115], 73.63, 31),
            expected(7, [363.22046, 218.0, 433.22046, 450.0], 75.57, 30),
            expected(8, [346.41031, 149.01614, 376.55737, 236.43452], 33.45, 36),
            expected(9, [297.41403, 185.01706, 344.16153, 412.28278], 42.80, 34),
            expected(10, [136.95946, 206.07745, 179.62943, 320.58356], 46.31, 32),
            expected(11, [77.51575, 180.81949, 130.46681, 388.02057], 44.66, 33),
            expected(13, [586.94348, 266.39999, 641.85657, 567.59998], 38.81, 35),
        ],
    );
}

#[test]
fn test_track_ids_are_monotonic_and_reset() {
    let mut tracker = BYTETracker::new(TrackerConfig::default());
    let mut highest = 0;

    // A new, far away object enters every frame while older ones vanish.
    for frame in 0..8 {
        let x = frame as f32 * 200.0;
        let out = tracker.update(&[det(x, 0.0, x + 50.0, 100.0, 0.9, frame)]).unwrap();
        for track in tracker.tracked_stracks() {
            assert!(track.track_id >= 1);
        }
        let newest = tracker
            .tracked_stracks()
            .iter()
            .map(|t| t.track_id)
            .max()
            .unwrap();
        assert!(newest > highest, "frame {frame}: id {newest} not above {highest}");
        highest = newest;
        assert!(out.iter().all(|t| t.is_activated));
    }
    assert_eq!(highest, 8);

    tracker.reset();
    assert_eq!(tracker.frame_id(), 0);
    assert!(tracker.tracked_stracks().is_empty());
    assert!(tracker.lost_stracks().is_empty());
    assert!(tracker.removed_stracks().is_empty());

    let out = tracker.update(&[det(10.0, 10.0, 60.0, 110.0, 0.9, 100)]).unwrap();
    assert_eq!(ids(&out), vec![1]);
}

#[test]
fn test_lost_track_expires_after_max_time_lost() {
    // max_time_lost = 30 / 30 * 2 = 2 frames
    let mut tracker = BYTETracker::with_params(30, 2, 0.5, 0.6, 0.8);
    assert_eq!(tracker.max_time_lost(), 2);

    let object = det(100.0, 100.0, 150.0, 200.0, 0.9, 1);
    assert_eq!(ids(&tracker.update(&[object.clone()]).unwrap()), vec![1]);

    // Unmatched on frames 2 and 3: lost but still recoverable.
    tracker.update(&[]).unwrap();
    tracker.update(&[]).unwrap();
    assert_eq!(ids(tracker.lost_stracks()), vec![1]);

    // Third unmatched frame: removed.
    tracker.update(&[]).unwrap();
    assert!(tracker.lost_stracks().is_empty());
    assert_eq!(ids(tracker.removed_stracks()), vec![1]);
    assert_eq!(tracker.removed_stracks()[0].state, TrackState::Removed);

    // The same object now gets a fresh identity and never reports as track 1.
    let out = tracker.update(&[object.clone()]).unwrap();
    assert!(out.is_empty());
    assert_eq!(ids(tracker.tracked_stracks()), vec![2]);

    for _ in 0..3 {
        let out = tracker.update(&[object.clone()]).unwrap();
        assert_eq!(ids(&out), vec![2]);
    }
}

#[test]
fn test_lost_track_recovered_before_expiry() {
    let mut tracker = BYTETracker::with_params(30, 2, 0.5, 0.6, 0.8);
    let object = det(100.0, 100.0, 150.0, 200.0, 0.9, 1);

    tracker.update(&[object.clone()]).unwrap();
    tracker.update(&[]).unwrap();
    tracker.update(&[]).unwrap();

    let out = tracker.update(&[det(100.0, 100.0, 150.0, 200.0, 0.9, 7)]).unwrap();
    assert_eq!(ids(&out), vec![1]);
    assert_eq!(out[0].detection_id, 7);
    assert_eq!(out[0].tracklet_len, 0);
}

#[test]
fn test_label_and_feature_follow_detection() {
    let mut tracker = BYTETracker::new(TrackerConfig::default());
    let object = Object::new(Rect::new(0.0, 0.0, 30.0, 60.0), 3, 0.9, 11)
        .with_feature(vec![0.1, 0.2, 0.3]);

    let out = tracker.update(&[object]).unwrap();
    assert_eq!(out[0].label, 3);
    assert_eq!(out[0].detection_id, 11);
    assert_eq!(out[0].feature.as_deref(), Some(&[0.1, 0.2, 0.3][..]));
}

#[test]
fn test_independent_sessions() {
    let mut a = BYTETracker::new(TrackerConfig::default());
    let mut b = BYTETracker::new(TrackerConfig::default());

    a.update(&[det(0.0, 0.0, 10.0, 20.0, 0.9, 1), det(50.0, 0.0, 60.0, 20.0, 0.9, 2)])
        .unwrap();
    let out = b.update(&[det(0.0, 0.0, 10.0, 20.0, 0.9, 1)]).unwrap();
    assert_eq!(ids(&out), vec![1]);
}
