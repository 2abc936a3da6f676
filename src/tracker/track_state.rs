/// Lifecycle of an [`STrack`](crate::STrack).
///
/// `New -> Tracked <-> Lost -> Removed`; unconfirmed tracks may also go
/// straight from `Tracked` to `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackState {
    /// Built from a detection, no Kalman state yet
    #[default]
    New,
    /// Matched in the latest frame
    Tracked,
    /// Unmatched but still eligible for re-identification
    Lost,
    /// Dropped for good, its ID is never reused
    Removed,
}
