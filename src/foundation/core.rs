/// Absolute 0-based frame index in animation timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of frames to iterate for a playback duration.
///
/// Non-positive durations are a degenerate export, not an error.
pub fn frame_count(duration: i64) -> u64 {
    u64::try_from(duration).unwrap_or(0)
}
