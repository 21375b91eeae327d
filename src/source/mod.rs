//! Playback sources: the animation side of an export.

/// Directory-of-stills playback source.
pub mod image_dir;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::ExportResult;
use crate::frame::FrameBuffer;

/// The playback engine as seen by an export.
///
/// An export borrows the source for its whole duration. It reads `duration` once, pulls frames in
/// increasing order, calls `poll_events` once per frame boundary, and sends `on_loaded` exactly
/// once when it ends, however it ends.
pub trait PlaybackSource {
    /// Animation length in frames. Non-positive means nothing to export.
    fn duration(&self) -> i64;

    /// Produce the rendered frame at `idx`. Ownership passes to the caller.
    fn frame(&mut self, idx: FrameIndex) -> ExportResult<FrameBuffer>;

    /// Drain pending interactive events so a stop request raised since the last frame is seen
    /// by the next progress check.
    fn poll_events(&mut self) {}

    /// End-of-export notification.
    fn on_loaded(&mut self) {}
}
