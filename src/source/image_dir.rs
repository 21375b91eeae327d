use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ExportError, ExportResult};
use crate::frame::FrameBuffer;
use crate::source::PlaybackSource;

/// Plays a directory of still images as an animation, one file per frame.
///
/// Files are ordered by name; anything the `image` crate does not recognise by extension is
/// skipped. Frames are decoded on demand, so only the frame being exported is held in memory.
#[derive(Debug)]
pub struct ImageDirSource {
    frames: Vec<PathBuf>,
    loaded_notifications: u32,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> ExportResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read frame directory '{}'", dir.display()))?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("list frame directory '{}'", dir.display()))?
                .path();
            if path.is_file() && image::ImageFormat::from_path(&path).is_ok() {
                frames.push(path);
            }
        }
        frames.sort();

        tracing::debug!(dir = %dir.display(), frames = frames.len(), "opened image directory");
        Ok(Self {
            frames,
            loaded_notifications: 0,
        })
    }

    /// Frame files in playback order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    pub fn loaded_notifications(&self) -> u32 {
        self.loaded_notifications
    }
}

impl PlaybackSource for ImageDirSource {
    fn duration(&self) -> i64 {
        i64::try_from(self.frames.len()).unwrap_or(i64::MAX)
    }

    fn frame(&mut self, idx: FrameIndex) -> ExportResult<FrameBuffer> {
        let path = usize::try_from(idx.0)
            .ok()
            .and_then(|i| self.frames.get(i))
            .ok_or_else(|| ExportError::playback(format!("frame {idx} is out of range")))?;

        let img = image::open(path)
            .map_err(|e| ExportError::playback(format!("decode '{}': {e}", path.display())))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        FrameBuffer::from_rgba8(width, height, img.into_raw())
    }

    fn on_loaded(&mut self) {
        self.loaded_notifications += 1;
    }
}
