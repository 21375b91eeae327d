use std::path::Path;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::FrameEncoder;
use crate::foundation::error::{ExportError, ExportResult};
use crate::frame::FrameBuffer;
use crate::pipeline::ImageProfile;

/// Writes one still image per `encode` call, in the format named by the sequence extension.
#[derive(Debug)]
pub struct ImageFileEncoder {
    format: image::ImageFormat,
    overwrite: bool,
    bg_rgba: [u8; 4],
}

impl ImageFileEncoder {
    pub fn new(profile: &ImageProfile, overwrite: bool, bg_rgba: [u8; 4]) -> ExportResult<Self> {
        let format = image::ImageFormat::from_extension(&profile.extension).ok_or_else(|| {
            ExportError::validation(format!(
                "no image encoder for extension '{}'",
                profile.extension
            ))
        })?;
        if !format.can_write() {
            return Err(ExportError::validation(format!(
                "image format {format:?} cannot be written"
            )));
        }
        Ok(Self {
            format,
            overwrite,
            bg_rgba,
        })
    }

    pub fn format(&self) -> image::ImageFormat {
        self.format
    }

    fn has_alpha(&self) -> bool {
        !matches!(self.format, image::ImageFormat::Jpeg)
    }
}

impl FrameEncoder for ImageFileEncoder {
    fn encode(&mut self, frame: &FrameBuffer, out_path: Option<&Path>) -> ExportResult<()> {
        let out_path = out_path
            .ok_or_else(|| ExportError::validation("image sequence frame has no output path"))?;
        frame.validate()?;

        if !self.overwrite && out_path.exists() {
            return Err(ExportError::encode(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        ensure_parent_dir(out_path)?;

        let (pixels, color) = if self.has_alpha() {
            (frame.to_straight_rgba8(), image::ColorType::Rgba8)
        } else {
            (frame.to_opaque_rgb8(self.bg_rgba), image::ColorType::Rgb8)
        };

        image::save_buffer_with_format(
            out_path,
            &pixels,
            frame.width,
            frame.height,
            color,
            self.format,
        )
        .map_err(|e| {
            ExportError::encode(format!("failed to write '{}': {e}", out_path.display()))
        })
    }

    fn finish(&mut self) -> ExportResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image_seq.rs"]
mod tests;
