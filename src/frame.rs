use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::{flatten_rgba8_to_rgb8, unpremultiply_rgba8};

/// One rendered animation frame as tightly packed, row-major RGBA8.
///
/// A buffer is owned by exactly one holder at a time: the playback source produces it, the
/// pipeline takes it for a single `process()` call, and it is dropped when that call returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameBuffer {
    /// Wrap straight-alpha RGBA8 pixels, checking the byte length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> ExportResult<Self> {
        let frame = Self {
            width,
            height,
            data,
            premultiplied: false,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// A frame filled with a single straight-alpha colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(px),
            premultiplied: false,
        }
    }

    pub fn validate(&self) -> ExportResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::validation(
                "frame width/height must be non-zero",
            ));
        }
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(ExportError::validation(format!(
                "frame data is {} bytes, expected {expected} for {}x{} rgba8",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Straight-alpha RGBA8 copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8(&mut out);
        }
        out
    }

    /// Opaque RGB8 copy with alpha flattened over `bg_rgba`.
    pub fn to_opaque_rgb8(&self, bg_rgba: [u8; 4]) -> Vec<u8> {
        let mut out = vec![0u8; self.data.len() / 4 * 3];
        flatten_rgba8_to_rgb8(&mut out, &self.data, self.premultiplied, bg_rgba);
        out
    }

    /// Opaque RGBA8 copy (alpha forced to 255), as streamed to ffmpeg.
    pub(crate) fn write_opaque_rgba8(&self, dst: &mut Vec<u8>, bg_rgba: [u8; 4]) {
        let rgb = self.to_opaque_rgb8(bg_rgba);
        dst.clear();
        dst.reserve(self.data.len());
        for px in rgb.chunks_exact(3) {
            dst.extend_from_slice(px);
            dst.push(255);
        }
    }
}
