use std::path::{Path, PathBuf};

use crate::foundation::error::ExportResult;
use crate::frame::FrameBuffer;

/// Sink contract for the pipeline's encoder stage.
///
/// `encode` is called once per processed frame, in strictly increasing frame order. Video
/// encoders append to one stream and receive `out_path = None`; image encoders receive the
/// destination of the single file they must write.
pub trait FrameEncoder {
    /// Write one frame. Each successful call is exactly one write.
    fn encode(&mut self, frame: &FrameBuffer, out_path: Option<&Path>) -> ExportResult<()>;
    /// Flush and release encoder resources. Called once, after the last frame (or none).
    fn finish(&mut self) -> ExportResult<()>;
}

impl<E: FrameEncoder + ?Sized> FrameEncoder for &mut E {
    fn encode(&mut self, frame: &FrameBuffer, out_path: Option<&Path>) -> ExportResult<()> {
        (**self).encode(frame, out_path)
    }

    fn finish(&mut self) -> ExportResult<()> {
        (**self).finish()
    }
}

/// One frame captured by [`InMemoryEncoder`].
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    pub out_path: Option<PathBuf>,
    pub frame: FrameBuffer,
}

/// Encoder that keeps frames in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    frames: Vec<EncodedFrame>,
    finish_calls: u32,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in the order they were encoded.
    pub fn frames(&self) -> &[EncodedFrame] {
        &self.frames
    }

    /// How many times `finish` has been called.
    pub fn finish_calls(&self) -> u32 {
        self.finish_calls
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn encode(&mut self, frame: &FrameBuffer, out_path: Option<&Path>) -> ExportResult<()> {
        self.frames.push(EncodedFrame {
            out_path: out_path.map(Path::to_path_buf),
            frame: frame.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.finish_calls += 1;
        Ok(())
    }
}
