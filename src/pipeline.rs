use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_FRAME_RATE, ExportOpts};
use crate::encode::ffmpeg::FfmpegVideoEncoder;
use crate::encode::image_seq::ImageFileEncoder;
use crate::encode::sink::FrameEncoder;
use crate::foundation::error::{ExportError, ExportResult};
use crate::format::ExportMode;
use crate::frame::FrameBuffer;
use crate::target::ExportTarget;

/// Settings for the single-stream video profile.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoProfile {
    pub out_path: PathBuf,
    pub frame_rate: f64,
    /// kbit/s, `0` for the encoder default.
    pub bit_rate: u32,
    /// kbit, `0` for the encoder default.
    pub buffer_size: u32,
}

impl VideoProfile {
    /// 24 fps with encoder-default rate control.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            frame_rate: DEFAULT_FRAME_RATE,
            bit_rate: 0,
            buffer_size: 0,
        }
    }
}

/// Settings for the one-file-per-frame profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageProfile {
    /// Shared by every file name and used to pick the image format.
    pub extension: String,
}

/// Sink-stage configuration, chosen once from the export target.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineConfig {
    Video(VideoProfile),
    ImageSequence(ImageProfile),
}

impl PipelineConfig {
    pub fn for_target(target: &ExportTarget, opts: &ExportOpts) -> Self {
        match target.sequence() {
            Some(seq) => Self::ImageSequence(ImageProfile {
                extension: seq.extension.clone(),
            }),
            None => Self::Video(VideoProfile {
                out_path: target.path().to_path_buf(),
                frame_rate: opts.frame_rate,
                bit_rate: opts.video_bit_rate,
                buffer_size: opts.video_buffer_size,
            }),
        }
    }

    pub fn mode(&self) -> ExportMode {
        match self {
            Self::Video(_) => ExportMode::Video,
            Self::ImageSequence(_) => ExportMode::ImageSequence,
        }
    }
}

/// Two-stage frame pipeline: a one-frame source slot feeding an encoder.
///
/// The source slot holds at most one [`FrameBuffer`]; `process` moves it out, so the buffer is
/// released when `process` returns whether or not encoding succeeded.
pub struct FramePipeline<'a> {
    config: PipelineConfig,
    encoder: Box<dyn FrameEncoder + 'a>,
    source: Option<FrameBuffer>,
    output_path: Option<PathBuf>,
    processed: u64,
}

impl<'a> FramePipeline<'a> {
    /// Build the pipeline with the default encoder for the profile.
    pub fn configure(config: PipelineConfig, opts: &ExportOpts) -> ExportResult<Self> {
        opts.validate()?;
        let encoder: Box<dyn FrameEncoder + 'a> = match &config {
            PipelineConfig::Video(profile) => Box::new(FfmpegVideoEncoder::new(
                profile.clone(),
                opts.overwrite,
                opts.bg_rgba,
            )?),
            PipelineConfig::ImageSequence(profile) => Box::new(ImageFileEncoder::new(
                profile,
                opts.overwrite,
                opts.bg_rgba,
            )?),
        };
        Ok(Self::from_boxed(config, encoder))
    }

    /// Build the pipeline around a caller-supplied encoder.
    pub fn with_encoder(config: PipelineConfig, encoder: impl FrameEncoder + 'a) -> Self {
        Self::from_boxed(config, Box::new(encoder))
    }

    fn from_boxed(config: PipelineConfig, encoder: Box<dyn FrameEncoder + 'a>) -> Self {
        Self {
            config,
            encoder,
            source: None,
            output_path: None,
            processed: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Bind the frame the next `process` call consumes. Replaces any unprocessed frame.
    pub fn set_source_buffer(&mut self, frame: FrameBuffer) {
        self.source = Some(frame);
    }

    /// Rebind the destination file for the next image-sequence `process` call.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = Some(path.into());
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Frames successfully written so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Encode the bound frame: append it to the stream, or write it to the bound path.
    pub fn process(&mut self) -> ExportResult<()> {
        let frame = self
            .source
            .take()
            .ok_or_else(|| ExportError::validation("process called without a source buffer"))?;

        let out_path = match self.config {
            PipelineConfig::Video(_) => None,
            PipelineConfig::ImageSequence(_) => Some(self.output_path.as_deref().ok_or_else(
                || ExportError::validation("image sequence process called without an output path"),
            )?),
        };

        self.encoder.encode(&frame, out_path)?;
        self.processed += 1;
        Ok(())
    }

    /// Flush the encoder and release its resources.
    pub fn finish(&mut self) -> ExportResult<()> {
        self.source = None;
        self.encoder.finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
