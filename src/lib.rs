//! Export animation playback to a video file or a numbered image sequence.
//!
//! - Build an [`ExportTarget`] from the chosen path (the extension decides the [`ExportMode`])
//! - Hand a [`PlaybackSource`] and a progress callback to [`export`]
//! - Inspect the returned [`ExportReport`]
#![forbid(unsafe_code)]

mod foundation;

pub mod config;
pub mod encode;
pub mod export;
pub mod format;
pub mod frame;
pub mod pipeline;
pub mod sequence;
pub mod source;
pub mod target;

pub use crate::foundation::core::{FrameIndex, frame_count};
pub use crate::foundation::error::{ExportError, ExportResult};

pub use crate::config::{DEFAULT_FRAME_RATE, ExportOpts};
pub use crate::encode::ffmpeg::{FfmpegVideoEncoder, is_ffmpeg_on_path};
pub use crate::encode::image_seq::ImageFileEncoder;
pub use crate::encode::sink::{EncodedFrame, FrameEncoder, InMemoryEncoder};
pub use crate::export::{
    ExportOutcome, ExportProgress, ExportReport, export, export_with_pipeline, progress_fraction,
};
pub use crate::format::{ExportMode, classify};
pub use crate::frame::FrameBuffer;
pub use crate::pipeline::{FramePipeline, ImageProfile, PipelineConfig, VideoProfile};
pub use crate::sequence::{SequenceName, digit_width, next_path, split_extension};
pub use crate::source::PlaybackSource;
pub use crate::source::image_dir::ImageDirSource;
pub use crate::target::ExportTarget;
