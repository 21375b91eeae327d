use crate::config::ExportOpts;
use crate::foundation::core::{FrameIndex, frame_count};
use crate::foundation::error::{ExportError, ExportResult};
use crate::format::ExportMode;
use crate::pipeline::{FramePipeline, PipelineConfig};
use crate::source::PlaybackSource;
use crate::target::ExportTarget;

/// Progress value handed to the progress callback before each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportProgress {
    /// In `[0, 1)`, strictly increasing over an export.
    pub fraction: f64,
    /// Display text; carries no meaning for the export itself.
    pub label: String,
}

/// How an export ended.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Every frame was written.
    Completed,
    /// The progress callback asked to stop. Frames already written are kept.
    Cancelled,
    /// A frame could not be pulled or encoded, or the encoder failed to finish.
    Failed(ExportError),
}

impl ExportOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn error(&self) -> Option<&ExportError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Summary of one export attempt.
#[derive(Debug)]
pub struct ExportReport {
    pub mode: ExportMode,
    pub outcome: ExportOutcome,
    /// Frames in the animation when the export started.
    pub frames_total: u64,
    /// Frames successfully written, always a prefix `0..frames_written` of the animation.
    pub frames_written: u64,
}

/// Progress fraction reported before frame `index`: `index / (duration - 0.999)`.
///
/// The offset keeps the last frame just below 1.0.
pub fn progress_fraction(index: u64, duration: u64) -> f64 {
    index as f64 / (duration as f64 - 0.999)
}

/// Export every frame of `source` to `target` with the default encoder for its mode.
///
/// `progress` is called once per frame, before the frame is pulled; returning `true` stops the
/// export. Errors returned as `Err` are preconditions (bad options, unusable encoder setup) and
/// happen before the source is touched. Once frames start flowing, failures are reported through
/// [`ExportOutcome::Failed`] and `on_loaded` is always sent.
#[tracing::instrument(
    skip_all,
    fields(path = %target.path().display(), mode = %target.mode())
)]
pub fn export(
    source: &mut dyn PlaybackSource,
    target: &ExportTarget,
    opts: &ExportOpts,
    progress: impl FnMut(&ExportProgress) -> bool,
) -> ExportResult<ExportReport> {
    let config = PipelineConfig::for_target(target, opts);
    let pipeline = FramePipeline::configure(config, opts)?;
    export_with_pipeline(source, target, pipeline, progress)
}

/// Same as [`export`], with a caller-built pipeline.
pub fn export_with_pipeline(
    source: &mut dyn PlaybackSource,
    target: &ExportTarget,
    mut pipeline: FramePipeline<'_>,
    mut progress: impl FnMut(&ExportProgress) -> bool,
) -> ExportResult<ExportReport> {
    if pipeline.config().mode() != target.mode() {
        return Err(ExportError::validation(format!(
            "pipeline is configured for {} but target '{}' is {}",
            pipeline.config().mode(),
            target.path().display(),
            target.mode()
        )));
    }

    let duration = frame_count(source.duration());
    tracing::info!(frames = duration, "export started");

    let mut status = ExportProgress {
        fraction: 0.0,
        label: target.progress_label(),
    };
    let mut outcome = ExportOutcome::Completed;

    for i in 0..duration {
        source.poll_events();

        status.fraction = progress_fraction(i, duration);
        if progress(&status) {
            tracing::info!(frame = i, "export cancelled");
            outcome = ExportOutcome::Cancelled;
            break;
        }

        if let Err(e) = export_frame(source, target, &mut pipeline, FrameIndex(i), duration) {
            tracing::warn!(frame = i, error = %e, "export failed");
            outcome = ExportOutcome::Failed(e);
            break;
        }
    }

    let finished = pipeline.finish();
    let frames_written = pipeline.processed();
    drop(pipeline);
    source.on_loaded();

    if let Err(e) = finished {
        match outcome {
            ExportOutcome::Failed(_) => {
                tracing::warn!(error = %e, "encoder cleanup failed after an earlier error");
            }
            _ => {
                tracing::warn!(error = %e, "encoder failed to finish");
                outcome = ExportOutcome::Failed(e);
            }
        }
    }

    if outcome.is_completed() {
        tracing::info!(frames = frames_written, "export finished");
    }
    Ok(ExportReport {
        mode: target.mode(),
        outcome,
        frames_total: duration,
        frames_written,
    })
}

fn export_frame(
    source: &mut dyn PlaybackSource,
    target: &ExportTarget,
    pipeline: &mut FramePipeline<'_>,
    idx: FrameIndex,
    duration: u64,
) -> ExportResult<()> {
    let frame = source.frame(idx)?;
    if let Some(seq) = target.sequence() {
        pipeline.set_output_path(seq.path_for(idx.0, duration));
    }
    tracing::debug!(frame = idx.0, width = frame.width, height = frame.height, "processing frame");
    pipeline.set_source_buffer(frame);
    pipeline.process()
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
