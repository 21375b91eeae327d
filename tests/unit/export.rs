use std::path::{Path, PathBuf};

use super::*;
use crate::encode::sink::{FrameEncoder, InMemoryEncoder};
use crate::frame::FrameBuffer;
use crate::pipeline::{ImageProfile, VideoProfile};

#[derive(Default)]
struct CountingSource {
    duration: i64,
    pulled: Vec<u64>,
    polls: u32,
    loaded: u32,
    fail_pull_at: Option<u64>,
}

impl CountingSource {
    fn new(duration: i64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }
}

impl PlaybackSource for CountingSource {
    fn duration(&self) -> i64 {
        self.duration
    }

    fn frame(&mut self, idx: FrameIndex) -> ExportResult<FrameBuffer> {
        if self.fail_pull_at == Some(idx.0) {
            return Err(ExportError::playback("render failed"));
        }
        self.pulled.push(idx.0);
        Ok(FrameBuffer::solid(2, 2, [idx.0 as u8, 0, 0, 255]))
    }

    fn poll_events(&mut self) {
        self.polls += 1;
    }

    fn on_loaded(&mut self) {
        self.loaded += 1;
    }
}

/// Writes nothing, fails on the `fail_at`-th encode.
struct FailingEncoder {
    fail_at: u64,
    calls: u64,
    finished: bool,
}

impl FrameEncoder for FailingEncoder {
    fn encode(&mut self, _frame: &FrameBuffer, _out_path: Option<&Path>) -> ExportResult<()> {
        let n = self.calls;
        self.calls += 1;
        if n == self.fail_at {
            return Err(ExportError::encode("disk full"));
        }
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.finished = true;
        Ok(())
    }
}

fn video_target() -> (ExportTarget, PipelineConfig) {
    let target = ExportTarget::new("/out/anim.mp4").unwrap();
    (target, PipelineConfig::Video(VideoProfile::new("/out/anim.mp4")))
}

fn image_target() -> (ExportTarget, PipelineConfig) {
    let target = ExportTarget::new("/out/anim.png").unwrap();
    let config = PipelineConfig::ImageSequence(ImageProfile {
        extension: "png".to_string(),
    });
    (target, config)
}

#[test]
fn fractions_increase_and_stay_below_one() {
    for duration in [1u64, 2, 3, 12, 24, 1000] {
        let mut prev = -1.0;
        for i in 0..duration {
            let f = progress_fraction(i, duration);
            assert!(f > prev, "duration {duration} index {i}");
            assert!((0.0..1.0).contains(&f), "duration {duration} index {i}: {f}");
            prev = f;
        }
    }
}

#[test]
fn completed_export_writes_every_frame_in_order() {
    let (target, config) = video_target();
    let mut source = CountingSource::new(5);
    let mut mem = InMemoryEncoder::new();
    let mut seen = Vec::new();

    let report = export_with_pipeline(
        &mut source,
        &target,
        FramePipeline::with_encoder(config, &mut mem),
        |p| {
            seen.push(p.clone());
            false
        },
    )
    .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.frames_total, 5);
    assert_eq!(report.frames_written, 5);
    assert_eq!(source.pulled, vec![0, 1, 2, 3, 4]);
    assert_eq!(source.loaded, 1);
    assert_eq!(mem.finish_calls(), 1);

    let reds: Vec<u8> = mem.frames().iter().map(|f| f.frame.data[0]).collect();
    assert_eq!(reds, vec![0, 1, 2, 3, 4]);

    assert_eq!(seen.len(), 5);
    assert!(seen.iter().all(|p| p.label == "Exporting \"/out/anim.mp4\""));
    assert_eq!(seen[0].fraction, 0.0);
}

#[test]
fn image_sequence_paths_are_numbered_from_one() {
    let (target, config) = image_target();
    let mut source = CountingSource::new(12);
    let mut mem = InMemoryEncoder::new();
    let mut labels = Vec::new();

    let report = export_with_pipeline(
        &mut source,
        &target,
        FramePipeline::with_encoder(config, &mut mem),
        |p| {
            labels.push(p.label.clone());
            false
        },
    )
    .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.mode, ExportMode::ImageSequence);
    let paths: Vec<PathBuf> = mem
        .frames()
        .iter()
        .map(|f| f.out_path.clone().unwrap())
        .collect();
    assert_eq!(paths.len(), 12);
    assert_eq!(paths[0], PathBuf::from("/out/anim-01.png"));
    assert_eq!(paths[11], PathBuf::from("/out/anim-12.png"));
    assert!(labels.iter().all(|l| l == "Exporting frames"));
}

#[test]
fn stop_at_k_writes_exactly_k_frames() {
    for k in [0u64, 1, 3] {
        let (target, config) = image_target();
        let mut source = CountingSource::new(6);
        let mut mem = InMemoryEncoder::new();
        let mut calls = 0u64;

        let report = export_with_pipeline(
            &mut source,
            &target,
            FramePipeline::with_encoder(config, &mut mem),
            |_| {
                let stop = calls == k;
                calls += 1;
                stop
            },
        )
        .unwrap();

        assert!(report.outcome.is_cancelled(), "k = {k}");
        assert_eq!(report.frames_written, k);
        assert_eq!(source.pulled, (0..k).collect::<Vec<_>>());
        assert_eq!(mem.frames().len() as u64, k);
        assert_eq!(source.loaded, 1);
        assert_eq!(mem.finish_calls(), 1);
    }
}

#[test]
fn events_are_polled_before_every_check_in_both_modes() {
    for (target, config) in [video_target(), image_target()] {
        let mut source = CountingSource::new(4);
        let mut mem = InMemoryEncoder::new();
        export_with_pipeline(
            &mut source,
            &target,
            FramePipeline::with_encoder(config, &mut mem),
            |_| false,
        )
        .unwrap();
        assert_eq!(source.polls, 4, "{}", target.mode());
    }
}

#[test]
fn encode_failure_at_k_reports_failed_with_k_written() {
    let (target, config) = video_target();
    let mut source = CountingSource::new(10);
    let mut enc = FailingEncoder {
        fail_at: 4,
        calls: 0,
        finished: false,
    };

    let report = export_with_pipeline(
        &mut source,
        &target,
        FramePipeline::with_encoder(config, &mut enc),
        |_| false,
    )
    .unwrap();

    assert!(matches!(
        report.outcome.error(),
        Some(ExportError::Encode(msg)) if msg == "disk full"
    ));
    assert_eq!(report.frames_written, 4);
    // The failing frame was pulled; nothing after it.
    assert_eq!(source.pulled, vec![0, 1, 2, 3, 4]);
    assert_eq!(source.loaded, 1);
    assert!(enc.finished);
}

#[test]
fn pull_failure_is_reported_as_failed() {
    let (target, config) = video_target();
    let mut source = CountingSource {
        fail_pull_at: Some(2),
        ..CountingSource::new(5)
    };
    let mut mem = InMemoryEncoder::new();

    let report = export_with_pipeline(
        &mut source,
        &target,
        FramePipeline::with_encoder(config, &mut mem),
        |_| false,
    )
    .unwrap();

    assert!(matches!(report.outcome.error(), Some(ExportError::Source(_))));
    assert_eq!(report.frames_written, 2);
    assert_eq!(source.loaded, 1);
}

#[test]
fn empty_animation_completes_without_writes() {
    for duration in [0i64, -3] {
        let (target, config) = image_target();
        let mut source = CountingSource::new(duration);
        let mut mem = InMemoryEncoder::new();
        let mut calls = 0;

        let report = export_with_pipeline(
            &mut source,
            &target,
            FramePipeline::with_encoder(config, &mut mem),
            |_| {
                calls += 1;
                false
            },
        )
        .unwrap();

        assert!(report.outcome.is_completed());
        assert_eq!(report.frames_total, 0);
        assert_eq!(report.frames_written, 0);
        assert!(source.pulled.is_empty());
        assert_eq!(calls, 0);
        assert_eq!(source.loaded, 1);
    }
}

#[test]
fn mismatched_pipeline_is_rejected_before_touching_the_source() {
    let (target, _) = video_target();
    let (_, image_config) = image_target();
    let mut source = CountingSource::new(3);
    let mut mem = InMemoryEncoder::new();

    let err = export_with_pipeline(
        &mut source,
        &target,
        FramePipeline::with_encoder(image_config, &mut mem),
        |_| false,
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::Validation(_)));
    assert_eq!(source.loaded, 0);
    assert!(source.pulled.is_empty());
}
