use std::io::{Read, Write as _};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::FrameEncoder;
use crate::foundation::error::{ExportError, ExportResult};
use crate::frame::FrameBuffer;
use crate::pipeline::VideoProfile;

/// Containers whose default ffmpeg codec wants `yuv420p` with even dimensions.
const YUV420_CONTAINERS: [&str; 4] = ["mp4", "m4v", "mov", "mkv"];

/// Video encoder that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
///
/// The process is started on the first frame, since that is where the frame size is learned.
/// The codec is left to ffmpeg's default for the output container.
pub struct FfmpegVideoEncoder {
    profile: VideoProfile,
    overwrite: bool,
    bg_rgba: [u8; 4],

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    size: Option<(u32, u32)>,
    scratch: Vec<u8>,
}

impl FfmpegVideoEncoder {
    pub fn new(profile: VideoProfile, overwrite: bool, bg_rgba: [u8; 4]) -> ExportResult<Self> {
        if !profile.frame_rate.is_finite() || profile.frame_rate <= 0.0 {
            return Err(ExportError::validation("video frame rate must be positive"));
        }
        if !overwrite && profile.out_path.exists() {
            return Err(ExportError::validation(format!(
                "output file '{}' already exists",
                profile.out_path.display()
            )));
        }
        Ok(Self {
            profile,
            overwrite,
            bg_rgba,
            child: None,
            stdin: None,
            stderr_drain: None,
            size: None,
            scratch: Vec::new(),
        })
    }

    /// Command line for a `width`x`height` stream, without spawning it.
    pub fn command(&self, width: u32, height: u32) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.arg(if self.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &self.profile.frame_rate.to_string(),
            "-i",
            "pipe:0",
            "-an",
        ]);
        if self.profile.bit_rate > 0 {
            cmd.args(["-b:v", &format!("{}k", self.profile.bit_rate)]);
        }
        if self.profile.buffer_size > 0 {
            cmd.args(["-bufsize", &format!("{}k", self.profile.buffer_size)]);
        }
        if wants_yuv420(&self.profile.out_path) {
            cmd.args([
                "-vf",
                "pad=ceil(iw/2)*2:ceil(ih/2)*2",
                "-pix_fmt",
                "yuv420p",
            ]);
        }
        cmd.arg(&self.profile.out_path);
        cmd
    }

    fn start(&mut self, width: u32, height: u32) -> ExportResult<()> {
        ensure_parent_dir(&self.profile.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(ExportError::encode(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        let mut child = self.command(width, height).spawn().map_err(|e| {
            ExportError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            path = %self.profile.out_path.display(),
            width,
            height,
            fps = self.profile.frame_rate,
            "spawned ffmpeg"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.size = Some((width, height));
        Ok(())
    }

    fn wait_child(&mut self) -> ExportResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait().map_err(|e| {
            ExportError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ExportError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ExportError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ExportError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl FrameEncoder for FfmpegVideoEncoder {
    fn encode(&mut self, frame: &FrameBuffer, _out_path: Option<&Path>) -> ExportResult<()> {
        frame.validate()?;
        let size = self.size;
        match size {
            None => self.start(frame.width, frame.height)?,
            Some((w, h)) if (w, h) != (frame.width, frame.height) => {
                return Err(ExportError::encode(format!(
                    "frame size mismatch: got {}x{}, expected {w}x{h}",
                    frame.width, frame.height
                )));
            }
            Some(_) => {}
        }

        frame.write_opaque_rgba8(&mut self.scratch, self.bg_rgba);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ExportError::encode("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            ExportError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.wait_child()
    }
}

impl Drop for FfmpegVideoEncoder {
    fn drop(&mut self) {
        if self.child.is_some()
            && let Err(e) = self.wait_child()
        {
            tracing::warn!(error = %e, "ffmpeg did not shut down cleanly");
        }
    }
}

fn wants_yuv420(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| YUV420_CONTAINERS.contains(&ext.as_str()))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
