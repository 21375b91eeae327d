use std::path::Path;

use crate::foundation::error::{ExportError, ExportResult};

/// Frame rate used for video exports unless overridden.
pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// User-tunable export settings.
///
/// `0` for bit rate or buffer size means "let the encoder pick".
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    /// Video frame rate in frames per second.
    pub frame_rate: f64,
    /// Video bit rate in kbit/s, `0` for the encoder default.
    pub video_bit_rate: u32,
    /// Rate-control buffer size in kbit, `0` for the encoder default.
    pub video_buffer_size: u32,
    /// Replace existing output files.
    pub overwrite: bool,
    /// Background used when alpha has to be flattened (JPEG, video).
    pub bg_rgba: [u8; 4],
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            video_bit_rate: 0,
            video_buffer_size: 0,
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

impl ExportOpts {
    pub fn validate(&self) -> ExportResult<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ExportError::validation(format!(
                "frame_rate must be a positive number, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }

    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> ExportResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("read export options '{}'", path.display()))?;
        let opts: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse export options '{}'", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }
}
