use std::path::Path;

use crate::foundation::error::{ExportError, ExportResult};

/// Base path and extension of an image-sequence target, split once before exporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceName {
    /// Everything before the last `.`.
    pub base: String,
    /// Everything after the last `.`, without the dot.
    pub extension: String,
}

impl SequenceName {
    /// Output path for frame `index` of an animation `duration` frames long.
    pub fn path_for(&self, index: u64, duration: u64) -> String {
        next_path(&self.base, &self.extension, index, duration)
    }
}

/// Split `path` at the last `.` of its file name.
///
/// Image sequences need the extension to pick an encoder, so a file name without a `.` fails
/// with [`ExportError::MissingExtension`].
pub fn split_extension(path: impl AsRef<Path>) -> ExportResult<SequenceName> {
    let path = path.as_ref();
    let s = path.to_string_lossy();
    let name_start = s.rfind(std::path::is_separator).map_or(0, |i| i + 1);
    let dot = s[name_start..]
        .rfind('.')
        .map(|i| name_start + i)
        .ok_or_else(|| ExportError::MissingExtension(path.to_path_buf()))?;

    Ok(SequenceName {
        base: s[..dot].to_string(),
        extension: s[dot + 1..].to_string(),
    })
}

/// Digits needed to print every 1-based frame number of an animation: `floor(log10(n)) + 1`.
pub fn digit_width(duration: u64) -> usize {
    duration.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// `"<base>-<index + 1, zero padded>.<extension>"`.
pub fn next_path(base: &str, extension: &str, index: u64, duration: u64) -> String {
    let width = digit_width(duration);
    format!("{base}-{:0width$}.{extension}", index + 1)
}

#[cfg(test)]
#[path = "../tests/unit/sequence.rs"]
mod tests;
