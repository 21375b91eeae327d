use std::path::Path;

/// How an export target is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// One still image per frame, numbered from 1.
    ImageSequence,
    /// One continuous encoded stream.
    Video,
}

impl ExportMode {
    /// Stable lowercase name for logs and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::ImageSequence => "image-sequence",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Still-image suffixes that select [`ExportMode::ImageSequence`].
pub const IMAGE_SEQUENCE_SUFFIXES: [&str; 5] = [".png", ".jpg", ".jpeg", ".tiff", ".tif"];

/// Decide the export mode from a destination path.
///
/// Only the suffix is inspected, case-insensitively. Anything that is not a known still-image
/// suffix is assumed to be a video container; this is a fallback, not a whitelist, so a typo'd
/// or unknown extension ends up handed to the video encoder.
pub fn classify(path: impl AsRef<Path>) -> ExportMode {
    let lower = path.as_ref().to_string_lossy().to_ascii_lowercase();
    if IMAGE_SEQUENCE_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        ExportMode::ImageSequence
    } else {
        ExportMode::Video
    }
}

#[cfg(test)]
#[path = "../tests/unit/format.rs"]
mod tests;
