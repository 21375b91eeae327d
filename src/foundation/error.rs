use std::path::PathBuf;

/// Crate-wide result alias.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while preparing or running an export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Invalid options or pipeline misuse detected before touching the encoder.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image-sequence target whose file name has no `.` to split an extension from.
    #[error("missing extension: '{}' has no '.' to select an image format", .0.display())]
    MissingExtension(PathBuf),

    /// The encoder rejected a frame or could not write its output.
    #[error("encode error: {0}")]
    Encode(String),

    /// The playback source failed to produce a frame.
    #[error("source error: {0}")]
    Source(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ExportError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ExportError::Source`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
