use std::path::{Path, PathBuf};

use crate::foundation::error::ExportResult;
use crate::format::{ExportMode, classify};
use crate::sequence::{SequenceName, split_extension};

/// Where and how an export is written. Built once, never changed during the export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTarget {
    path: PathBuf,
    mode: ExportMode,
    sequence: Option<SequenceName>,
}

impl ExportTarget {
    /// Classify `path` by its extension and build the target.
    pub fn new(path: impl Into<PathBuf>) -> ExportResult<Self> {
        let path = path.into();
        let mode = classify(&path);
        Self::with_mode(path, mode)
    }

    /// Build a target with an explicit mode, bypassing classification.
    ///
    /// Image sequences need an extension; a file name without `.` fails here, before any frame
    /// is pulled.
    pub fn with_mode(path: impl Into<PathBuf>, mode: ExportMode) -> ExportResult<Self> {
        let path = path.into();
        let sequence = match mode {
            ExportMode::ImageSequence => Some(split_extension(&path)?),
            ExportMode::Video => None,
        };
        Ok(Self {
            path,
            mode,
            sequence,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    /// Base/extension split, present only for image sequences.
    pub fn sequence(&self) -> Option<&SequenceName> {
        self.sequence.as_ref()
    }

    /// Progress label shown while exporting.
    pub fn progress_label(&self) -> String {
        match self.mode {
            ExportMode::Video => format!("Exporting \"{}\"", self.path.display()),
            ExportMode::ImageSequence => "Exporting frames".to_string(),
        }
    }
}
