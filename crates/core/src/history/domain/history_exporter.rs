use std::path::Path;

use super::history_entry::HistoryEntry;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No emotion history to export yet")]
    Empty,
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to encode history: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes a full snapshot of the history to a file, replacing any earlier
/// export at the same path.
pub trait HistoryExporter: Send {
    /// Returns the number of rows written.
    fn export(&self, entries: &[HistoryEntry], path: &Path) -> Result<usize, ExportError>;
}
