use std::fs::File;
use std::path::{Path, PathBuf};

use crate::history::domain::history_entry::HistoryEntry;
use crate::history::domain::history_exporter::{ExportError, HistoryExporter};

/// Exports history as CSV with a `timestamp,face,emotion,confidence` header.
///
/// Rows go to a `.part` file that replaces the target only once complete,
/// so a failed export never leaves a truncated file behind.
pub struct CsvHistoryExporter;

impl CsvHistoryExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvHistoryExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryExporter for CsvHistoryExporter {
    fn export(&self, entries: &[HistoryEntry], path: &Path) -> Result<usize, ExportError> {
        if entries.is_empty() {
            return Err(ExportError::Empty);
        }

        let part_path = partial_path(path);
        let result = write_rows(entries, &part_path).and_then(|()| {
            std::fs::rename(&part_path, path).map_err(|source| io_error(path, source))
        });
        if result.is_err() {
            let _ = std::fs::remove_file(&part_path);
        }
        result?;

        log::info!("Exported {} history rows to {}", entries.len(), path.display());
        Ok(entries.len())
    }
}

fn write_rows(entries: &[HistoryEntry], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush().map_err(|source| io_error(path, source))?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reads an exported history file back into entries.
pub fn read_history(path: &Path) -> Result<Vec<HistoryEntry>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let entries = reader.deserialize().collect::<Result<Vec<HistoryEntry>, _>>()?;
    Ok(entries)
}
