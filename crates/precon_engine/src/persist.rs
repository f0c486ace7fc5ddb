use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use precon_core::DeckRecord;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Write the deck list as CSV: fixed `deck_id,url` header, one row per
/// record, every field quoted as text. Written atomically (temp file then
/// rename) so a failed run never leaves a truncated file behind.
///
/// The first column carries the display name; the header names are the
/// fixed export format consumers already rely on.
pub fn write_deck_csv(
    dir: &Path,
    filename: &str,
    records: &[DeckRecord],
) -> Result<PathBuf, PersistError> {
    ensure_output_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(tmp.as_file_mut());
        writer.write_record(["deck_id", "url"])?;
        for record in records {
            writer.write_record([&record.name, &record.url])?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().sync_all()?;

    replace(tmp, dir.join(filename))
}

/// Save rendered page markup to a side file for offline inspection.
pub fn save_page_snapshot(dir: &Path, filename: &str, markup: &str) -> Result<PathBuf, PersistError> {
    ensure_output_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    io::Write::write_all(&mut tmp, markup.as_bytes())?;
    io::Write::flush(&mut tmp)?;
    tmp.as_file_mut().sync_all()?;

    replace(tmp, dir.join(filename))
}

fn replace(tmp: NamedTempFile, target: PathBuf) -> Result<PathBuf, PersistError> {
    // Replace existing file if present to keep determinism.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
