//! Whole-document file I/O for the question bank.
//!
//! # Invariants
//! - Reads buffer the entire file before parsing.
//! - Writes go to a sibling temp file that is renamed over the destination,
//!   so readers never observe a partial document.
//! - A symlinked destination is resolved first; the link stays and its
//!   target receives the new document.

use super::{BankError, BankResult, QuestionBank};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub(super) fn read_bank(path: &Path) -> BankResult<QuestionBank> {
    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    QuestionBank::from_json_slice(&bytes)
}

pub(super) fn write_atomically(path: &Path, bytes: &[u8]) -> BankResult<()> {
    let target = resolve_destination(path)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|source| io_error(path, source))?;
    staged
        .write_all(bytes)
        .map_err(|source| io_error(path, source))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|source| io_error(path, source))?;

    // Temp files are created owner-only; keep the destination's mode.
    if let Ok(metadata) = fs::metadata(&target) {
        staged
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|source| io_error(path, source))?;
    }

    staged
        .persist(&target)
        .map_err(|err| io_error(path, err.error))?;
    Ok(())
}

fn resolve_destination(path: &Path) -> BankResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|source| io_error(path, source))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BankError {
    BankError::Io {
        path: path.to_path_buf(),
        source,
    }
}
