//! Whole-file byte copy.
//!
//! Streams through `std::io::copy` (kernel-side copy where the platform has
//! one), so the database is never held in memory. Both handles are owned
//! locals and close on every exit path, independently of each other.

use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing::debug;

use crate::errors::{MigrationError, MigrationResult};

/// Copy all of `source` over `dest`, replacing existing content.
/// Returns the number of bytes written. No retry.
pub fn copy_file(source: &Path, dest: &Path) -> MigrationResult<u64> {
    let copy_err = |e: std::io::Error| MigrationError::CopyFailed {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    };

    let mut reader = File::open(source).map_err(copy_err)?;
    let metadata = reader.metadata().map_err(copy_err)?;
    if !metadata.is_file() {
        return Err(MigrationError::NotAFile(source.to_path_buf()));
    }
    let expected = metadata.len();

    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .map_err(copy_err)?;

    let copied = std::io::copy(&mut reader, &mut writer).map_err(copy_err)?;
    writer.sync_all().map_err(copy_err)?;

    if copied != expected {
        return Err(MigrationError::SizeMismatch {
            path: source.to_path_buf(),
            expected,
            copied,
        });
    }

    debug!(
        from = %source.display(),
        to = %dest.display(),
        bytes = copied,
        "File copied"
    );
    Ok(copied)
}
