//! WAL/SHM companion files of the chosen legacy database.
//!
//! Each suffix is handled on its own: a failed `-wal` copy does not stop the
//! `-shm` copy, and neither affects the primary copy that preceded them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::copier::copy_file;
use crate::constants::SIDECAR_SUFFIXES;

/// What happened to one sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SidecarStatus {
    Copied { bytes: u64 },
    Missing,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidecarResult {
    pub suffix: &'static str,
    #[serde(flatten)]
    pub status: SidecarStatus,
}

impl SidecarResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, SidecarStatus::Failed { .. })
    }
}

/// `base` with `suffix` appended to its final component (`db` -> `db-wal`).
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Copy `source_base + suffix` to `dest_base + suffix` when the source is a
/// regular file. Errors are logged and reported, never returned.
pub fn migrate_sidecar(source_base: &Path, dest_base: &Path, suffix: &'static str) -> SidecarResult {
    let source = with_suffix(source_base, suffix);
    if !source.is_file() {
        return SidecarResult {
            suffix,
            status: SidecarStatus::Missing,
        };
    }

    let dest = with_suffix(dest_base, suffix);
    let status = match copy_file(&source, &dest) {
        Ok(bytes) => {
            info!(from = %source.display(), to = %dest.display(), bytes, "Migrated sidecar");
            SidecarStatus::Copied { bytes }
        }
        Err(e) => {
            warn!(from = %source.display(), error = %e, code = e.error_code(), "Failed to migrate sidecar");
            SidecarStatus::Failed {
                error: e.to_string(),
            }
        }
    };
    SidecarResult { suffix, status }
}

/// Run [`migrate_sidecar`] for `-wal` then `-shm`.
pub fn migrate_sidecars(source_base: &Path, dest_base: &Path) -> Vec<SidecarResult> {
    SIDECAR_SUFFIXES
        .into_iter()
        .map(|suffix| migrate_sidecar(source_base, dest_base, suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_to_file_name() {
        assert_eq!(
            with_suffix(Path::new("/data/RKStorage"), "-wal"),
            PathBuf::from("/data/RKStorage-wal")
        );
    }

    #[test]
    fn copies_present_sidecar_and_skips_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("foo");
        let dst = tmp.path().join("Target");
        std::fs::write(with_suffix(&src, "-wal"), b"wal bytes").unwrap();

        let results = migrate_sidecars(&src, &dst);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].suffix, "-wal");
        assert_eq!(results[0].status, SidecarStatus::Copied { bytes: 9 });
        assert_eq!(results[1].status, SidecarStatus::Missing);

        assert_eq!(std::fs::read(tmp.path().join("Target-wal")).unwrap(), b"wal bytes");
        assert!(!tmp.path().join("Target-shm").exists());
    }

    #[test]
    fn directory_named_like_sidecar_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("foo");
        std::fs::create_dir(with_suffix(&src, "-shm")).unwrap();

        let result = migrate_sidecar(&src, &tmp.path().join("Target"), "-shm");
        assert_eq!(result.status, SidecarStatus::Missing);
    }

    #[test]
    fn one_failure_does_not_block_the_other() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("foo");
        std::fs::write(with_suffix(&src, "-wal"), b"w").unwrap();
        std::fs::write(with_suffix(&src, "-shm"), b"s").unwrap();
        // A directory in the way of the -wal destination makes that copy fail.
        let dst = tmp.path().join("Target");
        std::fs::create_dir(with_suffix(&dst, "-wal")).unwrap();

        let results = migrate_sidecars(&src, &dst);
        assert!(results[0].is_failure());
        assert_eq!(results[1].status, SidecarStatus::Copied { bytes: 1 });
    }
}
