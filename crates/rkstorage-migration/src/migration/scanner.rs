//! Directory listing with file-name filtering.
//! Listing failures are logged and read as "nothing found".

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{JOURNAL_SUFFIX, SHM_SUFFIX, WAL_SUFFIX};
use crate::errors::{MigrationError, MigrationResult};

/// Role of a legacy file, decided by its name suffix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Primary,
    Wal,
    Shm,
    Journal,
}

impl FileKind {
    pub fn classify(name: &str) -> Self {
        if name.ends_with(WAL_SUFFIX) {
            Self::Wal
        } else if name.ends_with(SHM_SUFFIX) {
            Self::Shm
        } else if name.ends_with(JOURNAL_SUFFIX) {
            Self::Journal
        } else {
            Self::Primary
        }
    }
}

/// A directory entry whose name matched the legacy prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyFile {
    pub path: PathBuf,
    pub name: String,
    pub kind: FileKind,
}

impl LegacyFile {
    pub fn new(path: PathBuf, name: String) -> Self {
        let kind = FileKind::classify(&name);
        Self { path, name, kind }
    }
}

/// Prefix match, excluding journals and WAL/SHM sidecars.
pub fn is_primary_legacy_candidate(prefix: &str, name: &str) -> bool {
    is_any_legacy_file(prefix, name) && FileKind::classify(name) == FileKind::Primary
}

/// Prefix match only. Used for cleanup, where sidecars are obsolete too.
pub fn is_any_legacy_file(prefix: &str, name: &str) -> bool {
    name.starts_with(prefix)
}

/// Lists the files of a directory that satisfy a name predicate.
/// Each call re-reads the directory.
pub trait FileScanner {
    fn list(&self, dir: &Path, filter: &dyn Fn(&str) -> bool) -> Vec<LegacyFile>;
}

impl<S: FileScanner + ?Sized> FileScanner for &S {
    fn list(&self, dir: &Path, filter: &dyn Fn(&str) -> bool) -> Vec<LegacyFile> {
        (**self).list(dir, filter)
    }
}

/// [`FileScanner`] over `std::fs::read_dir`. Results are sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    /// Fallible listing; [`FileScanner::list`] swallows the error.
    pub fn try_list(
        &self,
        dir: &Path,
        filter: &dyn Fn(&str) -> bool,
    ) -> MigrationResult<Vec<LegacyFile>> {
        let entries = std::fs::read_dir(dir).map_err(|source| MigrationError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            // Lossy names keep the prefix and suffix intact, so non-UTF-8
            // legacy files are still matched and cleaned up by path.
            let raw = entry.file_name();
            let name = raw.to_string_lossy().into_owned();
            if raw.to_str().is_none() {
                debug!(dir = %dir.display(), name = %name, "Entry name is not valid UTF-8");
            }
            if filter(&name) {
                files.push(LegacyFile::new(entry.path(), name));
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

impl FileScanner for DirectoryScanner {
    fn list(&self, dir: &Path, filter: &dyn Fn(&str) -> bool) -> Vec<LegacyFile> {
        match self.try_list(dir, filter) {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Directory listing failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "RKStorage-scoped-experience-";

    #[test]
    fn classify_by_suffix() {
        assert_eq!(FileKind::classify("db"), FileKind::Primary);
        assert_eq!(FileKind::classify("db-wal"), FileKind::Wal);
        assert_eq!(FileKind::classify("db-shm"), FileKind::Shm);
        assert_eq!(FileKind::classify("db-journal"), FileKind::Journal);
    }

    #[test]
    fn primary_candidate_excludes_sidecars() {
        assert!(is_primary_legacy_candidate(PREFIX, "RKStorage-scoped-experience-@me/app"));
        assert!(!is_primary_legacy_candidate(PREFIX, "RKStorage-scoped-experience-a-wal"));
        assert!(!is_primary_legacy_candidate(PREFIX, "RKStorage-scoped-experience-a-shm"));
        assert!(!is_primary_legacy_candidate(PREFIX, "RKStorage-scoped-experience-a-journal"));
        assert!(!is_primary_legacy_candidate(PREFIX, "RKStorage"));
    }

    #[test]
    fn any_legacy_file_includes_sidecars() {
        assert!(is_any_legacy_file(PREFIX, "RKStorage-scoped-experience-a-journal"));
        assert!(is_any_legacy_file(PREFIX, "RKStorage-scoped-experience-a-wal"));
        assert!(!is_any_legacy_file(PREFIX, "RKStorage-wal"));
    }

    #[test]
    fn lists_matching_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["keep-b", "other", "keep-a", "keep-a-wal"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let files = DirectoryScanner.list(tmp.path(), &|name| {
            is_primary_legacy_candidate("keep-", name)
        });
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["keep-a", "keep-b"]);
        assert!(files.iter().all(|f| f.kind == FileKind::Primary));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_still_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let raw = OsStr::from_bytes(b"RKStorage-scoped-experience-old\xff-journal");
        std::fs::write(tmp.path().join(raw), b"j").unwrap();

        let all = DirectoryScanner.list(tmp.path(), &|name| is_any_legacy_file(PREFIX, name));
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].path, tmp.path().join(raw));
        assert_eq!(all[0].kind, FileKind::Journal);

        let primaries = DirectoryScanner.list(tmp.path(), &|name| {
            is_primary_legacy_candidate(PREFIX, name)
        });
        assert!(primaries.is_empty());
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        assert!(DirectoryScanner.list(&missing, &|_| true).is_empty());
        let err = DirectoryScanner.try_list(&missing, &|_| true).unwrap_err();
        assert_eq!(err.error_code(), "DIRECTORY_UNREADABLE");
    }
}
