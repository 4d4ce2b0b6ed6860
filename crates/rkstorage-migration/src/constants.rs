//! Fixed file names shared by the legacy and current storage layouts.

/// Prefix of every database created under the scoped naming scheme.
pub const LEGACY_NAME_PREFIX: &str = "RKStorage-scoped-experience-";

/// Primary file of the current storage engine.
pub const TARGET_FILE_NAME: &str = "RKStorage";

/// Write-ahead log sidecar suffix.
pub const WAL_SUFFIX: &str = "-wal";

/// Shared-memory index sidecar suffix.
pub const SHM_SUFFIX: &str = "-shm";

/// Rollback journal suffix. Journals are deleted, never migrated.
pub const JOURNAL_SUFFIX: &str = "-journal";

/// Sidecars copied next to the target, in copy order.
pub const SIDECAR_SUFFIXES: [&str; 2] = [WAL_SUFFIX, SHM_SUFFIX];

/// Environment variable holding the log filter for [`crate::tracing::init_tracing`].
pub const LOG_ENV_VAR: &str = "RKSTORAGE_LOG";
