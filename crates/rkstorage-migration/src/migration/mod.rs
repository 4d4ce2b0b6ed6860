//! Legacy scoped-database migration.
//!
//! ## Components
//! - **scanner**: directory listing filtered by legacy file name
//! - **recency**: "most recent" selection over pluggable timestamp sources
//! - **copier**: streaming whole-file copy
//! - **sidecar**: `-wal` / `-shm` companion copies
//! - **orchestrator**: the end-to-end procedure and its report

pub mod copier;
pub mod orchestrator;
pub mod recency;
pub mod scanner;
pub mod sidecar;

pub use copier::copy_file;
pub use orchestrator::{migrate, MigrationOutcome, MigrationReport, Migrator};
pub use recency::{
    pick_most_recent, provider_for, CreationTimeProvider, ModificationTimeProvider,
    TimestampProvider,
};
pub use scanner::{
    is_any_legacy_file, is_primary_legacy_candidate, DirectoryScanner, FileKind, FileScanner,
    LegacyFile,
};
pub use sidecar::{migrate_sidecars, SidecarResult, SidecarStatus};
