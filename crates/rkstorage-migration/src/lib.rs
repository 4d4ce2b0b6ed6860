//! # rkstorage-migration
//!
//! One-time migration of the scoped legacy AsyncStorage databases
//! (`RKStorage-scoped-experience-*`) into the single `RKStorage` file the
//! current storage engine reads.
//!
//! The host calls [`migrate`] (or builds a [`Migrator`]) once at startup,
//! before anything else opens the target database. The call never fails:
//! every problem is logged and summarized in the returned [`MigrationReport`].

pub mod config;
pub mod constants;
pub mod errors;
pub mod migration;
pub mod storage;
pub mod tracing;

pub use config::{MigrationConfig, TimestampSource};
pub use errors::{MigrationError, MigrationResult};
pub use migration::{migrate, MigrationOutcome, MigrationReport, Migrator};
pub use storage::{SqliteStorageInitializer, StorageInitializer};
