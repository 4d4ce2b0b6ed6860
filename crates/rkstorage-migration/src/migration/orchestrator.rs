//! The migration procedure: guard, discover, select, initialize, copy,
//! sidecars, cleanup. A straight pipeline with early exits; nothing here
//! returns an error to the caller.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use super::copier::copy_file;
use super::recency::{pick_most_recent, provider_for, TimestampProvider};
use super::scanner::{
    is_any_legacy_file, is_primary_legacy_candidate, DirectoryScanner, FileScanner, LegacyFile,
};
use super::sidecar::{migrate_sidecars, SidecarResult, SidecarStatus};
use crate::config::MigrationConfig;
use crate::errors::{MigrationError, MigrationResult};
use crate::storage::StorageInitializer;

/// How a run ended. Only used for logging and diagnostics: the target file
/// on disk is the real completion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// The target already existed; nothing was scanned.
    SkippedAlreadyMigrated,
    /// No legacy database matched the prefix.
    SkippedNoCandidate,
    Migrated,
    /// Primary copy succeeded; a sidecar copy or a deletion did not.
    MigratedWithErrors,
    /// Storage initialization or the primary copy failed. Legacy files are intact.
    Aborted,
}

impl MigrationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkippedAlreadyMigrated => "skipped_already_migrated",
            Self::SkippedNoCandidate => "skipped_no_candidate",
            Self::Migrated => "migrated",
            Self::MigratedWithErrors => "migrated_with_errors",
            Self::Aborted => "aborted",
        }
    }

    /// Whether the legacy data now lives in the target.
    pub fn is_migrated(&self) -> bool {
        matches!(self, Self::Migrated | Self::MigratedWithErrors)
    }
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub outcome: MigrationOutcome,
    /// The legacy database chosen for migration, if any.
    pub source: Option<PathBuf>,
    pub target: PathBuf,
    pub sidecars: Vec<SidecarResult>,
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl MigrationReport {
    fn new(target: PathBuf) -> Self {
        Self {
            outcome: MigrationOutcome::SkippedAlreadyMigrated,
            source: None,
            target,
            sidecars: Vec::new(),
            deleted: Vec::new(),
            errors: Vec::new(),
            duration_ms: 0,
        }
    }

    fn record(&mut self, err: &MigrationError) {
        self.errors.push(format!("{}: {}", err.error_code(), err));
    }

    fn finish(mut self, outcome: MigrationOutcome, start: Instant) -> Self {
        self.outcome = outcome;
        self.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Runs the migration with injectable collaborators.
pub struct Migrator<'a> {
    config: MigrationConfig,
    initializer: &'a dyn StorageInitializer,
    scanner: Box<dyn FileScanner + 'a>,
    timestamps: Option<Box<dyn TimestampProvider + 'a>>,
}

impl<'a> Migrator<'a> {
    /// Filesystem scanner; timestamp provider chosen from `config.timestamp_source`
    /// when the run starts.
    pub fn new(config: MigrationConfig, initializer: &'a dyn StorageInitializer) -> Self {
        Self {
            config,
            initializer,
            scanner: Box::new(DirectoryScanner),
            timestamps: None,
        }
    }

    pub fn with_scanner(mut self, scanner: impl FileScanner + 'a) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn with_timestamp_provider(mut self, provider: impl TimestampProvider + 'a) -> Self {
        self.timestamps = Some(Box::new(provider));
        self
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate the most recent legacy database in `storage_dir` into the target.
    pub fn run(&self, storage_dir: &Path) -> MigrationReport {
        let start = Instant::now();
        let mut report = MigrationReport::new(self.config.target_path(storage_dir));

        // Idempotence guard: before any directory scan.
        if report.target.exists() {
            info!(dest = %report.target.display(), "Target storage exists, skipping migration");
            return report.finish(MigrationOutcome::SkippedAlreadyMigrated, start);
        }

        let prefix = self.config.legacy_prefix.as_str();
        let candidates = self
            .scanner
            .list(storage_dir, &|name| is_primary_legacy_candidate(prefix, name));

        let detected;
        let provider: &dyn TimestampProvider = match &self.timestamps {
            Some(provider) => provider.as_ref(),
            None => {
                detected = provider_for(self.config.timestamp_source, storage_dir);
                detected.as_ref()
            }
        };

        let Some(chosen) = pick_most_recent(&candidates, provider) else {
            info!(dir = %storage_dir.display(), "No scoped database found");
            return report.finish(MigrationOutcome::SkippedNoCandidate, start);
        };
        info!(
            source = %chosen.name,
            candidates = candidates.len(),
            timestamps = provider.name(),
            "Selected most recent scoped database"
        );
        report.source = Some(chosen.path.clone());

        // The engine's path must be the one the idempotence guard checks.
        let initialized = self
            .initializer
            .ensure_initialized()
            .and_then(|path| {
                if path == report.target {
                    Ok(path)
                } else {
                    Err(MigrationError::Initialization {
                        message: format!(
                            "engine uses {} but migration guards {}",
                            path.display(),
                            report.target.display()
                        ),
                    })
                }
            });
        if let Err(e) = initialized {
            error!(error = %e, code = e.error_code(), "Storage initialization failed, migration aborted");
            report.record(&e);
            discard_partial_target(&report.target);
            return report.finish(MigrationOutcome::Aborted, start);
        }

        if let Err(e) = copy_file(&chosen.path, &report.target) {
            error!(
                source = %chosen.name,
                error = %e,
                code = e.error_code(),
                "Failed to migrate scoped database"
            );
            report.record(&e);
            discard_partial_target(&report.target);
            return report.finish(MigrationOutcome::Aborted, start);
        }
        info!(source = %chosen.name, dest = %report.target.display(), "Migrated scoped database");

        report.sidecars = migrate_sidecars(&chosen.path, &report.target);
        for sidecar in &report.sidecars {
            if let SidecarStatus::Failed { error } = &sidecar.status {
                report.errors.push(format!("{}: {}", sidecar.suffix, error));
            }
        }

        for file in self
            .scanner
            .list(storage_dir, &|name| is_any_legacy_file(prefix, name))
        {
            match delete_legacy_file(&file) {
                Ok(()) => {
                    info!(file = %file.name, "Deleted scoped database file");
                    report.deleted.push(file.path);
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, "Failed to delete scoped database file");
                    report.record(&e);
                }
            }
        }

        let outcome = if report.errors.is_empty() {
            MigrationOutcome::Migrated
        } else {
            MigrationOutcome::MigratedWithErrors
        };
        info!(
            outcome = outcome.as_str(),
            deleted = report.deleted.len(),
            errors = report.errors.len(),
            "Completed the scoped storage migration"
        );
        report.finish(outcome, start)
    }
}

fn delete_legacy_file(file: &LegacyFile) -> MigrationResult<()> {
    std::fs::remove_file(&file.path).map_err(|source| MigrationError::DeleteFailed {
        path: file.path.clone(),
        source,
    })
}

/// Remove a target left behind by a failed primary copy so the next startup
/// retries instead of treating it as migrated.
fn discard_partial_target(target: &Path) {
    match std::fs::remove_file(target) {
        Ok(()) => info!(dest = %target.display(), "Removed incomplete target"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dest = %target.display(), error = %e, "Failed to remove incomplete target"),
    }
}

/// One-call entry point with the default scanner and timestamp policy.
pub fn migrate(
    storage_dir: &Path,
    legacy_prefix: &str,
    target_file_name: &str,
    initializer: &dyn StorageInitializer,
) -> MigrationReport {
    Migrator::new(MigrationConfig::new(legacy_prefix, target_file_name), initializer).run(storage_dir)
}
