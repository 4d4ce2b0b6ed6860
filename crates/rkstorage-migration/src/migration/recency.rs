//! "Most recent" selection among legacy databases.
//!
//! Timestamps come from a [`TimestampProvider`]. A lookup that fails yields
//! `None`, which orders below every real timestamp and so never wins.

use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use super::scanner::LegacyFile;
use crate::config::TimestampSource;

/// Best-available file timestamp.
pub trait TimestampProvider {
    fn timestamp(&self, path: &Path) -> Option<SystemTime>;

    fn name(&self) -> &'static str;
}

/// Filesystem creation ("birth") time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreationTimeProvider;

impl TimestampProvider for CreationTimeProvider {
    fn timestamp(&self, path: &Path) -> Option<SystemTime> {
        match std::fs::metadata(path).and_then(|m| m.created()) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No creation time");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "creation"
    }
}

/// Last modification time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModificationTimeProvider;

impl TimestampProvider for ModificationTimeProvider {
    fn timestamp(&self, path: &Path) -> Option<SystemTime> {
        match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No modification time");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "modification"
    }
}

/// Whether the filesystem holding `dir` reports creation times.
pub fn supports_creation_time(dir: &Path) -> bool {
    std::fs::metadata(dir).and_then(|m| m.created()).is_ok()
}

/// Pick the provider for `source`. `Auto` probes `dir` once.
pub fn provider_for(source: TimestampSource, dir: &Path) -> Box<dyn TimestampProvider> {
    match source {
        TimestampSource::Creation => Box::new(CreationTimeProvider),
        TimestampSource::Modification => Box::new(ModificationTimeProvider),
        TimestampSource::Auto if supports_creation_time(dir) => Box::new(CreationTimeProvider),
        TimestampSource::Auto => Box::new(ModificationTimeProvider),
    }
}

/// Most recent file by `provider`. Ties keep the first seen; when no
/// timestamp can be read at all, the first file is returned.
/// `None` only for an empty slice.
pub fn pick_most_recent<'a>(
    files: &'a [LegacyFile],
    provider: &dyn TimestampProvider,
) -> Option<&'a LegacyFile> {
    let mut best: Option<(&LegacyFile, SystemTime)> = None;

    for file in files {
        let Some(ts) = provider.timestamp(&file.path) else {
            continue;
        };
        match best {
            Some((_, current)) if ts <= current => {}
            _ => best = Some((file, ts)),
        }
    }

    best.map(|(file, _)| file).or_else(|| files.first())
}
