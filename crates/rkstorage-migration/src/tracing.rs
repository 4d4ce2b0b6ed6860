//! Subscriber bootstrap for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Install a fmt subscriber filtered by `RKSTORAGE_LOG`, or `default_directive`
/// when the variable is unset or invalid.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let _ = init_tracing("debug");
        assert!(!init_tracing("info"));
    }
}
