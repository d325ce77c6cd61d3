// system-tests/src/config.rs
// ============================================================================
// Module: System Test Configuration
// Description: Harness configuration rooted at the checked-in golden tree.
// Purpose: Centralize golden root resolution and environment overrides.
// Dependencies: meshdoc-config
// ============================================================================

//! ## Overview
//! System tests verify against `system-tests/golden` unless
//! `MESHDOC_GOLDEN_ROOT` points elsewhere. Setting `MESHDOC_REFRESH_GOLDEN=1`
//! rewrites the golden tree instead of verifying it. Invalid environment
//! values fail closed.

use std::path::Path;
use std::path::PathBuf;

use meshdoc_config::ConfigError;
use meshdoc_config::HarnessConfig;

/// Returns the checked-in golden root.
#[must_use]
pub fn golden_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Loads harness settings for system tests.
///
/// # Errors
///
/// Returns [`ConfigError`] when an environment override is invalid.
pub fn harness() -> Result<HarnessConfig, ConfigError> {
    HarnessConfig {
        golden_root: golden_root(),
        ..HarnessConfig::default()
    }
    .apply_env()
}
