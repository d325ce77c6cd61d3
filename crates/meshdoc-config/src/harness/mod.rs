// crates/meshdoc-config/src/harness/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Settings for golden roots, run roots, and event logs.
// Purpose: Provide typed harness settings from TOML files and env overrides.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Harness configuration is read from an optional TOML file and then from
//! environment variables, which take precedence. Both sources are parsed
//! strictly: unknown keys, invalid UTF-8, and empty values fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod env_tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::HarnessEnv;
pub use env::read_env_strict;
pub use file::HarnessConfig;
pub use file::MAX_HARNESS_CONFIG_BYTES;
