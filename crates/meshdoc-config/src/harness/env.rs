// crates/meshdoc-config/src/harness/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for harness settings.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use super::HarnessConfig;
use crate::ConfigError;
use crate::ProfileName;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Golden documentation root override.
    GoldenRoot,
    /// Run root for reports and scratch output.
    RunRoot,
    /// Rewrite golden docs instead of verifying (`true`/`false` or `1`/`0`).
    RefreshGolden,
    /// Path of the JSON-line event log.
    EventLog,
    /// Profile used when a caller does not name one.
    Profile,
}

impl HarnessEnv {
    /// Every harness variable.
    pub const ALL: [Self; 5] =
        [Self::GoldenRoot, Self::RunRoot, Self::RefreshGolden, Self::EventLog, Self::Profile];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoldenRoot => "MESHDOC_GOLDEN_ROOT",
            Self::RunRoot => "MESHDOC_RUN_ROOT",
            Self::RefreshGolden => "MESHDOC_REFRESH_GOLDEN",
            Self::EventLog => "MESHDOC_EVENT_LOG",
            Self::Profile => "MESHDOC_PROFILE",
        }
    }
}

impl HarnessConfig {
    /// Applies environment overrides on top of the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when an environment value is not valid UTF-8,
    /// is empty, or fails validation.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(root) = read_env_nonempty(HarnessEnv::GoldenRoot.as_str())? {
            self.golden_root = PathBuf::from(root);
        }
        if let Some(root) = read_env_nonempty(HarnessEnv::RunRoot.as_str())? {
            self.run_root = Some(PathBuf::from(root));
        }
        if let Some(raw) = read_env_nonempty(HarnessEnv::RefreshGolden.as_str())? {
            self.refresh_golden = parse_bool_env(HarnessEnv::RefreshGolden.as_str(), &raw)?;
        }
        if let Some(path) = read_env_nonempty(HarnessEnv::EventLog.as_str())? {
            self.event_log = Some(PathBuf::from(path));
        }
        if let Some(name) = read_env_nonempty(HarnessEnv::Profile.as_str())? {
            let profile = ProfileName::new(name).map_err(|err| {
                ConfigError::Env(format!("{}: {err}", HarnessEnv::Profile.as_str()))
            })?;
            self.profile = Some(profile);
        }
        Ok(self)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a boolean environment value.
fn parse_bool_env(name: &str, raw: &str) -> Result<bool, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(ConfigError::Env(format!("{name} must be 1, 0, true, or false")))
}
