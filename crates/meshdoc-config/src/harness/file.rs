// crates/meshdoc-config/src/harness/file.rs
// ============================================================================
// Module: Harness Config File
// Description: TOML-backed harness settings.
// Purpose: Load harness settings with size, encoding, and key validation.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! The harness file is optional. Relative paths inside it resolve against the
//! directory that contains the file so a checked-in `meshdoc.toml` works from
//! any working directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConfigError;
use crate::ProfileName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted size of a harness config file.
pub const MAX_HARNESS_CONFIG_BYTES: u64 = 1024 * 1024;

/// Golden root used when nothing overrides it.
const DEFAULT_GOLDEN_ROOT: &str = "golden";

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding golden documentation.
    pub golden_root: PathBuf,
    /// Optional directory for reports.
    pub run_root: Option<PathBuf>,
    /// Rewrite golden docs instead of verifying them.
    pub refresh_golden: bool,
    /// Optional JSON-line event log path.
    pub event_log: Option<PathBuf>,
    /// Profile used when a caller does not name one.
    pub profile: Option<ProfileName>,
    /// Optional overlay file for CLI invocations.
    pub values_file: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            golden_root: PathBuf::from(DEFAULT_GOLDEN_ROOT),
            run_root: None,
            refresh_golden: false,
            event_log: None,
            profile: None,
            values_file: None,
        }
    }
}

/// On-disk representation of the harness file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HarnessFile {
    /// Golden root, relative to the file's directory.
    golden_root: Option<PathBuf>,
    /// Run root, relative to the file's directory.
    run_root: Option<PathBuf>,
    /// Refresh flag.
    refresh_golden: Option<bool>,
    /// Event log path, relative to the file's directory.
    event_log: Option<PathBuf>,
    /// Default profile.
    profile: Option<ProfileName>,
    /// Overlay file, relative to the file's directory.
    values_file: Option<PathBuf>,
}

impl HarnessConfig {
    /// Loads the optional file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file or an environment value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    /// Loads settings from a TOML file without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Harness`] when it is oversized, not UTF-8, or invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = read_config_text(path)?;
        let parsed: HarnessFile =
            toml::from_str(&text).map_err(|err| ConfigError::Harness(err.to_string()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let defaults = Self::default();
        Ok(Self {
            golden_root: resolve(base, parsed.golden_root.unwrap_or(defaults.golden_root)),
            run_root: parsed.run_root.map(|root| resolve(base, root)),
            refresh_golden: parsed.refresh_golden.unwrap_or(defaults.refresh_golden),
            event_log: parsed.event_log.map(|log| resolve(base, log)),
            profile: parsed.profile,
            values_file: parsed.values_file.map(|file| resolve(base, file)),
        })
    }

    /// Returns the configured profile or [`ProfileName::DEFAULT`].
    #[must_use]
    pub fn profile_or_default(&self) -> ProfileName {
        self.profile.clone().unwrap_or_default()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the config file with a hard size cap and UTF-8 enforcement.
fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    let file = fs::File::open(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let mut bytes = Vec::new();
    file.take(MAX_HARNESS_CONFIG_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > MAX_HARNESS_CONFIG_BYTES {
        return Err(ConfigError::Harness("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Harness("config file must be utf-8".to_string()))
}

/// Resolves `path` against `base` unless it is already absolute.
fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() { path } else { base.join(path) }
}
