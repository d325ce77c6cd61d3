// crates/meshdoc-config/src/error.rs
// ============================================================================
// Module: Config Errors
// Description: Error type shared by configuration parsing and validation.
// Purpose: Give callers stable, matchable failure categories.
// Dependencies: thiserror
// ============================================================================

use thiserror::Error;

/// Errors raised while building or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Profile name does not satisfy naming rules.
    #[error("invalid profile name: {0}")]
    InvalidProfileName(String),
    /// Profile name is valid but not present in the catalog.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),
    /// System namespace is not a DNS-1123 label.
    #[error("invalid system namespace: {0}")]
    InvalidNamespace(String),
    /// Revision is not a DNS-1123 label.
    #[error("invalid revision: {0}")]
    InvalidRevision(String),
    /// Overlay text is not valid YAML.
    #[error("values overlay is not valid yaml: {0}")]
    OverlayParse(String),
    /// Overlay parsed but has an unsupported shape.
    #[error("values overlay rejected: {0}")]
    OverlayShape(String),
    /// Feature flag value cannot be interpreted.
    #[error("feature flag {flag} has invalid value: {reason}")]
    FeatureFlag {
        /// Flag name.
        flag: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Documentation label cannot be parsed.
    #[error("invalid docs selector: {0}")]
    InvalidSelector(String),
    /// Harness configuration file could not be read.
    #[error("harness config io error: {0}")]
    Io(String),
    /// Harness configuration file is invalid.
    #[error("harness config invalid: {0}")]
    Harness(String),
    /// Environment override is invalid.
    #[error("{0}")]
    Env(String),
}
