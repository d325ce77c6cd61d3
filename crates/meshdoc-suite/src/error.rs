// crates/meshdoc-suite/src/error.rs
// ============================================================================
// Module: Suite Errors
// Description: Error types for setup, installation, events, and suite runs.
// Purpose: Separate fatal suite faults from per-test failures.
// Dependencies: meshdoc-config, thiserror
// ============================================================================

//! ## Overview
//! Setup and installation errors abort a suite before any test runs and are
//! returned as [`SuiteError`]. Test failures never use these types; they are
//! recorded as [`crate::TestFailure`] values in the suite report.

use meshdoc_config::ConfigError;
use thiserror::Error;

// ============================================================================
// SECTION: Setup Errors
// ============================================================================

/// Errors returned by setup callbacks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The callback refused to produce a configuration.
    #[error("setup rejected: {0}")]
    Rejected(String),
    /// The callback or the chain produced an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// SECTION: Install Errors
// ============================================================================

/// Errors returned by installers.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// A control plane already occupies the namespace and revision.
    #[error("control plane already installed in {namespace} (revision {revision})")]
    AlreadyInstalled {
        /// System namespace.
        namespace: String,
        /// Revision label.
        revision: String,
    },
    /// No control plane is installed for the namespace and revision.
    #[error("no control plane installed in {namespace} (revision {revision})")]
    NotInstalled {
        /// System namespace.
        namespace: String,
        /// Revision label.
        revision: String,
    },
    /// The installer rejected the request.
    #[error("install rejected: {0}")]
    Rejected(String),
}

// ============================================================================
// SECTION: Event Errors
// ============================================================================

/// Errors returned by event sinks.
#[derive(Debug, Error)]
pub enum EventError {
    /// Event could not be serialized.
    #[error("event serialization failed: {0}")]
    Serialize(String),
    /// Event could not be written.
    #[error("event write failed: {0}")]
    Write(String),
}

// ============================================================================
// SECTION: Report Errors
// ============================================================================

/// Errors returned while writing suite reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report could not be serialized.
    #[error("report serialization failed: {0}")]
    Serialize(String),
    /// Report could not be written.
    #[error("report io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Suite Errors
// ============================================================================

/// Fatal errors that abort a suite run.
///
/// # Invariants
/// - Returned only before tests start; later failures land in the report.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The configured profile is not in the catalog.
    #[error("suite profile unavailable: {0}")]
    Profile(ConfigError),
    /// A setup callback failed.
    #[error("setup step `{step}` failed: {source}")]
    Setup {
        /// Registered name of the failing step.
        step: String,
        /// Underlying setup error.
        #[source]
        source: SetupError,
    },
    /// The configuration produced by the setup chain is invalid.
    #[error("setup produced an invalid configuration: {0}")]
    Invalid(ConfigError),
    /// The installer failed.
    #[error("installation failed: {0}")]
    Install(#[from] InstallError),
    /// The harness event log could not be opened.
    #[error("event log unavailable: {0}")]
    Events(EventError),
}
