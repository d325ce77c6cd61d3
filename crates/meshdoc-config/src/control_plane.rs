// crates/meshdoc-config/src/control_plane.rs
// ============================================================================
// Module: Control Plane Config
// Description: Configuration object mutated by setup callbacks before install.
// Purpose: Hold install settings and the textual values overlay.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ControlPlaneConfig`] is created empty when a suite starts, mutated by the
//! registered setup callbacks, validated, and then handed to the installer.
//! The overlay stays in its textual form so callbacks can write it verbatim;
//! [`ControlPlaneConfig::overlay`] parses it on demand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::ConfigError;
use crate::overlay::ValuesOverlay;
use crate::profile::is_dns_label;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Namespace the control plane is installed into unless overridden.
pub const DEFAULT_SYSTEM_NAMESPACE: &str = "istio-system";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Control-plane install configuration.
///
/// # Invariants
/// - After [`ControlPlaneConfig::validate`] succeeds, `system_namespace` and
///   `revision` are DNS-1123 labels and `control_plane_values` parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlPlaneConfig {
    /// Namespace that hosts the control plane.
    #[serde(default = "default_namespace")]
    pub system_namespace: String,
    /// Optional control-plane revision; `None` installs the default revision.
    #[serde(default)]
    pub revision: Option<String>,
    /// YAML overlay merged onto the profile's deployment values.
    #[serde(default)]
    pub control_plane_values: String,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            system_namespace: default_namespace(),
            revision: None,
            control_plane_values: String::new(),
        }
    }
}

impl ControlPlaneConfig {
    /// Parses the textual overlay.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the overlay text is invalid.
    pub fn overlay(&self) -> Result<ValuesOverlay, ConfigError> {
        ValuesOverlay::parse(&self.control_plane_values)
    }

    /// Validates every field, returning the parsed overlay on success.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid namespace, revision, or overlay.
    pub fn validate(&self) -> Result<ValuesOverlay, ConfigError> {
        if !is_dns_label(&self.system_namespace) {
            return Err(ConfigError::InvalidNamespace(self.system_namespace.clone()));
        }
        if let Some(revision) = &self.revision
            && !is_dns_label(revision)
        {
            return Err(ConfigError::InvalidRevision(revision.clone()));
        }
        self.overlay()
    }

    /// Returns the revision label, `default` when unset.
    #[must_use]
    pub fn revision_label(&self) -> &str {
        self.revision.as_deref().unwrap_or("default")
    }
}

/// Serde default for `system_namespace`.
fn default_namespace() -> String {
    DEFAULT_SYSTEM_NAMESPACE.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
