// crates/meshdoc-suite/src/install.rs
// ============================================================================
// Module: Installer
// Description: Control-plane installer seam and in-memory reference installer.
// Purpose: Apply a profile plus sealed configuration and track installations.
// Dependencies: meshdoc-config, serde, serde_json
// ============================================================================

//! ## Overview
//! [`Installer`] is the boundary to whatever applies a profile to a cluster.
//! [`InMemoryInstaller`] computes the effective values the way a real
//! installer would merge them and records live installations so that double
//! installs and stray uninstalls are detected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use meshdoc_config::ProfileDefinition;
use meshdoc_config::ProfileName;
use serde::Serialize;
use serde_json::Value;

use crate::context::SetupContext;
use crate::error::InstallError;
use crate::setup::SealedConfig;

// ============================================================================
// SECTION: Installation
// ============================================================================

/// Record of an installed control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installation {
    /// Installed profile.
    pub profile: ProfileName,
    /// System namespace.
    pub namespace: String,
    /// Revision label (`default` when unset).
    pub revision: String,
    /// Profile values with the overlay merged on top.
    pub values: Value,
}

impl Installation {
    /// Returns the `(namespace, revision)` key identifying the installation.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.namespace.clone(), self.revision.clone())
    }
}

// ============================================================================
// SECTION: Installer Trait
// ============================================================================

/// Applies profiles to a control plane.
pub trait Installer {
    /// Installs `profile` with the sealed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] when the installation cannot be applied.
    fn install(
        &mut self,
        context: &SetupContext,
        profile: &ProfileDefinition,
        config: &SealedConfig,
    ) -> Result<Installation, InstallError>;

    /// Removes a previous installation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] when the installation cannot be removed.
    fn uninstall(&mut self, installation: &Installation) -> Result<(), InstallError>;
}

// ============================================================================
// SECTION: In-Memory Installer
// ============================================================================

/// Installer that tracks installations in memory.
#[derive(Debug, Default)]
pub struct InMemoryInstaller {
    /// Live installations keyed by `(namespace, revision)`.
    live: BTreeMap<(String, String), Installation>,
}

impl InMemoryInstaller {
    /// Creates an installer with no live installations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates live installations in key order.
    pub fn live(&self) -> impl Iterator<Item = &Installation> {
        self.live.values()
    }

    /// Returns true when a control plane occupies the namespace and revision.
    #[must_use]
    pub fn is_installed(&self, namespace: &str, revision: &str) -> bool {
        self.live.contains_key(&(namespace.to_string(), revision.to_string()))
    }
}

impl Installer for InMemoryInstaller {
    fn install(
        &mut self,
        _context: &SetupContext,
        profile: &ProfileDefinition,
        config: &SealedConfig,
    ) -> Result<Installation, InstallError> {
        let installation = Installation {
            profile: profile.name.clone(),
            namespace: config.config().system_namespace.clone(),
            revision: config.config().revision_label().to_string(),
            values: profile.effective_values(config.overlay()),
        };
        let key = installation.key();
        if self.live.contains_key(&key) {
            return Err(InstallError::AlreadyInstalled {
                namespace: key.0,
                revision: key.1,
            });
        }
        self.live.insert(key, installation.clone());
        Ok(installation)
    }

    fn uninstall(&mut self, installation: &Installation) -> Result<(), InstallError> {
        let key = installation.key();
        if self.live.remove(&key).is_none() {
            return Err(InstallError::NotInstalled {
                namespace: key.0,
                revision: key.1,
            });
        }
        Ok(())
    }
}
