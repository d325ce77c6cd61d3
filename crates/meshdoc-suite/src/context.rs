// crates/meshdoc-suite/src/context.rs
// ============================================================================
// Module: Setup Context
// Description: Ambient resources handed to setup callbacks and installers.
// Purpose: Give callbacks read-only access to environment handles.
// Dependencies: std
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

/// Read-only ambient resources for a suite run.
///
/// An empty context is valid; callbacks that do not need resources ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupContext {
    /// Named resource handles, such as a cluster name or kube context.
    resources: BTreeMap<String, String>,
    /// Directory for run artifacts, when one is configured.
    run_root: Option<PathBuf>,
}

impl SetupContext {
    /// Returns a context with no resources.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            resources: BTreeMap::new(),
            run_root: None,
        }
    }

    /// Adds a named resource.
    #[must_use]
    pub fn with_resource(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.resources.insert(name.into(), value.into());
        self
    }

    /// Sets the run artifact directory.
    #[must_use]
    pub fn with_run_root(mut self, run_root: impl Into<PathBuf>) -> Self {
        self.run_root = Some(run_root.into());
        self
    }

    /// Looks up a named resource.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&str> {
        self.resources.get(name).map(String::as_str)
    }

    /// Returns the run artifact directory, if any.
    #[must_use]
    pub fn run_root(&self) -> Option<&Path> {
        self.run_root.as_deref()
    }

    /// Returns true when the context carries no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.run_root.is_none()
    }
}
