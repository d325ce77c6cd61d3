// crates/meshdoc-suite/src/setup.rs
// ============================================================================
// Module: Setup Chain
// Description: Ordered configuration mutators and the sealed configuration.
// Purpose: Build the control-plane configuration before installation.
// Dependencies: meshdoc-config
// ============================================================================

//! ## Overview
//! Setup callbacks are registered by name and applied in registration order to
//! a single [`ControlPlaneConfig`] that starts from its defaults. After the
//! last callback the configuration is validated and frozen into a
//! [`SealedConfig`]; the installer and tests only ever see shared references
//! to it.
//! Invariants:
//! - Each callback runs exactly once per suite run.
//! - A failing callback stops the chain; later callbacks do not run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use meshdoc_config::ConfigError;
use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::ValuesOverlay;

use crate::context::SetupContext;
use crate::error::SetupError;
use crate::error::SuiteError;
use crate::events::EventRecorder;
use crate::events::SuiteEvent;

// ============================================================================
// SECTION: Mutators
// ============================================================================

/// Mutates the control-plane configuration during suite setup.
pub trait ConfigMutator {
    /// Applies the mutation in place.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when no valid configuration can be produced.
    fn mutate(
        &self,
        context: &SetupContext,
        config: &mut ControlPlaneConfig,
    ) -> Result<(), SetupError>;
}

impl<F> ConfigMutator for F
where
    F: Fn(&SetupContext, &mut ControlPlaneConfig) -> Result<(), SetupError>,
{
    fn mutate(
        &self,
        context: &SetupContext,
        config: &mut ControlPlaneConfig,
    ) -> Result<(), SetupError> {
        self(context, config)
    }
}

/// Returns a mutator that replaces the control-plane values overlay.
///
/// The text is parsed when the step runs so a malformed overlay fails at its
/// own step. The mutator owns its copy of the text, so borrowed input works.
#[must_use]
pub fn set_control_plane_values(text: &str) -> impl ConfigMutator + use<> {
    let text = text.to_owned();
    move |_: &SetupContext, config: &mut ControlPlaneConfig| -> Result<(), SetupError> {
        ValuesOverlay::parse(&text)?;
        config.control_plane_values.clone_from(&text);
        Ok(())
    }
}

// ============================================================================
// SECTION: Sealed Configuration
// ============================================================================

/// Validated, immutable control-plane configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedConfig {
    /// Validated configuration.
    config: ControlPlaneConfig,
    /// Parsed overlay.
    overlay: ValuesOverlay,
}

impl SealedConfig {
    /// Validates `config` and seals it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn seal(config: ControlPlaneConfig) -> Result<Self, ConfigError> {
        let overlay = config.validate()?;
        Ok(Self {
            config,
            overlay,
        })
    }

    /// Returns the sealed configuration.
    #[must_use]
    pub const fn config(&self) -> &ControlPlaneConfig {
        &self.config
    }

    /// Returns the parsed overlay.
    #[must_use]
    pub const fn overlay(&self) -> &ValuesOverlay {
        &self.overlay
    }
}

// ============================================================================
// SECTION: Setup Chain
// ============================================================================

/// Named setup step.
struct SetupStep {
    /// Registered name, used in errors and events.
    name: String,
    /// Mutator.
    mutator: Box<dyn ConfigMutator>,
}

/// Ordered list of setup callbacks.
#[derive(Default)]
pub struct SetupChain {
    /// Steps in registration order.
    steps: Vec<SetupStep>,
}

impl SetupChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named mutator.
    pub fn push(&mut self, name: impl Into<String>, mutator: impl ConfigMutator + 'static) {
        self.steps.push(SetupStep {
            name: name.into(),
            mutator: Box::new(mutator),
        });
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when no steps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Applies every step to a default configuration and seals the result.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] naming the first failing step, or
    /// [`SuiteError::Invalid`] when the final configuration fails validation.
    pub fn apply(&self, context: &SetupContext) -> Result<SealedConfig, SuiteError> {
        self.apply_recorded(context, None)
    }

    /// Applies the chain, emitting a [`SuiteEvent::SetupApplied`] per step.
    pub(crate) fn apply_recorded(
        &self,
        context: &SetupContext,
        events: Option<&EventRecorder>,
    ) -> Result<SealedConfig, SuiteError> {
        let mut config = ControlPlaneConfig::default();
        for (index, step) in self.steps.iter().enumerate() {
            step.mutator.mutate(context, &mut config).map_err(|source| SuiteError::Setup {
                step: step.name.clone(),
                source,
            })?;
            if let Some(events) = events {
                events.emit(&SuiteEvent::SetupApplied {
                    step: step.name.clone(),
                    index,
                });
            }
        }
        let sealed = SealedConfig::seal(config).map_err(SuiteError::Invalid)?;
        if let Some(events) = events {
            events.emit(&SuiteEvent::ConfigSealed {
                overlay_keys: sealed.overlay().leaves().len(),
            });
        }
        Ok(sealed)
    }
}

impl std::fmt::Debug for SetupChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|step| step.name.as_str()).collect();
        f.debug_struct("SetupChain").field("steps", &names).finish()
    }
}
