// crates/meshdoc-config/src/lib.rs
// ============================================================================
// Module: meshdoc Config Library
// Description: Configuration model for control-plane profile documentation tests.
// Purpose: Provide the configuration object, overlays, profiles, and harness settings.
// Dependencies: serde, serde_json, serde_yaml, thiserror, toml
// ============================================================================

//! ## Overview
//! `meshdoc-config` owns every value that flows into a control-plane install
//! under test:
//! - [`ControlPlaneConfig`] is the configuration object mutated by setup
//!   callbacks before installation.
//! - [`ValuesOverlay`] is the parsed form of its textual values overlay.
//! - [`ProfileCatalog`] holds the built-in profiles and [`FEATURE_FLAGS`] the
//!   recognised pilot feature flags.
//! - [`DocsSelector`] parses the label handed to documentation tests.
//! - [`HarnessConfig`] carries golden/run-root settings from TOML and env.
//!
//! Invariants:
//! - Parsing fails closed; no configuration is silently defaulted past a
//!   validation error.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod control_plane;
pub mod error;
pub mod harness;
pub mod overlay;
pub mod profile;
pub mod selector;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use control_plane::ControlPlaneConfig;
pub use control_plane::DEFAULT_SYSTEM_NAMESPACE;
pub use error::ConfigError;
pub use harness::HarnessConfig;
pub use harness::HarnessEnv;
pub use overlay::ValuesOverlay;
pub use profile::FEATURE_FLAGS;
pub use profile::FeatureFlag;
pub use profile::FlagSource;
pub use profile::ProfileCatalog;
pub use profile::ProfileDefinition;
pub use profile::ProfileName;
pub use selector::DocTopic;
pub use selector::DocsSelector;
