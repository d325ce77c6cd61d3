// crates/meshdoc-config/src/control_plane/tests.rs
// ============================================================================
// Module: Control Plane Config Unit Tests
// Description: Unit coverage for config defaults and validation.
// Purpose: Ensure invalid install settings fail before installation.
// Dependencies: meshdoc-config
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::ControlPlaneConfig;
use super::DEFAULT_SYSTEM_NAMESPACE;
use crate::ConfigError;

#[test]
fn default_config_is_empty_and_valid() {
    let config = ControlPlaneConfig::default();
    assert_eq!(config.system_namespace, DEFAULT_SYSTEM_NAMESPACE);
    assert!(config.revision.is_none());
    assert!(config.control_plane_values.is_empty());
    let overlay = config.validate().expect("default config validates");
    assert!(overlay.is_empty());
    assert_eq!(config.revision_label(), "default");
}

#[test]
fn invalid_namespace_is_rejected() {
    let config = ControlPlaneConfig {
        system_namespace: "Istio_System".to_string(),
        ..ControlPlaneConfig::default()
    };
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::InvalidNamespace("Istio_System".to_string())
    );
}

#[test]
fn invalid_revision_is_rejected() {
    let config = ControlPlaneConfig {
        revision: Some("1.x".to_string()),
        ..ControlPlaneConfig::default()
    };
    assert_eq!(config.validate().unwrap_err(), ConfigError::InvalidRevision("1.x".to_string()));
}

#[test]
fn invalid_overlay_fails_validation() {
    let config = ControlPlaneConfig {
        control_plane_values: "values: [".to_string(),
        ..ControlPlaneConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::OverlayParse(_))));
}

#[test]
fn toml_round_trip_uses_defaults() {
    let config: ControlPlaneConfig =
        toml::from_str("revision = \"canary\"\n").expect("config parses");
    assert_eq!(config.system_namespace, DEFAULT_SYSTEM_NAMESPACE);
    assert_eq!(config.revision_label(), "canary");
    assert!(toml::from_str::<ControlPlaneConfig>("unknown = 1\n").is_err());
}
