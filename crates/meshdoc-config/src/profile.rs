// crates/meshdoc-config/src/profile.rs
// ============================================================================
// Module: Profile Catalog
// Description: Named control-plane profiles and the pilot feature-flag registry.
// Purpose: Resolve profile names to base values and effective flag settings.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A profile is a named preset of deployment values. The catalog ships the
//! built-in `default`, `demo`, and `minimal` profiles; callers may register
//! more. Feature flags are pilot environment settings addressed at
//! `values.<component>.env.<NAME>` and resolved overlay-first.
//!
//! Invariants:
//! - [`ProfileName`] values always satisfy DNS-1123 label rules.
//! - [`FEATURE_FLAGS`] is ordered by flag name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::ConfigError;
use crate::overlay::PATH_SEPARATOR;
use crate::overlay::ValuesOverlay;
use crate::overlay::lookup;

// ============================================================================
// SECTION: Names
// ============================================================================

/// Maximum length of a DNS-1123 label.
const MAX_LABEL_LEN: usize = 63;

/// Returns true when `value` is a DNS-1123 label.
pub(crate) fn is_dns_label(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_LABEL_LEN
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value.bytes().all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-')
}

/// Validated profile name.
///
/// # Invariants
/// - 1 to 63 characters of `[a-z0-9-]`, not starting or ending with `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Name of the profile used when none is requested.
    pub const DEFAULT: &'static str = "default";

    /// Validates and wraps a profile name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProfileName`] when the name breaks naming rules.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if !is_dns_label(&name) {
            return Err(ConfigError::InvalidProfileName(name));
        }
        Ok(Self(name))
    }

    /// Wraps a name known to be valid at compile time.
    fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the golden directory name for this profile (`profile-<name>`).
    #[must_use]
    pub fn doc_dir(&self) -> String {
        format!("profile-{}", self.0)
    }
}

impl Default for ProfileName {
    fn default() -> Self {
        Self::from_static(Self::DEFAULT)
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProfileName {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for ProfileName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileName> for String {
    fn from(value: ProfileName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Feature Flags
// ============================================================================

/// Pilot feature flag recognised by the documentation renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlag {
    /// Environment variable name.
    pub name: &'static str,
    /// Component whose `env` block carries the flag.
    pub component: &'static str,
    /// Value used when neither profile nor overlay sets the flag.
    pub default: bool,
    /// One-line description rendered into docs.
    pub description: &'static str,
}

impl FeatureFlag {
    /// Returns the dotted values path that carries this flag.
    #[must_use]
    pub fn value_path(&self) -> String {
        format!("values.{}.env.{}", self.component, self.name)
    }
}

/// Registered feature flags, ordered by name.
pub const FEATURE_FLAGS: &[FeatureFlag] = &[
    FeatureFlag {
        name: "PILOT_ENABLE_ALPHA_GATEWAY_API",
        component: "pilot",
        default: false,
        description: "Serves alpha Gateway API resources such as TCPRoute and TLSRoute.",
    },
    FeatureFlag {
        name: "PILOT_ENABLE_AMBIENT",
        component: "pilot",
        default: false,
        description: "Runs the ambient mode controllers in istiod.",
    },
    FeatureFlag {
        name: "PILOT_ENABLE_GATEWAY_API",
        component: "pilot",
        default: true,
        description: "Serves stable Gateway API resources.",
    },
];

/// Where an effective flag value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    /// Set by the configuration overlay.
    Overlay,
    /// Set by the profile's base values.
    Profile,
    /// Registry default.
    BuiltIn,
}

impl FlagSource {
    /// Returns the label used in rendered documentation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::Profile => "profile",
            Self::BuiltIn => "built-in default",
        }
    }
}

/// Interprets a flag value; accepts booleans and `"true"`/`"false"` strings.
fn parse_flag_value(flag: &FeatureFlag, value: &Value) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(enabled) => Ok(*enabled),
        Value::String(raw) if raw.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(raw) if raw.trim().eq_ignore_ascii_case("false") => Ok(false),
        other => Err(ConfigError::FeatureFlag {
            flag: flag.name.to_string(),
            reason: format!("expected true or false, found {other}"),
        }),
    }
}

// ============================================================================
// SECTION: Profiles
// ============================================================================

/// Named preset of control-plane deployment values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDefinition {
    /// Profile name.
    pub name: ProfileName,
    /// Human-readable summary rendered into docs.
    pub description: String,
    /// Base values before any overlay is applied.
    pub values: Value,
}

impl ProfileDefinition {
    /// Returns the profile values with `overlay` merged on top.
    #[must_use]
    pub fn effective_values(&self, overlay: &ValuesOverlay) -> Value {
        let mut values = self.values.clone();
        overlay.apply_to(&mut values);
        values
    }

    /// Resolves a feature flag against the effective values.
    ///
    /// The source is [`FlagSource::Overlay`] when the overlay sets the flag or
    /// replaces one of its ancestors with a non-mapping value. A flag whose
    /// path no longer exists in the effective values takes its built-in default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FeatureFlag`] when the configured value is not a boolean.
    pub fn resolve_flag(
        &self,
        flag: &FeatureFlag,
        overlay: &ValuesOverlay,
    ) -> Result<(bool, FlagSource), ConfigError> {
        let path = flag.value_path();
        let effective = self.effective_values(overlay);
        let from_overlay = overlay_covers(overlay, &path);
        match lookup(&effective, &path) {
            Some(value) => {
                let source = if from_overlay { FlagSource::Overlay } else { FlagSource::Profile };
                Ok((parse_flag_value(flag, value)?, source))
            }
            None if from_overlay => Ok((flag.default, FlagSource::Overlay)),
            None => Ok((flag.default, FlagSource::BuiltIn)),
        }
    }
}

/// Returns true when the overlay sets `path` or replaces one of its ancestors.
fn overlay_covers(overlay: &ValuesOverlay, path: &str) -> bool {
    if overlay.get(path).is_some() {
        return true;
    }
    path.match_indices(PATH_SEPARATOR)
        .any(|(end, _)| overlay.get(&path[..end]).is_some_and(|value| !value.is_object()))
}

/// Catalog of profiles keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCatalog {
    /// Profiles keyed by name.
    profiles: BTreeMap<ProfileName, ProfileDefinition>,
}

impl ProfileCatalog {
    /// Returns a catalog with no profiles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Returns the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(default_profile());
        catalog.insert(demo_profile());
        catalog.insert(minimal_profile());
        catalog
    }

    /// Registers a profile, returning any definition it replaced.
    pub fn insert(&mut self, profile: ProfileDefinition) -> Option<ProfileDefinition> {
        self.profiles.insert(profile.name.clone(), profile)
    }

    /// Looks up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] when the profile is not registered.
    pub fn get(&self, name: &ProfileName) -> Result<&ProfileDefinition, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    /// Iterates profiles in name order.
    pub fn profiles(&self) -> impl Iterator<Item = &ProfileDefinition> {
        self.profiles.values()
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Built-in `default` profile.
fn default_profile() -> ProfileDefinition {
    ProfileDefinition {
        name: ProfileName::from_static("default"),
        description: "Production-oriented control plane with an ingress gateway.".to_string(),
        values: json!({
            "components": {
                "base": { "enabled": true },
                "cni": { "enabled": false },
                "egressGateways": { "enabled": false },
                "ingressGateways": { "enabled": true },
                "pilot": { "enabled": true }
            },
            "meshConfig": {
                "accessLogFile": "",
                "enableTracing": false
            },
            "values": {
                "global": {
                    "istioNamespace": "istio-system",
                    "proxy": { "logLevel": "warning" }
                },
                "pilot": {
                    "autoscaleEnabled": true,
                    "env": { "PILOT_ENABLE_ALPHA_GATEWAY_API": true },
                    "replicaCount": 1
                }
            }
        }),
    }
}

/// Built-in `demo` profile.
fn demo_profile() -> ProfileDefinition {
    ProfileDefinition {
        name: ProfileName::from_static("demo"),
        description: "Showcase profile with both gateways, access logging, and tracing.".to_string(),
        values: json!({
            "components": {
                "base": { "enabled": true },
                "cni": { "enabled": false },
                "egressGateways": { "enabled": true },
                "ingressGateways": { "enabled": true },
                "pilot": { "enabled": true }
            },
            "meshConfig": {
                "accessLogFile": "/dev/stdout",
                "enableTracing": true
            },
            "values": {
                "global": {
                    "istioNamespace": "istio-system",
                    "proxy": { "logLevel": "info" }
                },
                "pilot": {
                    "autoscaleEnabled": false,
                    "env": { "PILOT_ENABLE_ALPHA_GATEWAY_API": true },
                    "replicaCount": 1
                }
            }
        }),
    }
}

/// Built-in `minimal` profile.
fn minimal_profile() -> ProfileDefinition {
    ProfileDefinition {
        name: ProfileName::from_static("minimal"),
        description: "Control plane only; no gateways are installed.".to_string(),
        values: json!({
            "components": {
                "base": { "enabled": true },
                "cni": { "enabled": false },
                "egressGateways": { "enabled": false },
                "ingressGateways": { "enabled": false },
                "pilot": { "enabled": true }
            },
            "values": {
                "global": { "istioNamespace": "istio-system" },
                "pilot": {
                    "autoscaleEnabled": true,
                    "replicaCount": 1
                }
            }
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
