// crates/meshdoc-config/src/overlay.rs
// ============================================================================
// Module: Values Overlay
// Description: Parsed form of the textual control-plane values overlay.
// Purpose: Validate overlay shape and merge it onto profile base values.
// Dependencies: serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! An overlay is a partial deployment document merged on top of a profile's
//! base values. Overlays are authored as YAML text and parsed into JSON values
//! so that lookups, flattening, and merging share one value model.
//!
//! Invariants:
//! - The overlay root is a mapping restricted to [`OVERLAY_SECTIONS`].
//! - Every section is itself a mapping.
//! - Merging is deep for mappings; any other value replaces the base value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::ConfigError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Top-level sections accepted in an overlay document.
pub const OVERLAY_SECTIONS: &[&str] = &["components", "meshConfig", "values"];

/// Separator used for flattened value paths.
pub const PATH_SEPARATOR: char = '.';

// ============================================================================
// SECTION: Overlay
// ============================================================================

/// Validated values overlay.
///
/// # Invariants
/// - Only keys from [`OVERLAY_SECTIONS`] appear at the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValuesOverlay {
    /// Root mapping of the overlay document.
    root: Map<String, Value>,
}

impl ValuesOverlay {
    /// Parses overlay YAML text. Blank text yields an empty overlay.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OverlayParse`] for invalid YAML and
    /// [`ConfigError::OverlayShape`] for unsupported document shapes.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_yaml::from_str(text).map_err(|err| ConfigError::OverlayParse(err.to_string()))?;
        Self::from_value(value)
    }

    /// Builds an overlay from an already-parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OverlayShape`] when the root is not a mapping,
    /// names an unknown section, or a section is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let root = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(ConfigError::OverlayShape(format!(
                    "root must be a mapping, found {}",
                    value_kind(&other)
                )));
            }
        };
        for (key, section) in &root {
            if !OVERLAY_SECTIONS.contains(&key.as_str()) {
                return Err(ConfigError::OverlayShape(format!(
                    "unknown section `{key}` (expected one of {})",
                    OVERLAY_SECTIONS.join(", ")
                )));
            }
            if !section.is_object() {
                return Err(ConfigError::OverlayShape(format!(
                    "section `{key}` must be a mapping, found {}",
                    value_kind(section)
                )));
            }
        }
        Ok(Self {
            root,
        })
    }

    /// Returns true when the overlay sets no leaf values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves().is_empty()
    }

    /// Returns the overlay as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Looks up a dotted path such as `values.pilot.env.NAME`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split(PATH_SEPARATOR);
        let first = parts.next()?;
        let start = self.root.get(first)?;
        parts.try_fold(start, |current, part| current.as_object()?.get(part))
    }

    /// Returns true when the overlay sets a leaf at `path`.
    #[must_use]
    pub fn sets(&self, path: &str) -> bool {
        self.leaves().contains_key(path)
    }

    /// Returns every leaf value keyed by its dotted path, sorted by path.
    #[must_use]
    pub fn leaves(&self) -> BTreeMap<String, Value> {
        flatten_leaves(&Value::Object(self.root.clone()))
    }

    /// Deep-merges the overlay onto `base` in place.
    pub fn apply_to(&self, base: &mut Value) {
        for (key, section) in &self.root {
            deep_merge_entry(base, key, section);
        }
    }
}

// ============================================================================
// SECTION: Value Helpers
// ============================================================================

/// Deep-merges `overlay` onto `base`: mappings merge per key, other values replace.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Merges a single root entry, promoting `base` to a mapping when needed.
fn deep_merge_entry(base: &mut Value, key: &str, value: &Value) {
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    if let Value::Object(map) = base {
        match map.get_mut(key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                map.insert(key.to_string(), value.clone());
            }
        }
    }
}

/// Flattens nested mappings into dotted paths.
///
/// Arrays, scalars, and empty mappings are leaves.
#[must_use]
pub fn flatten_leaves(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    collect_leaves("", value, &mut out);
    out
}

/// Recursive worker for [`flatten_leaves`].
fn collect_leaves(prefix: &str, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}{PATH_SEPARATOR}{key}")
                };
                collect_leaves(&path, child, out);
            }
        }
        _ => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), value.clone());
            }
        }
    }
}

/// Looks up a dotted path inside an arbitrary value.
#[must_use]
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(PATH_SEPARATOR).try_fold(value, |current, part| current.as_object()?.get(part))
}

/// Returns a short name for the kind of a value, used in error messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
