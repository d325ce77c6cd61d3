// crates/meshdoc-docs/src/render.rs
// ============================================================================
// Module: Docs Renderer
// Description: Deterministic Markdown renderer for control-plane profiles.
// Purpose: Produce the overview, values, and feature-flag docs for a profile.
// Dependencies: meshdoc-config, serde_json
// ============================================================================

//! ## Overview
//! The renderer validates the control-plane configuration, merges its overlay
//! onto the profile values, and writes three Markdown documents. Output uses
//! sorted keys, `\n` line endings, and a trailing newline so golden files are
//! stable across platforms.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Write;

use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::DocTopic;
use meshdoc_config::FEATURE_FLAGS;
use meshdoc_config::FeatureFlag;
use meshdoc_config::ProfileDefinition;
use meshdoc_config::ValuesOverlay;
use meshdoc_config::overlay::flatten_leaves;
use serde_json::Value;

use crate::DocsError;
use crate::types::DocArtifact;
use crate::types::DocBundle;

/// Banner line written under every document title.
pub const GENERATED_BANNER: &str = "Generated by meshdoc. Do not edit by hand.";

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders documentation for one profile and configuration.
#[derive(Debug, Clone, Copy)]
pub struct DocsRenderer<'a> {
    /// Profile being documented.
    profile: &'a ProfileDefinition,
    /// Sealed control-plane configuration.
    config: &'a ControlPlaneConfig,
    /// Feature flag registry rendered into the flags table.
    flags: &'a [FeatureFlag],
}

impl<'a> DocsRenderer<'a> {
    /// Creates a renderer using the built-in feature flag registry.
    #[must_use]
    pub const fn new(profile: &'a ProfileDefinition, config: &'a ControlPlaneConfig) -> Self {
        Self {
            profile,
            config,
            flags: FEATURE_FLAGS,
        }
    }

    /// Replaces the feature flag registry.
    #[must_use]
    pub const fn with_flags(mut self, flags: &'a [FeatureFlag]) -> Self {
        self.flags = flags;
        self
    }

    /// Renders every topic.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::Config`] when the configuration is invalid or a
    /// feature flag holds a non-boolean value.
    pub fn render(&self) -> Result<DocBundle, DocsError> {
        let overlay = self.config.validate()?;
        let artifacts = DocTopic::ALL
            .into_iter()
            .map(|topic| self.render_with(&overlay, topic))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocBundle {
            profile: self.profile.name.clone(),
            artifacts,
        })
    }

    /// Renders a single topic.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::Config`] under the same conditions as [`Self::render`].
    pub fn render_topic(&self, topic: DocTopic) -> Result<DocArtifact, DocsError> {
        let overlay = self.config.validate()?;
        self.render_with(&overlay, topic)
    }

    /// Renders `topic` against an already validated overlay.
    fn render_with(
        &self,
        overlay: &ValuesOverlay,
        topic: DocTopic,
    ) -> Result<DocArtifact, DocsError> {
        let content = match topic {
            DocTopic::Overview => self.overview(overlay),
            DocTopic::Values => self.values(overlay),
            DocTopic::FeatureFlags => self.feature_flags(overlay)?,
        };
        Ok(DocArtifact::new(&self.profile.name, topic, content))
    }

    /// Renders `overview.md`.
    fn overview(&self, overlay: &ValuesOverlay) -> String {
        let name = self.profile.name.as_str();
        let mut out = header(&format!("Profile: {name}"));
        out.push_str("\n## Summary\n\n");
        let _ = writeln!(out, "- Profile: `{name}`");
        let _ = writeln!(out, "- Description: {}", self.profile.description);
        let _ = writeln!(out, "- System namespace: `{}`", self.config.system_namespace);
        let _ = writeln!(out, "- Revision: `{}`", self.config.revision_label());
        let _ = writeln!(out, "- Overlay keys: {}", overlay.leaves().len());

        out.push_str("\n## Components\n\n");
        let effective = self.profile.effective_values(overlay);
        let components: BTreeMap<&str, &Value> = effective
            .get("components")
            .and_then(Value::as_object)
            .map(|map| map.iter().map(|(key, value)| (key.as_str(), value)).collect())
            .unwrap_or_default();
        if components.is_empty() {
            out.push_str("_No components configured._\n");
            return out;
        }
        out.push_str("| Component | Enabled |\n| --- | --- |\n");
        for (component, value) in components {
            let enabled = match value.get("enabled").and_then(Value::as_bool) {
                Some(true) => "yes",
                Some(false) => "no",
                None => "unset",
            };
            let _ = writeln!(out, "| `{}` | {enabled} |", escape_cell(component));
        }
        out
    }

    /// Renders `values.md`.
    fn values(&self, overlay: &ValuesOverlay) -> String {
        let name = self.profile.name.as_str();
        let mut out = header(&format!("Profile: {name} / Values"));
        out.push_str("\nEffective deployment values after the configuration overlay is applied.\n\n");
        let leaves = flatten_leaves(&self.profile.effective_values(overlay));
        let overridden = overlay.leaves();
        if leaves.is_empty() {
            out.push_str("_No values configured._\n");
            return out;
        }
        out.push_str("| Key | Value | Source |\n| --- | --- | --- |\n");
        for (key, value) in &leaves {
            let source = if overridden.contains_key(key) { "overlay" } else { "profile" };
            let _ = writeln!(
                out,
                "| `{}` | `{}` | {source} |",
                escape_cell(key),
                escape_cell(&display_value(value))
            );
        }
        out
    }

    /// Renders `feature-flags.md`.
    fn feature_flags(&self, overlay: &ValuesOverlay) -> Result<String, DocsError> {
        let name = self.profile.name.as_str();
        let mut out = header(&format!("Profile: {name} / Feature Flags"));
        out.push('\n');
        if self.flags.is_empty() {
            out.push_str("_No feature flags registered._\n");
            return Ok(out);
        }
        out.push_str(
            "| Flag | Component | Enabled | Source | Description |\n| --- | --- | --- | --- | --- |\n",
        );
        let mut flags: Vec<&FeatureFlag> = self.flags.iter().collect();
        flags.sort_by_key(|flag| flag.name);
        for flag in flags {
            let (enabled, source) = self.profile.resolve_flag(flag, overlay)?;
            let _ = writeln!(
                out,
                "| `{}` | {} | {} | {} | {} |",
                flag.name,
                flag.component,
                if enabled { "yes" } else { "no" },
                source.as_str(),
                escape_cell(flag.description)
            );
        }
        Ok(out)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the title and banner shared by every document.
fn header(title: &str) -> String {
    format!("# {title}\n\n{GENERATED_BANNER}\n")
}

/// Formats a leaf value for a table cell.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) if text.is_empty() => String::from("\"\""),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Escapes characters that would break a Markdown table row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
