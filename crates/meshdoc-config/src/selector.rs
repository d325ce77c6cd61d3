// crates/meshdoc-config/src/selector.rs
// ============================================================================
// Module: Docs Selector
// Description: Parser for the label passed to documentation tests.
// Purpose: Map labels such as `profile=default` onto a profile and topic.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A documentation test is identified by a short label. Two forms are
//! accepted: a bare profile name (`default`) or comma-separated `key=value`
//! pairs (`profile=default,topic=values`). Recognised keys are `profile`
//! (required) and `topic` (optional).

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;
use crate::ProfileName;

// ============================================================================
// SECTION: Topics
// ============================================================================

/// Documentation topic rendered per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocTopic {
    /// Profile summary and component list.
    Overview,
    /// Effective values table.
    Values,
    /// Feature flag table.
    FeatureFlags,
}

impl DocTopic {
    /// Every topic in render order.
    pub const ALL: [Self; 3] = [Self::Overview, Self::Values, Self::FeatureFlags];

    /// Returns the stable topic label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Values => "values",
            Self::FeatureFlags => "feature-flags",
        }
    }

    /// Returns the Markdown file name for the topic.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.md", self.as_str())
    }
}

impl fmt::Display for DocTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocTopic {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == value)
            .ok_or_else(|| ConfigError::InvalidSelector(format!("unknown topic `{value}`")))
    }
}

// ============================================================================
// SECTION: Selector
// ============================================================================

/// Parsed documentation label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsSelector {
    /// Profile whose docs are checked.
    profile: ProfileName,
    /// Optional single topic; `None` checks every topic.
    topic: Option<DocTopic>,
}

impl DocsSelector {
    /// Selects every topic of `profile`.
    #[must_use]
    pub const fn for_profile(profile: ProfileName) -> Self {
        Self {
            profile,
            topic: None,
        }
    }

    /// Restricts the selector to one topic.
    #[must_use]
    pub const fn with_topic(mut self, topic: DocTopic) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Parses a label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelector`] for empty labels, malformed pairs,
    /// unknown or duplicate keys, or a missing profile; invalid profile names
    /// surface as [`ConfigError::InvalidProfileName`].
    pub fn parse(label: &str) -> Result<Self, ConfigError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ConfigError::InvalidSelector("label is empty".to_string()));
        }
        if !label.contains('=') && !label.contains(',') {
            return Ok(Self::for_profile(ProfileName::new(label)?));
        }
        let mut profile = None;
        let mut topic = None;
        for pair in label.split(',') {
            let pair = pair.trim();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(ConfigError::InvalidSelector(format!("expected key=value, found `{pair}`")));
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "profile" => {
                    if profile.replace(ProfileName::new(value)?).is_some() {
                        return Err(duplicate_key(key));
                    }
                }
                "topic" => {
                    if topic.replace(value.parse::<DocTopic>()?).is_some() {
                        return Err(duplicate_key(key));
                    }
                }
                other => {
                    return Err(ConfigError::InvalidSelector(format!("unknown key `{other}`")));
                }
            }
        }
        let profile = profile
            .ok_or_else(|| ConfigError::InvalidSelector("missing `profile` key".to_string()))?;
        Ok(Self {
            profile,
            topic,
        })
    }

    /// Returns the selected profile.
    #[must_use]
    pub const fn profile(&self) -> &ProfileName {
        &self.profile
    }

    /// Returns the selected topic, if restricted.
    #[must_use]
    pub const fn topic(&self) -> Option<DocTopic> {
        self.topic
    }

    /// Returns true when `topic` is covered by this selector.
    #[must_use]
    pub fn includes(&self, topic: DocTopic) -> bool {
        self.topic.is_none_or(|selected| selected == topic)
    }
}

impl fmt::Display for DocsSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile={}", self.profile)?;
        if let Some(topic) = self.topic {
            write!(f, ",topic={topic}")?;
        }
        Ok(())
    }
}

impl FromStr for DocsSelector {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Builds the duplicate-key error.
fn duplicate_key(key: &str) -> ConfigError {
    ConfigError::InvalidSelector(format!("duplicate key `{key}`"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
