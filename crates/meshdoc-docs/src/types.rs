// crates/meshdoc-docs/src/types.rs
// ============================================================================
// Module: Docs Types
// Description: Rendered artifacts and verification report shapes.
// Purpose: Share canonical shapes between renderer, verifier, and reports.
// Dependencies: meshdoc-config, serde, sha2
// ============================================================================

//! ## Overview
//! A [`DocBundle`] holds the artifacts rendered for one profile. Verification
//! produces one [`DocCheck`] per selected artifact plus one per unexpected
//! golden file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use meshdoc_config::DocTopic;
use meshdoc_config::DocsSelector;
use meshdoc_config::ProfileName;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Rendered Markdown document.
///
/// # Invariants
/// - `path` is `profile-<name>/<topic>.md`, relative to the golden root.
/// - `digest` is the lowercase hex SHA-256 of `bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocArtifact {
    /// Relative path under the golden root.
    pub path: String,
    /// Topic rendered into this document.
    pub topic: DocTopic,
    /// UTF-8 Markdown bytes.
    pub bytes: Vec<u8>,
    /// SHA-256 digest of `bytes`.
    pub digest: String,
}

impl DocArtifact {
    /// Builds an artifact and computes its digest.
    #[must_use]
    pub fn new(profile: &ProfileName, topic: DocTopic, content: String) -> Self {
        let bytes = content.into_bytes();
        Self {
            path: format!("{}/{}", profile.doc_dir(), topic.file_name()),
            topic,
            digest: sha256_hex(&bytes),
            bytes,
        }
    }

    /// Returns the document text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// All artifacts rendered for one profile, in topic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBundle {
    /// Profile the bundle documents.
    pub profile: ProfileName,
    /// Rendered artifacts.
    pub artifacts: Vec<DocArtifact>,
}

impl DocBundle {
    /// Returns the artifact for `topic`, if rendered.
    #[must_use]
    pub fn artifact(&self, topic: DocTopic) -> Option<&DocArtifact> {
        self.artifacts.iter().find(|artifact| artifact.topic == topic)
    }

    /// Iterates artifacts covered by `selector`.
    pub fn selected<'a>(
        &'a self,
        selector: &'a DocsSelector,
    ) -> impl Iterator<Item = &'a DocArtifact> + 'a {
        self.artifacts.iter().filter(move |artifact| selector.includes(artifact.topic))
    }
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ============================================================================
// SECTION: Verification Report
// ============================================================================

/// Outcome for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Golden and rendered documents are identical.
    Match,
    /// Golden document differs; `diff` lists changed lines.
    Mismatch {
        /// Line diff from golden (`-`) to rendered (`+`).
        diff: String,
    },
    /// No golden document exists for a rendered artifact.
    MissingGolden,
    /// Golden document exists but is not produced by the renderer.
    Unexpected,
}

/// Verification result for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocCheck {
    /// Path relative to the golden root.
    pub path: String,
    /// Check outcome.
    #[serde(flatten)]
    pub status: CheckStatus,
    /// Digest of the golden document, when present.
    pub golden_digest: Option<String>,
    /// Digest of the rendered document, when rendered.
    pub rendered_digest: Option<String>,
}

impl DocCheck {
    /// Returns true for [`CheckStatus::Match`].
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, CheckStatus::Match)
    }
}

/// Verification report for a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Canonical selector label.
    pub selector: String,
    /// Per-path results, rendered artifacts first, unexpected files last.
    pub checks: Vec<DocCheck>,
}

impl VerificationReport {
    /// Returns true when every check matched.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.checks.iter().all(DocCheck::passed)
    }

    /// Iterates failing checks.
    pub fn failures(&self) -> impl Iterator<Item = &DocCheck> {
        self.checks.iter().filter(|check| !check.passed())
    }

    /// Describes every failure, including diffs, for test output.
    #[must_use]
    pub fn describe_failures(&self) -> String {
        let mut out = String::new();
        for check in self.failures() {
            match &check.status {
                CheckStatus::Match => {}
                CheckStatus::Mismatch {
                    diff,
                } => {
                    let _ = writeln!(out, "{}: content differs from golden", check.path);
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                }
                CheckStatus::MissingGolden => {
                    let _ = writeln!(out, "{}: golden document is missing", check.path);
                }
                CheckStatus::Unexpected => {
                    let _ = writeln!(out, "{}: golden document is not rendered", check.path);
                }
            }
        }
        out
    }
}
