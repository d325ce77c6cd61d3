// crates/meshdoc-docs/src/verify.rs
// ============================================================================
// Module: Golden Verifier
// Description: Compares rendered docs with golden docs and refreshes them.
// Purpose: Detect documentation drift for a selector and report it per file.
// Dependencies: cap-std, meshdoc-config
// ============================================================================

//! ## Overview
//! [`GoldenStore`] owns a golden root laid out as
//! `profile-<name>/<topic>.md`. Verification reads only the documents selected
//! by a [`DocsSelector`]; when the selector covers every topic, files in the
//! profile directory that the renderer does not produce are reported as
//! unexpected. Refresh rewrites the selected documents atomically.
//!
//! Invariants:
//! - A missing golden root is a tooling fault, not a mismatch.
//! - A missing profile directory yields `missing_golden` for every artifact.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use meshdoc_config::DocsSelector;

use crate::DocsError;
use crate::diff::line_diff;
use crate::golden;
use crate::types::CheckStatus;
use crate::types::DocBundle;
use crate::types::DocCheck;
use crate::types::VerificationReport;
use crate::types::sha256_hex;

/// Maximum size of a single golden document.
pub const MAX_DOC_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Golden Store
// ============================================================================

/// Golden documentation tree rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenStore {
    /// Golden root directory.
    root: PathBuf,
}

impl GoldenStore {
    /// Creates a store for `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Returns the golden root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compares the selected artifacts of `bundle` with golden documents.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError`] when the golden root is unavailable, a golden
    /// entry is unsafe or oversized, or the selector targets another profile.
    pub fn verify(
        &self,
        bundle: &DocBundle,
        selector: &DocsSelector,
    ) -> Result<VerificationReport, DocsError> {
        ensure_same_profile(bundle, selector)?;
        let root = golden::open_root(&self.root, false)?;
        let dir_name = bundle.profile.doc_dir();
        let profile_dir = golden::open_profile_dir(&root, &dir_name, false)?;

        let mut checks = Vec::new();
        let mut expected = BTreeSet::new();
        for artifact in bundle.selected(selector) {
            let file_name = artifact.topic.file_name();
            expected.insert(file_name.clone());
            let golden_bytes = match &profile_dir {
                Some(dir) => golden::read_doc(
                    dir,
                    &file_name,
                    Path::new(&artifact.path),
                    MAX_DOC_BYTES,
                )?,
                None => None,
            };
            let check = match golden_bytes {
                None => DocCheck {
                    path: artifact.path.clone(),
                    status: CheckStatus::MissingGolden,
                    golden_digest: None,
                    rendered_digest: Some(artifact.digest.clone()),
                },
                Some(bytes) => {
                    let golden_digest = sha256_hex(&bytes);
                    let status = if golden_digest == artifact.digest {
                        CheckStatus::Match
                    } else {
                        let golden_text = String::from_utf8_lossy(&bytes);
                        let diff = line_diff(&golden_text, &artifact.text())
                            .unwrap_or_else(|| String::from("@@ bytes differ @@\n"));
                        CheckStatus::Mismatch {
                            diff,
                        }
                    };
                    DocCheck {
                        path: artifact.path.clone(),
                        status,
                        golden_digest: Some(golden_digest),
                        rendered_digest: Some(artifact.digest.clone()),
                    }
                }
            };
            checks.push(check);
        }

        if selector.topic().is_none()
            && let Some(dir) = &profile_dir
        {
            for name in golden::list_files(dir, &dir_name)? {
                if !expected.contains(&name) {
                    let path = format!("{dir_name}/{name}");
                    // Oversized strays are still unexpected; they just carry no digest.
                    let golden_digest =
                        match golden::read_doc(dir, &name, Path::new(&path), MAX_DOC_BYTES) {
                            Ok(bytes) => bytes.map(|bytes| sha256_hex(&bytes)),
                            Err(DocsError::TooLarge { .. }) => None,
                            Err(err) => return Err(err),
                        };
                    checks.push(DocCheck {
                        path,
                        status: CheckStatus::Unexpected,
                        golden_digest,
                        rendered_digest: None,
                    });
                }
            }
        }

        Ok(VerificationReport {
            selector: selector.to_string(),
            checks,
        })
    }

    /// Rewrites the selected golden documents from `bundle`.
    ///
    /// When the selector covers every topic, stale files in the profile
    /// directory are removed. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError`] when the golden tree cannot be created or written.
    pub fn refresh(
        &self,
        bundle: &DocBundle,
        selector: &DocsSelector,
    ) -> Result<Vec<String>, DocsError> {
        ensure_same_profile(bundle, selector)?;
        let root = golden::open_root(&self.root, true)?;
        let dir_name = bundle.profile.doc_dir();
        let dir = golden::open_profile_dir(&root, &dir_name, true)?
            .ok_or_else(|| DocsError::UnsafePath(PathBuf::from(&dir_name)))?;

        let mut written = Vec::new();
        let mut expected = BTreeSet::new();
        for artifact in bundle.selected(selector) {
            let file_name = artifact.topic.file_name();
            golden::write_doc_atomic(&dir, &file_name, Path::new(&artifact.path), &artifact.bytes)?;
            expected.insert(file_name);
            written.push(artifact.path.clone());
        }
        if selector.topic().is_none() {
            for name in golden::list_files(&dir, &dir_name)? {
                if !expected.contains(&name) {
                    golden::remove_doc(&dir, &name)?;
                }
            }
        }
        Ok(written)
    }
}

/// Rejects selectors that name a different profile than the bundle.
fn ensure_same_profile(bundle: &DocBundle, selector: &DocsSelector) -> Result<(), DocsError> {
    if selector.profile() == &bundle.profile {
        return Ok(());
    }
    Err(DocsError::ProfileMismatch {
        selected: selector.profile().to_string(),
        rendered: bundle.profile.to_string(),
    })
}
