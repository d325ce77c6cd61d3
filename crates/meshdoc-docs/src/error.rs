// crates/meshdoc-docs/src/error.rs
// ============================================================================
// Module: Docs Errors
// Description: Tooling-fault errors for rendering and golden I/O.
// Purpose: Keep environment faults distinct from documentation drift.
// Dependencies: meshdoc-config, thiserror
// ============================================================================

use std::path::PathBuf;

use meshdoc_config::ConfigError;
use thiserror::Error;

/// Errors raised while rendering, reading, or writing documentation.
///
/// Content mismatches are never reported through this type; they are part of
/// a successful [`crate::VerificationReport`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Configuration could not be turned into documentation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Golden root is missing, not a directory, or unsafe.
    #[error("golden root unavailable: {}", .0.display())]
    GoldenRoot(PathBuf),
    /// A path inside the golden tree is unsafe (symlink or non-file).
    #[error("unsafe golden path: {}", .0.display())]
    UnsafePath(PathBuf),
    /// A document exceeds the size cap.
    #[error("document {} exceeds {limit} bytes", .path.display())]
    TooLarge {
        /// Offending path.
        path: PathBuf,
        /// Size cap in bytes.
        limit: u64,
    },
    /// Selector and bundle disagree on the profile.
    #[error("selector targets profile `{selected}` but docs were rendered for `{rendered}`")]
    ProfileMismatch {
        /// Profile named by the selector.
        selected: String,
        /// Profile of the rendered bundle.
        rendered: String,
    },
    /// Filesystem I/O failed.
    #[error("docs io error: {0}")]
    Io(String),
}
