// crates/meshdoc-docs/src/lib.rs
// ============================================================================
// Module: meshdoc Docs Library
// Description: Profile documentation renderer and golden verifier.
// Purpose: Render deterministic Markdown per profile and compare it with golden docs.
// Dependencies: meshdoc-config, cap-std, serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! [`DocsRenderer`] turns a profile plus a control-plane configuration into a
//! [`DocBundle`] of Markdown artifacts. [`GoldenStore`] compares a bundle with
//! the golden documents checked into the repository, producing a
//! [`VerificationReport`] with per-document status and line diffs, and can
//! rewrite the golden documents when a refresh is requested.
//!
//! Invariants:
//! - Rendering is byte-for-byte deterministic for identical inputs.
//! - Golden trees are opened without following symlinks.
//! - Tooling faults surface as [`DocsError`]; content drift surfaces only in
//!   the report.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod diff;
pub mod error;
mod golden;
pub mod render;
pub mod types;
pub mod verify;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use diff::line_diff;
pub use error::DocsError;
pub use render::DocsRenderer;
pub use types::CheckStatus;
pub use types::DocArtifact;
pub use types::DocBundle;
pub use types::DocCheck;
pub use types::VerificationReport;
pub use types::sha256_hex;
pub use verify::GoldenStore;
pub use verify::MAX_DOC_BYTES;
