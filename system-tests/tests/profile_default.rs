// system-tests/tests/profile_default.rs
// ============================================================================
// Module: Default Profile Suite
// Description: Aggregates default-profile system tests into one binary.
// Purpose: Run the canonical docs suite against the checked-in golden tree.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates default-profile system tests into one binary.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - Golden documents are read from `system-tests/golden`.

mod helpers;

#[path = "suites/profile_default.rs"]
mod profile_default;
