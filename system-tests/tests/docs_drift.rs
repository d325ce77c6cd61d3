// system-tests/tests/docs_drift.rs
// ============================================================================
// Module: Docs Drift Suite
// Description: Aggregates golden drift system tests into one binary.
// Purpose: Prove the docs test fails loudly when docs and golden disagree.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates golden drift system tests into one binary.
//! Invariants:
//! - Every scenario works on a scratch copy; the checked-in tree is read-only.

mod helpers;

#[path = "suites/docs_drift.rs"]
mod docs_drift;
