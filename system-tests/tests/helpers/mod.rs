// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for meshdoc system-tests.
// Purpose: Provide scratch golden trees and harness fixtures.
// Dependencies: system-tests, meshdoc-config, tempfile
// ============================================================================

//! ## Overview
//! Shared helpers for meshdoc system-tests.
//! Invariants:
//! - Helpers never write to the checked-in golden tree.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod golden;
