// system-tests/src/lib.rs
// ============================================================================
// Module: meshdoc System Tests Library
// Description: Suite entry points and shared configuration for system tests.
// Purpose: Define the canonical profile suites once for every test binary.
// Dependencies: meshdoc-config, meshdoc-suite
// ============================================================================

//! ## Overview
//! This crate hosts the suite definitions exercised by the binaries in
//! `system-tests/tests`, plus the harness configuration they share. The
//! checked-in golden documents live under `system-tests/golden`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod profile_default;
