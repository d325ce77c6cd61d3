// system-tests/src/profile_default.rs
// ============================================================================
// Module: Default Profile Suite
// Description: Suite that installs `default` with alpha Gateway API disabled.
// Purpose: Verify the generated docs for the default profile against golden.
// Dependencies: meshdoc-config, meshdoc-suite
// ============================================================================

//! ## Overview
//! The suite registers one setup callback,
//! [`disable_alpha_gateway_api`], which replaces the control-plane values
//! overlay with [`ALPHA_GATEWAY_VALUES`]. It then installs the `default`
//! profile and runs a single docs test labelled [`DOCS_LABEL`].
//!
//! Invariants:
//! - The overlay sets exactly one key and leaves every other default intact.
//! - The callback ignores the setup context and is idempotent.

use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::HarnessConfig;
use meshdoc_config::ProfileName;
use meshdoc_suite::SetupContext;
use meshdoc_suite::SetupError;
use meshdoc_suite::Suite;
use meshdoc_suite::SuiteError;
use meshdoc_suite::docs_test;

/// Suite name used for reports and events.
pub const SUITE_NAME: &str = "profile-default";

/// Setup step name.
pub const SETUP_STEP: &str = "disable-alpha-gateway-api";

/// Docs test label.
pub const DOCS_LABEL: &str = "profile=default";

/// Control-plane values overlay applied before installation.
pub const ALPHA_GATEWAY_VALUES: &str = "
values:
  pilot:
    env:
      PILOT_ENABLE_ALPHA_GATEWAY_API: false
";

/// Setup callback: disables the alpha Gateway API in pilot.
///
/// # Errors
///
/// Never fails; the signature matches every setup callback.
pub fn disable_alpha_gateway_api(
    _context: &SetupContext,
    config: &mut ControlPlaneConfig,
) -> Result<(), SetupError> {
    config.control_plane_values = ALPHA_GATEWAY_VALUES.to_string();
    Ok(())
}

/// Builds the default-profile suite.
///
/// The profile is always `default`, whatever the harness names.
///
/// # Errors
///
/// Returns [`SuiteError::Events`] when the harness event log cannot be opened.
pub fn suite(harness: HarnessConfig) -> Result<Suite, SuiteError> {
    Ok(Suite::from_harness(SUITE_NAME, harness)?
        .with_profile(ProfileName::default())
        .setup(SETUP_STEP, disable_alpha_gateway_api)
        .test(docs_test(DOCS_LABEL)))
}
