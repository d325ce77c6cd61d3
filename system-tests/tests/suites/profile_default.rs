// system-tests/tests/suites/profile_default.rs
// ============================================================================
// Module: Default Profile Tests
// Description: System tests for the default-profile docs suite.
// Purpose: Validate the setup callback and the docs test end-to-end.
// Dependencies: system-tests, meshdoc-config, meshdoc-suite
// ============================================================================

//! ## Overview
//! System tests for the default-profile docs suite.
//! Invariants:
//! - The suite installs `default` with exactly one overlay key.
//! - `profile=default` docs match the checked-in golden tree.

use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::DEFAULT_SYSTEM_NAMESPACE;
use meshdoc_suite::SetupContext;
use meshdoc_suite::TestStatus;
use serde_json::Value;
use system_tests::config::harness;
use system_tests::profile_default::ALPHA_GATEWAY_VALUES;
use system_tests::profile_default::DOCS_LABEL;
use system_tests::profile_default::disable_alpha_gateway_api;
use system_tests::profile_default::suite;

#[test]
fn profile_default_docs_match_golden() -> Result<(), Box<dyn std::error::Error>> {
    let report = suite(harness()?)?.run()?;
    let Some(outcome) = report.outcome(DOCS_LABEL) else {
        return Err(format!("no outcome for {DOCS_LABEL}").into());
    };
    if outcome.status != TestStatus::Passed || !report.is_success() {
        return Err(format!("docs suite failed:\n{}", report.to_markdown()).into());
    }
    if report.profile != "default" || report.overlay_keys != 1 {
        return Err(format!(
            "unexpected install: profile {} with {} overlay keys",
            report.profile, report.overlay_keys
        )
        .into());
    }
    Ok(())
}

#[test]
fn setup_callback_disables_alpha_gateway_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ControlPlaneConfig::default();
    disable_alpha_gateway_api(&SetupContext::empty(), &mut config)?;

    if config.control_plane_values != ALPHA_GATEWAY_VALUES {
        return Err("control-plane values were not replaced verbatim".into());
    }
    if config.system_namespace != DEFAULT_SYSTEM_NAMESPACE || config.revision.is_some() {
        return Err("setup callback changed fields other than the overlay".into());
    }
    let overlay = config.validate()?;
    let leaves = overlay.leaves();
    if leaves.len() != 1 {
        let keys: Vec<&str> = leaves.keys().map(String::as_str).collect();
        return Err(format!("expected one overlay key, found [{}]", keys.join(", ")).into());
    }
    let flag = overlay.get("values.pilot.env.PILOT_ENABLE_ALPHA_GATEWAY_API");
    if flag != Some(&Value::Bool(false)) {
        let found = flag.map_or_else(|| "unset".to_string(), Value::to_string);
        return Err(format!("alpha gateway flag is {found}, expected false").into());
    }
    Ok(())
}

#[test]
fn setup_callback_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let context = SetupContext::empty();
    let mut once = ControlPlaneConfig::default();
    disable_alpha_gateway_api(&context, &mut once)?;
    let mut twice = once.clone();
    disable_alpha_gateway_api(&context, &mut twice)?;
    if once != twice {
        return Err("second application changed the configuration".into());
    }
    Ok(())
}
