// crates/meshdoc-suite/src/invocation/tests.rs
// ============================================================================
// Module: Test Invocation Tests
// Description: Unit coverage for failure classification and the docs check.
// Dependencies: meshdoc-config, tempfile
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::path::Path;
use std::sync::Arc;

use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::HarnessConfig;
use meshdoc_config::ProfileCatalog;
use meshdoc_config::ProfileName;

use super::TestCase;
use super::TestContext;
use super::TestFailure;
use super::docs_test;
use crate::context::SetupContext;
use crate::events::EventRecorder;
use crate::events::RecordingSink;
use crate::events::SuiteEvent;
use crate::install::InMemoryInstaller;
use crate::install::Installer;
use crate::setup::SealedConfig;

const ALPHA_OFF: &str = "\nvalues:\n  pilot:\n    env:\n      PILOT_ENABLE_ALPHA_GATEWAY_API: false\n";

/// Runs `test` against the built-in `default` profile with `values` sealed.
fn run_case(
    test: &TestCase,
    values: &str,
    harness: &HarnessConfig,
    sink: &Arc<RecordingSink>,
) -> Result<(), TestFailure> {
    let catalog = ProfileCatalog::builtin();
    let profile = catalog.get(&ProfileName::default()).expect("default profile");
    let sealed = SealedConfig::seal(ControlPlaneConfig {
        control_plane_values: values.to_string(),
        ..ControlPlaneConfig::default()
    })
    .expect("sealed");
    let setup = SetupContext::empty();
    let installation =
        InMemoryInstaller::new().install(&setup, profile, &sealed).expect("installed");
    let events = EventRecorder::new(Box::new(Arc::clone(sink)));
    let context = TestContext {
        name: test.name(),
        setup: &setup,
        profile,
        config: &sealed,
        installation: &installation,
        harness,
        events: &events,
    };
    test.run(&context)
}

fn harness_at(root: &Path, refresh: bool) -> HarnessConfig {
    HarnessConfig {
        golden_root: root.to_path_buf(),
        refresh_golden: refresh,
        ..HarnessConfig::default()
    }
}

#[test]
fn failure_accessors_follow_the_variant() {
    let env = TestFailure::environment("golden root missing");
    assert!(env.is_environment());
    assert_eq!(env.diff(), None);
    assert_eq!(env.to_string(), "environment fault: golden root missing");

    let assertion = TestFailure::assertion("mismatch");
    assert!(!assertion.is_environment());
    assert_eq!(assertion.diff(), None);
    assert_eq!(assertion.to_string(), "assertion failed: mismatch");
}

#[test]
fn custom_test_case_sees_the_installation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let test = TestCase::new("namespace", |context| {
        if context.installation.namespace == "istio-system" {
            Ok(())
        } else {
            Err(TestFailure::assertion("unexpected namespace"))
        }
    });
    assert_eq!(test.name(), "namespace");
    let sink = Arc::new(RecordingSink::new());
    run_case(&test, ALPHA_OFF, &harness_at(dir.path(), false), &sink).expect("pass");
}

#[test]
fn docs_test_is_named_by_its_label() {
    assert_eq!(docs_test("profile=default").name(), "profile=default");
}

#[test]
fn refresh_then_verify_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("golden");
    let test = docs_test("profile=default");
    let sink = Arc::new(RecordingSink::new());

    run_case(&test, ALPHA_OFF, &harness_at(&root, true), &sink).expect("refresh");
    let refreshed = sink.events();
    assert!(matches!(
        refreshed.as_slice(),
        [SuiteEvent::GoldenRefreshed { test, paths }]
            if test == "profile=default" && paths.len() == 3
    ));

    run_case(&test, ALPHA_OFF, &harness_at(&root, false), &sink).expect("verify");
}

#[test]
fn drift_is_an_assertion_with_diff() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("golden");
    let test = docs_test("profile=default");
    let sink = Arc::new(RecordingSink::new());

    // Golden rendered with the alpha flag left at its profile value.
    run_case(&test, "", &harness_at(&root, true), &sink).expect("refresh");
    let failure =
        run_case(&test, ALPHA_OFF, &harness_at(&root, false), &sink).expect_err("drift");

    assert!(!failure.is_environment());
    let diff = failure.diff().expect("diff");
    assert!(diff.contains("PILOT_ENABLE_ALPHA_GATEWAY_API"));
    assert!(failure.to_string().contains("of 3 documents differ from golden for `profile=default`"));
}

#[test]
fn missing_golden_root_is_an_environment_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let test = docs_test("profile=default");
    let sink = Arc::new(RecordingSink::new());
    let failure = run_case(&test, ALPHA_OFF, &harness_at(&dir.path().join("absent"), false), &sink)
        .expect_err("missing root");
    assert!(failure.is_environment());
}

#[test]
fn label_for_another_profile_is_an_environment_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let test = docs_test("profile=demo");
    let sink = Arc::new(RecordingSink::new());
    let failure =
        run_case(&test, ALPHA_OFF, &harness_at(dir.path(), false), &sink).expect_err("mismatch");
    assert!(failure.is_environment());
    assert!(failure.to_string().contains("targets profile `demo` but `default` is installed"));
}

#[test]
fn malformed_label_is_an_environment_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let test = docs_test("profile=");
    let sink = Arc::new(RecordingSink::new());
    let failure =
        run_case(&test, ALPHA_OFF, &harness_at(dir.path(), false), &sink).expect_err("bad label");
    assert!(failure.is_environment());
}
