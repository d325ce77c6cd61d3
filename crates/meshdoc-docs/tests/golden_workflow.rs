// crates/meshdoc-docs/tests/golden_workflow.rs
// ============================================================================
// Module: Golden Workflow Tests
// Description: Refresh and verification against an on-disk golden tree.
// Purpose: Validate match, drift, missing, and unexpected outcomes end to end.
// Dependencies: meshdoc-docs, meshdoc-config, tempfile
// ============================================================================

//! ## Overview
//! Each test renders the built-in `default` profile into a temporary golden
//! root and then perturbs the tree to exercise one verification outcome.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only golden fixtures use direct assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::DocTopic;
use meshdoc_config::DocsSelector;
use meshdoc_config::ProfileCatalog;
use meshdoc_config::ProfileName;
use meshdoc_docs::CheckStatus;
use meshdoc_docs::DocBundle;
use meshdoc_docs::DocsError;
use meshdoc_docs::DocsRenderer;
use meshdoc_docs::GoldenStore;
use meshdoc_docs::MAX_DOC_BYTES;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn render(values: &str) -> Result<DocBundle, DocsError> {
    let catalog = ProfileCatalog::builtin();
    let profile = catalog.get(&ProfileName::new("default")?)?;
    let config = ControlPlaneConfig {
        control_plane_values: values.to_string(),
        ..ControlPlaneConfig::default()
    };
    DocsRenderer::new(profile, &config).render()
}

fn selector(label: &str) -> DocsSelector {
    DocsSelector::parse(label).expect("selector")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Refreshed golden docs verify cleanly.
#[test]
fn refreshed_tree_matches() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path().join("golden"));
    let bundle = render("")?;
    let written = store.refresh(&bundle, &selector("profile=default"))?;
    assert_eq!(written.len(), 3);

    let report = store.verify(&bundle, &selector("profile=default"))?;
    assert!(report.is_pass(), "{}", report.describe_failures());
    assert_eq!(report.checks.len(), 3);
    assert_eq!(report.selector, "profile=default");
    Ok(())
}

/// Drift in a single value is reported as a mismatch with a diff.
#[test]
fn overlay_drift_is_a_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    store.refresh(&render("")?, &selector("default"))?;

    let drifted = render("values:\n  pilot:\n    env:\n      PILOT_ENABLE_ALPHA_GATEWAY_API: false\n")?;
    let report = store.verify(&drifted, &selector("default"))?;
    assert!(!report.is_pass());
    let failing: Vec<&str> = report.failures().map(|check| check.path.as_str()).collect();
    assert_eq!(
        failing,
        vec![
            "profile-default/overview.md",
            "profile-default/values.md",
            "profile-default/feature-flags.md"
        ]
    );
    let flags = &report.checks[2];
    let CheckStatus::Mismatch {
        diff,
    } = &flags.status
    else {
        return Err("expected mismatch".into());
    };
    assert!(diff.contains("-| `PILOT_ENABLE_ALPHA_GATEWAY_API` | pilot | yes | profile |"));
    assert!(diff.contains("+| `PILOT_ENABLE_ALPHA_GATEWAY_API` | pilot | no | overlay |"));
    assert_ne!(flags.golden_digest, flags.rendered_digest);
    Ok(())
}

/// A topic selector only checks that topic and ignores stray files.
#[test]
fn topic_selector_limits_checks() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let bundle = render("")?;
    store.refresh(&bundle, &selector("default"))?;
    fs::write(temp.path().join("profile-default/notes.md"), "stray\n")?;

    let report = store.verify(&bundle, &selector("profile=default,topic=values"))?;
    assert!(report.is_pass());
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].path, "profile-default/values.md");
    Ok(())
}

/// Missing and unexpected golden files both fail verification.
#[test]
fn missing_and_unexpected_files_fail() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let bundle = render("")?;
    store.refresh(&bundle, &selector("default"))?;
    fs::remove_file(temp.path().join("profile-default").join(DocTopic::Values.file_name()))?;
    fs::write(temp.path().join("profile-default/notes.md"), "stray\n")?;

    let report = store.verify(&bundle, &selector("default"))?;
    let statuses: Vec<(&str, &CheckStatus)> =
        report.checks.iter().map(|check| (check.path.as_str(), &check.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("profile-default/overview.md", &CheckStatus::Match),
            ("profile-default/values.md", &CheckStatus::MissingGolden),
            ("profile-default/feature-flags.md", &CheckStatus::Match),
            ("profile-default/notes.md", &CheckStatus::Unexpected),
        ]
    );
    let summary = report.describe_failures();
    assert!(summary.contains("profile-default/values.md: golden document is missing"));
    assert!(summary.contains("profile-default/notes.md: golden document is not rendered"));

    store.refresh(&bundle, &selector("default"))?;
    assert!(!temp.path().join("profile-default/notes.md").exists());
    assert!(store.verify(&bundle, &selector("default"))?.is_pass());
    Ok(())
}

/// A missing profile directory reports every artifact as missing.
#[test]
fn missing_profile_dir_reports_missing_golden() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let report = store.verify(&render("")?, &selector("default"))?;
    assert_eq!(report.checks.len(), 3);
    assert!(report.checks.iter().all(|check| check.status == CheckStatus::MissingGolden));
    Ok(())
}

/// A missing golden root is an environment fault.
#[test]
fn missing_root_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path().join("absent"));
    let result = store.verify(&render("")?, &selector("default"));
    assert!(matches!(result, Err(DocsError::GoldenRoot(_))));
    Ok(())
}

/// Selectors for another profile are rejected.
#[test]
fn selector_profile_must_match_bundle() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let result = store.verify(&render("")?, &selector("profile=demo"));
    assert!(matches!(result, Err(DocsError::ProfileMismatch { .. })));
    Ok(())
}

/// Oversized golden documents are rejected before reading.
#[test]
fn oversized_golden_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let bundle = render("")?;
    store.refresh(&bundle, &selector("default"))?;
    let size = usize::try_from(MAX_DOC_BYTES)? + 1;
    fs::write(temp.path().join("profile-default/overview.md"), vec![b'x'; size])?;
    let result = store.verify(&bundle, &selector("default"));
    assert!(matches!(result, Err(DocsError::TooLarge { .. })));
    Ok(())
}

/// Symlinked golden documents are refused.
#[cfg(target_os = "linux")]
#[test]
fn symlinked_golden_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path().join("golden"));
    let bundle = render("")?;
    store.refresh(&bundle, &selector("default"))?;
    let outside = temp.path().join("outside.md");
    fs::write(&outside, "outside\n")?;
    let target = temp.path().join("golden/profile-default/overview.md");
    fs::remove_file(&target)?;
    std::os::unix::fs::symlink(&outside, &target)?;
    let result = store.verify(&bundle, &selector("default"));
    assert!(matches!(result, Err(DocsError::UnsafePath(_))));
    Ok(())
}

/// Oversized stray files stay unexpected and carry no golden digest.
#[test]
fn oversized_stray_file_is_unexpected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let store = GoldenStore::new(temp.path());
    let bundle = render("")?;
    store.refresh(&bundle, &selector("default"))?;
    let size = usize::try_from(MAX_DOC_BYTES)? + 1;
    fs::write(temp.path().join("profile-default/huge.md"), vec![b'x'; size])?;

    let report = store.verify(&bundle, &selector("default"))?;
    let stray = report
        .checks
        .iter()
        .find(|check| check.path == "profile-default/huge.md")
        .ok_or("stray file not reported")?;
    assert_eq!(stray.status, CheckStatus::Unexpected);
    assert_eq!(stray.golden_digest, None);
    assert!(!report.is_pass());
    Ok(())
}

/// Refresh creates nested golden roots; upward traversal is refused.
#[test]
fn nested_root_is_created_and_parent_dirs_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let bundle = render("")?;
    let nested = GoldenStore::new(temp.path().join("a").join("b").join("golden"));
    nested.refresh(&bundle, &selector("default"))?;
    assert!(temp.path().join("a/b/golden/profile-default/values.md").is_file());

    let upward = GoldenStore::new(temp.path().join("a/../a/b/golden"));
    let result = upward.verify(&bundle, &selector("default"));
    assert!(matches!(result, Err(DocsError::GoldenRoot(_))));
    Ok(())
}

/// A symlink anywhere along the golden root is refused.
#[cfg(target_os = "linux")]
#[test]
fn symlinked_root_component_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let real = temp.path().join("real");
    let bundle = render("")?;
    GoldenStore::new(&real).refresh(&bundle, &selector("default"))?;
    let link = temp.path().join("link");
    std::os::unix::fs::symlink(&real, &link)?;

    let result = GoldenStore::new(&link).verify(&bundle, &selector("default"));
    assert!(matches!(result, Err(DocsError::GoldenRoot(_))));
    Ok(())
}
