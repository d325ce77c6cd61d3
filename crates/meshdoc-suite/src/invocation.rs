// crates/meshdoc-suite/src/invocation.rs
// ============================================================================
// Module: Test Invocations
// Description: Named checks run against an installed control plane.
// Purpose: Provide the docs verification check and failure classification.
// Dependencies: meshdoc-config, meshdoc-docs, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TestCase`] is a named closure over a [`TestContext`]. [`docs_test`]
//! builds the canonical check: parse a profile label, render docs for the
//! installed profile and sealed configuration, and verify them against the
//! golden tree (or refresh the golden tree when the harness asks for it).
//! Invariants:
//! - Tooling faults are [`TestFailure::Environment`]; content drift is
//!   [`TestFailure::Assertion`] and carries the per-document diff.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use meshdoc_config::DocsSelector;
use meshdoc_config::HarnessConfig;
use meshdoc_config::ProfileDefinition;
use meshdoc_docs::DocsRenderer;
use meshdoc_docs::GoldenStore;
use serde::Serialize;
use thiserror::Error;

use crate::context::SetupContext;
use crate::events::EventRecorder;
use crate::events::SuiteEvent;
use crate::install::Installation;
use crate::setup::SealedConfig;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Classified test failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestFailure {
    /// Tooling or environment fault; the check could not be evaluated.
    #[error("environment fault: {message}")]
    Environment {
        /// Fault description.
        message: String,
    },
    /// The check ran and its expectation did not hold.
    #[error("assertion failed: {message}")]
    Assertion {
        /// Failure summary.
        message: String,
        /// Optional detail, such as a line diff.
        diff: Option<String>,
    },
}

impl TestFailure {
    /// Builds an environment fault from any displayable error.
    pub fn environment(err: impl Display) -> Self {
        Self::Environment {
            message: err.to_string(),
        }
    }

    /// Builds an assertion failure without a diff.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
            diff: None,
        }
    }

    /// Returns the diff attached to an assertion failure.
    #[must_use]
    pub fn diff(&self) -> Option<&str> {
        match self {
            Self::Assertion {
                diff,
                ..
            } => diff.as_deref(),
            Self::Environment {
                ..
            } => None,
        }
    }

    /// Returns true for environment faults.
    #[must_use]
    pub const fn is_environment(&self) -> bool {
        matches!(self, Self::Environment { .. })
    }
}

// ============================================================================
// SECTION: Test Context
// ============================================================================

/// Read-only view handed to every test.
pub struct TestContext<'a> {
    /// Test name.
    pub name: &'a str,
    /// Ambient resources.
    pub setup: &'a SetupContext,
    /// Installed profile definition.
    pub profile: &'a ProfileDefinition,
    /// Sealed configuration.
    pub config: &'a SealedConfig,
    /// Active installation.
    pub installation: &'a Installation,
    /// Harness settings.
    pub harness: &'a HarnessConfig,
    /// Event recorder.
    pub(crate) events: &'a EventRecorder,
}

impl TestContext<'_> {
    /// Emits a lifecycle event from inside a test.
    pub fn emit(&self, event: &SuiteEvent) {
        self.events.emit(event);
    }
}

// ============================================================================
// SECTION: Test Case
// ============================================================================

/// Boxed check closure.
type Check = Box<dyn Fn(&TestContext<'_>) -> Result<(), TestFailure>>;

/// Named check executed after installation.
pub struct TestCase {
    /// Test name, unique within a suite.
    name: String,
    /// Check body.
    check: Check,
}

impl TestCase {
    /// Creates a test case.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&TestContext<'_>) -> Result<(), TestFailure> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    /// Returns the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the check.
    pub(crate) fn run(&self, context: &TestContext<'_>) -> Result<(), TestFailure> {
        (self.check)(context)
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Docs Test
// ============================================================================

/// Builds a test that verifies generated docs for `label`.
///
/// The label is a docs selector such as `profile=default` and is also the
/// test name. The selected profile must be the installed profile.
pub fn docs_test(label: impl Into<String>) -> TestCase {
    let label = label.into();
    let name = label.clone();
    TestCase::new(name, move |context| verify_docs(context, &label))
}

/// Body of [`docs_test`].
fn verify_docs(context: &TestContext<'_>, label: &str) -> Result<(), TestFailure> {
    let selector = DocsSelector::parse(label).map_err(TestFailure::environment)?;
    if selector.profile() != &context.installation.profile {
        return Err(TestFailure::environment(format!(
            "label `{label}` targets profile `{}` but `{}` is installed",
            selector.profile(),
            context.installation.profile
        )));
    }
    let bundle = DocsRenderer::new(context.profile, context.config.config())
        .render()
        .map_err(TestFailure::environment)?;
    let store = GoldenStore::new(&context.harness.golden_root);

    if context.harness.refresh_golden {
        let paths = store.refresh(&bundle, &selector).map_err(TestFailure::environment)?;
        context.emit(&SuiteEvent::GoldenRefreshed {
            test: context.name.to_string(),
            paths,
        });
        return Ok(());
    }

    let report = store.verify(&bundle, &selector).map_err(TestFailure::environment)?;
    if report.is_pass() {
        return Ok(());
    }
    let failing = report.failures().count();
    Err(TestFailure::Assertion {
        message: format!(
            "{failing} of {} documents differ from golden for `{selector}` under {}",
            report.checks.len(),
            store.root().display()
        ),
        diff: Some(report.describe_failures()),
    })
}

#[cfg(test)]
mod tests;
