// crates/meshdoc-suite/src/suite.rs
// ============================================================================
// Module: Suite
// Description: Explicit suite object with setup, install, test, and teardown.
// Purpose: Drive one control-plane scenario from configuration to report.
// Dependencies: meshdoc-config
// ============================================================================

//! ## Overview
//! A [`Suite`] is built by value and run once per scenario. [`Suite::run`]
//! walks the lifecycle:
//!
//! 1. resolve the profile from the catalog;
//! 2. apply setup callbacks in registration order and seal the result;
//! 3. install the profile with the sealed configuration;
//! 4. run each test in registration order;
//! 5. uninstall, then write the report into the run root when configured.
//!
//! Invariants:
//! - Steps 1-3 are fatal: an error there returns [`SuiteError`] and no test runs.
//! - Test failures are recorded per test and never stop later tests.
//! - Teardown runs whenever installation succeeded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use meshdoc_config::HarnessConfig;
use meshdoc_config::ProfileCatalog;
use meshdoc_config::ProfileName;

use crate::context::SetupContext;
use crate::error::SuiteError;
use crate::events::EventRecorder;
use crate::events::EventSink;
use crate::events::JsonLineSink;
use crate::events::NullSink;
use crate::events::SuiteEvent;
use crate::install::InMemoryInstaller;
use crate::install::Installer;
use crate::invocation::TestCase;
use crate::invocation::TestContext;
use crate::report::SuiteReport;
use crate::report::TestOutcome;
use crate::setup::ConfigMutator;
use crate::setup::SetupChain;

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Explicit test suite for one profile.
pub struct Suite {
    /// Suite name, used in reports and events.
    name: String,
    /// Profile to install.
    profile: ProfileName,
    /// Profiles available to the suite.
    catalog: ProfileCatalog,
    /// Ambient resources.
    context: SetupContext,
    /// Setup callbacks.
    setup: SetupChain,
    /// Installer seam.
    installer: Box<dyn Installer>,
    /// Harness settings.
    harness: HarnessConfig,
    /// Event recorder.
    events: EventRecorder,
    /// Tests in registration order.
    tests: Vec<TestCase>,
}

impl Suite {
    /// Creates a suite for the `default` profile with in-memory collaborators.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: ProfileName::default(),
            catalog: ProfileCatalog::builtin(),
            context: SetupContext::empty(),
            setup: SetupChain::new(),
            installer: Box::new(InMemoryInstaller::new()),
            harness: HarnessConfig::default(),
            events: EventRecorder::new(Box::new(NullSink)),
            tests: Vec::new(),
        }
    }

    /// Creates a suite from harness settings.
    ///
    /// The profile comes from the harness (or `default`), and events are
    /// appended to the harness event log when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Events`] when the event log cannot be opened.
    pub fn from_harness(
        name: impl Into<String>,
        harness: HarnessConfig,
    ) -> Result<Self, SuiteError> {
        let mut suite = Self::new(name).with_profile(harness.profile_or_default());
        if let Some(path) = &harness.event_log {
            suite = suite.with_events(JsonLineSink::append_to(path).map_err(SuiteError::Events)?);
        }
        if let Some(run_root) = &harness.run_root {
            suite.context = suite.context.with_run_root(run_root);
        }
        Ok(suite.with_harness(harness))
    }

    /// Sets the profile to install.
    #[must_use]
    pub fn with_profile(mut self, profile: ProfileName) -> Self {
        self.profile = profile;
        self
    }

    /// Replaces the profile catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the ambient context.
    #[must_use]
    pub fn with_context(mut self, context: SetupContext) -> Self {
        self.context = context;
        self
    }

    /// Replaces the installer.
    #[must_use]
    pub fn with_installer(mut self, installer: impl Installer + 'static) -> Self {
        self.installer = Box::new(installer);
        self
    }

    /// Replaces the harness settings.
    #[must_use]
    pub fn with_harness(mut self, harness: HarnessConfig) -> Self {
        self.harness = harness;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_events(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = EventRecorder::new(Box::new(sink));
        self
    }

    /// Registers a named setup callback.
    #[must_use]
    pub fn setup(mut self, name: impl Into<String>, mutator: impl ConfigMutator + 'static) -> Self {
        self.setup.push(name, mutator);
        self
    }

    /// Registers a test.
    #[must_use]
    pub fn test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// Runs the suite lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] when the profile is unknown, setup fails, or
    /// installation fails. Test, teardown, and report-write failures are
    /// recorded in the returned [`SuiteReport`].
    pub fn run(&mut self) -> Result<SuiteReport, SuiteError> {
        self.events.emit(&SuiteEvent::SuiteStarted {
            suite: self.name.clone(),
            profile: self.profile.to_string(),
        });
        let profile = match self.catalog.get(&self.profile) {
            Ok(profile) => profile.clone(),
            Err(err) => return Err(self.abort(SuiteError::Profile(err))),
        };
        let sealed = match self.setup.apply_recorded(&self.context, Some(&self.events)) {
            Ok(sealed) => sealed,
            Err(err) => return Err(self.abort(err)),
        };
        let installation = match self.installer.install(&self.context, &profile, &sealed) {
            Ok(installation) => installation,
            Err(err) => return Err(self.abort(SuiteError::Install(err))),
        };
        self.events.emit(&SuiteEvent::Installed {
            profile: installation.profile.to_string(),
            namespace: installation.namespace.clone(),
            revision: installation.revision.clone(),
        });

        let mut outcomes = Vec::with_capacity(self.tests.len());
        for test in &self.tests {
            self.events.emit(&SuiteEvent::TestStarted {
                test: test.name().to_string(),
            });
            let context = TestContext {
                name: test.name(),
                setup: &self.context,
                profile: &profile,
                config: &sealed,
                installation: &installation,
                harness: &self.harness,
                events: &self.events,
            };
            let started = Instant::now();
            let result = test.run(&context);
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let outcome = TestOutcome::from_result(test.name(), duration_ms, result);
            self.events.emit(&SuiteEvent::TestFinished {
                test: outcome.name.clone(),
                status: outcome.status,
                duration_ms,
            });
            outcomes.push(outcome);
        }

        let teardown_error = match self.installer.uninstall(&installation) {
            Ok(()) => {
                self.events.emit(&SuiteEvent::Uninstalled {
                    namespace: installation.namespace.clone(),
                    revision: installation.revision.clone(),
                });
                None
            }
            Err(err) => {
                let reason = err.to_string();
                self.events.emit(&SuiteEvent::TeardownFailed {
                    reason: reason.clone(),
                });
                Some(reason)
            }
        };

        let mut report = SuiteReport {
            suite: self.name.clone(),
            profile: installation.profile.to_string(),
            namespace: installation.namespace.clone(),
            revision: installation.revision.clone(),
            overlay_keys: sealed.overlay().leaves().len(),
            tests: outcomes,
            teardown_error,
            report_error: None,
            dropped_events: 0,
        };
        self.events.emit(&SuiteEvent::SuiteFinished {
            passed: report.passed(),
            failed: report.failed(),
        });
        report.dropped_events = self.events.dropped();
        if let Some(run_root) = &self.harness.run_root
            && let Err(err) = report.write_to(&run_root.join(&self.name))
        {
            let reason = err.to_string();
            self.events.emit(&SuiteEvent::ReportFailed {
                reason: reason.clone(),
            });
            report.report_error = Some(reason);
        }
        Ok(report)
    }

    /// Emits an abort event and returns the error.
    fn abort(&self, err: SuiteError) -> SuiteError {
        self.events.emit(&SuiteEvent::SuiteAborted {
            reason: err.to_string(),
        });
        err
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("profile", &self.profile)
            .field("setup", &self.setup)
            .field("tests", &self.tests)
            .finish_non_exhaustive()
    }
}
