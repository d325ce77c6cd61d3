// crates/meshdoc-suite/src/lib.rs
// ============================================================================
// Module: meshdoc Suite Library
// Description: Explicit suite lifecycle for control-plane documentation tests.
// Purpose: Compose setup callbacks, an installer, and checks into one run.
// Dependencies: meshdoc-config, meshdoc-docs, serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! A [`Suite`] owns everything a scenario needs: the profile to install,
//! setup callbacks that mutate a [`meshdoc_config::ControlPlaneConfig`], an
//! [`Installer`], and a list of [`TestCase`] checks such as [`docs_test`].
//! There is no process-wide runner; each test binary builds and runs its own
//! suite.
//!
//! ```no_run
//! use meshdoc_suite::Suite;
//! use meshdoc_suite::docs_test;
//! use meshdoc_suite::set_control_plane_values;
//!
//! let report = Suite::new("docs")
//!     .setup("alpha-gateway", set_control_plane_values("values: {}"))
//!     .test(docs_test("profile=default"))
//!     .run();
//! # let _ = report;
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod error;
pub mod events;
pub mod install;
pub mod invocation;
pub mod report;
pub mod setup;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::SetupContext;
pub use error::EventError;
pub use error::InstallError;
pub use error::ReportError;
pub use error::SetupError;
pub use error::SuiteError;
pub use events::EventSink;
pub use events::JsonLineSink;
pub use events::NullSink;
pub use events::RecordingSink;
pub use events::SuiteEvent;
pub use install::InMemoryInstaller;
pub use install::Installation;
pub use install::Installer;
pub use invocation::TestCase;
pub use invocation::TestContext;
pub use invocation::TestFailure;
pub use invocation::docs_test;
pub use report::SuiteReport;
pub use report::TestOutcome;
pub use report::TestStatus;
pub use setup::ConfigMutator;
pub use setup::SealedConfig;
pub use setup::SetupChain;
pub use setup::set_control_plane_values;
pub use suite::Suite;
