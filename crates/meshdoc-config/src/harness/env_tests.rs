// crates/meshdoc-config/src/harness/env_tests.rs
// ============================================================================
// Module: Harness Env Unit Tests
// Description: Unit coverage for strict environment parsing of harness settings.
// Purpose: Ensure configuration parsing fails closed on invalid inputs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Invariants:
//! - Environment parsing rejects invalid or empty values.
//! - Tests restore environment state after each run.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::OnceLock;

use super::HarnessConfig;
use super::HarnessEnv;
use crate::ConfigError;

mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("env lock poisoned")
}

/// Snapshots harness variables, clears them, and restores them on drop.
struct EnvGuard {
    entries: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn clean() -> Self {
        let entries = HarnessEnv::ALL
            .into_iter()
            .map(|var| (var.as_str(), std::env::var(var.as_str()).ok()))
            .collect();
        for var in HarnessEnv::ALL {
            env_mut::remove_var(var.as_str());
        }
        Self {
            entries,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, &value),
                None => env_mut::remove_var(name),
            }
        }
    }
}

#[test]
fn no_env_keeps_defaults() {
    let _lock = env_lock();
    let _guard = EnvGuard::clean();

    let config = HarnessConfig::load(None).expect("config should load");
    assert_eq!(config, HarnessConfig::default());
}

#[test]
fn overrides_apply() {
    let _lock = env_lock();
    let _guard = EnvGuard::clean();

    env_mut::set_var(HarnessEnv::GoldenRoot.as_str(), "/tmp/golden");
    env_mut::set_var(HarnessEnv::RunRoot.as_str(), "/tmp/run");
    env_mut::set_var(HarnessEnv::RefreshGolden.as_str(), "1");
    env_mut::set_var(HarnessEnv::EventLog.as_str(), "/tmp/events.jsonl");
    env_mut::set_var(HarnessEnv::Profile.as_str(), "demo");

    let config = HarnessConfig::load(None).expect("config should load");
    assert_eq!(config.golden_root, PathBuf::from("/tmp/golden"));
    assert_eq!(config.run_root, Some(PathBuf::from("/tmp/run")));
    assert!(config.refresh_golden);
    assert_eq!(config.event_log, Some(PathBuf::from("/tmp/events.jsonl")));
    assert_eq!(config.profile_or_default().as_str(), "demo");
}

#[test]
fn refresh_parses_bool_values() {
    let _lock = env_lock();
    let _guard = EnvGuard::clean();

    env_mut::set_var(HarnessEnv::RefreshGolden.as_str(), "TRUE");
    assert!(HarnessConfig::load(None).expect("config should load").refresh_golden);

    env_mut::set_var(HarnessEnv::RefreshGolden.as_str(), "0");
    assert!(!HarnessConfig::load(None).expect("config should load").refresh_golden);

    env_mut::set_var(HarnessEnv::RefreshGolden.as_str(), "maybe");
    assert!(matches!(HarnessConfig::load(None), Err(ConfigError::Env(_))));
}

#[test]
fn empty_values_fail_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::clean();

    env_mut::set_var(HarnessEnv::GoldenRoot.as_str(), "  ");
    assert!(matches!(HarnessConfig::load(None), Err(ConfigError::Env(_))));
}

#[test]
fn invalid_profile_fails_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::clean();

    env_mut::set_var(HarnessEnv::Profile.as_str(), "Not A Profile");
    let err = HarnessConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("MESHDOC_PROFILE"));
}
