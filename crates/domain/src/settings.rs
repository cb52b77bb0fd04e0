//! Runner settings.
//!
//! Values that vary between environments running the same suites: where the service lives,
//! how long to wait for it and how chatty to be.

use serde::{Deserialize, Serialize};

use crate::request::RequestConfig;

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Settings for running API test suites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Base URL of the service under test, for network transports.
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Log every exchange in full.
    pub pretty_print: bool,
    /// Stop the run at the first failing case.
    pub stop_on_failure: bool,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            pretty_print: false,
            stop_on_failure: false,
            log_filter: default_log_filter(),
        }
    }
}

impl RunnerSettings {
    /// Returns the request configuration every test starts from under these settings.
    #[must_use]
    pub fn default_request_config(&self) -> RequestConfig {
        RequestConfig {
            pretty_print: self.pretty_print,
            ..RequestConfig::default()
        }
    }
}
