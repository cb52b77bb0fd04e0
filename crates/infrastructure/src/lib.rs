//! Docspec Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and tracing setup.

pub mod adapters;
pub mod settings;
pub mod telemetry;
pub mod testing;

pub use adapters::{ReqwestTransport, TowerTransport};
pub use settings::{ENV_PREFIX, SettingsError, load_settings, load_settings_with};
pub use telemetry::init_tracing;
pub use testing::{CaseOutcome, RunReport, TestRunner};
