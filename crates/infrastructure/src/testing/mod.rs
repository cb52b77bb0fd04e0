//! Suite execution.
//!
//! This module provides the runner that executes registered cases and reports their
//! outcomes.

mod runner;

pub use runner::{CaseOutcome, RunReport, TestRunner};
