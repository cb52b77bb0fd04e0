//! HTTP verbs an API can be declared with.
//!
//! Declarations accept any verb spelling; only the five in [`HttpMethod::EXECUTABLE`]
//! can actually be sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Recognized HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
    /// Recognized but not executable.
    Head,
    /// Recognized but not executable.
    Options,
}

const NAMES: [(HttpMethod, &str); 7] = [
    (HttpMethod::Get, "GET"),
    (HttpMethod::Post, "POST"),
    (HttpMethod::Put, "PUT"),
    (HttpMethod::Patch, "PATCH"),
    (HttpMethod::Delete, "DELETE"),
    (HttpMethod::Head, "HEAD"),
    (HttpMethod::Options, "OPTIONS"),
];

impl HttpMethod {
    /// Methods an API test can be executed with.
    pub const EXECUTABLE: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Delete, Self::Patch];

    /// Returns whether an API test can be executed with this method.
    #[must_use]
    pub const fn is_executable(self) -> bool {
        !matches!(self, Self::Head | Self::Options)
    }

    /// Canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        NAMES[self as usize].1
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    /// Case-insensitive. The error keeps the caller's spelling.
    fn from_str(s: &str) -> DomainResult<Self> {
        NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(method, _)| *method)
            .ok_or_else(|| DomainError::UnsupportedMethod(s.to_string()))
    }
}
