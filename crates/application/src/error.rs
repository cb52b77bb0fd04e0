//! Application error types

use std::fmt;

use docspec_domain::{HttpStatus, ValidationError};
use thiserror::Error;

use crate::ports::TransportError;

/// Where in an outgoing request a value was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLocation {
    /// A `{name}` segment of the URL template.
    PathParameter,
    /// A query string parameter.
    QueryParameter,
    /// A field of the request body.
    RequestBodyField,
}

impl fmt::Display for RequestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PathParameter => "path parameter",
            Self::QueryParameter => "query parameter",
            Self::RequestBodyField => "request body field",
        })
    }
}

/// An API test was configured in a way that cannot be executed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `expect_status` was never called.
    #[error("Expected status is required")]
    MissingExpectedStatus,

    /// A predicate was supplied where a concrete value has to be sent.
    #[error("Predicate example cannot be sent as {location} \"{key}\"")]
    PredicateInRequest {
        /// Part of the request the value belongs to.
        location: RequestLocation,
        /// Parameter or field name.
        key: String,
    },
}

/// Failure of a single API test execution.
///
/// Every variant is terminal for that execution; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiTestError {
    /// The test configuration is incomplete or unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The declared verb cannot be executed.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The response carried a different status.
    #[error("expected status {expected} but got {actual}")]
    StatusMismatch {
        /// Declared status.
        expected: HttpStatus,
        /// Received status.
        actual: HttpStatus,
    },

    /// The response body did not match the expected shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No body was expected but the response carried one.
    #[error("Expected response body is required \n    {body}")]
    UnexpectedBody {
        /// Pretty-printed response body.
        body: String,
    },

    /// The transport failed before a response was available.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type alias for API test execution.
pub type ApiTestResult<T> = Result<T, ApiTestError>;

/// An API or test case was declared incorrectly.
///
/// Raised synchronously at declaration time, before any test runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    /// The API options carry no name.
    #[error("API name is required")]
    MissingName,

    /// The URL template does not start with `/`.
    #[error("API URL must start with /")]
    InvalidUrl(String),

    /// No service handle was provided.
    #[error("Service handle is required")]
    MissingService,

    /// No callback was provided to declare the API's tests.
    #[error("API test callback is required")]
    MissingCallback,

    /// A test case was declared without a description.
    #[error("Test description is required")]
    MissingDescription,
}
