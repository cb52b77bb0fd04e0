//! Structural response validation.
//!
//! Compares an expected [`Shape`](crate::Shape) against an actual JSON body and reports the
//! first mismatch with the path where it occurred.

mod path;
mod validator;

use thiserror::Error;

pub use path::ValidationPath;
pub use validator::{validate, validate_at};

/// The first mismatch found while validating a response body.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A literal did not strictly equal the actual value.
    #[error("Expected response body[{path}] to be {expected} but got {actual}")]
    ValueMismatch {
        /// Where the mismatch occurred.
        path: ValidationPath,
        /// Rendered expected value.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },

    /// The actual value had the wrong container type.
    #[error("Expected response body[{path}] to be {expected} but got {actual}")]
    TypeMismatch {
        /// Where the mismatch occurred.
        path: ValidationPath,
        /// `an array` or `an object`.
        expected: &'static str,
        /// Type name of the actual value.
        actual: &'static str,
    },

    /// An array had a different number of elements.
    #[error("Expected response body[{path}] to have length {expected} but got {actual}")]
    LengthMismatch {
        /// Where the mismatch occurred.
        path: ValidationPath,
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A field predicate rejected the actual value; its message is kept verbatim.
    #[error(transparent)]
    Predicate(anyhow::Error),
}

impl ValidationError {
    /// Returns the path of the mismatch, when known.
    ///
    /// Predicate failures carry only the predicate's own error.
    #[must_use]
    pub const fn path(&self) -> Option<&ValidationPath> {
        match self {
            Self::ValueMismatch { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::LengthMismatch { path, .. } => Some(path),
            Self::Predicate(_) => None,
        }
    }
}
