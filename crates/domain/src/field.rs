//! Documented field values.
//!
//! A [`FieldSpec`] pairs a human-readable description with an example. The example is
//! either a literal, which doubles as the expected value when a response is validated, or
//! a [`Predicate`] that inspects the actual value and fails when an invariant does not hold.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::shape::Shape;

type CheckFn = dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync;

/// An assertion over an actual value.
///
/// The predicate signals failure by returning an error; the error is surfaced to the
/// caller untouched.
#[derive(Clone)]
pub struct Predicate(Arc<CheckFn>);

impl Predicate {
    /// Wraps a checking closure.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// Runs the predicate against `actual`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the predicate raised.
    pub fn check(&self, actual: &Value) -> anyhow::Result<()> {
        (self.0)(actual)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// The example carried by a [`FieldSpec`]: exactly one of a literal or a predicate.
#[derive(Debug, Clone)]
pub enum Example {
    /// A concrete value, possibly a nested shape of further fields.
    Literal(Box<Shape>),
    /// An assertion over the actual value.
    Predicate(Predicate),
}

impl Example {
    /// Returns the literal shape, if this example is not a predicate.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Shape> {
        match self {
            Self::Literal(shape) => Some(shape.as_ref()),
            Self::Predicate(_) => None,
        }
    }

    /// Returns true if this example is a predicate.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate(_))
    }

    /// Renders the example for diagnostics. Predicates render as `"<predicate>"`.
    #[must_use]
    pub fn documented(&self) -> Value {
        match self {
            Self::Literal(shape) => shape.documented(),
            Self::Predicate(_) => Value::String("<predicate>".to_string()),
        }
    }
}

/// A documented value descriptor.
///
/// Constructed once when a suite is declared and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    description: String,
    example: Example,
}

impl FieldSpec {
    /// Creates a field whose example is a literal value.
    #[must_use]
    pub fn literal(description: impl Into<String>, example: impl Into<Shape>) -> Self {
        Self {
            description: description.into(),
            example: Example::Literal(Box::new(example.into())),
        }
    }

    /// Creates a field whose example is a predicate over the actual value.
    #[must_use]
    pub fn predicate<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            example: Example::Predicate(Predicate::new(check)),
        }
    }

    /// Returns the documentation text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the example.
    #[must_use]
    pub const fn example(&self) -> &Example {
        &self.example
    }

    /// Renders the field as `{"description": .., "example": ..}` for diagnostics.
    #[must_use]
    pub fn documented(&self) -> Value {
        json!({
            "description": self.description,
            "example": self.example.documented(),
        })
    }
}

/// Declares a field with a literal example.
#[must_use]
pub fn field(description: impl Into<String>, example: impl Into<Shape>) -> FieldSpec {
    FieldSpec::literal(description, example)
}

/// Declares a field checked by a predicate.
#[must_use]
pub fn field_with<F>(description: impl Into<String>, check: F) -> FieldSpec
where
    F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
{
    FieldSpec::predicate(description, check)
}

/// Declares a request header with a literal value.
#[must_use]
pub fn header(description: impl Into<String>, value: impl Into<String>) -> FieldSpec {
    FieldSpec::literal(description, value.into())
}

/// Declares a header checked by a predicate.
///
/// Predicate headers are documentation only; they are never sent.
#[must_use]
pub fn header_with<F>(description: impl Into<String>, check: F) -> FieldSpec
where
    F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
{
    FieldSpec::predicate(description, check)
}
