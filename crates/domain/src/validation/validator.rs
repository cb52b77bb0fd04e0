//! Recursive comparison of expected shapes against actual values.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::{ValidationError, ValidationPath};
use crate::field::{Example, FieldSpec};
use crate::shape::{Shape, plain_text};

/// Validates `actual` against `expected` starting at the root path.
///
/// Succeeds silently; the first mismatch found depth-first is returned.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(expected: &Shape, actual: &Value) -> Result<(), ValidationError> {
    validate_at(expected, Some(actual), &ValidationPath::root())
}

/// Validates a possibly absent `actual` value against `expected` at `path`.
///
/// `None` stands for a key missing from the enclosing object.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_at(
    expected: &Shape,
    actual: Option<&Value>,
    path: &ValidationPath,
) -> Result<(), ValidationError> {
    match expected {
        Shape::Field(field) => validate_field(field, actual, path),
        Shape::List(items) => validate_list(items, actual, path),
        Shape::Map(entries) => validate_map(entries, actual, path),
        Shape::Literal(value) => validate_literal(value, actual, path),
    }
}

fn validate_field(
    field: &FieldSpec,
    actual: Option<&Value>,
    path: &ValidationPath,
) -> Result<(), ValidationError> {
    match field.example() {
        Example::Predicate(predicate) => {
            debug!(path = %path, actual = %render(actual), "validating field with predicate");
            predicate
                .check(actual.unwrap_or(&Value::Null))
                .map_err(ValidationError::Predicate)
        }
        Example::Literal(shape) => validate_at(shape, actual, path),
    }
}

fn validate_list(
    expected: &[Shape],
    actual: Option<&Value>,
    path: &ValidationPath,
) -> Result<(), ValidationError> {
    let Some(Value::Array(actual_items)) = actual else {
        return Err(ValidationError::TypeMismatch {
            path: path.clone(),
            expected: "an array",
            actual: type_name(actual),
        });
    };

    if expected.len() != actual_items.len() {
        return Err(ValidationError::LengthMismatch {
            path: path.clone(),
            expected: expected.len(),
            actual: actual_items.len(),
        });
    }

    for (index, (expected_item, actual_item)) in expected.iter().zip(actual_items).enumerate() {
        validate_at(expected_item, Some(actual_item), &path.index(index))?;
    }
    Ok(())
}

fn validate_map(
    expected: &IndexMap<String, Shape>,
    actual: Option<&Value>,
    path: &ValidationPath,
) -> Result<(), ValidationError> {
    let Some(Value::Object(actual_entries)) = actual else {
        return Err(ValidationError::TypeMismatch {
            path: path.clone(),
            expected: "an object",
            actual: type_name(actual),
        });
    };

    // Keys present only in the actual object are never inspected.
    for (key, expected_value) in expected {
        validate_at(expected_value, actual_entries.get(key), &path.key(key))?;
    }
    Ok(())
}

fn validate_literal(
    expected: &Value,
    actual: Option<&Value>,
    path: &ValidationPath,
) -> Result<(), ValidationError> {
    if actual.is_some_and(|actual| strict_eq(expected, actual)) {
        return Ok(());
    }
    Err(ValidationError::ValueMismatch {
        path: path.clone(),
        expected: plain_text(expected),
        actual: render(actual),
    })
}

/// Same JSON type and same value. Numbers compare numerically so `1` equals `1.0`.
#[allow(clippy::float_cmp)]
fn strict_eq(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => {
            e == a || e.as_f64().zip(a.as_f64()).is_some_and(|(e, a)| e == a)
        }
        _ => expected == actual,
    }
}

fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), plain_text)
}

const fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
