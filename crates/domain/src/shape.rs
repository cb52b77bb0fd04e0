//! Expected shapes.
//!
//! A [`Shape`] is the tree a response is compared against: literals, documented fields,
//! ordered lists and keyed maps, nested arbitrarily. The same tree also carries the example
//! values used to build outgoing requests.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::field::{Example, FieldSpec};

/// A possibly nested description of an expected value.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A primitive compared by strict equality.
    Literal(Value),
    /// A documented field holding a literal or a predicate.
    Field(FieldSpec),
    /// An ordered sequence; comparison is length and order sensitive.
    List(Vec<Shape>),
    /// A keyed mapping; only the keys listed here are compared.
    Map(IndexMap<String, Shape>),
}

impl Shape {
    /// Builds a map shape from key/shape pairs, keeping insertion order.
    #[must_use]
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a list shape.
    #[must_use]
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Resolves the shape to a plain JSON value by unwrapping every field to its literal
    /// example.
    ///
    /// Returns `None` when a predicate appears anywhere in the tree, since a predicate has
    /// no concrete value.
    #[must_use]
    pub fn example_value(&self) -> Option<Value> {
        match self {
            Self::Literal(value) => Some(value.clone()),
            Self::Field(field) => match field.example() {
                Example::Literal(shape) => shape.example_value(),
                Example::Predicate(_) => None,
            },
            Self::List(items) => items
                .iter()
                .map(Self::example_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Self::Map(entries) => entries
                .iter()
                .map(|(key, shape)| shape.example_value().map(|value| (key.clone(), value)))
                .collect::<Option<Map<_, _>>>()
                .map(Value::Object),
        }
    }

    /// Renders the shape for diagnostics, keeping field descriptions.
    #[must_use]
    pub fn documented(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Field(field) => field.documented(),
            Self::List(items) => Value::Array(items.iter().map(Self::documented).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, shape)| (key.clone(), shape.documented()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            primitive => Self::Literal(primitive),
        }
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(value: $ty) -> Self {
                    Self::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(&str, String, bool, i32, i64, u16, u32, u64, f64);

impl From<FieldSpec> for Shape {
    fn from(field: FieldSpec) -> Self {
        Self::Field(field)
    }
}

impl From<Vec<Self>> for Shape {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<IndexMap<String, Self>> for Shape {
    fn from(entries: IndexMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}

/// Renders a JSON value the way it reads in messages and URLs: strings without quotes,
/// everything else as compact JSON.
#[must_use]
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{field, field_with};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_json_builds_nested_shapes() {
        let shape = Shape::from(json!({"a": [1, {"b": "x"}], "c": null}));
        let Shape::Map(entries) = &shape else {
            unreachable!("object converts to a map");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(matches!(entries["a"], Shape::List(ref items) if items.len() == 2));
        assert!(matches!(entries["c"], Shape::Literal(Value::Null)));
    }

    #[test]
    fn test_example_value_unwraps_fields() {
        let shape = Shape::object([
            ("name", Shape::from(field("name", "Ann"))),
            (
                "tags",
                Shape::array([field("tag", "admin"), field("tag", "ops")]),
            ),
            (
                "address",
                field("address", Shape::object([("city", field("city", "Oslo"))])).into(),
            ),
        ]);

        assert_eq!(
            shape.example_value(),
            Some(json!({
                "name": "Ann",
                "tags": ["admin", "ops"],
                "address": {"city": "Oslo"}
            }))
        );
    }

    #[test]
    fn test_example_value_rejects_nested_predicate() {
        let shape = Shape::object([(
            "items",
            Shape::array([field_with("id", |_| Ok(()))]),
        )]);
        assert_eq!(shape.example_value(), None);
    }

    #[test]
    fn test_documented_keeps_descriptions() {
        let shape = Shape::object([("id", field("user id", 7))]);
        assert_eq!(
            shape.documented(),
            json!({"id": {"description": "user id", "example": 7}})
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text(&json!("Ann")), "Ann");
        assert_eq!(plain_text(&json!(42)), "42");
        assert_eq!(plain_text(&json!(true)), "true");
        assert_eq!(plain_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
