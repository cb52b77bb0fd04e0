//! Accumulated request configuration for an API test.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::field::FieldSpec;
use crate::response::HttpStatus;
use crate::shape::Shape;

/// Everything an API test declares about its request and the expected response.
///
/// Mutated only while a test is being configured; execution reads it.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Values substituted into `{name}` placeholders of the URL template.
    pub path_params: IndexMap<String, FieldSpec>,
    /// Query string parameters.
    pub query_params: IndexMap<String, FieldSpec>,
    /// Request body fields. `None` sends no body at all.
    pub request_body: Option<IndexMap<String, Shape>>,
    /// Request headers.
    pub request_headers: IndexMap<String, FieldSpec>,
    /// Status the response must carry. Required before execution.
    pub expected_status: Option<HttpStatus>,
    /// Expected response body. `None` requires an empty body.
    pub expected_response_body: Option<IndexMap<String, Shape>>,
    /// Log the full exchange. No effect on the outcome.
    pub pretty_print: bool,
}

impl RequestConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expected response body as a single map shape.
    #[must_use]
    pub fn expected_shape(&self) -> Option<Shape> {
        self.expected_response_body.clone().map(Shape::Map)
    }

    /// Renders the request side of the configuration for diagnostics.
    #[must_use]
    pub fn documented(&self) -> Value {
        json!({
            "pathParams": documented_fields(&self.path_params),
            "headers": documented_fields(&self.request_headers),
            "queryParams": documented_fields(&self.query_params),
            "requestBody": self.request_body.as_ref().map_or(Value::Null, documented_shapes),
        })
    }
}

fn documented_fields(fields: &IndexMap<String, FieldSpec>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, field)| (key.clone(), field.documented()))
            .collect::<Map<_, _>>(),
    )
}

fn documented_shapes(shapes: &IndexMap<String, Shape>) -> Value {
    Value::Object(
        shapes
            .iter()
            .map(|(key, shape)| (key.clone(), shape.documented()))
            .collect::<Map<_, _>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{field, header_with};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_empty() {
        let config = RequestConfig::new();
        assert!(config.path_params.is_empty());
        assert!(config.request_body.is_none());
        assert!(config.expected_status.is_none());
        assert!(!config.pretty_print);
    }

    #[test]
    fn test_documented_rendering() {
        let mut config = RequestConfig::new();
        config
            .request_headers
            .insert("X-Trace".to_string(), header_with("trace id", |_| Ok(())));
        config
            .request_body
            .get_or_insert_with(IndexMap::new)
            .insert("name".to_string(), field("name", "Ann").into());

        assert_eq!(
            config.documented(),
            json!({
                "pathParams": {},
                "headers": {"X-Trace": {"description": "trace id", "example": "<predicate>"}},
                "queryParams": {},
                "requestBody": {"name": {"description": "name", "example": "Ann"}},
            })
        );
    }

    #[test]
    fn test_expected_shape_wraps_map() {
        let mut config = RequestConfig::new();
        assert!(config.expected_shape().is_none());

        config.expected_response_body = Some(IndexMap::from([(
            "id".to_string(),
            Shape::from(field("id", 1)),
        )]));
        assert!(matches!(config.expected_shape(), Some(Shape::Map(m)) if m.len() == 1));
    }
}
