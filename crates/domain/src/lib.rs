//! Docspec Domain - Core declaration types
//!
//! This crate defines what an API test declares: documented fields, expected response
//! shapes, request configuration, and the structural validator that checks an actual
//! response body against an expected shape.
//! All types here are pure Rust with no I/O dependencies.

pub mod api_doc;
pub mod error;
pub mod field;
pub mod request;
pub mod response;
pub mod settings;
pub mod shape;
pub mod validation;

pub use api_doc::ApiDocOptions;
pub use error::{DomainError, DomainResult};
pub use field::{Example, FieldSpec, Predicate, field, field_with, header, header_with};
pub use request::{HttpMethod, RequestConfig};
pub use response::HttpStatus;
pub use settings::RunnerSettings;
pub use shape::{Shape, plain_text};
pub use validation::{ValidationError, ValidationPath, validate, validate_at};
