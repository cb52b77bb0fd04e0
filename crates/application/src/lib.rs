//! Docspec Application - API test execution and declaration
//!
//! This crate turns declarations from the domain layer into executed requests:
//! the [`ApiTestBuilder`] assembles and sends a request through a [`Transport`] and
//! validates the response, while [`describe_api`] and [`it_doc`] register suites and
//! cases with a [`SuiteRegistry`].
//!
//! Ports define the collaborators; adapters live in the infrastructure crate.

pub mod describe_api;
pub mod error;
pub mod ports;
pub mod template;

pub use api_test::ApiTestBuilder;
pub use describe_api::{ApiCallback, ApiDeclaration, ApiDoc, describe_api, it_doc};
pub use error::{ApiTestError, ApiTestResult, ConfigError, DeclarationError, RequestLocation};
pub use ports::{
    CaseFn, CaseFuture, HookFn, ServiceHandle, SuiteBody, SuiteRegistry, Transport,
    TransportError, TransportRequest, TransportResponse, case, hook,
};
