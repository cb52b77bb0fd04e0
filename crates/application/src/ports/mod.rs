//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and its collaborators.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod suite;
mod transport;

pub use suite::{CaseFn, CaseFuture, HookFn, SuiteBody, SuiteRegistry, case, hook};
pub use transport::{
    ServiceHandle, Transport, TransportError, TransportRequest, TransportResponse,
};
