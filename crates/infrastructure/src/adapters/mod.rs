//! Transport adapters
//!
//! Implementations of the `Transport` port: over the network with reqwest, or in
//! process against a tower service.

mod reqwest_transport;
mod tower_transport;

pub use reqwest_transport::ReqwestTransport;
pub use tower_transport::TowerTransport;
