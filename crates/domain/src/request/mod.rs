//! HTTP request declaration types

mod config;
mod method;

pub use config::RequestConfig;
pub use method::HttpMethod;
