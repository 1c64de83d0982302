//! HTTP transport: report handlers and the error-to-response mapping.

pub mod error;
pub mod http;

pub use error::ApiError;
