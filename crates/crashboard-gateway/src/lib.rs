//! crashboard gateway library entry.
//!
//! Wires credential loading, the reporting API client, the report builders,
//! and the HTTP surface. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod obs;
pub mod ops;
pub mod reporting;
pub mod reports;
pub mod router;
pub mod transport;
