//! crashboard core: request-scoped report types and the pure transforms that
//! turn reporting API rows into chart points and week-over-week entries.
//!
//! This crate carries no transport, runtime, or rendering dependencies so the
//! report math can be exercised without a server or a remote API.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed metric values surface as `CrashboardError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod report;
pub mod window;

/// Shared result type.
pub use error::{Result, CrashboardError};
pub use metric::MetricRow;
pub use window::{Granularity, TimeWindow};
