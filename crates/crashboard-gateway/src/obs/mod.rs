//! In-process counters rendered by `/metrics` (Prometheus text format).

pub mod metrics;
