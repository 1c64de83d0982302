//! Top-level facade crate for crashboard.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use crashboard_core::*;
}

pub mod gateway {
    pub use crashboard_gateway::*;
}
