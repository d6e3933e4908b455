//! Boundary Output
//!
//! Serializable per-tick reports and the run trace the CLI writes out.

pub mod report;

pub use report::{RunTrace, TickReport};
