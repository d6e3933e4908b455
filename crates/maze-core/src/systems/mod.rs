//! Per-Tick Systems
//!
//! The schedule runs these in a fixed chain: wanderers pick goals, agents
//! re-path, agents move, tension updates from the moved positions, capture
//! is checked last.

pub mod capture;
pub mod motion;
pub mod tension;

pub use capture::detect_capture;
pub use motion::{move_agents, repath_agents, retarget_wanderers};
pub use tension::update_tension;
