//! Narrative Modifiers
//!
//! Choices resolved once into plain numbers for the engine. The per-tick
//! systems multiply and compare; they never inspect the choices themselves.

use serde::{Deserialize, Serialize};

use crate::state::{MercyChoice, StoryState, TruthChoice, METER_MAX};

/// Baseline pursuer re-path interval in seconds
pub const REPATH_BASE_SECS: f32 = 0.45;

/// Floor under the obsession-scaled re-path interval; the pursuer never
/// re-plans faster than this
pub const REPATH_FLOOR_SECS: f32 = 0.18;

/// Obsession level above which the pursuer gets a flat speed bonus
const OBSESSION_SPEED_THRESHOLD: i32 = 65;

/// Numeric signals the engine derives from a `StoryState` at level load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeModifiers {
    /// Multiplier on the pursuer's base speed
    pub pursuer_speed_mult: f32,
    /// Seconds between pursuer re-path queries
    pub repath_interval: f32,
}

impl NarrativeModifiers {
    /// Resolve a story state into engine-facing modifiers.
    ///
    /// A merciful answer slows the pursuer 8%, a denied truth quickens it 7%,
    /// and high obsession adds 5% on top. Obsession also shortens the
    /// re-path interval linearly toward the floor - an antagonist that has
    /// learned the player re-plans faster.
    pub fn from_state(state: &StoryState) -> Self {
        let mut speed = 1.0;
        if state.choices.mercy == Some(MercyChoice::Mercy) {
            speed *= 0.92;
        }
        if state.choices.truth == Some(TruthChoice::Deny) {
            speed *= 1.07;
        }
        if state.obsession > OBSESSION_SPEED_THRESHOLD {
            speed *= 1.05;
        }

        let t = (state.obsession as f32 / METER_MAX as f32).clamp(0.0, 1.0);
        let repath_interval =
            (REPATH_BASE_SECS - (REPATH_BASE_SECS - REPATH_FLOOR_SECS) * t).max(REPATH_FLOOR_SECS);

        Self {
            pursuer_speed_mult: speed,
            repath_interval,
        }
    }
}

impl Default for NarrativeModifiers {
    fn default() -> Self {
        Self::from_state(&StoryState::default())
    }
}
