//! Ending Classification
//!
//! Weighs the four answers plus the meters into one of three endings.
//! Prose for each ending lives with the presentation layer.

use serde::{Deserialize, Serialize};

use crate::state::{HungerChoice, MercyChoice, NameChoice, StoryState, TruthChoice};

/// The three possible endings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// Release: enough kind answers, meters kept low
    Clearing,
    /// Invitation: cruel answers and high meters
    Usher,
    /// The default: the gate opens onto the same gate
    Loop,
}

/// Minimum "kind answer" count for the Clearing ending
const CLEARING_MIN_SCORE: u32 = 3;
/// Maximum average meter darkness for the Clearing ending
const CLEARING_MAX_DARK: f32 = 55.0;
/// Maximum score that still allows the Usher ending
const USHER_MAX_SCORE: u32 = 1;
/// Minimum average meter darkness for the Usher ending
const USHER_MIN_DARK: f32 = 60.0;

/// Classify a finished playthrough.
pub fn compute_ending(state: &StoryState) -> Ending {
    let c = &state.choices;
    let score = (c.mercy == Some(MercyChoice::Mercy)) as u32
        + (c.truth == Some(TruthChoice::Confess)) as u32
        + (c.name == Some(NameChoice::Refuse)) as u32
        + (c.hunger == Some(HungerChoice::Feed)) as u32;

    let dark = (state.guilt + state.obsession) as f32 / 2.0;

    if score >= CLEARING_MIN_SCORE && dark < CLEARING_MAX_DARK {
        Ending::Clearing
    } else if score <= USHER_MAX_SCORE && dark > USHER_MIN_DARK {
        Ending::Usher
    } else {
        Ending::Loop
    }
}
