//! Narrative State Contracts
//!
//! Typed story state shared between the maze engine and whatever front end
//! persists and presents it. The engine never reads prose or branches on
//! strings; it consumes the numeric signals exposed here.

pub mod ending;
pub mod modifiers;
pub mod state;

pub use ending::{compute_ending, Ending};
pub use modifiers::NarrativeModifiers;
pub use state::{
    Choice, ChoiceOutcome, Choices, HungerChoice, MercyChoice, NameChoice, NpcReply, StoryState,
    TruthChoice, METER_MAX,
};
