//! Story State
//!
//! Branching-choice state for a run: four binary answers, the guilt and
//! obsession meters, and relic/note progress. Choices are applied through
//! `apply_choice`/`apply_npc_reply`, which return an explicit `ChoiceOutcome`
//! value instead of mutating anything beyond the meters - the caller decides
//! what to do with hints and tension nudges.

use serde::{Deserialize, Serialize};

/// Upper bound for the guilt and obsession meters
pub const METER_MAX: i32 = 100;

/// Answer to the mercy question ("do you let it come close?")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MercyChoice {
    Mercy,
    Strict,
}

/// Answer to the truth question ("do you confess what you were looking for?")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruthChoice {
    Confess,
    Deny,
}

/// Answer to the name question ("do you accept a new name?")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameChoice {
    Accept,
    Refuse,
}

/// Answer to the hunger question ("do you feed it?")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HungerChoice {
    Feed,
    Starve,
}

/// A fully-typed answer to one of the four branching questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    Mercy(MercyChoice),
    Truth(TruthChoice),
    Name(NameChoice),
    Hunger(HungerChoice),
}

/// Replies available when addressing a wanderer directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcReply {
    /// Ask for directions; costs guilt, grants a hint
    AskForHelp,
    /// Refuse the bargain; costs obsession
    BackAway,
    /// Listen to the counting-song; calms tension a little
    Listen,
    /// Interrupt it; spikes tension a little
    Interrupt,
}

/// Tension adjustment from the "calm"/"spike" wanderer replies, in points
/// on the 0-100 tension scale
const CALM_NUDGE: f32 = -7.0;
const SPIKE_NUDGE: f32 = 9.0;

/// Result of applying a choice, to be consumed by the caller.
///
/// Deltas are reported pre-clamp; the meters themselves are clamped to
/// [0, METER_MAX] inside `StoryState`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    pub guilt_delta: i32,
    pub obsession_delta: i32,
    /// Additive adjustment to the live tension value, in points
    pub tension_nudge: f32,
    /// Whether the reply earns a direction hint toward the relic
    pub grants_hint: bool,
}

impl ChoiceOutcome {
    fn meters(guilt_delta: i32, obsession_delta: i32) -> Self {
        Self {
            guilt_delta,
            obsession_delta,
            tension_nudge: 0.0,
            grants_hint: false,
        }
    }
}

/// The four recorded answers, unanswered until the run reaches them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choices {
    pub mercy: Option<MercyChoice>,
    pub truth: Option<TruthChoice>,
    pub name: Option<NameChoice>,
    pub hunger: Option<HungerChoice>,
}

/// Persistent narrative state for one playthrough
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryState {
    pub choices: Choices,
    /// Note ids already read this playthrough
    pub notes_read: Vec<String>,
    /// Relics recovered so far
    pub relics: u32,
    /// Guilt meter, 0..=METER_MAX
    pub guilt: i32,
    /// Obsession meter, 0..=METER_MAX
    pub obsession: i32,
}

impl StoryState {
    /// Fresh state for a new playthrough
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer and apply its consequences to the meters.
    ///
    /// Re-answering a question overwrites the previous answer and its
    /// consequences apply again.
    pub fn apply_choice(&mut self, choice: Choice) -> ChoiceOutcome {
        let outcome = match choice {
            Choice::Mercy(v) => {
                self.choices.mercy = Some(v);
                match v {
                    MercyChoice::Mercy => ChoiceOutcome::meters(-10, 10),
                    MercyChoice::Strict => ChoiceOutcome::meters(20, 0),
                }
            }
            Choice::Truth(v) => {
                self.choices.truth = Some(v);
                match v {
                    TruthChoice::Confess => ChoiceOutcome::meters(-5, 10),
                    TruthChoice::Deny => ChoiceOutcome::meters(25, 0),
                }
            }
            Choice::Name(v) => {
                self.choices.name = Some(v);
                match v {
                    NameChoice::Accept => ChoiceOutcome::meters(0, 25),
                    NameChoice::Refuse => ChoiceOutcome::meters(0, -5),
                }
            }
            Choice::Hunger(v) => {
                self.choices.hunger = Some(v);
                match v {
                    HungerChoice::Feed => ChoiceOutcome::meters(10, 0),
                    HungerChoice::Starve => ChoiceOutcome::meters(30, 0),
                }
            }
        };
        self.shift_meters(outcome.guilt_delta, outcome.obsession_delta);
        outcome
    }

    /// Apply a direct wanderer reply.
    pub fn apply_npc_reply(&mut self, reply: NpcReply) -> ChoiceOutcome {
        let outcome = match reply {
            NpcReply::AskForHelp => ChoiceOutcome {
                grants_hint: true,
                ..ChoiceOutcome::meters(10, 0)
            },
            NpcReply::BackAway => ChoiceOutcome::meters(0, 10),
            NpcReply::Listen => ChoiceOutcome {
                tension_nudge: CALM_NUDGE,
                ..ChoiceOutcome::meters(0, 0)
            },
            NpcReply::Interrupt => ChoiceOutcome {
                tension_nudge: SPIKE_NUDGE,
                ..ChoiceOutcome::meters(0, 0)
            },
        };
        self.shift_meters(outcome.guilt_delta, outcome.obsession_delta);
        outcome
    }

    /// Has this note already been read?
    pub fn note_already_read(&self, id: &str) -> bool {
        self.notes_read.iter().any(|n| n == id)
    }

    /// Record a note as read (idempotent)
    pub fn mark_note_read(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.note_already_read(&id) {
            self.notes_read.push(id);
        }
    }

    fn shift_meters(&mut self, guilt_delta: i32, obsession_delta: i32) {
        self.guilt = (self.guilt + guilt_delta).clamp(0, METER_MAX);
        self.obsession = (self.obsession + obsession_delta).clamp(0, METER_MAX);
    }

    /// Serialize to pretty JSON (persistence format is owned by the caller)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
