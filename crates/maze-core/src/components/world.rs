//! World Resources
//!
//! Shared per-level state: the player's per-tick inputs, the frame clock,
//! the placement layout, and the resolved narrative signals.

use bevy_ecs::prelude::*;
use story_state::{NarrativeModifiers, StoryState};

use crate::components::agent::{LookDir, Position};
use crate::maze::CellCoord;

/// Resource: the player's continuous state, pushed in by the host each tick.
/// The core never moves the player; it only reads.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerState {
    pub position: Position,
    /// Forward-look unit vector on the ground plane
    pub look: LookDir,
}

/// Resource: frame-stepped clock. `dt` is the bounded delta for the current
/// tick; systems read it instead of receiving a parameter.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WorldClock {
    pub tick: u64,
    /// Seconds since level load
    pub elapsed: f32,
    /// Bounded delta-time for the tick being processed
    pub dt: f32,
}

/// Resource: cells chosen at level build. Callers use these for world
/// building (gate, spawn points) and must not mutate the maze afterwards.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLayout {
    pub level: u32,
    /// Player start cell
    pub start: CellCoord,
    /// Exit gate cell: farthest from the start
    pub exit: CellCoord,
    /// Pursuer spawn cell: farthest from the exit
    pub pursuer_spawn: CellCoord,
}

/// Resource: narrative scalars resolved from the story state. Built at
/// level load and refreshed whenever the host folds a story change in;
/// per-tick systems read numbers here and never see the choices.
#[derive(Resource, Debug, Clone, Copy)]
pub struct StorySignals {
    /// Guilt meter as a float, 0..=100
    pub guilt: f32,
    /// Obsession meter as a float, 0..=100
    pub obsession: f32,
    pub modifiers: NarrativeModifiers,
}

impl StorySignals {
    pub fn from_story(story: &StoryState) -> Self {
        Self {
            guilt: story.guilt as f32,
            obsession: story.obsession as f32,
            modifiers: NarrativeModifiers::from_state(story),
        }
    }
}

impl Default for StorySignals {
    fn default() -> Self {
        Self::from_story(&StoryState::default())
    }
}

/// Resource: boundary signals produced during one tick, cleared before each
/// schedule run
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TickEvents {
    /// True when the pursuer closed below the capture threshold
    pub caught: bool,
    /// Pursuer-to-player distance measured this tick
    pub pursuer_distance: f32,
}

impl TickEvents {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Static description of one level: maze dimensions and pursuer base speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    pub width: usize,
    pub height: usize,
    pub pursuer_speed: f32,
    pub name: &'static str,
}

/// The four-level campaign table; levels past the end reuse the last entry
const LEVELS: [LevelSpec; 4] = [
    LevelSpec {
        width: 10,
        height: 10,
        pursuer_speed: 2.3,
        name: "The Polite Path",
    },
    LevelSpec {
        width: 12,
        height: 12,
        pursuer_speed: 2.7,
        name: "Trees That Watch",
    },
    LevelSpec {
        width: 14,
        height: 14,
        pursuer_speed: 3.1,
        name: "Bright Rain, Dark Work",
    },
    LevelSpec {
        width: 16,
        height: 16,
        pursuer_speed: 3.6,
        name: "The Gate Learns You",
    },
];

impl LevelSpec {
    /// Look up the spec for a 1-based level number
    pub fn for_level(level: u32) -> Self {
        let index = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
        LEVELS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table_lookup() {
        assert_eq!(LevelSpec::for_level(1).width, 10);
        assert_eq!(LevelSpec::for_level(4).width, 16);
        // Out-of-table levels clamp rather than panic
        assert_eq!(LevelSpec::for_level(0), LevelSpec::for_level(1));
        assert_eq!(LevelSpec::for_level(9), LevelSpec::for_level(4));
    }

    #[test]
    fn test_pursuer_speed_escalates() {
        for level in 1..4 {
            assert!(
                LevelSpec::for_level(level).pursuer_speed
                    < LevelSpec::for_level(level + 1).pursuer_speed
            );
        }
    }

    #[test]
    fn test_story_signals_resolve_once() {
        let mut story = StoryState::new();
        story.guilt = 40;
        story.obsession = 70;
        let signals = StorySignals::from_story(&story);
        assert_eq!(signals.guilt, 40.0);
        assert_eq!(signals.obsession, 70.0);
        // Obsession above threshold shows up in the resolved multiplier
        assert!(signals.modifiers.pursuer_speed_mult > 1.0);
    }
}
