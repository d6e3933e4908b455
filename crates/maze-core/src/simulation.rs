//! Simulation Facade
//!
//! One value owns the whole level: the ECS world plus the fixed system
//! schedule. The host pushes player state in through `step` and reads the
//! tick report back; nothing else crosses the boundary per tick.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use story_state::{ChoiceOutcome, StoryState};

use crate::components::agent::{Position, Pursuer};
use crate::components::world::{LevelLayout, PlayerState, StorySignals, TickEvents, WorldClock};
use crate::components::LookDir;
use crate::config::SimConfig;
use crate::maze::{MazeError, MazeGrid};
use crate::output::TickReport;
use crate::setup::build_level;
use crate::systems::{detect_capture, move_agents, repath_agents, retarget_wanderers, update_tension};
use crate::tension::TensionState;

/// The host's per-tick input: where the player is, where they look, and how
/// much wall-clock time passed
#[derive(Debug, Clone, Copy)]
pub struct PlayerUpdate {
    pub position: Position,
    pub look: LookDir,
    /// Raw frame delta, seconds; clamped to the configured ceiling
    pub dt: f32,
}

/// A running level: world state plus the system chain that advances it
pub struct Simulation {
    world: World,
    schedule: Schedule,
    layout: LevelLayout,
}

impl Simulation {
    /// Build a level from the story so far and stand the schedule up
    pub fn new(level: u32, story: &StoryState, config: SimConfig) -> Result<Self, MazeError> {
        let mut world = World::new();
        let layout = build_level(&mut world, level, story, config)?;

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                retarget_wanderers,
                repath_agents,
                move_agents,
                update_tension,
                detect_capture,
            )
                .chain(),
        );

        Ok(Self {
            world,
            schedule,
            layout,
        })
    }

    /// Advance the level by one tick and report what the host must react to
    pub fn step(&mut self, update: PlayerUpdate) -> TickReport {
        let max_dt = self.world.resource::<SimConfig>().world.max_tick_dt;
        let dt = update.dt.clamp(0.0, max_dt);

        {
            let mut clock = self.world.resource_mut::<WorldClock>();
            clock.tick += 1;
            clock.elapsed += dt;
            clock.dt = dt;
        }
        {
            let mut player = self.world.resource_mut::<PlayerState>();
            player.position = update.position;
            player.look = update.look.normalized();
        }
        self.world.resource_mut::<TickEvents>().clear();

        self.schedule.run(&mut self.world);

        let clock = *self.world.resource::<WorldClock>();
        let events = *self.world.resource::<TickEvents>();
        let tension = *self.world.resource::<TensionState>();

        TickReport {
            tick: clock.tick,
            elapsed: clock.elapsed,
            tension: tension.value,
            pursuer_distance: events.pursuer_distance,
            caught: events.caught,
        }
    }

    /// Fold a mid-level story change into the running level: re-resolve the
    /// narrative signals (speed multiplier, re-path cadence), move the
    /// tension floor to the new meters, and apply the choice's one-shot
    /// nudge. The host calls this right after mutating its `StoryState`.
    pub fn apply_story_outcome(&mut self, story: &StoryState, outcome: ChoiceOutcome) {
        let signals = StorySignals::from_story(story);
        let tension_cfg = self.world.resource::<SimConfig>().tension.clone();
        {
            let mut tension = self.world.resource_mut::<TensionState>();
            tension.rebase(signals.guilt, signals.obsession, &tension_cfg);
            if outcome.tension_nudge != 0.0 {
                tension.nudge(outcome.tension_nudge);
            }
        }
        self.world.insert_resource(signals);
    }

    /// Cells chosen at build time (start, exit, pursuer spawn)
    pub fn layout(&self) -> LevelLayout {
        self.layout
    }

    /// The immutable maze for this level
    pub fn maze(&self) -> &MazeGrid {
        self.world.resource::<MazeGrid>()
    }

    /// Current smoothed tension, 0..=100
    pub fn tension(&self) -> f32 {
        self.world.resource::<TensionState>().value
    }

    /// The pursuer's continuous position, for host-side rendering
    pub fn pursuer_position(&mut self) -> Option<Position> {
        let mut query = self
            .world
            .query_filtered::<&Position, With<Pursuer>>();
        query.iter(&self.world).next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_state::NpcReply;

    fn stationary_update(sim: &mut Simulation) -> PlayerUpdate {
        let cell_size = 3.2;
        PlayerUpdate {
            position: Position::at_cell_center(sim.layout().start, cell_size),
            look: LookDir::default(),
            dt: 0.016,
        }
    }

    #[test]
    fn test_step_advances_clock_and_reports() {
        let story = StoryState::new();
        let mut sim = Simulation::new(1, &story, SimConfig::default()).unwrap();

        let update = stationary_update(&mut sim);
        let first = sim.step(update);
        let second = sim.step(update);

        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert!(second.elapsed > first.elapsed);
        assert!(first.pursuer_distance.is_finite());
    }

    #[test]
    fn test_dt_is_clamped() {
        let story = StoryState::new();
        let mut sim = Simulation::new(1, &story, SimConfig::default()).unwrap();

        let mut update = stationary_update(&mut sim);
        update.dt = 5.0;
        let report = sim.step(update);
        // A five second stall advances the clock by at most the ceiling
        assert!(report.elapsed <= 0.033 + 1e-6);
    }

    #[test]
    fn test_story_nudge_moves_tension() {
        let mut story = StoryState::new();
        let mut sim = Simulation::new(1, &story, SimConfig::default()).unwrap();

        let outcome = story.apply_npc_reply(NpcReply::Interrupt);
        let before = sim.tension();
        sim.apply_story_outcome(&story, outcome);
        assert!(sim.tension() > before);
    }

    #[test]
    fn test_midlevel_choice_raises_the_tension_floor() {
        use story_state::{Choice, TruthChoice};

        // Park the player far from every agent so closeness and stare
        // pressure stay zero and only the narrative floor acts
        let far_player = PlayerUpdate {
            position: Position::new(1000.0, 1000.0),
            look: LookDir::default(),
            dt: 0.016,
        };

        let mut story = StoryState::new();
        let mut treated = Simulation::new(1, &story, SimConfig::default()).unwrap();
        let mut control = Simulation::new(1, &story, SimConfig::default()).unwrap();

        let outcome = story.apply_choice(Choice::Truth(TruthChoice::Deny));
        treated.apply_story_outcome(&story, outcome);

        let mut treated_last = 0.0;
        let mut control_last = 0.0;
        for _ in 0..300 {
            treated_last = treated.step(far_player).tension;
            control_last = control.step(far_player).tension;
        }

        // Deny lifts guilt to 25, a tension floor of 6.25 points
        assert!(control_last < 1.0);
        assert!(treated_last > 5.0);
    }

    #[test]
    fn test_pursuer_position_is_exposed() {
        let story = StoryState::new();
        let mut sim = Simulation::new(1, &story, SimConfig::default()).unwrap();
        let layout = sim.layout();
        let pos = sim.pursuer_position().expect("pursuer spawned");
        assert_eq!(pos, Position::at_cell_center(layout.pursuer_spawn, 3.2));
    }
}
