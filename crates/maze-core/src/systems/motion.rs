//! Agent Motion Systems
//!
//! Wanderer goal selection, the shared re-path cadence, and the steering
//! integrator. Motion is cell-to-cell: agents walk toward the center of the
//! single next cell their last path query returned, so they never clip
//! corners even when the path is stale.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::agent::{Heading, MotionState, Position, Pursuer, WanderState, Wanderer};
use crate::components::world::{PlayerState, StorySignals, WorldClock};
use crate::config::SimConfig;
use crate::maze::{CellCoord, MazeGrid};
use crate::path::next_step;
use crate::tension::TensionState;
use crate::{collision::resolve_collision, SimRng};

/// Pick fresh random goal cells for wanderers whose retarget clock ran out.
///
/// The clock freezes while the player is inside the stare distance, so a
/// staring wanderer resumes its old errand when the player leaves.
pub fn retarget_wanderers(
    config: Res<SimConfig>,
    clock: Res<WorldClock>,
    grid: Res<MazeGrid>,
    player: Res<PlayerState>,
    mut rng: ResMut<SimRng>,
    mut wanderers: Query<(&Position, &mut MotionState, &mut WanderState), With<Wanderer>>,
) {
    for (position, mut motion, mut wander) in wanderers.iter_mut() {
        if position.distance_to(player.position) < config.motion.stare_distance {
            continue;
        }

        wander.retarget_timer -= clock.dt;
        if wander.retarget_timer > 0.0 {
            continue;
        }

        motion.goal = CellCoord::new(
            rng.0.gen_range(0..grid.width()),
            rng.0.gen_range(0..grid.height()),
        );
        wander.retarget_timer = rng.0.gen_range(
            config.motion.wander_retarget_min_secs..config.motion.wander_retarget_max_secs,
        );
    }
}

/// Re-query the next path step for every agent whose cadence timer expired.
///
/// The pursuer's goal is pinned to the player's current cell each query, and
/// its cadence comes from the narrative modifiers (obsession shortens it).
/// Wanderers keep their own goals and the flat cadence from config.
pub fn repath_agents(
    config: Res<SimConfig>,
    clock: Res<WorldClock>,
    grid: Res<MazeGrid>,
    player: Res<PlayerState>,
    signals: Res<StorySignals>,
    mut agents: Query<(&Position, &mut MotionState, Option<&Pursuer>)>,
) {
    let cell_size = config.world.cell_size;
    let player_cell = player.position.cell(&grid, cell_size);

    for (position, mut motion, pursuer) in agents.iter_mut() {
        motion.repath_timer -= clock.dt;
        if motion.repath_timer > 0.0 {
            continue;
        }

        if pursuer.is_some() {
            motion.goal = player_cell;
            motion.repath_timer = signals.modifiers.repath_interval;
        } else {
            motion.repath_timer = config.motion.wander_repath_secs;
        }

        let here = position.cell(&grid, cell_size);
        motion.step = next_step(&grid, here, motion.goal);
        tracing::debug!(?here, goal = ?motion.goal, step = ?motion.step, "re-pathed");
    }
}

/// Integrate positions toward each agent's step cell and resolve walls.
///
/// Wanderers inside the stare distance hold still and face the player. The
/// pursuer's speed compounds the narrative multiplier with a tension bonus
/// read from last tick's value, then everything is clamped to the floor.
pub fn move_agents(
    config: Res<SimConfig>,
    clock: Res<WorldClock>,
    grid: Res<MazeGrid>,
    player: Res<PlayerState>,
    signals: Res<StorySignals>,
    tension: Res<TensionState>,
    mut agents: Query<(
        &mut Position,
        &mut Heading,
        &MotionState,
        Option<&Pursuer>,
        Option<&Wanderer>,
    )>,
) {
    let cell_size = config.world.cell_size;

    for (mut position, mut heading, motion, pursuer, wanderer) in agents.iter_mut() {
        if wanderer.is_some()
            && position.distance_to(player.position) < config.motion.stare_distance
        {
            *heading = Heading::toward(*position, player.position);
            continue;
        }

        let mut speed = motion.base_speed;
        if pursuer.is_some() {
            speed *= signals.modifiers.pursuer_speed_mult;
            speed *= 1.0 + config.motion.tension_speed_gain * tension.value / 100.0;
        }
        speed = speed.max(config.motion.min_speed);

        let target = Position::at_cell_center(motion.step, cell_size);
        let distance = position.distance_to(target);
        if distance > f32::EPSILON {
            // Never overshoot the cell center; the walk terminates exactly
            let travel = (speed * clock.dt).min(distance);
            position.x += (target.x - position.x) / distance * travel;
            position.z += (target.z - position.z) / distance * travel;
        }

        if pursuer.is_some() {
            *heading = Heading::toward(*position, player.position);
        } else if distance > f32::EPSILON {
            *heading = Heading::toward(*position, target);
        }

        resolve_collision(position.as_mut(), &grid, cell_size, config.motion.agent_radius);
    }
}
