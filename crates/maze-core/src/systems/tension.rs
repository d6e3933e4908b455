//! Tension Update System
//!
//! Feeds the dread estimator each tick from the moved agent positions:
//! pursuer closeness through the smoothstep falloff, gaze alignment from the
//! player's look vector, and flat additive pressure from staring wanderers.

use bevy_ecs::prelude::*;

use crate::components::agent::{Position, Pursuer, Wanderer};
use crate::components::world::{PlayerState, WorldClock};
use crate::config::SimConfig;
use crate::tension::{smoothstep_falloff, TensionState, ThreatObservation};

pub fn update_tension(
    config: Res<SimConfig>,
    clock: Res<WorldClock>,
    player: Res<PlayerState>,
    mut tension: ResMut<TensionState>,
    pursuers: Query<&Position, With<Pursuer>>,
    wanderers: Query<&Position, (With<Wanderer>, Without<Pursuer>)>,
) {
    let cfg = &config.tension;

    let observation = match pursuers.iter().next() {
        Some(pursuer_pos) => {
            let distance = player.position.distance_to(*pursuer_pos);
            ThreatObservation {
                closeness: smoothstep_falloff(cfg.far_distance, cfg.near_distance, distance),
                // Looking away never relieves tension below zero
                gaze: player
                    .look
                    .alignment(player.position, *pursuer_pos)
                    .max(0.0),
            }
        }
        None => ThreatObservation::default(),
    };

    tension.update(observation, cfg, clock.dt);

    for wanderer_pos in wanderers.iter() {
        let distance = player.position.distance_to(*wanderer_pos);
        if distance < config.motion.stare_distance {
            let pressure =
                (config.motion.stare_distance - distance) * cfg.stare_pressure_gain * clock.dt;
            tension.add_pressure(pressure);
        }
    }
}
