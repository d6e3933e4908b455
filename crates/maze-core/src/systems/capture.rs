//! Capture Detection System
//!
//! Runs last in the chain so the distance it reports reflects this tick's
//! movement. Capture is latched into `TickEvents` for the host to read; the
//! core keeps simulating until the host tears the level down.

use bevy_ecs::prelude::*;

use crate::components::agent::{Position, Pursuer};
use crate::components::world::{PlayerState, TickEvents};
use crate::config::SimConfig;

pub fn detect_capture(
    config: Res<SimConfig>,
    player: Res<PlayerState>,
    mut events: ResMut<TickEvents>,
    pursuers: Query<&Position, With<Pursuer>>,
) {
    let Some(pursuer_pos) = pursuers.iter().next() else {
        events.pursuer_distance = f32::INFINITY;
        return;
    };

    let distance = player.position.distance_to(*pursuer_pos);
    events.pursuer_distance = distance;
    if distance < config.capture.distance {
        events.caught = true;
        tracing::info!(distance, "pursuer reached the player");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());
        world.insert_resource(PlayerState::default());
        world.insert_resource(TickEvents::default());
        world
    }

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(detect_capture);
        schedule.run(world);
    }

    #[test]
    fn test_capture_inside_threshold() {
        let mut world = setup_world();
        world.resource_mut::<PlayerState>().position = Position::new(2.0, 2.0);
        world.spawn((Pursuer, Position::new(2.0, 3.0)));

        run_once(&mut world);
        let events = world.resource::<TickEvents>();
        assert!(events.caught);
        assert!((events.pursuer_distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_capture_outside_threshold() {
        let mut world = setup_world();
        world.resource_mut::<PlayerState>().position = Position::new(0.0, 0.0);
        world.spawn((Pursuer, Position::new(0.0, 1.3)));

        run_once(&mut world);
        assert!(!world.resource::<TickEvents>().caught);
    }

    #[test]
    fn test_no_pursuer_reports_infinite_distance() {
        let mut world = setup_world();
        run_once(&mut world);
        let events = world.resource::<TickEvents>();
        assert!(!events.caught);
        assert!(events.pursuer_distance.is_infinite());
    }
}
