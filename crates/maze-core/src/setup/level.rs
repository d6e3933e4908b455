//! Level Builder
//!
//! Everything about a level derives from one seed, and the seed derives from
//! the level number plus the story meters. Replaying a level after different
//! choices rebuilds a different maze; replaying with the same choices
//! rebuilds the identical one.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use story_state::StoryState;
use tracing::info;

use crate::components::agent::{Heading, MotionState, Position, Pursuer, WanderState, Wanderer};
use crate::components::world::{
    LevelLayout, LevelSpec, PlayerState, StorySignals, TickEvents, WorldClock,
};
use crate::config::SimConfig;
use crate::maze::{CellCoord, MazeError, MazeGrid};
use crate::tension::TensionState;
use crate::SimRng;

/// Wanderer speed parameters (base + random spread + per-level ramp)
const WANDERER_SPEED_BASE: f32 = 1.3;
const WANDERER_SPEED_SPREAD: f32 = 0.6;
const WANDERER_SPEED_PER_LEVEL: f32 = 0.06;

/// Cap on extra wanderers granted by level depth
const WANDERER_LEVEL_CAP: u32 = 3;

/// The deterministic seed for a level: the level number and the story meters
/// are the only inputs, so identical histories replay identical mazes
pub fn level_seed(level: u32, story: &StoryState) -> u64 {
    1000 + level as u64 * 999 + story.guilt as u64 * 7 + story.obsession as u64 * 11
}

/// Build one level into `world`: generate the maze, choose the layout cells,
/// insert every resource, and spawn the pursuer and wanderers.
pub fn build_level(
    world: &mut World,
    level: u32,
    story: &StoryState,
    config: SimConfig,
) -> Result<LevelLayout, MazeError> {
    let spec = LevelSpec::for_level(level);
    let seed = level_seed(level, story);
    let mut rng = SmallRng::seed_from_u64(seed);

    let grid = MazeGrid::generate(spec.width, spec.height, &mut rng)?;

    let start = CellCoord::new(0, 0);
    let (exit, exit_depth) = grid.farthest_from(start.x, start.y)?;
    let (pursuer_spawn, _) = grid.farthest_from(exit.x, exit.y)?;

    let layout = LevelLayout {
        level,
        start,
        exit,
        pursuer_spawn,
    };

    info!(
        level,
        name = spec.name,
        width = spec.width,
        height = spec.height,
        seed,
        ?exit,
        exit_depth,
        ?pursuer_spawn,
        "built level"
    );

    let cell_size = config.world.cell_size;

    world.insert_resource(PlayerState {
        position: Position::at_cell_center(start, cell_size),
        ..Default::default()
    });
    world.insert_resource(WorldClock::default());
    world.insert_resource(TickEvents::default());

    let signals = StorySignals::from_story(story);
    world.insert_resource(TensionState::with_baseline(
        signals.guilt,
        signals.obsession,
        &config.tension,
    ));
    world.insert_resource(signals);
    world.insert_resource(layout);

    world.spawn((
        Pursuer,
        Position::at_cell_center(pursuer_spawn, cell_size),
        Heading::default(),
        MotionState::new(pursuer_spawn, spec.pursuer_speed),
    ));

    let wanderer_count = 1 + level.min(WANDERER_LEVEL_CAP);
    for _ in 0..wanderer_count {
        let cell = CellCoord::new(
            rng.gen_range(0..spec.width),
            rng.gen_range(0..spec.height),
        );
        let speed = WANDERER_SPEED_BASE
            + rng.gen_range(0.0..WANDERER_SPEED_SPREAD)
            + level as f32 * WANDERER_SPEED_PER_LEVEL;
        let retarget = rng.gen_range(
            config.motion.wander_retarget_min_secs..config.motion.wander_retarget_max_secs,
        );
        world.spawn((
            Wanderer,
            Position::at_cell_center(cell, cell_size),
            Heading::default(),
            MotionState::new(cell, speed),
            WanderState {
                retarget_timer: retarget,
            },
        ));
    }

    // Agents share the level rng from here on, so wanderer goal picks stay
    // on the same deterministic stream
    world.insert_resource(SimRng(rng));
    world.insert_resource(grid);
    world.insert_resource(config);

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::path_distance;
    use story_state::{Choice, MercyChoice};

    #[test]
    fn test_seed_depends_on_level_and_meters() {
        let mut story = StoryState::new();
        let base = level_seed(1, &story);
        assert_eq!(base, 1999);

        assert_ne!(level_seed(2, &story), base);
        story.guilt = 10;
        assert_ne!(level_seed(1, &story), base);
    }

    #[test]
    fn test_same_history_builds_identical_layout() {
        let mut story = StoryState::new();
        story.apply_choice(Choice::Mercy(MercyChoice::Strict));

        let mut a = World::new();
        let mut b = World::new();
        let layout_a = build_level(&mut a, 2, &story, SimConfig::default()).unwrap();
        let layout_b = build_level(&mut b, 2, &story, SimConfig::default()).unwrap();
        assert_eq!(layout_a, layout_b);

        let grid_a = a.resource::<MazeGrid>();
        let grid_b = b.resource::<MazeGrid>();
        for y in 0..grid_a.height() {
            for x in 0..grid_a.width() {
                assert_eq!(grid_a.cell(x, y).unwrap(), grid_b.cell(x, y).unwrap());
            }
        }
    }

    #[test]
    fn test_different_meters_build_different_mazes() {
        let calm = StoryState::new();
        let mut guilty = StoryState::new();
        guilty.guilt = 60;

        let mut a = World::new();
        let mut b = World::new();
        build_level(&mut a, 1, &calm, SimConfig::default()).unwrap();
        build_level(&mut b, 1, &guilty, SimConfig::default()).unwrap();

        let grid_a = a.resource::<MazeGrid>();
        let grid_b = b.resource::<MazeGrid>();
        let differs = (0..grid_a.height()).any(|y| {
            (0..grid_a.width()).any(|x| grid_a.cell(x, y).unwrap() != grid_b.cell(x, y).unwrap())
        });
        assert!(differs, "guilt shifts the seed, so walls should differ");
    }

    #[test]
    fn test_layout_cells_are_spread_apart() {
        let story = StoryState::new();
        let mut world = World::new();
        let layout = build_level(&mut world, 1, &story, SimConfig::default()).unwrap();

        assert_ne!(layout.exit, layout.start);
        assert_ne!(layout.pursuer_spawn, layout.exit);

        // The exit is the eccentricity of the start; nothing is farther
        let grid = world.resource::<MazeGrid>();
        let exit_dist = path_distance(grid, layout.start, layout.exit).unwrap();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let d = path_distance(grid, layout.start, CellCoord::new(x, y)).unwrap();
                assert!(d <= exit_dist);
            }
        }
    }

    #[test]
    fn test_agent_census_scales_with_level() {
        let story = StoryState::new();

        // Count is 1 + min(3, level), so it plateaus at four
        for (level, expected_wanderers) in [(1u32, 2usize), (2, 3), (3, 4), (4, 4), (9, 4)] {
            let mut world = World::new();
            build_level(&mut world, level, &story, SimConfig::default()).unwrap();

            let mut pursuer_query = world.query_filtered::<Entity, With<Pursuer>>();
            assert_eq!(pursuer_query.iter(&world).count(), 1);

            let mut wanderer_query = world.query_filtered::<Entity, With<Wanderer>>();
            assert_eq!(
                wanderer_query.iter(&world).count(),
                expected_wanderers,
                "level {level}"
            );
        }
    }

    #[test]
    fn test_player_starts_at_start_cell_center() {
        let story = StoryState::new();
        let mut world = World::new();
        let layout = build_level(&mut world, 1, &story, SimConfig::default()).unwrap();

        let config = world.resource::<SimConfig>().clone();
        let player = world.resource::<PlayerState>();
        assert_eq!(
            player.position,
            Position::at_cell_center(layout.start, config.world.cell_size)
        );
    }
}
