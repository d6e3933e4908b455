//! Maze Pursuit Simulation Runner
//!
//! Headless harness for tuning sessions: builds a level from a story
//! history, holds the player at the start cell, and steps the simulation a
//! fixed number of ticks while sampling reports into a trace file.

use clap::Parser;
use story_state::StoryState;
use tracing_subscriber::EnvFilter;

use maze_core::{LookDir, PlayerUpdate, Position, RunTrace, SimConfig, Simulation};

/// Command line arguments for the simulation runner
#[derive(Parser, Debug)]
#[command(name = "maze_sim")]
#[command(about = "Headless maze pursuit simulation")]
struct Args {
    /// Level to build, 1-based
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Starting guilt meter, 0-100
    #[arg(long, default_value_t = 0)]
    guilt: i32,

    /// Starting obsession meter, 0-100
    #[arg(long, default_value_t = 0)]
    obsession: i32,

    /// Record every Nth tick into the trace; must be at least 1
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    sample_interval: u64,

    /// Tuning file path
    #[arg(long, default_value = maze_core::DEFAULT_TUNING_PATH)]
    tuning: String,

    /// Where to write the run trace, if anywhere
    #[arg(long)]
    trace: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut story = StoryState::new();
    story.guilt = args.guilt.clamp(0, story_state::METER_MAX);
    story.obsession = args.obsession.clamp(0, story_state::METER_MAX);

    let config = match SimConfig::load(&args.tuning) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("could not load {}: {}; using defaults", args.tuning, e);
            SimConfig::default()
        }
    };
    let cell_size = config.world.cell_size;

    let seed = maze_core::level_seed(args.level, &story);
    let mut sim = match Simulation::new(args.level, &story, config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Could not build level {}: {}", args.level, e);
            std::process::exit(1);
        }
    };
    let layout = sim.layout();

    println!("Maze Pursuit Simulation");
    println!("=======================");
    println!("Level: {} (seed {})", args.level, seed);
    println!("Start: ({}, {})", layout.start.x, layout.start.y);
    println!("Exit: ({}, {})", layout.exit.x, layout.exit.y);
    println!(
        "Pursuer spawn: ({}, {})",
        layout.pursuer_spawn.x, layout.pursuer_spawn.y
    );
    println!();

    let update = PlayerUpdate {
        position: Position::at_cell_center(layout.start, cell_size),
        look: LookDir::default(),
        dt: 0.016,
    };

    let mut trace = RunTrace::new(args.level, seed);
    let mut final_report = None;

    for tick in 0..args.ticks {
        let report = sim.step(update);

        if tick % args.sample_interval == 0 {
            trace.push(report);
        }
        if report.caught {
            trace.push(report);
            println!(
                "Caught at tick {} ({:.1}s), tension {:.1}",
                report.tick, report.elapsed, report.tension
            );
            final_report = Some(report);
            break;
        }
        final_report = Some(report);
    }

    if let Some(report) = final_report {
        println!();
        println!(
            "Ran {} ticks. Tension {:.1}, pursuer distance {:.2}.",
            report.tick, report.tension, report.pursuer_distance
        );
        println!("Peak tension over the run: {:.1}", trace.peak_tension());
    }

    if let Some(path) = &args.trace {
        match trace.write_json(path) {
            Ok(()) => println!("Wrote trace to {}", path),
            Err(e) => eprintln!("Warning: could not write trace: {}", e),
        }
    }
}
