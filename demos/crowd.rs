//! Headless crowd simulation.
//!
//! Run: cargo run --bin crowd -- [config.toml] [ticks]
//! Set RUST_LOG=debug to watch the requesters work.

use std::sync::Arc;

use navgrid_demos::{Crowd, obstacle_field};
use navgrid_paths::PathfindingConfig;
use rand::SeedableRng;

const WIDTH: i32 = 96;
const HEIGHT: i32 = 64;
const AGENTS: usize = 500;
const DEFAULT_TICKS: usize = 200;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| PathfindingConfig::from_toml_str(&s).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {path}: {e}");
                std::process::exit(1);
            }
        },
        None => PathfindingConfig::default(),
    };
    let ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let grid = match obstacle_field(WIDTH, HEIGHT, &mut rng) {
        Ok(grid) => Arc::new(grid),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "{}x{} field, {} walkable cells, {:?} strategy",
        WIDTH,
        HEIGHT,
        grid.walkable_count(),
        config.strategy
    );

    let mut crowd = match Crowd::new(grid, &config, AGENTS, 7) {
        Ok(crowd) => crowd,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let started = std::time::Instant::now();
    for _ in 0..ticks {
        crowd.tick();
    }
    crowd.shutdown();
    let elapsed = started.elapsed();

    let stats = crowd.stats();
    println!(
        "{} ticks in {:.2?}: {} requested, {} delivered, {} arrived, {} rejected, {} errors",
        stats.ticks, elapsed, stats.requested, stats.delivered, stats.arrived, stats.rejected, stats.errors
    );
}
