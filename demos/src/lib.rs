//! Crowd simulation shared by the demo binaries.
//!
//! A random obstacle field is filled with walkers. Every tick, idle walkers
//! ask for a path to a random walkable cell, walkers with a path advance
//! one waypoint, and finished requests are drained from the service.

use std::rc::Rc;
use std::sync::Arc;

use navgrid_core::{GridConfig, GridError, NavGrid, WorldPos};
use navgrid_paths::{AgentNavigation, ConfigError, PathStatus, PathfindingConfig, PathfindingService};
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

/// Share of blocked cells in a generated field.
pub const OBSTACLE_DENSITY: f64 = 0.2;

/// A random obstacle field; the border row and column stay open so most of
/// the grid is connected.
pub fn obstacle_field(width: i32, height: i32, rng: &mut impl Rng) -> Result<NavGrid, GridError> {
    let blocked: Vec<bool> = (0..width * height)
        .map(|_| rng.random_bool(OBSTACLE_DENSITY))
        .collect();
    NavGrid::from_fn(GridConfig::with_size(width, height), |p| {
        let border = p.x == 0 || p.y == 0 || p.x == width - 1 || p.y == height - 1;
        border || !blocked[(p.y * width + p.x) as usize]
    })
}

struct Walker {
    nav: Rc<AgentNavigation>,
    pos: WorldPos,
    step: usize,
}

/// Running totals over a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrowdStats {
    pub ticks: usize,
    pub requested: usize,
    pub rejected: usize,
    pub delivered: usize,
    pub arrived: usize,
    pub errors: usize,
}

pub struct Crowd {
    service: PathfindingService<Rc<AgentNavigation>>,
    walkers: Vec<Walker>,
    rng: StdRng,
    stats: CrowdStats,
}

impl Crowd {
    /// `agents` walkers on `grid`, placed on random walkable cells.
    pub fn new(
        grid: Arc<NavGrid>,
        config: &PathfindingConfig,
        agents: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let walkers = (0..agents)
            .filter_map(|_| grid.random_walkable_cell(&mut rng).map(|c| c.position))
            .map(|pos| Walker {
                nav: AgentNavigation::new(),
                pos,
                step: 0,
            })
            .collect();
        let service = PathfindingService::new(grid, config)?;
        Ok(Self {
            service,
            walkers,
            rng,
            stats: CrowdStats::default(),
        })
    }

    pub fn stats(&self) -> CrowdStats {
        self.stats
    }

    pub fn in_flight(&self) -> usize {
        self.service.in_flight()
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        let grid = Arc::clone(self.service.grid());
        for w in &mut self.walkers {
            match w.nav.status() {
                PathStatus::Idle | PathStatus::Failed => {
                    let Some(target) = grid.random_walkable_cell(&mut self.rng) else {
                        continue;
                    };
                    w.step = 0;
                    if w.nav.request_path(&mut self.service, w.pos, target.position) {
                        self.stats.requested += 1;
                        // Blocking requests are answered inside the call.
                        if w.nav.status() != PathStatus::Requested {
                            self.stats.delivered += 1;
                        }
                    } else {
                        self.stats.rejected += 1;
                    }
                }
                PathStatus::Succeeded => {
                    let waypoints = w.nav.waypoints();
                    w.step += 1;
                    let next = waypoints.get(w.step).map(|c| c.position);
                    drop(waypoints);
                    match next {
                        Some(pos) => w.pos = pos,
                        None => {
                            self.stats.arrived += 1;
                            w.nav.clear_path();
                        }
                    }
                }
                PathStatus::Requested => {}
            }
        }

        match self.service.drain_completions() {
            Ok(n) => self.stats.delivered += n,
            Err(e) => {
                self.stats.errors += 1;
                log::error!("tick {}: {e}", self.stats.ticks);
            }
        }
    }

    /// Stop the service, dropping undelivered requests.
    pub fn shutdown(&mut self) {
        self.service.dispose();
    }
}
