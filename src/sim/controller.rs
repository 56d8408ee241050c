//! Simulation lifecycle
//!
//! One `Simulation` is one month's run, owned from creation to teardown:
//!
//! ```text
//! Idle --seed--> Seeded --start--> Running --teardown--> TornDown
//! ```
//!
//! Stepping is driven from outside, one `step()` per frame. Each step is
//! atomic from an observer's point of view: the world advances, the body
//! count is taken (before culling, so a ball leaving this frame is still
//! counted once), escaped balls are culled, the runner's rate is sampled,
//! and only then do observers hear about it.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Material;
use super::world::World;
use crate::config::SimConfig;
use crate::consts::STEP_DT;
use crate::error::{Error, Result};
use crate::scene::SceneGeometry;

/// Lifecycle phase of one simulation instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Created, world empty
    Idle,
    /// Statics in place, not stepping yet
    Seeded,
    /// Live; step() advances the world
    Running,
    /// Terminal; only good for dropping
    TornDown,
}

/// Per-step snapshot published to observers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Total bodies in the world, barriers and balls alike, counted
    /// before the step's cull
    pub bodies: usize,
    /// Absolute step rate reported by the runner (steps/sec)
    pub step_rate: f32,
}

/// The external stepping facility.
///
/// The crate never owns a clock; whoever embeds it does. A runner is
/// handed over at start(), stopped at teardown, and asked once per step
/// for its instantaneous rate.
pub trait StepRunner {
    fn start(&mut self);
    fn stop(&mut self);
    /// Instantaneous steps/sec. May come back negative while the runner
    /// corrects its timing window; the controller reports the magnitude.
    fn rate(&self) -> f32;
}

/// Synchronous per-step observer
pub trait StepObserver {
    fn on_step(&mut self, metrics: StepMetrics);
}

/// Any FnMut closure works as an observer
impl<F: FnMut(StepMetrics)> StepObserver for F {
    fn on_step(&mut self, metrics: StepMetrics) {
        self(metrics)
    }
}

/// One month's simulation run
pub struct Simulation {
    phase: SimPhase,
    world: World,
    runner: Option<Box<dyn StepRunner>>,
    observers: Vec<Box<dyn StepObserver>>,
    metrics: StepMetrics,
    rng: Pcg32,
    ball_radius: f32,
    ball_material: Material,
}

impl Simulation {
    /// A fresh instance in `Idle` with an empty world
    pub fn create(cfg: &SimConfig, seed: u64) -> Self {
        Self {
            phase: SimPhase::Idle,
            world: World::new(cfg.width, cfg.height).with_gravity(cfg.gravity_y),
            runner: None,
            observers: Vec::new(),
            metrics: StepMetrics::default(),
            rng: Pcg32::seed_from_u64(seed),
            ball_radius: cfg.ball_radius,
            ball_material: cfg.ball,
        }
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The latest published metrics (zeroed until the first step)
    pub fn metrics(&self) -> StepMetrics {
        self.metrics
    }

    /// Register an observer; all of them hear every subsequent step
    pub fn observe(&mut self, observer: Box<dyn StepObserver>) {
        self.observers.push(observer);
    }

    /// Install the static barriers. Allowed exactly once, from `Idle`.
    pub fn seed(&mut self, scene: &SceneGeometry) -> Result<()> {
        if self.phase != SimPhase::Idle {
            return Err(Error::PhaseViolation {
                op: "seed",
                phase: self.phase,
            });
        }
        for barrier in scene.iter() {
            self.world.add_barrier(barrier);
        }
        self.phase = SimPhase::Seeded;
        log::debug!("seeded world with {} barriers", scene.len());
        Ok(())
    }

    /// Hand over the runner and go live
    pub fn start(&mut self, mut runner: Box<dyn StepRunner>) -> Result<()> {
        if self.phase != SimPhase::Seeded {
            return Err(Error::PhaseViolation {
                op: "start",
                phase: self.phase,
            });
        }
        runner.start();
        self.runner = Some(runner);
        self.phase = SimPhase::Running;
        log::info!("simulation running");
        Ok(())
    }

    /// Drop `count` balls at random integer x positions across
    /// [0, region_width], at height * height_fraction. Returns how many
    /// were spawned.
    pub fn spawn(&mut self, count: i64, region_width: f32, height_fraction: f32) -> Result<usize> {
        if count < 0 {
            return Err(Error::InvalidSpawnCount { count });
        }
        if !matches!(self.phase, SimPhase::Seeded | SimPhase::Running) {
            return Err(Error::PhaseViolation {
                op: "spawn",
                phase: self.phase,
            });
        }
        let y = self.world.height() * height_fraction;
        let max_x = region_width.max(0.0) as u32;
        for _ in 0..count {
            let x = self.rng.random_range(0..=max_x) as f32;
            self.world
                .add_ball(Vec2::new(x, y), self.ball_radius, self.ball_material);
        }
        log::debug!("spawned {count} balls across [0, {max_x}]");
        Ok(count as usize)
    }

    /// One step: advance, count, cull, sample the rate, notify.
    /// Returns the published metrics, or None outside `Running`.
    pub fn step(&mut self) -> Option<StepMetrics> {
        if self.phase != SimPhase::Running {
            return None;
        }
        self.world.step(STEP_DT);

        let bodies = self.world.body_count();
        let culled = self.world.cull_out_of_bounds();
        if culled > 0 {
            log::debug!("culled {culled} escaped balls");
        }
        let rate = self.runner.as_ref().map(|r| r.rate()).unwrap_or(0.0);
        self.metrics = StepMetrics {
            bodies,
            step_rate: rate.abs(),
        };

        let metrics = self.metrics;
        for observer in &mut self.observers {
            observer.on_step(metrics);
        }
        Some(metrics)
    }

    /// Stop the runner and release every body. Terminal, idempotent, and
    /// a no-op on an instance that never went live.
    pub fn teardown(&mut self) {
        match self.phase {
            SimPhase::Seeded | SimPhase::Running => {
                if let Some(mut runner) = self.runner.take() {
                    runner.stop();
                }
                self.world.clear();
                self.phase = SimPhase::TornDown;
                log::info!("simulation torn down");
            }
            SimPhase::Idle | SimPhase::TornDown => {}
        }
    }
}
