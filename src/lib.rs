//! Breadfall - a falling-ball sieve driven by monthly price data
//!
//! Each month of a commodity-price table becomes one run of a small 2D
//! physics scene: six horizontal "sieve" bars whose length tracks the
//! month's price, plus a floor and two side walls, with a batch of balls
//! dropped from the top. Rendering, audio and the data fetch live outside
//! this crate; everything here is deterministic given a seed.
//!
//! Core modules:
//! - `data`: month-indexed table access and cell validation
//! - `scene`: static barrier layout for one month
//! - `sim`: physics world, lifecycle controller, runner/observer seams
//! - `navigator`: month-by-month control that owns the live session
//! - `config`: tunable parameters (defaults give the 1000x700 layout)

pub mod config;
pub mod data;
pub mod error;
pub mod navigator;
pub mod scene;
pub mod sim;

pub use config::SimConfig;
pub use data::{DataRow, DataTable, RowFields};
pub use error::{Error, Result};
pub use navigator::{MonthNavigator, RunnerFactory};
pub use scene::{Barrier, SceneGeometry, build_scene};
pub use sim::{SimPhase, Simulation, StepMetrics, StepObserver, StepRunner};

/// Layout and physics constants
pub mod consts {
    /// Canvas dimensions (the renderer draws at exactly this size)
    pub const WIDTH: f32 = 1000.0;
    pub const HEIGHT: f32 = 700.0;

    /// Fixed simulation timestep (60 Hz)
    pub const STEP_DT: f32 = 1.0 / 60.0;
    /// Downward gravity (pixels/s²)
    pub const GRAVITY_Y: f32 = 980.0;

    /// Barrier defaults - sieve bars and side walls share one thickness
    pub const WALL_LENGTH: f32 = 500.0;
    pub const BAR_THICKNESS: f32 = 25.0;
    /// Number of sieve bars; bar k sits at canvas_width * k / (SIEVE_BARS + 1)
    pub const SIEVE_BARS: usize = 6;
    /// Floor width as a fraction of the canvas width
    pub const FLOOR_SPAN: f32 = 0.93;
    /// Floor center sits this far above the bottom edge
    pub const FLOOR_OFFSET: f32 = 30.0;

    /// Price-to-bar-length mapping: a month at PRICE_MIN gets bars of
    /// wall_length * BAR_FRACTION_AT_MIN, a month at PRICE_MAX gets the
    /// shorter BAR_FRACTION_AT_MAX (pricier bread, leakier sieve)
    pub const PRICE_MIN: f32 = 52.0;
    pub const PRICE_MAX: f32 = 108.0;
    pub const BAR_FRACTION_AT_MIN: f32 = 0.23;
    pub const BAR_FRACTION_AT_MAX: f32 = 0.1;

    /// Table columns (zero-based): price in column 3, ball count in column 4
    pub const PRICE_COLUMN: usize = 3;
    pub const SPAWN_COLUMN: usize = 4;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_RESTITUTION: f32 = 1.0;
    pub const BALL_FRICTION: f32 = 0.5;
    pub const BALL_DENSITY: f32 = 0.001;
    /// Balls spawn at canvas_height * this fraction
    pub const SPAWN_HEIGHT_FRACTION: f32 = 0.1;

    /// Barrier surface properties
    pub const BARRIER_RESTITUTION: f32 = 0.0;
    pub const BARRIER_FRICTION: f32 = 0.1;

    /// Fill colors, passed through verbatim for the renderer
    pub const BARRIER_FILL: &str = "white";
    pub const BALL_FILL: &str = "#ffff66";
}

/// Linearly map `value` from [in_min, in_max] to [out_min, out_max].
///
/// Values outside the input range extrapolate along the same line; the
/// output range may be inverted (out_min > out_max). A degenerate input
/// range is rejected rather than dividing by zero.
pub fn scale(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Result<f32> {
    if in_min == in_max {
        return Err(Error::DegenerateRange { in_min });
    }
    Ok((value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min)
}
