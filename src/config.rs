//! Simulation configuration
//!
//! Everything tunable about the scene and the balls lives here. The
//! defaults give the standard 1000x700 layout; a partial JSON config
//! overrides individual fields.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{Error, Result};
use crate::sim::Material;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Canvas ===
    /// Canvas width in pixels; also the spawn region width
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,

    // === Barriers ===
    /// Full length budget for side walls and sieve bars; bars use a
    /// price-derived fraction of it
    pub wall_length: f32,

    // === Price mapping ===
    /// Input range of the price-to-fraction mapping
    pub price_min: f32,
    pub price_max: f32,
    /// Bar length fraction at price_min
    pub bar_fraction_at_min: f32,
    /// Bar length fraction at price_max
    pub bar_fraction_at_max: f32,

    // === Balls ===
    pub ball_radius: f32,
    /// Surface properties of spawned balls
    pub ball: Material,
    /// Balls drop in at height * this fraction
    pub spawn_height_fraction: f32,

    // === Physics ===
    /// Downward gravity (pixels/s²)
    pub gravity_y: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: consts::WIDTH,
            height: consts::HEIGHT,
            wall_length: consts::WALL_LENGTH,
            price_min: consts::PRICE_MIN,
            price_max: consts::PRICE_MAX,
            bar_fraction_at_min: consts::BAR_FRACTION_AT_MIN,
            bar_fraction_at_max: consts::BAR_FRACTION_AT_MAX,
            ball_radius: consts::BALL_RADIUS,
            ball: Material::ball(),
            spawn_height_fraction: consts::SPAWN_HEIGHT_FRACTION,
            gravity_y: consts::GRAVITY_Y,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reject configurations the price mapping cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.price_min == self.price_max {
            return Err(Error::DegenerateRange {
                in_min: self.price_min,
            });
        }
        Ok(())
    }
}
