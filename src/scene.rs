//! Static scene layout
//!
//! One month's barriers: six sieve bars across the middle of the canvas,
//! a floor near the bottom, and two side walls. All of them are
//! axis-aligned rectangles described by center and full size, ready to be
//! seeded into a world or handed to a renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    BAR_THICKNESS, BARRIER_FILL, FLOOR_OFFSET, FLOOR_SPAN, SIEVE_BARS,
};

/// One immovable rectangle, center + full extents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub pos: Vec2,
    pub size: Vec2,
    /// Render fill, passed through verbatim
    pub fill: String,
}

impl Barrier {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            fill: BARRIER_FILL.to_owned(),
        }
    }

    /// Half extents, the shape collision code works in
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// The full static scene for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGeometry {
    pub barriers: Vec<Barrier>,
}

impl SceneGeometry {
    pub fn len(&self) -> usize {
        self.barriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Barrier> {
        self.barriers.iter()
    }
}

/// Lay out the barriers for one month.
///
/// Sieve bar k (1-based) is centered at canvas_width * k / 7, halfway down
/// the canvas, with length wall_length * bar_length_fraction. The floor
/// spans most of the width near the bottom; the side walls stand
/// wall_length tall near the edges. A wall_length of 0 keeps all nine
/// barriers in place but collapses them to zero length, which is how
/// month navigation clears the previous layout.
pub fn build_scene(
    canvas_width: f32,
    canvas_height: f32,
    wall_length: f32,
    bar_length_fraction: f32,
) -> SceneGeometry {
    let mut barriers = Vec::with_capacity(SIEVE_BARS + 3);

    let spacing = canvas_width / (SIEVE_BARS as f32 + 1.0);
    let bar_length = wall_length * bar_length_fraction;
    for k in 1..=SIEVE_BARS {
        barriers.push(Barrier::new(
            Vec2::new(spacing * k as f32, canvas_height / 2.0),
            Vec2::new(bar_length, BAR_THICKNESS),
        ));
    }

    // Floor
    barriers.push(Barrier::new(
        Vec2::new(canvas_width / 2.0, canvas_height - FLOOR_OFFSET),
        Vec2::new(canvas_width * FLOOR_SPAN, BAR_THICKNESS),
    ));

    // Side walls, one barrier-width in from each edge
    let inset = 2.0 * BAR_THICKNESS;
    barriers.push(Barrier::new(
        Vec2::new(inset, canvas_height / 2.0),
        Vec2::new(BAR_THICKNESS, wall_length),
    ));
    barriers.push(Barrier::new(
        Vec2::new(canvas_width - inset, canvas_height / 2.0),
        Vec2::new(BAR_THICKNESS, wall_length),
    ));

    SceneGeometry { barriers }
}
