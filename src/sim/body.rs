//! Bodies and materials
//!
//! Two kinds of body exist: immovable axis-aligned rectangles (the
//! barriers) and dynamic balls. Contact response mixes the two surface
//! materials: the livelier restitution wins, the slicker friction wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    BALL_DENSITY, BALL_FRICTION, BALL_RESTITUTION, BARRIER_FRICTION, BARRIER_RESTITUTION,
};

/// Surface properties of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Bounce energy kept on the contact normal (1.0 = perfectly elastic)
    pub restitution: f32,
    /// Tangential damping per contact (0.0 = frictionless)
    pub friction: f32,
    /// Mass per unit area
    pub density: f32,
}

impl Material {
    /// Spawned balls: perfectly elastic and light
    pub fn ball() -> Self {
        Self {
            restitution: BALL_RESTITUTION,
            friction: BALL_FRICTION,
            density: BALL_DENSITY,
        }
    }

    /// Barriers: dead bounce, slick surface
    pub fn barrier() -> Self {
        Self {
            restitution: BARRIER_RESTITUTION,
            friction: BARRIER_FRICTION,
            density: 1.0,
        }
    }

    /// Effective restitution for a contact pair
    pub fn pair_restitution(a: &Self, b: &Self) -> f32 {
        a.restitution.max(b.restitution)
    }

    /// Effective friction for a contact pair
    pub fn pair_friction(a: &Self, b: &Self) -> f32 {
        a.friction.min(b.friction)
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Axis-aligned rectangle, stored as half extents
    Rect { half: Vec2 },
    /// Circle
    Ball { radius: f32 },
}

/// One body in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub shape: BodyShape,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub material: Material,
    pub is_static: bool,
    /// Render fill, passed through verbatim
    pub fill: String,
}

impl Body {
    /// An immovable rectangle
    pub fn rect_static(id: u32, pos: Vec2, half: Vec2, fill: String) -> Self {
        Self {
            id,
            shape: BodyShape::Rect { half },
            pos,
            vel: Vec2::ZERO,
            material: Material::barrier(),
            is_static: true,
            fill,
        }
    }

    /// A dynamic ball, initially at rest
    pub fn ball(id: u32, pos: Vec2, radius: f32, material: Material, fill: String) -> Self {
        Self {
            id,
            shape: BodyShape::Ball { radius },
            pos,
            vel: Vec2::ZERO,
            material,
            is_static: false,
            fill,
        }
    }

    /// Mass from density and shape area
    pub fn mass(&self) -> f32 {
        let area = match self.shape {
            BodyShape::Rect { half } => 4.0 * half.x * half.y,
            BodyShape::Ball { radius } => std::f32::consts::PI * radius * radius,
        };
        self.material.density * area
    }
}
