//! The physics world
//!
//! Holds every body for one month's run: the static barriers seeded from
//! a scene plus whatever balls have been dropped in. Stepping integrates
//! gravity, resolves ball-barrier contacts in substeps small enough that
//! fast balls cannot tunnel through a bar, then settles ball-ball
//! contacts. Culling is a separate pass so callers can count bodies
//! before off-screen balls disappear.

use glam::Vec2;

use super::body::{Body, BodyShape, Material};
use super::collision::{ball_ball_collision, ball_rect_collision, bounce_velocity};
use crate::consts::{BALL_FILL, GRAVITY_Y};
use crate::scene::Barrier;

/// All bodies for one run, statics and balls kept apart
#[derive(Debug, Clone)]
pub struct World {
    width: f32,
    height: f32,
    gravity: Vec2,
    barriers: Vec<Body>,
    balls: Vec<Body>,
    next_id: u32,
}

impl World {
    /// An empty world with the default downward gravity
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            gravity: Vec2::new(0.0, GRAVITY_Y),
            barriers: Vec::new(),
            balls: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_gravity(mut self, gravity_y: f32) -> Self {
        self.gravity.y = gravity_y;
        self
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add one immovable barrier from a scene descriptor
    pub fn add_barrier(&mut self, barrier: &Barrier) -> u32 {
        let id = self.take_id();
        self.barriers.push(Body::rect_static(
            id,
            barrier.pos,
            barrier.half_extents(),
            barrier.fill.clone(),
        ));
        id
    }

    /// Add a ball at rest
    pub fn add_ball(&mut self, pos: Vec2, radius: f32, material: Material) -> u32 {
        let id = self.take_id();
        self.balls
            .push(Body::ball(id, pos, radius, material, BALL_FILL.to_owned()));
        id
    }

    /// Remove a body by id, barrier or ball
    pub fn remove(&mut self, id: u32) -> bool {
        let barriers_before = self.barriers.len();
        self.barriers.retain(|b| b.id != id);
        if self.barriers.len() != barriers_before {
            return true;
        }
        let balls_before = self.balls.len();
        self.balls.retain(|b| b.id != id);
        self.balls.len() != balls_before
    }

    /// Drop every body
    pub fn clear(&mut self) {
        self.barriers.clear();
        self.balls.clear();
    }

    /// Total bodies, barriers and balls alike
    pub fn body_count(&self) -> usize {
        self.barriers.len() + self.balls.len()
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn barrier_count(&self) -> usize {
        self.barriers.len()
    }

    pub fn balls(&self) -> &[Body] {
        &self.balls
    }

    pub fn barriers(&self) -> &[Body] {
        &self.barriers
    }

    /// Every body in render order: barriers first, then balls
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.barriers.iter().chain(self.balls.iter())
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Advance every ball by one timestep
    pub fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        let barriers = &self.barriers;

        for ball in self.balls.iter_mut() {
            let BodyShape::Ball { radius } = ball.shape else {
                continue;
            };
            ball.vel += gravity * dt;

            // Substep fast balls so they cannot pass through a thin bar
            let move_dist = ball.vel.length() * dt;
            let step_size = radius * 0.3;
            let num_steps = ((move_dist / step_size).ceil() as usize).clamp(1, 20);
            let step_dt = dt / num_steps as f32;

            for _ in 0..num_steps {
                ball.pos += ball.vel * step_dt;

                for barrier in barriers {
                    let BodyShape::Rect { half } = barrier.shape else {
                        continue;
                    };
                    let result = ball_rect_collision(ball.pos, radius, barrier.pos, half);
                    if result.hit && ball.vel.dot(result.normal) < 0.0 {
                        let restitution =
                            Material::pair_restitution(&ball.material, &barrier.material);
                        let friction = Material::pair_friction(&ball.material, &barrier.material);
                        ball.vel = bounce_velocity(ball.vel, result.normal, restitution, friction);
                        ball.pos += result.normal * (result.penetration + 0.5);
                        break; // One contact per substep
                    }
                }
            }
        }

        self.resolve_ball_contacts();
    }

    /// Pairwise ball contacts: positional separation plus an impulse
    /// along the contact normal
    fn resolve_ball_contacts(&mut self) {
        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                let (head, tail) = self.balls.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                let (BodyShape::Ball { radius: a_radius }, BodyShape::Ball { radius: b_radius }) =
                    (a.shape, b.shape)
                else {
                    continue;
                };

                let result = ball_ball_collision(a.pos, a_radius, b.pos, b_radius);
                if !result.hit {
                    continue;
                }

                // Separate first so stacked balls cannot sink into each other
                let half_push = result.normal * (result.penetration / 2.0);
                a.pos -= half_push;
                b.pos += half_push;

                let approach = (b.vel - a.vel).dot(result.normal);
                let (a_mass, b_mass) = (a.mass(), b.mass());
                if approach < 0.0 && a_mass > 0.0 && b_mass > 0.0 {
                    let restitution = Material::pair_restitution(&a.material, &b.material);
                    let impulse =
                        -(1.0 + restitution) * approach / (1.0 / a_mass + 1.0 / b_mass);
                    a.vel -= result.normal * (impulse / a_mass);
                    b.vel += result.normal * (impulse / b_mass);
                }
            }
        }
    }

    /// Remove every ball past the side edges or below the bottom edge.
    /// Balls above the top edge are kept: they are on their way back down.
    /// Returns how many were removed.
    pub fn cull_out_of_bounds(&mut self) -> usize {
        let (width, height) = (self.width, self.height);
        let before = self.balls.len();
        self.balls
            .retain(|b| b.pos.x >= 0.0 && b.pos.x <= width && b.pos.y <= height);
        before - self.balls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STEP_DT;

    fn floor() -> Barrier {
        Barrier::new(Vec2::new(500.0, 670.0), Vec2::new(930.0, 25.0))
    }

    #[test]
    fn test_counts_track_adds() {
        let mut world = World::new(1000.0, 700.0);
        world.add_barrier(&floor());
        world.add_ball(Vec2::new(500.0, 100.0), 10.0, Material::ball());
        world.add_ball(Vec2::new(300.0, 100.0), 10.0, Material::ball());
        assert_eq!(world.barrier_count(), 1);
        assert_eq!(world.ball_count(), 2);
        assert_eq!(world.body_count(), 3);
        assert_eq!(world.bodies().count(), 3);
    }

    #[test]
    fn test_gravity_pulls_balls_down() {
        let mut world = World::new(1000.0, 700.0);
        let id = world.add_ball(Vec2::new(500.0, 100.0), 10.0, Material::ball());
        world.step(STEP_DT);
        let ball = world.balls().iter().find(|b| b.id == id).unwrap();
        assert!(ball.vel.y > 0.0);
        assert!(ball.pos.y > 100.0);
    }

    #[test]
    fn test_barriers_never_move() {
        let mut world = World::new(1000.0, 700.0);
        world.add_barrier(&floor());
        world.add_ball(Vec2::new(500.0, 640.0), 10.0, Material::ball());
        for _ in 0..120 {
            world.step(STEP_DT);
        }
        let barrier = &world.barriers()[0];
        assert_eq!(barrier.pos, Vec2::new(500.0, 670.0));
        assert_eq!(barrier.vel, Vec2::ZERO);
    }

    #[test]
    fn test_ball_bounces_off_the_floor() {
        let mut world = World::new(1000.0, 700.0);
        world.add_barrier(&floor());
        let id = world.add_ball(Vec2::new(500.0, 600.0), 10.0, Material::ball());

        // Drop until the floor sends it back up
        let mut bounced = false;
        for _ in 0..120 {
            world.step(STEP_DT);
            let ball = world.balls().iter().find(|b| b.id == id).unwrap();
            if ball.vel.y < 0.0 {
                bounced = true;
                // The bounce happens at the floor's top face, not inside it
                assert!(ball.pos.y < 660.0, "bounced at {}", ball.pos.y);
                break;
            }
        }
        assert!(bounced, "ball never came back up");
    }

    #[test]
    fn test_cull_removes_only_escaped_balls() {
        let mut world = World::new(1000.0, 700.0);
        world.add_barrier(&floor());
        world.add_ball(Vec2::new(-1.0, 300.0), 10.0, Material::ball());
        world.add_ball(Vec2::new(1001.0, 300.0), 10.0, Material::ball());
        world.add_ball(Vec2::new(500.0, 701.0), 10.0, Material::ball());
        let kept = world.add_ball(Vec2::new(500.0, 300.0), 10.0, Material::ball());
        let above = world.add_ball(Vec2::new(500.0, -50.0), 10.0, Material::ball());

        assert_eq!(world.cull_out_of_bounds(), 3);
        assert_eq!(world.ball_count(), 2);
        let ids: Vec<u32> = world.balls().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![kept, above]);
        // Barriers are never culled
        assert_eq!(world.barrier_count(), 1);
    }

    #[test]
    fn test_cull_keeps_balls_on_the_edge() {
        let mut world = World::new(1000.0, 700.0);
        world.add_ball(Vec2::new(0.0, 300.0), 10.0, Material::ball());
        world.add_ball(Vec2::new(1000.0, 300.0), 10.0, Material::ball());
        world.add_ball(Vec2::new(500.0, 700.0), 10.0, Material::ball());
        assert_eq!(world.cull_out_of_bounds(), 0);
        assert_eq!(world.ball_count(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let mut world = World::new(1000.0, 700.0);
        let barrier = world.add_barrier(&floor());
        let ball = world.add_ball(Vec2::new(500.0, 300.0), 10.0, Material::ball());
        assert!(world.remove(ball));
        assert!(world.remove(barrier));
        assert!(!world.remove(ball));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_overlapping_balls_push_apart() {
        let mut world = World::new(1000.0, 700.0);
        let a = world.add_ball(Vec2::new(500.0, 300.0), 10.0, Material::ball());
        let b = world.add_ball(Vec2::new(512.0, 300.0), 10.0, Material::ball());
        world.step(STEP_DT);
        let a_pos = world.balls().iter().find(|x| x.id == a).unwrap().pos;
        let b_pos = world.balls().iter().find(|x| x.id == b).unwrap().pos;
        assert!(
            (b_pos.x - a_pos.x) >= 20.0 - 1e-3,
            "still overlapping: {} vs {}",
            a_pos.x,
            b_pos.x
        );
    }

    #[test]
    fn test_head_on_contact_swaps_velocities() {
        let mut world = World::new(1000.0, 700.0).with_gravity(0.0);
        let a = world.add_ball(Vec2::new(490.0, 300.0), 10.0, Material::ball());
        let b = world.add_ball(Vec2::new(509.0, 300.0), 10.0, Material::ball());
        // Drive a into b
        if let Some(ball) = world.balls.iter_mut().find(|x| x.id == a) {
            ball.vel = Vec2::new(60.0, 0.0);
        }
        world.step(STEP_DT);
        let a_vel = world.balls().iter().find(|x| x.id == a).unwrap().vel;
        let b_vel = world.balls().iter().find(|x| x.id == b).unwrap().vel;
        // Equal masses and restitution 1: the mover stops, the target goes
        assert!(a_vel.x.abs() < 1e-3, "a kept {}", a_vel.x);
        assert!((b_vel.x - 60.0).abs() < 1e-3, "b got {}", b_vel.x);
    }

    #[test]
    fn test_clear_empties_the_world() {
        let mut world = World::new(1000.0, 700.0);
        world.add_barrier(&floor());
        world.add_ball(Vec2::new(500.0, 300.0), 10.0, Material::ball());
        world.clear();
        assert_eq!(world.body_count(), 0);
    }
}
