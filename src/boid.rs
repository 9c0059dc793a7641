/*
 * Boid Module
 *
 * This module defines the Boid struct and the rules that steer it.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * On top of that a wall push keeps it inside the world bounds.
 *
 * Neighbors are only those inside the forward perception cone and within
 * the neighbor distance.
 */

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::geometry::AxisAlignedRect;
use crate::params::FlockParams;
use crate::quadtree::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Forces gathered during the current step, zeroed by `integrate`.
    pub acceleration: Vec2,
}

impl Boid {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    /// Spawn at a uniformly random spot strictly inside `bounds`, heading in
    /// a random direction at `speed`. `bounds` must contain its own center.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: &AxisAlignedRect, speed: f32) -> Self {
        let x = sample_interior(rng, bounds.left(), bounds.right(), bounds.center.x);
        let y = sample_interior(rng, bounds.bottom(), bounds.top(), bounds.center.y);
        let angle = rng.gen_range(0.0..TAU);
        let heading = Vec2::new(angle.cos(), angle.sin());

        Self::new(Vec2::new(x, y), heading * speed)
    }

    // Unit heading, or zero while standing still
    #[inline]
    pub fn forward(&self) -> Vec2 {
        self.velocity.normalize_or_zero()
    }

    // Snapshot stored in the spatial index
    #[inline]
    pub fn as_point(&self) -> Point {
        Point::with_velocity(self.position, self.velocity)
    }

    // Apply a force to the boid
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Advance by `dt`: fold acceleration into velocity, lift the speed to
    /// `min_speed` if it fell below, move, and reset the acceleration.
    ///
    /// A zero velocity has no direction to rescale along and stays zero.
    pub fn integrate(&mut self, dt: f32, min_speed: f32) {
        self.velocity += self.acceleration * dt;

        if self.velocity.length_squared() < min_speed * min_speed {
            self.velocity = self.velocity.normalize_or_zero() * min_speed;
        }

        self.position += self.velocity * dt;
        self.acceleration = Vec2::ZERO;
    }
}

// The half-open range can return `low`, which the index treats as outside
fn sample_interior<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32, fallback: f32) -> f32 {
    let value = rng.gen_range(low..high);
    if value > low {
        value
    } else {
        fallback
    }
}

/// Push away from every world edge closer than `margin`, growing linearly
/// from zero at the margin to `max_force` on the edge itself. Each side is
/// handled on its own, so corners push on both axes.
pub fn wall_avoidance_force(
    position: Vec2,
    bounds: &AxisAlignedRect,
    margin: f32,
    max_force: f32,
) -> Vec2 {
    let push = |distance: f32| max_force * (margin - distance) / margin;
    let mut force = Vec2::ZERO;

    let to_left = position.x - bounds.left();
    let to_right = bounds.right() - position.x;
    let to_top = bounds.top() - position.y;
    let to_bottom = position.y - bounds.bottom();

    if to_left < margin {
        force.x += push(to_left);
    }
    if to_right < margin {
        force.x -= push(to_right);
    }
    if to_top < margin {
        force.y -= push(to_top);
    }
    if to_bottom < margin {
        force.y += push(to_bottom);
    }

    force
}

/// Perception test: `other` must sit strictly inside the cone around
/// `forward` and no farther than `neighbor_distance`.
#[inline]
pub fn is_neighbor(
    position: Vec2,
    forward: Vec2,
    other: Vec2,
    cos_threshold: f32,
    neighbor_distance: f32,
) -> bool {
    let to = other - position;
    let facing = forward.dot(to.normalize_or_zero());

    facing > cos_threshold && to.length() <= neighbor_distance
}

/// Sum of the separation, alignment and cohesion forces acting on `boid`.
///
/// `candidates` may hold points outside the perception cone or circle; they
/// are filtered here. Returns the force and the number of accepted neighbors.
pub fn flocking_force<'a, I>(
    boid: &Boid,
    candidates: I,
    params: &FlockParams,
    cos_threshold: f32,
) -> (Vec2, usize)
where
    I: IntoIterator<Item = &'a Point>,
{
    let forward = boid.forward();
    let mut separation = Vec2::ZERO;
    let mut alignment = Vec2::ZERO;
    let mut cohesion = Vec2::ZERO;
    let mut count = 0usize;

    for other in candidates {
        if !is_neighbor(
            boid.position,
            forward,
            other.position,
            cos_threshold,
            params.neighbor_distance,
        ) {
            continue;
        }

        separation += (boid.position - other.position).normalize_or_zero();
        alignment += other.velocity;
        cohesion += other.position;
        count += 1;
    }

    if count == 0 {
        return (Vec2::ZERO, 0);
    }

    let n = count as f32;
    let force = separation / n * params.separation_weight
        + (alignment / n - boid.velocity) * params.alignment_weight
        + (cohesion / n - boid.position) * params.cohesion_weight;

    (force, count)
}
