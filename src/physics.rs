/*
 * Physics Module
 *
 * This module runs one update pass over the flock and rebuilds the quadtree
 * afterwards. Every boid reads only the index built at the end of the
 * previous step and its own state, so the pass can run sequentially or in
 * parallel with rayon and produce the same per-boid results. The index is
 * rebuilt only once the whole pass has finished.
 */

use rayon::prelude::*;
use std::ops::Add;
use tracing::trace;

use crate::boid::{flocking_force, is_neighbor, wall_avoidance_force, Boid};
use crate::geometry::AxisAlignedRect;
use crate::params::FlockParams;
use crate::quadtree::{Point, QuadTree};

/// Neighbor bookkeeping gathered over one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    /// Points returned by the square index queries.
    pub candidates: usize,
    /// Points that passed the cone and distance filter.
    pub accepted: usize,
}

impl Add for NeighborCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            candidates: self.candidates + other.candidates,
            accepted: self.accepted + other.accepted,
        }
    }
}

/// Read-only inputs shared by every boid during a pass.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub index: &'a QuadTree,
    pub world: &'a AxisAlignedRect,
    pub params: &'a FlockParams,
    pub cos_threshold: f32,
    pub dt: f32,
}

impl<'a> StepContext<'a> {
    pub fn new(
        index: &'a QuadTree,
        world: &'a AxisAlignedRect,
        params: &'a FlockParams,
        dt: f32,
    ) -> Self {
        Self {
            index,
            world,
            params,
            cos_threshold: params.cos_angle_threshold(),
            dt,
        }
    }

    // Square range centered on the boid, half extent = neighbor distance
    #[inline]
    fn query_range(&self, boid: &Boid) -> AxisAlignedRect {
        AxisAlignedRect::square(boid.position, self.params.neighbor_distance)
    }
}

/// Wall push, neighbor query, flocking forces and integration for one boid.
/// `found` is scratch space reused across calls.
pub fn update_boid(boid: &mut Boid, ctx: &StepContext<'_>, found: &mut Vec<Point>) -> NeighborCounts {
    let params = ctx.params;

    boid.apply_force(wall_avoidance_force(
        boid.position,
        ctx.world,
        params.wall_margin,
        params.wall_max_force,
    ));

    found.clear();
    ctx.index.query_into(&ctx.query_range(boid), found);

    let (force, accepted) = flocking_force(boid, found.iter(), params, ctx.cos_threshold);
    boid.apply_force(force);
    boid.integrate(ctx.dt, params.min_speed);

    NeighborCounts {
        candidates: found.len(),
        accepted,
    }
}

/// Update every boid against the prior-step index.
pub fn update_boids(boids: &mut [Boid], ctx: &StepContext<'_>, parallel: bool) -> NeighborCounts {
    if parallel {
        boids
            .par_iter_mut()
            .map_init(Vec::new, |found, boid| update_boid(boid, ctx, found))
            .reduce(NeighborCounts::default, |a, b| a + b)
    } else {
        let mut found = Vec::new();
        boids
            .iter_mut()
            .map(|boid| update_boid(boid, ctx, &mut found))
            .fold(NeighborCounts::default(), |a, b| a + b)
    }
}

/// Filtered neighbors of `boid` in `index`, as the update pass sees them.
pub fn neighbors_of(boid: &Boid, index: &QuadTree, params: &FlockParams) -> Vec<Point> {
    let cos_threshold = params.cos_angle_threshold();
    let forward = boid.forward();
    let range = AxisAlignedRect::square(boid.position, params.neighbor_distance);

    index
        .query(&range)
        .into_iter()
        .filter(|other| {
            is_neighbor(
                boid.position,
                forward,
                other.position,
                cos_threshold,
                params.neighbor_distance,
            )
        })
        .collect()
}

/// Clear the index and insert every boid again. Returns how many boids the
/// index rejected because they sit outside (or on the edge of) its bounds.
pub fn rebuild_index(index: &mut QuadTree, boids: &[Boid]) -> usize {
    index.clear();

    let dropped = boids
        .iter()
        .filter(|boid| !index.insert(boid.as_point()))
        .count();

    trace!(
        boids = boids.len(),
        dropped,
        nodes = index.node_count(),
        "rebuilt quadtree"
    );

    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn world() -> AxisAlignedRect {
        AxisAlignedRect::square(Vec2::ZERO, 100.0)
    }

    fn scattered_boids() -> Vec<Boid> {
        (0..64)
            .map(|i| {
                let x = (i % 8) as f32 * 9.0 - 31.5;
                let y = (i / 8) as f32 * 9.0 - 31.5;
                let angle = i as f32 * 0.7;
                Boid::new(Vec2::new(x, y), Vec2::new(angle.cos(), angle.sin()) * 10.0)
            })
            .collect()
    }

    #[test]
    fn rebuild_reports_out_of_bounds_boids() {
        let mut index = QuadTree::new(world(), 4);
        let boids = vec![
            Boid::new(Vec2::new(1.0, 1.0), Vec2::X),
            Boid::new(Vec2::new(120.0, 1.0), Vec2::X),
            Boid::new(Vec2::new(100.0, 1.0), Vec2::X),
        ];

        assert_eq!(rebuild_index(&mut index, &boids), 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn parallel_and_sequential_passes_agree() {
        let params = FlockParams::default();
        let world = world();
        let mut index = QuadTree::new(world, 4);
        let boids = scattered_boids();
        rebuild_index(&mut index, &boids);

        let ctx = StepContext::new(&index, &world, &params, 0.1);
        let mut sequential = boids.clone();
        let mut parallel = boids;

        let seq_counts = update_boids(&mut sequential, &ctx, false);
        let par_counts = update_boids(&mut parallel, &ctx, true);

        assert_eq!(seq_counts, par_counts);
        assert_eq!(sequential, parallel);
        assert!(seq_counts.accepted > 0);
    }

    #[test]
    fn update_reads_only_the_prior_index() {
        let params = FlockParams::default();
        let world = world();
        let boids = scattered_boids();
        let mut index = QuadTree::new(world, 4);
        rebuild_index(&mut index, &boids);

        let ctx = StepContext::new(&index, &world, &params, 0.1);

        // Updating boids one at a time in reverse order must match a full pass
        let mut forward_pass = boids.clone();
        update_boids(&mut forward_pass, &ctx, false);

        let mut reverse_pass = boids;
        let mut found = Vec::new();
        for boid in reverse_pass.iter_mut().rev() {
            update_boid(boid, &ctx, &mut found);
        }

        assert_eq!(forward_pass, reverse_pass);
    }

    #[test]
    fn neighbors_of_applies_the_perception_filter() {
        let params = FlockParams::default();
        let mut index = QuadTree::new(world(), 4);
        let boid = Boid::new(Vec2::ZERO, Vec2::new(6.0, 0.0));
        let others = vec![
            boid,
            Boid::new(Vec2::new(5.0, 0.0), Vec2::X),
            Boid::new(Vec2::new(-5.0, 0.0), Vec2::X),
            Boid::new(Vec2::new(22.0, 22.0), Vec2::X),
        ];
        rebuild_index(&mut index, &others);

        let neighbors = neighbors_of(&boid, &index, &params);
        let positions: Vec<Vec2> = neighbors.iter().map(|p| p.position).collect();

        assert!(positions.contains(&Vec2::new(5.0, 0.0)));
        assert!(!positions.contains(&Vec2::new(-5.0, 0.0)));
        assert!(!positions.contains(&Vec2::new(22.0, 22.0)));
    }
}
