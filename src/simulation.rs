/*
 * Simulation Module
 *
 * FlockSimulation owns the flock and the quadtree built from it. The host
 * drives it by calling `advance(dt)` once per tick and reads agents and
 * quadtree boundaries back for drawing; nothing else mutates it.
 *
 * Per step:
 * 1. Every boid is updated against the index built at the end of the last
 *    step (wall push, neighbor query, flocking forces, integration).
 * 2. Once all boids are done, the index is cleared and rebuilt from the new
 *    positions for the next step.
 */

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::boid::Boid;
use crate::error::ConfigError;
use crate::geometry::AxisAlignedRect;
use crate::params::{FlockParams, SimulationParams};
use crate::physics::{self, StepContext};
use crate::quadtree::{Point, QuadTree};

/// Numbers gathered during the most recent `advance`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Steps completed so far.
    pub step: u64,
    /// Points returned by all square neighbor queries.
    pub candidates: usize,
    /// Points that survived the cone and distance filter.
    pub neighbors: usize,
    /// Boids left out of the rebuilt index because they were off-world.
    pub dropped: usize,
    /// Nodes in the rebuilt index.
    pub nodes: usize,
}

pub struct FlockSimulation {
    boids: Vec<Boid>,
    index: QuadTree,
    world_bounds: AxisAlignedRect,
    params: SimulationParams,
    last_step: StepStats,
}

impl FlockSimulation {
    /// Build a simulation with randomly placed boids.
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world_bounds = params.world_bounds();
        let boids = (0..params.num_boids)
            .map(|_| Boid::random(&mut rng, &world_bounds, params.initial_speed))
            .collect();

        Ok(Self::assemble(params, boids))
    }

    /// Shorthand for [`FlockSimulation::new`] with default construction
    /// settings and the given world, population and tunables.
    pub fn configure(
        world_bounds: AxisAlignedRect,
        population: usize,
        tunables: FlockParams,
    ) -> Result<Self, ConfigError> {
        let mut params = SimulationParams {
            num_boids: population,
            flock: tunables,
            ..SimulationParams::default()
        };
        params.set_world_bounds(world_bounds);

        Self::new(params)
    }

    /// Build a simulation from boids placed by the caller. `num_boids` in
    /// `params` is replaced by the length of `boids`.
    pub fn from_boids(mut params: SimulationParams, boids: Vec<Boid>) -> Result<Self, ConfigError> {
        params.num_boids = boids.len();
        params.validate()?;

        Ok(Self::assemble(params, boids))
    }

    fn assemble(params: SimulationParams, boids: Vec<Boid>) -> Self {
        let world_bounds = params.world_bounds();
        let mut index = QuadTree::new(world_bounds, params.capacity);
        let dropped = physics::rebuild_index(&mut index, &boids);

        info!(
            boids = boids.len(),
            half_width = world_bounds.half_width,
            half_height = world_bounds.half_height,
            capacity = params.capacity,
            parallel = params.enable_parallel,
            "flock simulation created"
        );

        let last_step = StepStats {
            dropped,
            nodes: index.node_count(),
            ..StepStats::default()
        };

        Self {
            boids,
            index,
            world_bounds,
            params,
            last_step,
        }
    }

    /// Run one simulation step of length `dt`.
    pub fn advance(&mut self, dt: f32) {
        let counts = {
            let ctx = StepContext::new(&self.index, &self.world_bounds, &self.params.flock, dt);
            physics::update_boids(&mut self.boids, &ctx, self.params.enable_parallel)
        };

        let dropped = physics::rebuild_index(&mut self.index, &self.boids);
        if dropped > 0 {
            warn!(dropped, "boids outside the world were left out of the quadtree");
        }

        self.last_step = StepStats {
            step: self.last_step.step + 1,
            candidates: counts.candidates,
            neighbors: counts.accepted,
            dropped,
            nodes: self.index.node_count(),
        };

        debug!(
            step = self.last_step.step,
            dt,
            candidates = counts.candidates,
            neighbors = counts.accepted,
            nodes = self.last_step.nodes,
            "advanced flock"
        );
    }

    /// Swap the force tunables between steps.
    pub fn reconfigure(&mut self, tunables: FlockParams) -> Result<(), ConfigError> {
        tunables.validate()?;
        self.params.flock = tunables;

        info!(?tunables, "flock tunables updated");
        Ok(())
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.params.enable_parallel = enabled;
    }

    /// Position and velocity of every agent.
    pub fn agents(&self) -> Vec<(Vec2, Vec2)> {
        self.boids
            .iter()
            .map(|boid| (boid.position, boid.velocity))
            .collect()
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Boundary of every quadtree node, leaf and internal.
    pub fn boundaries(&self) -> Vec<AxisAlignedRect> {
        self.index.boundaries()
    }

    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// Neighbors agent `i` would use on the next step. Empty for an unknown
    /// index.
    pub fn neighbors_of(&self, i: usize) -> Vec<Point> {
        self.boids
            .get(i)
            .map(|boid| physics::neighbors_of(boid, &self.index, &self.params.flock))
            .unwrap_or_default()
    }

    pub fn world_bounds(&self) -> &AxisAlignedRect {
        &self.world_bounds
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}
