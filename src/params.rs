/*
 * Simulation Parameters Module
 *
 * This module defines the parameter structs for the flocking simulation.
 * FlockParams holds the tunables read by every agent update; SimulationParams
 * adds the values fixed at construction time (population, world bounds,
 * quadtree capacity, seeding). Both deserialize with defaults filled in, so a
 * host may load a partial configuration. The slider ranges used by the viewer
 * live here as well.
 */

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::AxisAlignedRect;
use crate::quadtree::{DEFAULT_CAPACITY, MAX_CAPACITY};

/// Tunables of the force model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    /// Radius of the perception circle.
    pub neighbor_distance: f32,
    /// Half angle of the perception cone, in degrees.
    pub neighbor_angle_deg: f32,
    /// Speed floor applied after integrating acceleration.
    pub min_speed: f32,
    /// Distance from a world edge at which the wall push starts.
    pub wall_margin: f32,
    /// Push applied when an agent sits exactly on a world edge.
    pub wall_max_force: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            separation_weight: 0.5,
            alignment_weight: 0.34,
            cohesion_weight: 0.16,
            neighbor_distance: 24.0,
            neighbor_angle_deg: 90.0,
            min_speed: 6.0,
            wall_margin: 10.0,
            wall_max_force: 10.0,
        }
    }
}

impl FlockParams {
    /// Cosine of the perception half angle. A neighbor direction must have a
    /// dot product with the heading strictly greater than this.
    pub fn cos_angle_threshold(&self) -> f32 {
        self.neighbor_angle_deg.to_radians().cos()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("separation_weight", self.separation_weight)?;
        check_finite("alignment_weight", self.alignment_weight)?;
        check_finite("cohesion_weight", self.cohesion_weight)?;
        check_finite("neighbor_angle_deg", self.neighbor_angle_deg)?;
        check_finite("min_speed", self.min_speed)?;
        check_finite("wall_max_force", self.wall_max_force)?;

        if !(self.neighbor_distance.is_finite() && self.neighbor_distance > 0.0) {
            return Err(ConfigError::InvalidNeighborDistance(self.neighbor_distance));
        }
        if !(self.wall_margin.is_finite() && self.wall_margin > 0.0) {
            return Err(ConfigError::InvalidWallMargin(self.wall_margin));
        }
        if self.min_speed < 0.0 {
            return Err(ConfigError::Negative("min_speed"));
        }

        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn get_neighbor_distance_range() -> std::ops::RangeInclusive<f32> {
        1.0..=100.0
    }

    pub fn get_angle_range() -> std::ops::RangeInclusive<f32> {
        0.0..=180.0
    }

    pub fn get_min_speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }

    pub fn get_wall_margin_range() -> std::ops::RangeInclusive<f32> {
        1.0..=50.0
    }

    pub fn get_wall_force_range() -> std::ops::RangeInclusive<f32> {
        0.0..=100.0
    }
}

/// Everything needed to build a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub world_center: (f32, f32),
    pub world_half_width: f32,
    pub world_half_height: f32,
    /// Points a quadtree leaf holds before splitting.
    pub capacity: usize,
    /// Speed of every agent at spawn.
    pub initial_speed: f32,
    pub enable_parallel: bool,
    /// Fixed seed for reproducible spawns; entropy when absent.
    pub seed: Option<u64>,
    pub flock: FlockParams,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 100,
            world_center: (0.0, 0.0),
            world_half_width: 100.0,
            world_half_height: 100.0,
            capacity: DEFAULT_CAPACITY,
            initial_speed: 24.0,
            enable_parallel: true,
            seed: None,
            flock: FlockParams::default(),
        }
    }
}

impl SimulationParams {
    pub fn world_bounds(&self) -> AxisAlignedRect {
        AxisAlignedRect::new(
            Vec2::new(self.world_center.0, self.world_center.1),
            self.world_half_width,
            self.world_half_height,
        )
    }

    /// Replace center and half extents from a rectangle.
    pub fn set_world_bounds(&mut self, bounds: AxisAlignedRect) {
        self.world_center = (bounds.center.x, bounds.center.y);
        self.world_half_width = bounds.half_width;
        self.world_half_height = bounds.half_height;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_boids == 0 {
            return Err(ConfigError::InvalidPopulation);
        }

        let extents_ok = self.world_half_width.is_finite()
            && self.world_half_height.is_finite()
            && self.world_half_width > 0.0
            && self.world_half_height > 0.0;
        if !extents_ok {
            return Err(ConfigError::InvalidWorldBounds {
                half_width: self.world_half_width,
                half_height: self.world_half_height,
            });
        }
        check_finite("world_center.x", self.world_center.0)?;
        check_finite("world_center.y", self.world_center.1)?;
        // Small extents around a far center can round away to nothing
        let world = self.world_bounds();
        if !world.contains(world.center) {
            return Err(ConfigError::InvalidWorldBounds {
                half_width: self.world_half_width,
                half_height: self.world_half_height,
            });
        }

        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity);
        }

        check_finite("initial_speed", self.initial_speed)?;
        if self.initial_speed < 0.0 {
            return Err(ConfigError::Negative("initial_speed"));
        }

        self.flock.validate()
    }

    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        1..=5000
    }

    pub fn get_world_extent_range() -> std::ops::RangeInclusive<f32> {
        20.0..=1000.0
    }

    pub fn get_capacity_range() -> std::ops::RangeInclusive<usize> {
        1..=32
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(name))
    }
}
