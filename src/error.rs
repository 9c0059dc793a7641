//! Errors raised while configuring a simulation.

use thiserror::Error;

/// Rejected simulation parameters. Stepping itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be positive")]
    InvalidPopulation,

    #[error("world bounds must have positive, finite half extents with a distinct interior (got {half_width} x {half_height})")]
    InvalidWorldBounds { half_width: f32, half_height: f32 },

    #[error("neighbor distance must be positive and finite (got {0})")]
    InvalidNeighborDistance(f32),

    #[error("quadtree capacity must be between 1 and {}", crate::quadtree::MAX_CAPACITY)]
    InvalidCapacity,

    #[error("wall avoidance margin must be positive and finite (got {0})")]
    InvalidWallMargin(f32),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}
