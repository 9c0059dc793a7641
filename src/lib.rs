/*
 * Quadtree Boids - Module Definitions
 *
 * A boid flocking simulation whose neighbor lookups go through a region
 * quadtree rebuilt every step. The host drives `FlockSimulation::advance`
 * and reads agents and quadtree boundaries back for its debug overlay.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use error::ConfigError;
pub use geometry::AxisAlignedRect;
pub use params::{FlockParams, SimulationParams};
pub use quadtree::{Point, QuadTree};
pub use simulation::{FlockSimulation, StepStats};

// Define modules
pub mod boid;
pub mod error;
pub mod geometry;
pub mod params;
pub mod physics;
pub mod quadtree;
pub mod simulation;
