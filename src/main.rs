/*
 * Quadtree Boids Viewer
 *
 * Opens a window running the flock simulation and draws the quadtree node
 * boundaries and boid positions as a debug overlay. Sliders adjust the
 * flocking tunables live; population and world changes apply on reset.
 *
 * Log output is controlled through RUST_LOG, e.g. RUST_LOG=quadtree_boids=debug.
 */

mod app;
mod camera;
mod input;
mod renderer;
mod ui;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    nannou::app(app::model)
        .update(app::update)
        .run();
}
