/*
 * Application Module
 *
 * This module defines the viewer model and its update loop. The viewer is a
 * host for FlockSimulation: it owns the window and UI, feeds the frame delta
 * into `advance`, and pushes tunable changes back through `reconfigure`.
 * Changes that affect construction (population, world size, capacity) only
 * take effect when the flock is reset.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::time::Duration;
use tracing::{error, info};

use quadtree_boids::{FlockSimulation, SimulationParams, StepStats};

use crate::camera::Camera;
use crate::input;
use crate::renderer;
use crate::ui;

// Longest step fed to the simulation, so a stalled frame cannot teleport boids
const MAX_STEP: f32 = 1.0 / 20.0;

// Viewer-only toggles
pub struct ViewSettings {
    pub pause_simulation: bool,
    pub show_quadtree: bool,
    pub show_focus: bool,
    pub show_debug: bool,
    pub time_scale: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            pause_simulation: false,
            show_quadtree: true,
            show_focus: true,
            show_debug: true,
            time_scale: 1.0,
        }
    }
}

// Debug information to display
#[derive(Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub stats: StepStats,
}

// Main model for the application
pub struct Model {
    pub sim: FlockSimulation,
    // Parameters edited by the UI; applied on reset or reconfigure
    pub draft: SimulationParams,
    pub settings: ViewSettings,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Quadtree Boids")
        .size(1024, 768)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to open viewer window");

    let window = app.window(window_id).expect("viewer window vanished");
    let egui = Egui::from_window(&window);

    let draft = SimulationParams::default();
    let sim = match FlockSimulation::new(draft.clone()) {
        Ok(sim) => sim,
        Err(err) => panic!("default parameters rejected: {err}"),
    };

    let camera = Camera::fit(sim.world_bounds(), app.window_rect());

    Model {
        sim,
        draft,
        settings: ViewSettings::default(),
        egui,
        debug_info: DebugInfo::default(),
        camera,
        mouse_position: Vec2::ZERO,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let changes = ui::update_ui(
        &mut model.egui,
        &mut model.draft,
        &mut model.settings,
        &model.debug_info,
    );

    if changes.reset {
        reset_flock(app, model);
    } else if changes.tunables {
        if let Err(err) = model.sim.reconfigure(model.draft.flock) {
            error!(%err, "rejected tunables from the UI");
            model.draft.flock = model.sim.params().flock;
        }
    }
    model.sim.set_parallel(model.draft.enable_parallel);

    if !model.settings.pause_simulation {
        let dt = update.since_last.as_secs_f32().min(MAX_STEP) * model.settings.time_scale;
        model.sim.advance(dt);
    }

    model.debug_info.stats = model.sim.last_step();
}

// Rebuild the flock from the edited parameters
fn reset_flock(app: &App, model: &mut Model) {
    match FlockSimulation::new(model.draft.clone()) {
        Ok(sim) => {
            info!(boids = sim.len(), "flock reset");
            model.camera = Camera::fit(sim.world_bounds(), app.window_rect());
            model.sim = sim;
        }
        Err(err) => {
            error!(%err, "could not reset flock");
            model.draft = model.sim.params().clone();
        }
    }
}
