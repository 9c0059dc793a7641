/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for the flock tunables, the
 * construction parameters applied on reset, and the overlay toggles.
 */

use nannou_egui::{egui, Egui};

use quadtree_boids::{FlockParams, SimulationParams};

use crate::app::{DebugInfo, ViewSettings};

// What the UI asked for this frame
#[derive(Default)]
pub struct UiChanges {
    pub reset: bool,
    pub tunables: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    draft: &mut SimulationParams,
    settings: &mut ViewSettings,
    debug_info: &DebugInfo,
) -> UiChanges {
    let mut changes = UiChanges::default();
    let before = draft.flock;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(egui::Slider::new(&mut draft.num_boids, SimulationParams::get_num_boids_range()).text("Number of Boids"));
                ui.add(egui::Slider::new(&mut draft.world_half_width, SimulationParams::get_world_extent_range()).text("World Half Width"));
                ui.add(egui::Slider::new(&mut draft.world_half_height, SimulationParams::get_world_extent_range()).text("World Half Height"));
                ui.add(egui::Slider::new(&mut draft.capacity, SimulationParams::get_capacity_range()).text("Node Capacity"));

                if ui.button("Reset Boids").clicked() {
                    changes.reset = true;
                }
            });

            ui.collapsing("Flocking Behavior", |ui| {
                let flock = &mut draft.flock;
                ui.add(egui::Slider::new(&mut flock.separation_weight, FlockParams::get_weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut flock.alignment_weight, FlockParams::get_weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut flock.cohesion_weight, FlockParams::get_weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut flock.neighbor_distance, FlockParams::get_neighbor_distance_range()).text("Neighbor Distance"));
                ui.add(egui::Slider::new(&mut flock.neighbor_angle_deg, FlockParams::get_angle_range()).text("Neighbor Angle"));
                ui.add(egui::Slider::new(&mut flock.min_speed, FlockParams::get_min_speed_range()).text("Min Speed"));
                ui.add(egui::Slider::new(&mut flock.wall_margin, FlockParams::get_wall_margin_range()).text("Wall Margin"));
                ui.add(egui::Slider::new(&mut flock.wall_max_force, FlockParams::get_wall_force_range()).text("Wall Force"));
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut draft.enable_parallel, "Enable Parallel Processing");
                ui.add(egui::Slider::new(&mut settings.time_scale, 0.1..=4.0).text("Time Scale"));

                ui.separator();

                let stats = &debug_info.stats;
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Quadtree nodes: {}", stats.nodes));
                ui.label(format!("Neighbor candidates: {}", stats.candidates));
                ui.label(format!("Neighbors accepted: {}", stats.neighbors));
                ui.label(format!("Off-world boids: {}", stats.dropped));
            });

            ui.checkbox(&mut settings.show_quadtree, "Show Quadtree");
            ui.checkbox(&mut settings.show_focus, "Show Focus Boid");
            ui.checkbox(&mut settings.show_debug, "Show Debug Info");
            ui.checkbox(&mut settings.pause_simulation, "Pause Simulation");
        });

    changes.tunables = draft.flock != before;
    changes
}

// Draw debug information on the screen
pub fn draw_debug_info(
    draw: &nannou::Draw,
    debug_info: &DebugInfo,
    window_rect: nannou::geom::Rect,
    boids_len: usize,
) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 200.0;
    let panel_height = line_height * 4.0 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width / 2.0;
    let text_y = window_rect.top() - margin;

    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Step: {}", debug_info.stats.step),
        format!("Boids: {}", boids_len),
        format!("Nodes: {}", debug_info.stats.nodes),
    ];

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(text_x, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
