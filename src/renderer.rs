/*
 * Renderer Module
 *
 * This module draws the debug overlay for the simulation:
 * - every quadtree node boundary as an outline
 * - every boid as a point
 * - the focus boid (index 0) in red with its perception circle, heading
 *   and the neighbors it currently accepts highlighted in purple
 */

use nannou::prelude::*;

use quadtree_boids::AxisAlignedRect;

use crate::app::Model;
use crate::camera::Camera;
use crate::ui;

const POINT_SIZE: f32 = 4.0;
const FOCUS_INDEX: usize = 0;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;
    let sim = &model.sim;

    if model.settings.show_quadtree {
        for rect in sim.boundaries() {
            draw_outline(&draw, camera, window_rect, &rect, rgba(1.0, 1.0, 1.0, 0.35));
        }
    } else {
        draw_outline(&draw, camera, window_rect, sim.world_bounds(), rgba(0.3, 0.3, 0.3, 1.0));
    }

    for (i, (position, _)) in sim.agents().iter().enumerate() {
        let color = if model.settings.show_focus && i == FOCUS_INDEX {
            rgba(1.0, 0.0, 0.0, 1.0)
        } else {
            rgba(0.0, 1.0, 0.0, 1.0)
        };
        draw.ellipse()
            .xy(to_screen(camera, window_rect, position.x, position.y))
            .radius(POINT_SIZE / 2.0)
            .color(color);
    }

    if model.settings.show_focus {
        draw_focus(&draw, model, window_rect);
    }

    if model.settings.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, sim.len());
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        tracing::error!(?err, "failed to render frame");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        tracing::error!(?err, "failed to render ui");
    }
}

// Perception circle, heading and accepted neighbors of the focus boid
fn draw_focus(draw: &Draw, model: &Model, window_rect: Rect) {
    let camera = &model.camera;
    let Some(focus) = model.sim.boids().get(FOCUS_INDEX) else {
        return;
    };

    let center = to_screen(camera, window_rect, focus.position.x, focus.position.y);
    let radius = model.sim.params().flock.neighbor_distance * camera.zoom;

    draw.ellipse()
        .xy(center)
        .radius(radius)
        .no_fill()
        .stroke(RED)
        .stroke_weight(1.0);

    let tip = focus.position + focus.forward() * model.sim.params().flock.neighbor_distance;
    draw.arrow()
        .start(center)
        .end(to_screen(camera, window_rect, tip.x, tip.y))
        .color(YELLOW)
        .stroke_weight(1.5);

    for neighbor in model.sim.neighbors_of(FOCUS_INDEX) {
        draw.ellipse()
            .xy(to_screen(camera, window_rect, neighbor.position.x, neighbor.position.y))
            .radius(POINT_SIZE * 0.75)
            .color(PURPLE);
    }
}

fn draw_outline(draw: &Draw, camera: &Camera, window_rect: Rect, rect: &AxisAlignedRect, color: Rgba) {
    let center = to_screen(camera, window_rect, rect.center.x, rect.center.y);
    let size = vec2(rect.half_width, rect.half_height) * 2.0 * camera.zoom;

    draw.rect()
        .xy(center)
        .wh(size)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(color);
}

#[inline]
fn to_screen(camera: &Camera, window_rect: Rect, x: f32, y: f32) -> Point2 {
    camera.world_to_screen(vec2(x, y), window_rect)
}
