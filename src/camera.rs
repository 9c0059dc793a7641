/*
 * Camera Module
 *
 * Maps between world space (quadtree coordinates, +Y up) and the nannou
 * window. The camera stores the world point shown at the window center and
 * a pixels-per-world-unit scale. The mouse pans by grabbing a world point
 * and zooms around the cursor.
 */

use nannou::prelude::*;

use quadtree_boids::AxisAlignedRect;

// Share of the window the world fills after a fit
const FIT_MARGIN: f32 = 0.9;
// Scale change per wheel line
const ZOOM_STEP: f32 = 1.1;

pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    // Screen position of the cursor at the previous drag event
    drag_anchor: Option<Vec2>,
}

impl Camera {
    /// Center on `world` and zoom so it fills the window.
    pub fn fit(world: &AxisAlignedRect, window_rect: Rect) -> Self {
        let scale_x = window_rect.w() / (2.0 * world.half_width);
        let scale_y = window_rect.h() / (2.0 * world.half_height);
        let zoom = scale_x.min(scale_y) * FIT_MARGIN;

        Self {
            position: vec2(world.center.x, world.center.y),
            zoom,
            min_zoom: zoom * 0.1,
            max_zoom: zoom * 20.0,
            drag_anchor: None,
        }
    }

    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        window_rect.xy() + (point - self.position) * self.zoom
    }

    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        self.position + (point - window_rect.xy()) / self.zoom
    }

    /// Scale by `ZOOM_STEP` per wheel line, keeping the world point under
    /// `cursor` fixed on screen.
    pub fn zoom_at(&mut self, lines: f32, cursor: Vec2, window_rect: Rect) {
        let pinned = self.screen_to_world(cursor, window_rect);
        self.zoom = (self.zoom * ZOOM_STEP.powf(lines)).clamp(self.min_zoom, self.max_zoom);
        self.position = pinned - (cursor - window_rect.xy()) / self.zoom;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn start_drag(&mut self, cursor: Vec2) {
        self.drag_anchor = Some(cursor);
    }

    // The grabbed world point follows the cursor
    pub fn drag(&mut self, cursor: Vec2) {
        if let Some(anchor) = self.drag_anchor.replace(cursor) {
            self.position -= (cursor - anchor) / self.zoom;
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    fn camera() -> Camera {
        Camera::fit(&AxisAlignedRect::square(glam::Vec2::new(50.0, -20.0), 100.0), window())
    }

    #[test]
    fn fit_centers_the_world_inside_the_window() {
        let camera = camera();
        assert_eq!(camera.world_to_screen(vec2(50.0, -20.0), window()), Vec2::ZERO);

        let corner = camera.world_to_screen(vec2(150.0, 80.0), window());
        assert!(corner.x < 400.0 && corner.y < 300.0);
        assert!((corner.y - 270.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_keeps_the_point_under_the_cursor() {
        let mut camera = camera();
        let cursor = vec2(120.0, -75.0);
        let before = camera.screen_to_world(cursor, window());

        camera.zoom_at(3.0, cursor, window());

        let after = camera.screen_to_world(cursor, window());
        assert!(before.distance(after) < 1e-3);
        assert!(camera.zoom <= camera.max_zoom);
    }

    #[test]
    fn drag_moves_the_view_with_the_cursor() {
        let mut camera = camera();
        let grabbed = camera.screen_to_world(vec2(10.0, 10.0), window());

        camera.start_drag(vec2(10.0, 10.0));
        camera.drag(vec2(60.0, -30.0));
        camera.end_drag();

        assert!(!camera.is_dragging());
        assert!(camera.screen_to_world(vec2(60.0, -30.0), window()).distance(grabbed) < 1e-3);
    }
}
