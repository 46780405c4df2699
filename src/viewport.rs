//! Pan/zoom view transform.
//!
//! `screen = world * zoom + pan`. Click handling, dragging, the connection
//! preview and rendering all go through the same [`Viewport`].

use crate::config::EditorConfig;
use crate::geometry::{screen_to_world, world_to_screen};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        screen_to_world(sx, sy, self.pan_x, self.pan_y, self.zoom)
    }

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        world_to_screen(wx, wy, self.pan_x, self.pan_y, self.zoom)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom one wheel step around the screen point `(sx, sy)`.
    ///
    /// Negative `delta_y` zooms in. The world point under the cursor stays
    /// under the cursor. Returns `false` when the zoom is already at its
    /// limit and nothing changed.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, delta_y: f32, config: &EditorConfig) -> bool {
        let factor = if delta_y < 0.0 { config.zoom_step } else { 1.0 / config.zoom_step };
        let zoom = (self.zoom * factor).clamp(config.min_zoom, config.max_zoom);
        if zoom == self.zoom {
            return false;
        }

        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom = zoom;
        self.pan_x = sx - wx * zoom;
        self.pan_y = sy - wy * zoom;
        debug!("zoom {:.3} pan ({:.1}, {:.1})", self.zoom, self.pan_x, self.pan_y);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let vp = Viewport::default();
        assert_eq!(vp.screen_to_world(12.0, 34.0), (12.0, 34.0));
    }

    #[test]
    fn test_round_trip() {
        let vp = Viewport { pan_x: 40.0, pan_y: -20.0, zoom: 2.5 };
        let (wx, wy) = vp.screen_to_world(100.0, 200.0);
        let (sx, sy) = vp.world_to_screen(wx, wy);
        assert!((sx - 100.0).abs() < 1e-3);
        assert!((sy - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let config = EditorConfig::default();
        let mut vp = Viewport { pan_x: 15.0, pan_y: 25.0, zoom: 1.3 };
        let (cx, cy) = (320.0, 240.0);
        let before = vp.screen_to_world(cx, cy);

        for delta in [-1.0, -1.0, 1.0, -3.0, 5.0] {
            vp.zoom_at(cx, cy, delta, &config);
            let after = vp.screen_to_world(cx, cy);
            assert!((after.0 - before.0).abs() < 1e-3);
            assert!((after.1 - before.1).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zoom_direction_and_step() {
        let config = EditorConfig::default();
        let mut vp = Viewport::default();
        assert!(vp.zoom_at(0.0, 0.0, -100.0, &config));
        assert!((vp.zoom - 1.1).abs() < 1e-6);
        assert!(vp.zoom_at(0.0, 0.0, 100.0, &config));
        assert!((vp.zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamps() {
        let config = EditorConfig::default();
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_at(0.0, 0.0, -1.0, &config);
        }
        assert_eq!(vp.zoom, 5.0);
        assert!(!vp.zoom_at(0.0, 0.0, -1.0, &config));

        for _ in 0..200 {
            vp.zoom_at(0.0, 0.0, 1.0, &config);
        }
        assert_eq!(vp.zoom, 0.1);
    }

    #[test]
    fn test_pan_by() {
        let mut vp = Viewport::default();
        vp.pan_by(10.0, -5.0);
        assert_eq!(vp.screen_to_world(10.0, -5.0), (0.0, 0.0));
    }
}
