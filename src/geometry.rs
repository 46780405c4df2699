//! Plane geometry shared by hit testing, dragging and rendering.
//!
//! Everything here works on world coordinates except [`screen_to_world`] and
//! [`world_to_screen`], which are the only crossings between the two spaces.

/// Check if a point lies inside (or on) a circle.
///
/// The radius is taken by absolute value; a zero radius only matches the
/// exact center.
pub fn point_in_circle(px: f32, py: f32, cx: f32, cy: f32, radius: f32) -> bool {
    let dx = px - cx;
    let dy = py - cy;
    let r = radius.abs();
    dx * dx + dy * dy <= r * r
}

/// Distance from a point to the segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either end
/// measure to that endpoint. Zero-length segments reduce to point distance.
pub fn distance_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let seg_x = bx - ax;
    let seg_y = by - ay;
    let len_sq = seg_x * seg_x + seg_y * seg_y;

    let (nearest_x, nearest_y) = if len_sq == 0.0 {
        (ax, ay)
    } else {
        let t = (((px - ax) * seg_x + (py - ay) * seg_y) / len_sq).clamp(0.0, 1.0);
        (ax + t * seg_x, ay + t * seg_y)
    };

    let dx = px - nearest_x;
    let dy = py - nearest_y;
    (dx * dx + dy * dy).sqrt()
}

/// Convert a screen position to world coordinates: `(s - pan) / zoom`.
pub fn screen_to_world(sx: f32, sy: f32, pan_x: f32, pan_y: f32, zoom: f32) -> (f32, f32) {
    ((sx - pan_x) / zoom, (sy - pan_y) / zoom)
}

/// Inverse of [`screen_to_world`]: `w * zoom + pan`.
pub fn world_to_screen(wx: f32, wy: f32, pan_x: f32, pan_y: f32, zoom: f32) -> (f32, f32) {
    (wx * zoom + pan_x, wy * zoom + pan_y)
}

/// Angle of the direction from point 1 to point 2, in radians.
pub fn angle_between(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (y2 - y1).atan2(x2 - x1)
}

pub fn midpoint(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32) {
    ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
}

/// A straight segment between two world positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl Segment {
    pub fn new(start_x: f32, start_y: f32, end_x: f32, end_y: f32) -> Self {
        Self { start_x, start_y, end_x, end_y }
    }

    pub fn angle(&self) -> f32 {
        angle_between(self.start_x, self.start_y, self.end_x, self.end_y)
    }

    pub fn midpoint(&self) -> (f32, f32) {
        midpoint(self.start_x, self.start_y, self.end_x, self.end_y)
    }

    pub fn distance_to(&self, px: f32, py: f32) -> f32 {
        distance_to_segment(px, py, self.start_x, self.start_y, self.end_x, self.end_y)
    }

    /// Shift both endpoints sideways by `distance`.
    ///
    /// The shift is `(sin θ, -cos θ) * distance` where θ is the direction of
    /// the segment, so the two edges of a bidirectional pair land on opposite
    /// sides of the center line.
    pub fn offset_perpendicular(&self, distance: f32) -> Self {
        let angle = self.angle();
        let perp_x = angle.sin() * distance;
        let perp_y = -angle.cos() * distance;
        Self {
            start_x: self.start_x + perp_x,
            start_y: self.start_y + perp_y,
            end_x: self.end_x + perp_x,
            end_y: self.end_y + perp_y,
        }
    }
}
