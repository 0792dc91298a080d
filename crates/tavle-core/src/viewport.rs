//! Viewport transform between screen space and the infinite world plane.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom scale.
pub const MIN_SCALE: f64 = 0.05;
/// Maximum allowed zoom scale.
pub const MAX_SCALE: f64 = 8.0;
/// How much one wheel unit changes the scale when zooming.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

/// Maps between screen-space pointer coordinates and world coordinates.
///
/// Owns the pan offset and zoom scale. A world point `w` appears on screen at
/// `w * scale + pan`; the inverse is used for input handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset in screen units.
    pub pan: Vec2,
    /// Current zoom scale, kept within [`MIN_SCALE`, `MAX_SCALE`].
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform converting world to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan.x,
            world.y * self.scale + self.pan.y,
        )
    }

    /// Pan the viewport by a delta in screen units.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom by a wheel delta, keeping the given screen point fixed.
    ///
    /// The world point under the cursor before the zoom is still under the
    /// cursor afterwards, so zooming never makes the canvas jump.
    pub fn zoom_around(&mut self, screen: Point, delta: f64) {
        let new_scale = (self.scale + delta * ZOOM_SENSITIVITY).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let ratio = new_scale / self.scale;
        self.pan = Vec2::new(
            screen.x - (screen.x - self.pan.x) * ratio,
            screen.y - (screen.y - self.pan.y) * ratio,
        );
        self.scale = new_scale;
    }

    /// Convert a fixed screen-space length (e.g. a grab handle) to world units
    /// at the current zoom.
    pub fn screen_len_to_world(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let vp = Viewport::new();
        let screen = Point::new(100.0, 200.0);
        let world = vp.screen_to_world(screen);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_pan_and_scale() {
        let mut vp = Viewport::new();
        vp.pan = Vec2::new(50.0, 100.0);
        vp.scale = 2.0;
        let world = vp.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut vp = Viewport::new();
        vp.pan = Vec2::new(30.0, -20.0);
        vp.scale = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = vp.screen_to_world(vp.world_to_screen(original));

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut vp = Viewport::new();
        vp.pan = Vec2::new(12.0, -7.0);
        vp.scale = 1.3;

        let cursor = Point::new(400.0, 250.0);
        let before = vp.screen_to_world(cursor);
        vp.zoom_around(cursor, 500.0);
        let after = vp.screen_to_world(cursor);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = Viewport::new();
        vp.zoom_around(Point::ZERO, -1e9);
        assert!((vp.scale - MIN_SCALE).abs() < f64::EPSILON);

        vp.scale = 1.0;
        vp.zoom_around(Point::ZERO, 1e9);
        assert!((vp.scale - MAX_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_size_scales_inversely() {
        let mut vp = Viewport::new();
        vp.scale = 4.0;
        assert!((vp.screen_len_to_world(16.0) - 4.0).abs() < f64::EPSILON);
        vp.scale = 0.5;
        assert!((vp.screen_len_to_world(16.0) - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_by() {
        let mut vp = Viewport::new();
        vp.pan_by(Vec2::new(10.0, 20.0));
        assert!((vp.pan.x - 10.0).abs() < f64::EPSILON);
        assert!((vp.pan.y - 20.0).abs() < f64::EPSILON);
    }
}
