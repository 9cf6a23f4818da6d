//! Display transform of the current image. Never touches pixels.

use serde::Serialize;

/// Zoom and rotation applied when showing the current image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    /// Scale factor, 1.0 is actual size.
    pub scale: f64,
    /// Clockwise rotation in degrees: 0, 90, 180 or 270.
    pub rotation: u16,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0,
        }
    }
}

impl ViewTransform {
    /// Multiplies the scale by `step`.
    pub fn zoom_in(&mut self, step: f64) {
        self.scale *= step;
    }

    /// Divides the scale by `step`.
    pub fn zoom_out(&mut self, step: f64) {
        self.scale /= step;
    }

    /// Rotates 90° clockwise.
    pub fn rotate_right(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Rotates 90° counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.rotation = (self.rotation + 270) % 360;
    }

    /// Back to actual size, unrotated.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Size the image occupies on screen.
    pub fn display_size(&self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = if self.rotation % 180 == 0 {
            (width, height)
        } else {
            (height, width)
        };
        (
            (f64::from(w) * self.scale).round() as u32,
            (f64::from(h) * self.scale).round() as u32,
        )
    }
}
