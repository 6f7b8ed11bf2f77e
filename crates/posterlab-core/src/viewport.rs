//! Viewport module for fit-to-screen scale, user zoom and pan.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Screen padding kept around the poster when fitting it to the viewport.
pub const FIT_PADDING: f64 = 40.0;

/// Viewport maps the fixed poster canvas onto the on-screen area.
///
/// The effective scale is the fit-to-viewport scale times the user zoom, so
/// pointer deltas divided by it are canvas units regardless of screen size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// On-screen area available to the canvas, in screen pixels.
    pub screen: Size,
    /// Poster size in canvas units.
    pub canvas: Size,
    /// Padding kept on every side when fitting.
    pub padding: f64,
    /// User zoom multiplier on top of the fit scale.
    pub zoom: f64,
    /// Pan offset in screen pixels.
    pub pan: Vec2,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            screen: Size::ZERO,
            canvas: Size::ZERO,
            padding: FIT_PADDING,
            zoom: 1.0,
            pan: Vec2::ZERO,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Viewport {
    pub fn new(screen: Size, canvas: Size) -> Self {
        Self {
            screen,
            canvas,
            ..Default::default()
        }
    }

    /// Scale at which the whole poster fits the screen area.
    ///
    /// Falls back to 1.0 until both sizes are known.
    pub fn fit_scale(&self) -> f64 {
        if self.canvas.is_zero_area() || self.screen.is_zero_area() {
            return 1.0;
        }
        let available = Size::new(
            (self.screen.width - self.padding * 2.0).max(1.0),
            (self.screen.height - self.padding * 2.0).max(1.0),
        );
        (available.width / self.canvas.width).min(available.height / self.canvas.height)
    }

    /// Fit scale times user zoom.
    pub fn effective_scale(&self) -> f64 {
        self.fit_scale() * self.zoom
    }

    /// Convert a pointer movement in screen pixels to canvas units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        let scale = self.effective_scale();
        if scale <= 0.0 {
            return delta;
        }
        delta / scale
    }

    /// Canvas-to-screen transform. The poster is centered in the screen area, then panned.
    ///
    /// Until the screen size is known the poster sits at the screen origin.
    pub fn transform(&self) -> Affine {
        let scale = self.effective_scale();
        let origin = if self.screen.is_zero_area() {
            Vec2::ZERO
        } else {
            Vec2::new(
                (self.screen.width - self.canvas.width * scale) / 2.0,
                (self.screen.height - self.canvas.height * scale) / 2.0,
            )
        };
        Affine::translate(origin + self.pan) * Affine::scale(scale)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Multiply the zoom by `factor`, clamped to the allowed range.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Pan the view by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Back to fit-to-screen with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }
}
