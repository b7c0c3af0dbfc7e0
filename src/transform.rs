//! Pan/zoom view transform.
//!
//! The view maps document space to screen space with a uniform scale and a
//! screen-space offset: `screen = document * scale + offset`. Both roles own
//! one [`ViewTransform`] and route every pointer conversion through it.

use serde::{Deserialize, Serialize};

use crate::model::{BoundingBox, Point};

/// Width and height of a viewport or an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or negative), i.e. nothing can be fitted.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Represents pan/zoom view state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    /// Create a new transform with the given scale and offset.
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Create an identity transform (scale=1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Zoom factor for a wheel delta: `exp(-delta * sensitivity)`.
    ///
    /// Always strictly positive, so a positive scale stays positive.
    pub fn wheel_factor(delta: f64, sensitivity: f64) -> f64 {
        (-delta * sensitivity).exp()
    }

    /// Apply a screen-space pan delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the scale by `factor`, keeping the document point under
    /// `screen` fixed on screen.
    ///
    /// 1. Find the document point under the cursor with the pre-zoom view
    /// 2. Scale
    /// 3. Move the offset so the same document point lands back under the cursor
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn zoom_at_point(&mut self, screen: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("Ignoring zoom with invalid factor {}", factor);
            return;
        }

        let doc = self.screen_to_document(screen);
        self.scale *= factor;
        self.offset_x = screen.x - doc.x * self.scale;
        self.offset_y = screen.y - doc.y * self.scale;

        log::debug!(
            "🔍 Zoom-to-cursor: {:.3}x at ({:.1}, {:.1}), offset: ({:.1}, {:.1})",
            self.scale,
            screen.x,
            screen.y,
            self.offset_x,
            self.offset_y
        );
    }

    /// Fit content of `content` size into `viewport`, scaled by `margin` and centered.
    ///
    /// Returns false (and leaves the view untouched) when either size is degenerate.
    pub fn fit_to_bounds(&mut self, content: Size, viewport: Size, margin: f64) -> bool {
        if content.is_degenerate() || viewport.is_degenerate() {
            log::debug!("Fit skipped: content {:?}, viewport {:?}", content, viewport);
            return false;
        }

        let scale = (viewport.width / content.width).min(viewport.height / content.height) * margin;
        self.scale = scale;
        self.offset_x = (viewport.width - content.width * scale) / 2.0;
        self.offset_y = (viewport.height - content.height * scale) / 2.0;

        log::debug!(
            "Fit {}x{} into {}x{}: scale {:.3}",
            content.width,
            content.height,
            viewport.width,
            viewport.height,
            scale
        );
        true
    }

    /// Frame a document-space box: the largest scale (capped at `max_scale`)
    /// that fits the box inside the viewport minus `padding` on each side,
    /// with the box's top-left corner placed at the padding inset.
    ///
    /// Returns false when the padded viewport has no room left.
    pub fn frame_bounds(
        &mut self,
        bounds: &BoundingBox,
        viewport: Size,
        padding: f64,
        max_scale: f64,
    ) -> bool {
        let inner = Size::new(viewport.width - 2.0 * padding, viewport.height - 2.0 * padding);
        if inner.is_degenerate() {
            log::debug!("Frame skipped: viewport {:?} too small for padding", viewport);
            return false;
        }

        // A zero-extent box divides to infinity and falls back to the cap.
        let fit = (inner.width / bounds.width).min(inner.height / bounds.height);
        self.scale = fit.min(max_scale);
        self.offset_x = -bounds.x * self.scale + padding;
        self.offset_y = -bounds.y * self.scale + padding;
        true
    }

    /// Reset to the identity view.
    pub fn reset(&mut self) {
        *self = Self::identity();
        log::debug!("🔄 View reset");
    }

    /// Convert a screen point to document space.
    pub fn screen_to_document(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    /// Convert a document point to screen space.
    pub fn document_to_screen(&self, doc: Point) -> Point {
        Point::new(
            doc.x * self.scale + self.offset_x,
            doc.y * self.scale + self.offset_y,
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
