//! Pointer coordinate mapping for canvases and sub-viewports.
//!
//! Pointer offsets arrive in CSS pixels with a top-left origin. Viewports are
//! described with a bottom-left origin (as renderers set them), so the
//! rectangle is flipped against the canvas' logical height. Logical sizes
//! prefer the styled size over the backing store so results do not change
//! with the device pixel ratio.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size descriptor of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Backing-store width in device pixels
    pub width: f32,
    /// Backing-store height in device pixels
    pub height: f32,
    /// Styled (CSS) width, when set
    #[serde(default)]
    pub style_width: Option<f32>,
    /// Styled (CSS) height, when set
    #[serde(default)]
    pub style_height: Option<f32>,
}

impl Canvas {
    /// Canvas without a styled size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            style_width: None,
            style_height: None,
        }
    }

    /// Builder: styled (CSS) size
    pub fn with_style_size(mut self, width: f32, height: f32) -> Self {
        self.style_width = Some(width);
        self.style_height = Some(height);
        self
    }

    /// Logical width, preferring the styled size
    pub fn logical_width(&self) -> f32 {
        self.style_width.unwrap_or(self.width)
    }

    /// Logical height, preferring the styled size
    pub fn logical_height(&self) -> f32 {
        self.style_height.unwrap_or(self.height)
    }

    /// Logical size, preferring the styled size
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.logical_width(), self.logical_height())
    }
}

/// Sub-region of the canvas, bottom-left origin, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Viewport bounds in canvas-local, top-left-origin pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    /// Left
    pub x1: f32,
    /// Right
    pub x2: f32,
    /// Top
    pub y1: f32,
    /// Bottom
    pub y2: f32,
}

impl ViewportRect {
    /// Width
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }
}

/// Bounds of `viewport` in the canvas' top-left pixel space
pub fn rectangle_of(canvas: &Canvas, viewport: &Viewport) -> ViewportRect {
    let height = canvas.logical_height();
    ViewportRect {
        x1: viewport.x,
        x2: viewport.x + viewport.width,
        y1: height - (viewport.y + viewport.height),
        y2: height - viewport.y,
    }
}

/// Whether `point` lies inside `viewport`. Without a viewport every point is
/// contained.
pub fn is_contained(canvas: &Canvas, viewport: Option<&Viewport>, point: Vec2) -> bool {
    match viewport {
        None => true,
        Some(viewport) => rectangle_of(canvas, viewport).contains(point),
    }
}

/// Whether the mapping target has a positive, finite area. Normalizing
/// against an empty canvas or viewport divides by zero.
pub fn has_area(canvas: &Canvas, viewport: Option<&Viewport>) -> bool {
    let size = match viewport {
        None => canvas.logical_size(),
        Some(viewport) => Vec2::new(viewport.width, viewport.height),
    };
    size.is_finite() && size.x > 0.0 && size.y > 0.0
}

/// Map a pointer offset to normalized device coordinates (`-1..1`, y up),
/// relative to `viewport` when given, else to the whole canvas.
pub fn to_normalized_coords(canvas: &Canvas, point: Vec2, viewport: Option<&Viewport>) -> Vec2 {
    let mut out = Vec2::ZERO;
    to_normalized_coords_into(canvas, point, viewport, &mut out);
    out
}

/// Like [`to_normalized_coords`], writing into `out`
pub fn to_normalized_coords_into(
    canvas: &Canvas,
    point: Vec2,
    viewport: Option<&Viewport>,
    out: &mut Vec2,
) {
    let (origin, size) = match viewport {
        None => (Vec2::ZERO, canvas.logical_size()),
        Some(viewport) => {
            let rect = rectangle_of(canvas, viewport);
            (Vec2::new(rect.x1, rect.y1), Vec2::new(rect.width(), rect.height()))
        }
    };
    let local = (point - origin) / size;
    out.x = local.x * 2.0 - 1.0;
    out.y = -(local.y * 2.0) + 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(1600.0, 1200.0).with_style_size(800.0, 600.0)
    }

    fn viewport() -> Viewport {
        Viewport::new(100.0, 50.0, 200.0, 100.0)
    }

    #[test]
    fn rectangle_flips_bottom_left_origin() {
        let rect = rectangle_of(&canvas(), &viewport());
        assert_eq!(
            rect,
            ViewportRect {
                x1: 100.0,
                x2: 300.0,
                y1: 450.0,
                y2: 550.0
            }
        );
    }

    #[test]
    fn logical_size_prefers_style() {
        assert_eq!(canvas().logical_height(), 600.0);
        assert_eq!(Canvas::new(640.0, 480.0).logical_width(), 640.0);
    }

    #[test]
    fn boundary_is_inclusive() {
        let c = canvas();
        let v = viewport();
        for point in [
            Vec2::new(100.0, 450.0),
            Vec2::new(300.0, 450.0),
            Vec2::new(100.0, 550.0),
            Vec2::new(300.0, 550.0),
        ] {
            assert!(is_contained(&c, Some(&v), point), "{point:?}");
        }
        for point in [
            Vec2::new(99.0, 500.0),
            Vec2::new(301.0, 500.0),
            Vec2::new(200.0, 449.0),
            Vec2::new(200.0, 551.0),
        ] {
            assert!(!is_contained(&c, Some(&v), point), "{point:?}");
        }
    }

    #[test]
    fn no_viewport_contains_everything() {
        assert!(is_contained(&canvas(), None, Vec2::new(-5000.0, 9000.0)));
    }

    #[test]
    fn viewport_center_and_corners() {
        let c = canvas();
        let v = viewport();
        assert_eq!(
            to_normalized_coords(&c, Vec2::new(200.0, 500.0), Some(&v)),
            Vec2::ZERO
        );
        assert_eq!(
            to_normalized_coords(&c, Vec2::new(100.0, 450.0), Some(&v)),
            Vec2::new(-1.0, 1.0)
        );
        assert_eq!(
            to_normalized_coords(&c, Vec2::new(300.0, 450.0), Some(&v)),
            Vec2::new(1.0, 1.0)
        );
        assert_eq!(
            to_normalized_coords(&c, Vec2::new(100.0, 550.0), Some(&v)),
            Vec2::new(-1.0, -1.0)
        );
        assert_eq!(
            to_normalized_coords(&c, Vec2::new(300.0, 550.0), Some(&v)),
            Vec2::new(1.0, -1.0)
        );
    }

    #[test]
    fn full_canvas_normalization_uses_logical_size() {
        let mut out = Vec2::splat(9.0);
        to_normalized_coords_into(&canvas(), Vec2::new(400.0, 300.0), None, &mut out);
        assert_eq!(out, Vec2::ZERO);
        assert_eq!(
            to_normalized_coords(&canvas(), Vec2::new(800.0, 0.0), None),
            Vec2::new(1.0, 1.0)
        );
    }

    #[test]
    fn empty_targets_have_no_area() {
        assert!(has_area(&canvas(), None));
        assert!(has_area(&canvas(), Some(&viewport())));
        assert!(!has_area(&Canvas::new(0.0, 0.0), None));
        assert!(!has_area(&Canvas::new(800.0, 600.0).with_style_size(0.0, 600.0), None));
        assert!(!has_area(&canvas(), Some(&Viewport::new(10.0, 10.0, 0.0, 0.0))));
        assert!(!has_area(&canvas(), Some(&Viewport::new(10.0, 10.0, -20.0, 40.0))));
    }
}
