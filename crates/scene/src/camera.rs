//! Camera used to turn normalized pointer coordinates into world rays.

use crate::ray::Ray;
use glam::{Mat4, Vec2, Vec3};

/// View and projection matrices of the camera rendering the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-to-view transform
    pub view: Mat4,
    /// View-to-clip transform (depth range 0..1)
    pub projection: Mat4,
}

impl Camera {
    /// Create a camera from raw matrices
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Right-handed perspective camera at `eye` looking at `target`
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y_radians, aspect, near, far),
        }
    }

    /// Right-handed orthographic camera at `eye` looking at `target`
    pub fn orthographic(eye: Vec3, target: Vec3, half_width: f32, half_height: f32, far: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                0.0,
                far,
            ),
        }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }

    /// World-space ray through a point in normalized device coordinates
    /// (`-1..1` on both axes, y up).
    ///
    /// The ray starts on the near plane, so it is valid for perspective and
    /// orthographic projections alike.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = (self.projection * self.view).inverse();
        let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            std::f32::consts::FRAC_PI_4,
            1.0,
            0.1,
            100.0,
        )
    }
}
