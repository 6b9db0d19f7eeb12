//! Ray primitives and intersection tests against scene geometry.

use glam::Vec3;

/// A ray in world space. `direction` is expected to be normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from center and full extents
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test. Returns the distance to the entry point, or to the exit point
    /// when the origin is inside the box.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = ray.direction.recip();

        let t1 = (self.min - ray.origin) * inv_dir;
        let t2 = (self.max - ray.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // NaN from a degenerate ray compares false against everything.
        if !tmin.is_finite() || !tmax.is_finite() {
            return None;
        }

        // Entire box is behind the origin.
        if tmax < 0.0 {
            return None;
        }

        if tmin > tmax {
            return None;
        }

        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Intersect a camera-facing quad centered on `center`.
///
/// Returns the distance along the ray and the UV of the hit (0..1 on both
/// axes, origin at the bottom-left corner).
pub fn ray_billboard_quad(
    ray: &Ray,
    center: Vec3,
    size: (f32, f32),
    camera_pos: Vec3,
) -> Option<(f32, (f32, f32))> {
    let to_camera = (camera_pos - center).normalize_or_zero();
    if to_camera == Vec3::ZERO {
        return None;
    }

    let right = Vec3::Y.cross(to_camera).normalize_or_zero();
    // Looking straight up or down: any horizontal axis works.
    let right = if right == Vec3::ZERO { Vec3::X } else { right };
    let up = to_camera.cross(right);

    let denom = ray.direction.dot(to_camera);
    if denom.abs() < 0.0001 {
        return None;
    }

    let t = (center - ray.origin).dot(to_camera) / denom;
    if t < 0.0 {
        return None;
    }

    let to_hit = ray.at(t) - center;
    let u = to_hit.dot(right);
    let v = to_hit.dot(up);
    let (half_width, half_height) = (size.0 * 0.5, size.1 * 0.5);

    if u.abs() <= half_width && v.abs() <= half_height {
        let uv = ((u + half_width) / size.0, (v + half_height) / size.1);
        Some((t, uv))
    } else {
        None
    }
}
