//! Rays and the ray-intersection oracle.

use glam::Vec3;

/// Tolerance used for parallel tests and self-intersection rejection.
pub const RAY_EPSILON: f32 = 1e-6;

/// A ray in world space. The direction is kept unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: Vec3,
    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero direction stays zero and never intersects anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Replace origin and direction in place (direction is normalized).
    pub fn set(&mut self, origin: Vec3, direction: Vec3) {
        self.origin = origin;
        self.direction = direction.normalize_or_zero();
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection reported by a [`Raycast`] target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray hit the target.
    pub point: Vec3,
    /// Distance from the ray origin to `point` (never negative).
    pub distance: f32,
}

/// The ray-intersection oracle: anything a ray can be tested against.
pub trait Raycast {
    /// Nearest intersection of `ray` with `self`, if any.
    fn raycast(&self, ray: &Ray) -> Option<RayHit>;
}

impl<T: Raycast + ?Sized> Raycast for &T {
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        (**self).raycast(ray)
    }
}

impl<T: Raycast + ?Sized> Raycast for Box<T> {
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        (**self).raycast(ray)
    }
}

/// Möller–Trumbore ray/triangle test. Both faces count as hits.
///
/// Returns the distance along the ray, or `None` on a miss or when the hit
/// lies at or behind the origin.
pub fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);

    // Ray parallel to the triangle plane
    if det.abs() < RAY_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    (t > RAY_EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn triangle_hit_from_either_side() {
        let a = Vec3::new(-1.0, -1.0, -3.0);
        let b = Vec3::new(1.0, -1.0, -3.0);
        let c = Vec3::new(0.0, 1.0, -3.0);

        let front = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let t = intersect_triangle(&front, a, b, c).expect("front hit");
        assert!((t - 3.0).abs() < 1e-5);

        let back = Ray::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z);
        let t = intersect_triangle(&back, a, b, c).expect("back hit");
        assert!((t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss_and_behind() {
        let a = Vec3::new(-1.0, -1.0, -3.0);
        let b = Vec3::new(1.0, -1.0, -3.0);
        let c = Vec3::new(0.0, 1.0, -3.0);

        let beside = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(intersect_triangle(&beside, a, b, c).is_none());

        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_triangle(&away, a, b, c).is_none());

        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(intersect_triangle(&parallel, a, b, c).is_none());
    }
}
