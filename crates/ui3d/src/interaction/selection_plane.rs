//! Selection plane: an infinite plane built from a quad's corners, used to
//! map the pointer onto a fixed surface in explicit mode.

use glam::{Mat4, Vec3};
use vrinteract_core::{Quad, Ray, RAY_EPSILON};

use crate::components::Color;

/// Plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Plane through three points, with the normal following `(c - b) × (a - b)`.
    ///
    /// Collinear points yield a zero normal, which never intersects.
    pub fn from_coplanar_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (c - b).cross(a - b).normalize_or_zero();
        Self {
            normal,
            constant: -normal.dot(a),
        }
    }

    /// Signed distance from `point` to the plane.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Intersection of `ray` with the plane.
    ///
    /// `None` when the ray is parallel or the plane lies behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < RAY_EPSILON {
            return None;
        }
        let t = -(ray.origin.dot(self.normal) + self.constant) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }
}

/// Translucent quad the selection plane is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionQuad {
    /// Distance in front of the parent origin along -Z.
    pub distance: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub opacity: f32,
    /// Shown only in explicit mode.
    pub visible: bool,
}

impl SelectionQuad {
    pub fn new(distance: f32, color: Color, opacity: f32, width: f32, height: f32) -> Self {
        Self {
            distance,
            width,
            height,
            color,
            opacity,
            visible: false,
        }
    }

    /// Local position relative to the parent.
    pub fn local_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.distance)
    }

    /// World-space corners under `parent`, in plane-geometry order.
    pub fn world_corners(&self, parent: &Mat4) -> [Vec3; 4] {
        Quad::new(self.local_position(), self.width, self.height)
            .corners()
            .map(|corner| parent.transform_point3(corner))
    }
}

/// A selection quad and the plane last computed from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPlane {
    quad: SelectionQuad,
    parent: Mat4,
    plane: Plane,
}

impl SelectionPlane {
    /// Build the quad under `parent` and compute its plane once.
    pub fn new(quad: SelectionQuad, parent: Mat4) -> Self {
        let [a, b, c, _] = quad.world_corners(&parent);
        Self {
            quad,
            parent,
            plane: Plane::from_coplanar_points(a, b, c),
        }
    }

    /// Recompute the plane from three explicit points.
    pub fn configure(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.plane = Plane::from_coplanar_points(a, b, c);
    }

    /// Recompute the plane from the quad's current corners.
    pub fn refresh(&mut self) {
        let [a, b, c, _] = self.quad.world_corners(&self.parent);
        self.configure(a, b, c);
    }

    /// Project the pointer ray onto the plane.
    pub fn project(&self, ray: &Ray) -> Option<Vec3> {
        self.plane.intersect_ray(ray)
    }

    /// Move the quad. The plane keeps its old equation until [`Self::refresh`].
    pub fn set_distance(&mut self, distance: f32) {
        self.quad.distance = distance;
    }

    /// Replace the parent transform. Like [`Self::set_distance`], this does
    /// not recompute the plane.
    pub fn set_parent(&mut self, parent: Mat4) {
        self.parent = parent;
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn quad(&self) -> &SelectionQuad {
        &self.quad
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.quad.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coplanar_points_normal() {
        let plane = Plane::from_coplanar_points(
            Vec3::new(-1.0, 1.0, -2.0),
            Vec3::new(1.0, 1.0, -2.0),
            Vec3::new(-1.0, -1.0, -2.0),
        );
        // Top-left, top-right, bottom-left winds towards -Z.
        assert!((plane.normal - Vec3::NEG_Z).length() < 1e-6);
        assert!((plane.constant + 2.0).abs() < 1e-6);
        assert!(plane.distance_to_point(Vec3::new(3.0, 4.0, -2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::from_coplanar_points(Vec3::ZERO, Vec3::X, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert_eq!(plane.intersect_ray(&ray), None);
    }

    #[test]
    fn test_perpendicular_ray_lands_at_plane_distance() {
        let quad = SelectionQuad::new(2.5, Color::WHITE, 0.2, 0.5, 0.5);
        let selection = SelectionPlane::new(quad, Mat4::IDENTITY);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let point = selection.project(&ray).expect("plane ahead");
        assert!((point.distance(ray.origin) - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_plane_behind_origin_misses() {
        let selection = SelectionPlane::new(
            SelectionQuad::new(1.0, Color::WHITE, 0.2, 0.5, 0.5),
            Mat4::IDENTITY,
        );
        assert_eq!(selection.project(&Ray::new(Vec3::ZERO, Vec3::Z)), None);
    }

    #[test]
    fn test_plane_is_unbounded() {
        let selection = SelectionPlane::new(
            SelectionQuad::new(1.0, Color::WHITE, 0.2, 0.5, 0.5),
            Mat4::IDENTITY,
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::new(3.0, 0.0, -1.0));
        let point = selection.project(&ray).expect("hit outside the quad");
        assert!((point - Vec3::new(3.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_moving_the_quad_needs_refresh() {
        let mut selection = SelectionPlane::new(
            SelectionQuad::new(1.0, Color::WHITE, 0.2, 0.5, 0.5),
            Mat4::IDENTITY,
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        selection.set_distance(3.0);
        let stale = selection.project(&ray).unwrap();
        assert!((stale.z + 1.0).abs() < 1e-5);

        selection.refresh();
        let fresh = selection.project(&ray).unwrap();
        assert!((fresh.z + 3.0).abs() < 1e-5);

        selection.set_parent(Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        let stale = selection.project(&ray).unwrap();
        assert!((stale.z + 3.0).abs() < 1e-5);

        selection.refresh();
        let moved = selection.project(&ray).unwrap();
        assert!((moved.z + 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_parent_transform_places_the_quad() {
        let parent = Mat4::from_translation(Vec3::new(0.0, 1.2, -1.8));
        let selection = SelectionPlane::new(
            SelectionQuad::new(0.5, Color::WHITE, 0.2, 0.5, 0.5),
            parent,
        );
        let corners = selection.quad().world_corners(&parent);
        assert!((corners[0] - Vec3::new(-0.25, 1.45, -2.3)).length() < 1e-5);
        let ray = Ray::new(Vec3::new(0.0, 1.2, 0.0), Vec3::NEG_Z);
        let point = selection.project(&ray).unwrap();
        assert!((point.z + 2.3).abs() < 1e-5);
    }
}
