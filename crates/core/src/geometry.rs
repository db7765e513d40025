//! Sampled and raycastable geometry.

use glam::{Quat, Vec2, Vec3};
use thiserror::Error;

use crate::ray::{intersect_triangle, Ray, RayHit, Raycast, RAY_EPSILON};

/// Errors raised while building meshes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {len} vertices")]
    IndexOutOfRange {
        /// Triangle slot that carried the bad index.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        len: usize,
    },
}

/// A fixed, ordered sequence of local-space vertex positions.
pub trait GeometrySampler {
    /// Vertex positions in local space, in a stable order.
    fn vertices(&self) -> &[Vec3];

    /// Number of sample vertices.
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }
}

impl GeometrySampler for Vec<Vec3> {
    fn vertices(&self) -> &[Vec3] {
        self
    }
}

/// Axis-aligned box centred on the origin, sampled at its eight corners.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    size: Vec3,
    corners: Vec<Vec3>,
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl BoxGeometry {
    /// Create a box with the given extents.
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let mut corners = Vec::with_capacity(8);
        for &z in &[half.z, -half.z] {
            for &y in &[half.y, -half.y] {
                for &x in &[half.x, -half.x] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        Self {
            size: Vec3::new(width, height, depth),
            corners,
        }
    }

    /// Full extents of the box.
    pub fn size(&self) -> Vec3 {
        self.size
    }
}

impl GeometrySampler for BoxGeometry {
    fn vertices(&self) -> &[Vec3] {
        &self.corners
    }
}

/// Indexed triangle mesh, usually stored in world space when used as a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build a mesh, validating every index.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        for (slot, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= positions.len() {
                    return Err(MeshError::IndexOutOfRange {
                        triangle: slot,
                        index,
                        len: positions.len(),
                    });
                }
            }
        }
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Build a non-indexed mesh from loose triangles.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [Vec3; 3]>) -> Self {
        let mut mesh = Self::default();
        for tri in triangles {
            mesh.push_triangle(tri);
        }
        mesh
    }

    /// Two-triangle quad from corners given in winding order.
    pub fn quad(corners: [Vec3; 4]) -> Self {
        Self {
            positions: corners.to_vec(),
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Closed box around `center` with the given half extents.
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        let positions = BoxGeometry::new(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            half_extents.z * 2.0,
        )
        .vertices()
        .iter()
        .map(|&v| v + center)
        .collect();
        // Corner order from BoxGeometry: bit 0 = -x, bit 1 = -y, bit 2 = -z
        let triangles = vec![
            [0, 1, 3], [0, 3, 2], // +z
            [4, 6, 7], [4, 7, 5], // -z
            [0, 2, 6], [0, 6, 4], // +x
            [1, 5, 7], [1, 7, 3], // -x
            [0, 4, 5], [0, 5, 1], // +y
            [2, 3, 7], [2, 7, 6], // -y
        ];
        Self {
            positions,
            triangles,
        }
    }

    /// Append a loose triangle.
    pub fn push_triangle(&mut self, tri: [Vec3; 3]) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&tri);
        self.triangles.push([base, base + 1, base + 2]);
    }

    /// Remove a face by index, returning its corners. Vertices are kept.
    pub fn remove_triangle(&mut self, index: usize) -> Option<[Vec3; 3]> {
        if index >= self.triangles.len() {
            return None;
        }
        let tri = self.triangles.remove(index);
        Some(tri.map(|i| self.positions[i as usize]))
    }

    /// Corners of the triangle at `index`.
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        self.triangles
            .get(index)
            .map(|tri| tri.map(|i| self.positions[i as usize]))
    }

    /// Iterate over all triangles as corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles
            .iter()
            .map(|tri| tri.map(|i| self.positions[i as usize]))
    }

    /// Number of faces.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl GeometrySampler for TriangleMesh {
    fn vertices(&self) -> &[Vec3] {
        &self.positions
    }
}

impl Raycast for TriangleMesh {
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.triangles()
            .filter_map(|[a, b, c]| intersect_triangle(ray, a, b, c))
            .min_by(f32::total_cmp)
            .map(|distance| RayHit {
                point: ray.at(distance),
                distance,
            })
    }
}

/// Oriented flat rectangle; the local +Z axis is its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// World-space centre.
    pub center: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Width (local X) and height (local Y).
    pub size: Vec2,
}

impl Quad {
    /// Axis-aligned quad facing +Z.
    pub fn new(center: Vec3, width: f32, height: f32) -> Self {
        Self {
            center,
            orientation: Quat::IDENTITY,
            size: Vec2::new(width, height),
        }
    }

    /// Builder: set orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Unit normal in world space.
    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Corners in plane-geometry order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Vec3; 4] {
        let right = self.orientation * Vec3::X * (self.size.x * 0.5);
        let up = self.orientation * Vec3::Y * (self.size.y * 0.5);
        [
            self.center - right + up,
            self.center + right + up,
            self.center - right - up,
            self.center + right - up,
        ]
    }
}

impl Raycast for Quad {
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let normal = self.normal();
        let denom = ray.direction.dot(normal);

        // Ray parallel to the quad
        if denom.abs() < RAY_EPSILON {
            return None;
        }

        let distance = (self.center - ray.origin).dot(normal) / denom;
        if distance < 0.0 {
            return None;
        }

        let point = ray.at(distance);
        let local = self.orientation.inverse() * (point - self.center);
        let half = self.size * 0.5;
        (local.x.abs() <= half.x && local.y.abs() <= half.y).then_some(RayHit { point, distance })
    }
}
