//! Vertex-sampled ray-occlusion collider.
//!
//! Each sample vertex of the collider geometry is turned into a world-space
//! direction from the host origin. A ray is cast along it; if the target is hit
//! before the ray has travelled the vertex's distance, the vertex is embedded
//! in or behind the target and the host is colliding.

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use thiserror::Error;
use tracing::warn;
use vrinteract_core::{
    BoxGeometry, GeometrySampler, HostNode, NodeId, Ray, Raycast, SceneGraph, RAY_EPSILON,
};

/// Errors reported by collider queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColliderError {
    /// The collider is not attached, or its host no longer exists.
    ///
    /// The outcome of the test is unknown; it does not mean "no collision".
    #[error("collider has no host node")]
    NoHost,
    /// No collider is registered for the requested host.
    #[error("no collider is attached to {0}")]
    NotAttached(NodeId),
}

/// Occlusion collider bound to at most one host node.
pub struct Collider {
    geometry: Box<dyn GeometrySampler>,
    host: Option<NodeId>,
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("vertices", &self.geometry.vertex_count())
            .field("host", &self.host)
            .finish()
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::new(BoxGeometry::default())
    }
}

impl Collider {
    /// Create a detached collider sampling `geometry`.
    pub fn new(geometry: impl GeometrySampler + 'static) -> Self {
        Self {
            geometry: Box::new(geometry),
            host: None,
        }
    }

    /// Host this collider is attached to.
    pub fn host(&self) -> Option<NodeId> {
        self.host
    }

    /// Sample geometry.
    pub fn geometry(&self) -> &dyn GeometrySampler {
        self.geometry.as_ref()
    }

    /// Whether any sample vertex is occluded by `target` along its own
    /// direction from the host origin.
    pub fn test<S, T>(&self, scene: &S, target: &T) -> Result<bool, ColliderError>
    where
        S: SceneGraph + ?Sized,
        T: Raycast + ?Sized,
    {
        let host = self.resolve_host(scene)?;
        let origin = host.world_position();
        Ok(self.sample_offsets(host).any(|offset| {
            let reach = offset.length();
            reach > RAY_EPSILON && occluded(target, Ray::new(origin, offset), reach)
        }))
    }

    /// Like [`Collider::test`], but every ray is cast along `direction`.
    ///
    /// The distance threshold is still each vertex's own distance, and one
    /// ray is cast per vertex.
    pub fn test_direction<S, T>(
        &self,
        scene: &S,
        target: &T,
        direction: Vec3,
    ) -> Result<bool, ColliderError>
    where
        S: SceneGraph + ?Sized,
        T: Raycast + ?Sized,
    {
        let host = self.resolve_host(scene)?;
        let origin = host.world_position();
        Ok(self
            .sample_offsets(host)
            .any(|offset| occluded(target, Ray::new(origin, direction), offset.length())))
    }

    fn resolve_host<'s, S>(&self, scene: &'s S) -> Result<&'s dyn HostNode, ColliderError>
    where
        S: SceneGraph + ?Sized,
    {
        let Some(id) = self.host else {
            warn!("collider has no host node; occlusion test skipped");
            return Err(ColliderError::NoHost);
        };
        scene.host(id).ok_or_else(|| {
            warn!(host = %id, "collider host is missing from the scene; occlusion test skipped");
            ColliderError::NoHost
        })
    }

    /// World-space offsets from the host origin to each sample vertex.
    fn sample_offsets<'a>(&'a self, host: &dyn HostNode) -> impl Iterator<Item = Vec3> + 'a {
        let local = host.local_matrix();
        let local_position = host.local_position();
        let orientation = host.world_orientation();
        self.geometry
            .vertices()
            .iter()
            .map(move |&v| orientation * (local.transform_point3(v) - local_position))
    }
}

fn occluded<T: Raycast + ?Sized>(target: &T, ray: Ray, reach: f32) -> bool {
    target.raycast(&ray).is_some_and(|hit| hit.distance < reach)
}

/// Registry of colliders keyed by host node. A host carries at most one.
#[derive(Debug, Default)]
pub struct ColliderSet {
    colliders: HashMap<NodeId, Collider>,
}

impl ColliderSet {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `collider` to `host`.
    ///
    /// A collider already attached to the host is replaced; it is returned
    /// detached and a warning is logged.
    pub fn attach(&mut self, host: NodeId, mut collider: Collider) -> Option<Collider> {
        collider.host = Some(host);
        let mut previous = self.colliders.insert(host, collider)?;
        warn!(%host, "overwriting an existing collider");
        previous.host = None;
        Some(previous)
    }

    /// Detach and return the collider of `host`.
    pub fn detach(&mut self, host: NodeId) -> Option<Collider> {
        let mut collider = self.colliders.remove(&host)?;
        collider.host = None;
        Some(collider)
    }

    /// Drop colliders whose hosts were removed from the scene.
    pub fn remove_hosts(&mut self, removed: &[NodeId]) {
        for id in removed {
            self.colliders.remove(id);
        }
    }

    /// Collider attached to `host`.
    pub fn get(&self, host: NodeId) -> Option<&Collider> {
        self.colliders.get(&host)
    }

    /// Number of attached colliders.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no collider is attached.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Run [`Collider::test`] for the collider of `host`.
    pub fn test<S, T>(&self, host: NodeId, scene: &S, target: &T) -> Result<bool, ColliderError>
    where
        S: SceneGraph + ?Sized,
        T: Raycast + ?Sized,
    {
        self.get(host)
            .ok_or(ColliderError::NotAttached(host))?
            .test(scene, target)
    }

    /// Run [`Collider::test_direction`] for the collider of `host`.
    pub fn test_direction<S, T>(
        &self,
        host: NodeId,
        scene: &S,
        target: &T,
        direction: Vec3,
    ) -> Result<bool, ColliderError>
    where
        S: SceneGraph + ?Sized,
        T: Raycast + ?Sized,
    {
        self.get(host)
            .ok_or(ColliderError::NotAttached(host))?
            .test_direction(scene, target, direction)
    }
}
