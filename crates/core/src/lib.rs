#![warn(missing_docs)]
//! Core primitives shared across the workspace.
//!
//! Rays and the intersection oracle live in [`ray`], sampled and raycastable
//! geometry in [`geometry`], and the host-node transform hierarchy in [`scene`].

pub mod geometry;
pub mod ray;
pub mod scene;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use geometry::{BoxGeometry, GeometrySampler, MeshError, Quad, TriangleMesh};
pub use ray::{intersect_triangle, Ray, RayHit, Raycast, RAY_EPSILON};
pub use scene::{HostNode, NodeId, Scene, SceneGraph, SceneNode, Transform};

/// Frame counter for the external tick loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick of any session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Simulated seconds elapsed at `tick_rate` ticks per second.
    pub fn seconds(self, tick_rate: f32) -> f32 {
        if tick_rate <= 0.0 {
            return 0.0;
        }
        self.0 as f32 / tick_rate
    }
}
