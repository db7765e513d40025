#![warn(missing_docs)]
//! Collision primitives: vertex-sampled occlusion colliders and the
//! host-to-collider registry.

mod collider;

pub use collider::{Collider, ColliderError, ColliderSet};
