//! Host nodes: the externally owned transform hierarchy colliders and
//! controllers read from.

use std::collections::BTreeMap;
use std::fmt;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Read-only transform queries the interaction core needs from a node.
pub trait HostNode {
    /// Local transform relative to the parent.
    fn local_matrix(&self) -> Mat4;

    /// Accumulated transform from the scene root.
    fn world_matrix(&self) -> Mat4;

    /// Translation part of the local transform.
    fn local_position(&self) -> Vec3 {
        self.local_matrix().w_axis.truncate()
    }

    /// Translation part of the world transform.
    fn world_position(&self) -> Vec3 {
        self.world_matrix().w_axis.truncate()
    }

    /// Rotation part of the world transform.
    fn world_orientation(&self) -> Quat {
        let (_, rotation, _) = self.world_matrix().to_scale_rotation_translation();
        rotation
    }
}

/// Lookup of host nodes by id. Lookups never take ownership.
pub trait SceneGraph {
    /// The node registered under `id`, if it still exists.
    fn host(&self, id: NodeId) -> Option<&dyn HostNode>;
}

/// Translation, rotation and scale of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent origin.
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder: set rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Compose into a matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A node owned by [`Scene`]; caches its world matrix.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    parent: Option<NodeId>,
    local: Transform,
    world: Mat4,
}

impl SceneNode {
    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Local transform.
    pub fn transform(&self) -> &Transform {
        &self.local
    }
}

impl HostNode for SceneNode {
    fn local_matrix(&self) -> Mat4 {
        self.local.matrix()
    }

    fn world_matrix(&self) -> Mat4 {
        self.world
    }
}

/// Minimal transform hierarchy. World matrices are refreshed eagerly on every
/// mutation, so reads after a mutation are always current.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn add_node(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.insert(name.into(), None, transform)
    }

    /// Add a node under `parent`. Returns `None` when the parent does not exist.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            tracing::warn!(%parent, "cannot add child to a missing node");
            return None;
        }
        Some(self.insert(name.into(), Some(parent), transform))
    }

    fn insert(&mut self, name: String, parent: Option<NodeId>, local: Transform) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        let parent_world = parent
            .and_then(|p| self.nodes.get(&p))
            .map_or(Mat4::IDENTITY, |p| p.world);
        self.nodes.insert(
            id,
            SceneNode {
                id,
                name,
                parent,
                world: parent_world * local.matrix(),
                local,
            },
        );
        id
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace a node's local transform. Returns `false` for unknown ids.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => node.local = transform,
            None => return false,
        }
        self.refresh_world(id);
        true
    }

    /// Move a node, keeping rotation and scale.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> bool {
        let Some(mut transform) = self.nodes.get(&id).map(|n| n.local) else {
            return false;
        };
        transform.translation = translation;
        self.set_transform(id, transform)
    }

    /// Rotate a node, keeping translation and scale.
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        let Some(mut transform) = self.nodes.get(&id).map(|n| n.local) else {
            return false;
        };
        transform.rotation = rotation;
        self.set_transform(id, transform)
    }

    /// Remove a node and its whole subtree, returning every removed id.
    pub fn remove_node(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        let mut removed = vec![id];
        let mut cursor = 0;
        while cursor < removed.len() {
            let current = removed[cursor];
            removed.extend(
                self.nodes
                    .values()
                    .filter(|n| n.parent == Some(current))
                    .map(|n| n.id),
            );
            cursor += 1;
        }
        for node in &removed {
            self.nodes.remove(node);
        }
        removed
    }

    fn refresh_world(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let parent_world = self
                .nodes
                .get(&current)
                .and_then(|n| n.parent)
                .and_then(|p| self.nodes.get(&p))
                .map_or(Mat4::IDENTITY, |p| p.world);
            if let Some(node) = self.nodes.get_mut(&current) {
                node.world = parent_world * node.local.matrix();
            }
            pending.extend(
                self.nodes
                    .values()
                    .filter(|n| n.parent == Some(current))
                    .map(|n| n.id),
            );
        }
    }
}

impl SceneGraph for Scene {
    fn host(&self, id: NodeId) -> Option<&dyn HostNode> {
        self.nodes.get(&id).map(|n| n as &dyn HostNode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn child_world_transform_composes_parent() {
        let mut scene = Scene::new();
        let parent = scene.add_node(
            "rig",
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        let child = scene
            .add_child(parent, "hand", Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)))
            .expect("parent exists");

        let node = scene.node(child).unwrap();
        assert!((node.world_position() - Vec3::new(0.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(node.local_position(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn moving_parent_refreshes_descendants() {
        let mut scene = Scene::new();
        let parent = scene.add_node("rig", Transform::default());
        let child = scene
            .add_child(parent, "hand", Transform::from_translation(Vec3::Y))
            .unwrap();

        assert!(scene.set_translation(parent, Vec3::new(0.0, 0.0, 5.0)));
        let world = scene.node(child).unwrap().world_position();
        assert!((world - Vec3::new(0.0, 1.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn remove_node_drops_subtree() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", Transform::default());
        let child = scene.add_child(root, "child", Transform::default()).unwrap();
        let other = scene.add_node("other", Transform::default());

        let removed = scene.remove_node(root);
        assert_eq!(removed, vec![root, child]);
        assert!(scene.host(child).is_none());
        assert!(scene.host(other).is_some());
        assert!(scene.add_child(root, "late", Transform::default()).is_none());
    }

    #[test]
    fn world_orientation_ignores_scale() {
        let mut scene = Scene::new();
        let rotation = Quat::from_rotation_x(0.3);
        let id = scene.add_node(
            "scaled",
            Transform::default()
                .with_rotation(rotation)
                .with_scale(Vec3::splat(2.0)),
        );
        let q = scene.host(id).unwrap().world_orientation();
        assert!(q.angle_between(rotation) < 1e-4);
    }
}
