//! Scene fixtures shared by integration tests.

use glam::{EulerRot, Quat, Vec3};
use vrinteract_core::{NodeId, Scene, Transform, TriangleMesh};

/// Square wall of side `2 * half_extent` in the plane `z = center.z`.
pub fn wall_target(center: Vec3, half_extent: f32) -> TriangleMesh {
    let h = half_extent;
    TriangleMesh::quad([
        center + Vec3::new(-h, -h, 0.0),
        center + Vec3::new(h, -h, 0.0),
        center + Vec3::new(h, h, 0.0),
        center + Vec3::new(-h, h, 0.0),
    ])
}

/// Closed box target.
pub fn box_target(center: Vec3, half_extents: Vec3) -> TriangleMesh {
    TriangleMesh::cuboid(center, half_extents)
}

/// Controller orientation from yaw (about +Y) and pitch (about +X), radians.
pub fn controller_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Scene holding a single controller node.
pub fn controller_scene(position: Vec3, yaw: f32, pitch: f32) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let controller = scene.add_node(
        "controller",
        Transform::from_translation(position).with_rotation(controller_rotation(yaw, pitch)),
    );
    (scene, controller)
}

/// Rotate `controller` so its forward axis (-Z) points at `target`.
pub fn aim_at(scene: &mut Scene, controller: NodeId, target: Vec3) -> bool {
    let Some(origin) = scene.node(controller).map(|n| n.transform().translation) else {
        return false;
    };
    let direction = (target - origin).normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }
    scene.set_rotation(controller, Quat::from_rotation_arc(Vec3::NEG_Z, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrinteract_core::{HostNode, Ray, Raycast};

    #[test]
    fn aimed_controller_hits_the_wall_centre() {
        let (mut scene, controller) = controller_scene(Vec3::ZERO, 0.0, 0.0);
        let target = Vec3::new(1.0, 0.5, -4.0);
        assert!(aim_at(&mut scene, controller, target));

        let node = scene.node(controller).unwrap();
        let ray = Ray::new(node.world_position(), node.world_orientation() * Vec3::NEG_Z);
        let hit = wall_target(target, 0.5).raycast(&ray).expect("aimed ray hits");
        assert!((hit.point - target).length() < 1e-4);
    }

    #[test]
    fn yaw_turns_forward_to_the_left() {
        let rotation = controller_rotation(std::f32::consts::FRAC_PI_2, 0.0);
        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }
}
