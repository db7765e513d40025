//! Pointer rig: the controller ray plus its two indicator dots.

use glam::{Mat4, Vec3};
use vrinteract_core::{NodeId, Ray};

use super::raycaster::controller_ray;
use crate::components::Color;

/// A dot drawn where the pointer lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    /// World-space position.
    pub position: Vec3,
    pub visible: bool,
    pub color: Color,
}

impl Indicator {
    fn new(color: Color) -> Self {
        Self {
            position: Vec3::ZERO,
            visible: false,
            color,
        }
    }

    /// Move the dot to `position` and show it.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Ray and indicators derived from the bound controller.
#[derive(Debug, Clone)]
pub struct PointerRig {
    controller: Option<NodeId>,
    /// Ray recomputed each tick.
    pub ray: Ray,
    /// Free-aim dot at the element hit.
    pub dot: Indicator,
    /// Plane-locked dot used in explicit mode.
    pub dot_sel: Indicator,
    /// Whether the beam is drawn at all.
    pub visible: bool,
}

impl Default for PointerRig {
    fn default() -> Self {
        Self {
            controller: None,
            ray: Ray::default(),
            dot: Indicator::new(Color::WHITE),
            dot_sel: Indicator::new(Color::RED),
            visible: true,
        }
    }
}

impl PointerRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller the rig follows.
    pub fn controller(&self) -> Option<NodeId> {
        self.controller
    }

    pub fn bind(&mut self, controller: NodeId) {
        self.controller = Some(controller);
    }

    pub fn unbind(&mut self) -> Option<NodeId> {
        self.controller.take()
    }

    /// Recompute the ray from the controller's world matrix.
    pub fn update_ray(&mut self, world: &Mat4) {
        self.ray = controller_ray(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_rig_defaults() {
        let rig = PointerRig::new();
        assert!(rig.controller().is_none());
        assert!(!rig.dot.visible);
        assert!(!rig.dot_sel.visible);
        assert_eq!(rig.dot_sel.color, Color::RED);
    }

    #[test]
    fn test_update_ray_follows_controller() {
        let mut rig = PointerRig::new();
        let world = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::PI),
            Vec3::new(0.2, 1.4, 0.0),
        );
        rig.update_ray(&world);
        assert!((rig.ray.origin - Vec3::new(0.2, 1.4, 0.0)).length() < 1e-6);
        assert!((rig.ray.direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_indicator_place_and_hide() {
        let mut rig = PointerRig::new();
        rig.dot.place(Vec3::ONE);
        assert!(rig.dot.visible);
        assert_eq!(rig.dot.position, Vec3::ONE);
        rig.dot.hide();
        assert!(!rig.dot.visible);
    }
}
