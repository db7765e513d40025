//! Gaze-locked text shown a fixed distance in front of the head.

use glam::Vec3;
use vrinteract_core::HostNode;

/// Head-locked text block.
#[derive(Debug, Clone, PartialEq)]
pub struct Visor {
    /// Distance along the head's forward axis.
    pub distance: f32,
    /// Font size in world units.
    pub font_size: f32,
    text: String,
}

impl Default for Visor {
    fn default() -> Self {
        Self {
            distance: 0.45,
            font_size: 0.07,
            text: String::new(),
        }
    }
}

impl Visor {
    /// Visor at `distance` metres.
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// World position of the text for the given head node.
    pub fn world_position(&self, head: &dyn HostNode) -> Vec3 {
        head.world_position() + head.world_orientation() * Vec3::new(0.0, 0.0, -self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use vrinteract_core::{Scene, Transform};

    #[test]
    fn test_visor_follows_head() {
        let mut scene = Scene::new();
        let head = scene.add_node(
            "head",
            Transform::from_translation(Vec3::new(0.0, 1.6, 0.0))
                .with_rotation(glam::Quat::from_rotation_y(FRAC_PI_2)),
        );
        let mut visor = Visor::default();
        visor.set_text("Look here");

        let position = visor.world_position(scene.node(head).unwrap());
        assert!((position - Vec3::new(-0.45, 1.6, 0.0)).length() < 1e-5);
        assert_eq!(visor.text(), "Look here");
    }
}
