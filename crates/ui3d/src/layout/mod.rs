//! 3D UI Layout System
//!
//! Flow layout for blocks on a flat panel: children are stacked along the
//! parent's direction and the group is centred on the parent. Each nesting
//! level is pushed `depth_step` towards the viewer.

use glam::{Vec2, Vec3};

use crate::components::ElementId;

/// Main axis along which children are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right.
    Row,
    /// Top to bottom.
    #[default]
    Column,
}

/// One block in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Element positioned by this node, if any.
    pub key: Option<ElementId>,
    /// Fixed size; `Vec2::ZERO` sizes the node to its children.
    pub size: Vec2,
    pub margin: f32,
    pub direction: Direction,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Fixed-size block.
    pub fn block(key: Option<ElementId>, width: f32, height: f32) -> Self {
        Self {
            key,
            size: Vec2::new(width, height),
            margin: 0.0,
            direction: Direction::Column,
            children: Vec::new(),
        }
    }

    /// Content-sized container.
    pub fn container(direction: Direction) -> Self {
        Self {
            key: None,
            size: Vec2::ZERO,
            margin: 0.0,
            direction,
            children: Vec::new(),
        }
    }

    /// Builder: set margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Builder: set stacking direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: LayoutNode) -> Self {
        self.children.push(child);
        self
    }

    /// Size without margins.
    pub fn extent(&self) -> Vec2 {
        if self.size != Vec2::ZERO {
            return self.size;
        }
        let mut main = 0.0_f32;
        let mut cross = 0.0_f32;
        for child in &self.children {
            let outer = child.outer();
            match self.direction {
                Direction::Row => {
                    main += outer.x;
                    cross = cross.max(outer.y);
                }
                Direction::Column => {
                    main += outer.y;
                    cross = cross.max(outer.x);
                }
            }
        }
        match self.direction {
            Direction::Row => Vec2::new(main, cross),
            Direction::Column => Vec2::new(cross, main),
        }
    }

    /// Size including margins.
    pub fn outer(&self) -> Vec2 {
        self.extent() + Vec2::splat(2.0 * self.margin)
    }
}

/// Compute the centre of every keyed node with the root centred on `origin`.
pub fn arrange(root: &LayoutNode, origin: Vec3, depth_step: f32) -> Vec<(ElementId, Vec3)> {
    let mut placements = Vec::new();
    place(root, origin, depth_step, &mut placements);
    placements
}

fn place(node: &LayoutNode, center: Vec3, depth_step: f32, out: &mut Vec<(ElementId, Vec3)>) {
    if let Some(key) = node.key {
        out.push((key, center));
    }
    if node.children.is_empty() {
        return;
    }

    let total: f32 = node
        .children
        .iter()
        .map(|c| match node.direction {
            Direction::Row => c.outer().x,
            Direction::Column => c.outer().y,
        })
        .sum();
    let mut cursor = -total * 0.5;
    for child in &node.children {
        let outer = child.outer();
        let offset = match node.direction {
            Direction::Row => {
                let x = cursor + outer.x * 0.5;
                cursor += outer.x;
                Vec3::new(x, 0.0, depth_step)
            }
            Direction::Column => {
                let y = -(cursor + outer.y * 0.5);
                cursor += outer.y;
                Vec3::new(0.0, y, depth_step)
            }
        };
        place(child, center + offset, depth_step, out);
    }
}
