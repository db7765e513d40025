//! Per-frame pointer update over an ordered set of interactive elements.

use glam::{Mat4, Vec3};
use tracing::debug;
use vrinteract_core::{NodeId, SceneGraph};

use super::pointer::PointerRig;
use super::raycaster::resolve_closest;
use super::selection_plane::{SelectionPlane, SelectionQuad};
use crate::components::{ElementId, ElementState, InteractiveElement};

/// What one call to [`InteractionEngine::update`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// False when the tick was skipped (no controller or not interactive).
    pub ran: bool,
    /// Element under the pointer.
    pub hit: Option<ElementId>,
    pub hit_point: Option<Vec3>,
    /// Pointer projected onto the selection plane.
    pub plane_point: Option<Vec3>,
    /// Elements that entered `Selected` this tick.
    pub selected: Vec<ElementId>,
    /// State changes applied this tick, in order.
    pub transitions: Vec<(ElementId, ElementState)>,
}

/// Owns the elements, the pointer rig and the optional selection plane.
#[derive(Debug)]
pub struct InteractionEngine {
    elements: Vec<InteractiveElement>,
    pointer: PointerRig,
    selection: Option<SelectionPlane>,
    interactive: bool,
    explicit: bool,
    selecting: bool,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            pointer: PointerRig::new(),
            selection: None,
            interactive: true,
            explicit: false,
            selecting: false,
        }
    }
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element. Earlier elements win distance ties.
    pub fn add_element(&mut self, element: InteractiveElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&InteractiveElement> {
        self.elements.get(id.0 as usize)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut InteractiveElement> {
        self.elements.get_mut(id.0 as usize)
    }

    /// Id of the first element named `name`.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name() == name)
            .map(|i| ElementId(i as u32))
    }

    /// Elements in priority order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &InteractiveElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    pub fn pointer(&self) -> &PointerRig {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerRig {
        &mut self.pointer
    }

    pub fn bind_controller(&mut self, controller: NodeId) {
        self.pointer.bind(controller);
    }

    pub fn unbind_controller(&mut self) -> Option<NodeId> {
        self.pointer.unbind()
    }

    /// Trigger state of the bound controller.
    pub fn set_selecting(&mut self, selecting: bool) {
        self.selecting = selecting;
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Enable or disable pointer updates; the beam visibility follows.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        self.pointer.visible = interactive;
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Map the pointer onto the selection plane instead of free aiming.
    pub fn start_explicit(&mut self) {
        self.explicit = true;
        if let Some(selection) = self.selection.as_mut() {
            selection.set_visible(true);
        }
    }

    pub fn stop_explicit(&mut self) {
        self.explicit = false;
        if let Some(selection) = self.selection.as_mut() {
            selection.set_visible(false);
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Create (or replace) the selection plane under `parent`.
    pub fn create_selection_plane(&mut self, quad: SelectionQuad, parent: Mat4) {
        let mut selection = SelectionPlane::new(quad, parent);
        selection.set_visible(false);
        self.selection = Some(selection);
    }

    pub fn selection_plane(&self) -> Option<&SelectionPlane> {
        self.selection.as_ref()
    }

    pub fn selection_plane_mut(&mut self) -> Option<&mut SelectionPlane> {
        self.selection.as_mut()
    }

    /// Run one pointer update against `scene`.
    pub fn update<S>(&mut self, scene: &S) -> TickReport
    where
        S: SceneGraph + ?Sized,
    {
        let mut report = TickReport::default();
        let Some(controller) = self.pointer.controller() else {
            return report;
        };
        if !self.interactive {
            return report;
        }
        let Some(host) = scene.host(controller) else {
            debug!(%controller, "controller missing from scene; skipping pointer update");
            return report;
        };
        report.ran = true;

        self.pointer.update_ray(&host.world_matrix());
        let ray = self.pointer.ray;

        let hit = resolve_closest(&self.elements, &ray).map(|hit| (hit.index, hit.point));
        report.hit = hit.map(|(index, _)| ElementId(index as u32));
        report.hit_point = hit.map(|(_, point)| point);

        match hit {
            Some((_, point)) if !self.explicit => self.pointer.dot.place(point),
            _ => self.pointer.dot.hide(),
        }

        if let Some(selection) = self.selection.as_ref() {
            report.plane_point = selection.project(&ray);
            match report.plane_point {
                Some(point) if self.explicit => self.pointer.dot_sel.place(point),
                _ => self.pointer.dot_sel.hide(),
            }
        }

        let hit_index = hit.map(|(index, _)| index);
        if let Some(index) = hit_index {
            let element = &mut self.elements[index];
            if element.is_pointer_driven() {
                let target = if self.selecting && element.has_state(ElementState::Selected) {
                    Some(ElementState::Selected)
                } else if element.has_state(ElementState::Hovered) {
                    Some(ElementState::Hovered)
                } else {
                    None
                };
                if let Some(state) = target {
                    transition(element, ElementId(index as u32), state, &mut report);
                }
            }
        }

        for (index, element) in self.elements.iter_mut().enumerate() {
            if Some(index) == hit_index {
                continue;
            }
            if element.is_pointer_driven() && element.has_state(ElementState::Idle) {
                transition(element, ElementId(index as u32), ElementState::Idle, &mut report);
            }
        }

        report
    }
}

fn transition(
    element: &mut InteractiveElement,
    id: ElementId,
    state: ElementState,
    report: &mut TickReport,
) {
    let previous = element.current_state();
    if element.set_state(state) && previous != Some(state) {
        report.transitions.push((id, state));
        if state == ElementState::Selected {
            report.selected.push(id);
        }
    }
}
