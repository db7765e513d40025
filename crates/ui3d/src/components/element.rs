//! Interactive element: a named finite-state entity with a world-space shape.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use tracing::debug;
use vrinteract_core::{Quad, Ray, RayHit, Raycast};

use super::style::{ElementStyle, VisualAttribute};

/// Interaction states an element may register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementState {
    /// Visible but ignores the pointer.
    Disabled,
    /// Resting state.
    Idle,
    /// Pointer is over the element.
    Hovered,
    /// Pointer is over the element with the trigger held.
    Selected,
}

impl ElementState {
    /// Every state, in declaration order.
    pub const ALL: [ElementState; 4] = [
        ElementState::Disabled,
        ElementState::Idle,
        ElementState::Hovered,
        ElementState::Selected,
    ];

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementState::Disabled => "disabled",
            ElementState::Idle => "idle",
            ElementState::Hovered => "hovered",
            ElementState::Selected => "selected",
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementState {
    type Err = crate::InterfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" => Ok(ElementState::Disabled),
            "idle" => Ok(ElementState::Idle),
            "hovered" => Ok(ElementState::Hovered),
            "selected" => Ok(ElementState::Selected),
            _ => Err(crate::InterfaceError::UnknownState(s.to_string())),
        }
    }
}

/// Handle of an element inside an [`crate::InteractionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Callback run when an element enters [`ElementState::Selected`].
pub type StateHook = Box<dyn FnMut()>;

struct StateEntry {
    attributes: Vec<VisualAttribute>,
    on_enter: Option<StateHook>,
}

/// A UI block with a state registry, a resolved style and an optional text.
pub struct InteractiveElement {
    name: String,
    states: BTreeMap<ElementState, StateEntry>,
    current: Option<ElementState>,
    style: ElementStyle,
    shape: Quad,
    visible: bool,
    ui: bool,
    text: Option<String>,
}

impl fmt::Debug for InteractiveElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveElement")
            .field("name", &self.name)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("style", &self.style)
            .field("shape", &self.shape)
            .field("visible", &self.visible)
            .field("ui", &self.ui)
            .field("text", &self.text)
            .finish()
    }
}

impl InteractiveElement {
    /// Create a visible, UI-capable element with no registered states.
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            states: BTreeMap::new(),
            current: None,
            style: ElementStyle::default(),
            shape: Quad::new(Vec3::ZERO, width, height),
            visible: true,
            ui: true,
            text: None,
        }
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: set the resting style.
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: mark the element as plain scenery. It can still be hit but
    /// never changes state from the pointer.
    pub fn non_ui(mut self) -> Self {
        self.ui = false;
        self
    }

    /// Register `state`, replacing an earlier registration.
    pub fn setup_state(
        &mut self,
        state: ElementState,
        attributes: &[VisualAttribute],
        on_enter: Option<StateHook>,
    ) {
        self.states.insert(
            state,
            StateEntry {
                attributes: attributes.to_vec(),
                on_enter,
            },
        );
    }

    /// Switch to `state` if it is registered.
    ///
    /// The state's attributes are applied to the style; the hook only runs
    /// when entering `Selected` from another state. Returns `false` without
    /// touching anything when the state is unregistered.
    pub fn set_state(&mut self, state: ElementState) -> bool {
        let Some(entry) = self.states.get_mut(&state) else {
            debug!(element = %self.name, %state, "state not registered; ignoring");
            return false;
        };
        self.style.apply(&entry.attributes);
        let previous = self.current.replace(state);
        if previous != Some(state) {
            debug!(element = %self.name, from = ?previous, to = %state, "state change");
            if state == ElementState::Selected {
                if let Some(hook) = entry.on_enter.as_mut() {
                    hook();
                }
            }
        }
        true
    }

    /// Whether `state` is registered.
    pub fn has_state(&self, state: ElementState) -> bool {
        self.states.contains_key(&state)
    }

    /// Current state; `None` until a registered state was set.
    pub fn current_state(&self) -> Option<ElementState> {
        self.current
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn shape(&self) -> &Quad {
        &self.shape
    }

    /// Move the element's centre.
    pub fn set_center(&mut self, center: Vec3) {
        self.shape.center = center;
    }

    /// Resize the element.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.shape.size.x = width;
        self.shape.size.y = height;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the element takes part in pointer state changes.
    pub fn is_ui(&self) -> bool {
        self.ui
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Whether the pointer logic may move this element between states.
    pub(crate) fn is_pointer_driven(&self) -> bool {
        self.ui && self.current != Some(ElementState::Disabled)
    }
}

impl Raycast for InteractiveElement {
    /// Hidden elements are never hit. The surface sits `offset` in front of
    /// the layout position.
    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        if !self.visible {
            return None;
        }
        let mut surface = self.shape;
        surface.center += surface.normal() * self.style.offset;
        surface.raycast(ray)
    }
}
