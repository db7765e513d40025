//! 3D UI interaction layer for vrinteract
//!
//! UI elements live in world space and are driven by a controller ray each
//! frame. The crate provides:
//!
//! - **Interactive Components**: buttons and panels with a registered set of
//!   states (`disabled`, `idle`, `hovered`, `selected`)
//! - **Pointer Interaction**: closest-hit resolution, free-aim and
//!   plane-locked indicator dots, and an optional selection plane
//! - **Countdown Gate**: locks interaction for a number of simulated seconds
//! - **Instruction Interface**: the ready-made panel with title, progress bar,
//!   instructions and four buttons
//!
//! # Example
//!
//! ```rust,no_run
//! use glam::Vec3;
//! use vrinteract_core::{Scene, Transform};
//! use vrinteract_ui3d::{InstructionInterface, InterfaceButton};
//!
//! let mut scene = Scene::new();
//! let controller = scene.add_node("controller", Transform::from_translation(Vec3::Y));
//!
//! let mut ui = InstructionInterface::default();
//! ui.engine_mut().bind_controller(controller);
//!
//! // In your frame loop:
//! ui.update_ui(&scene);
//! if ui.clicked(InterfaceButton::Next) {
//!     // advance to the next page
//! }
//! ```

pub mod components;
pub mod countdown;
pub mod error;
pub mod interaction;
pub mod interface;
pub mod layout;

// Re-export commonly used types
pub use components::{
    Button, ButtonStyle, Color, ElementId, ElementState, ElementStyle, InteractiveElement, Panel,
    StateHook, Visor, VisualAttribute,
};
pub use countdown::{CancellationToken, CountdownEvent, CountdownGate, Ticker};
pub use error::InterfaceError;
pub use interaction::{
    resolve_closest, Indicator, InteractionEngine, Intersection, Plane, PointerRig,
    SelectionPlane, SelectionQuad, TickReport,
};
pub use interface::{InstructionInterface, InterfaceButton, InterfaceEdit, InterfaceIds, PanelText};
pub use layout::{arrange, Direction, LayoutNode};

/// Version of the UI3D crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
