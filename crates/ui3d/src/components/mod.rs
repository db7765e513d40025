//! 3D UI Components
//!
//! Elements the pointer can hit, the builders that produce them and the
//! styles their states resolve to.

pub mod button;
pub mod element;
pub mod panel;
pub mod style;
pub mod visor;

pub use button::{Button, ButtonStyle};
pub use element::{ElementId, ElementState, InteractiveElement, StateHook};
pub use panel::Panel;
pub use style::{Color, ElementStyle, ParseColorError, VisualAttribute};
pub use visor::Visor;
