//! 3D UI Interaction System
//!
//! Pointer raycasting against UI elements, hover/select state changes and
//! the selection plane used in explicit pointing mode.

pub mod engine;
pub mod pointer;
pub mod raycaster;
pub mod selection_plane;

pub use engine::{InteractionEngine, TickReport};
pub use pointer::{Indicator, PointerRig};
pub use raycaster::{controller_ray, resolve_closest, Intersection};
pub use selection_plane::{Plane, SelectionPlane, SelectionQuad};
