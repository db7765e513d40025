//! Errors surfaced by the interaction layer.

use thiserror::Error;

use crate::components::ElementId;

/// Recoverable misuse of the interface. None of these leave it in a broken state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterfaceError {
    /// A countdown is in progress; the new one was ignored.
    #[error("a countdown is already in progress")]
    CountdownAlreadyRunning,
    /// No element is registered under the id.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
    /// The selection plane was used before it was created.
    #[error("no selection plane has been created")]
    NoSelectionPlane,
    /// A state name did not match any known state.
    #[error("unknown element state `{0}`")]
    UnknownState(String),
}
