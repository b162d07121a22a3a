//! Build errors for automaton construction.

use thiserror::Error;

/// Errors that can occur while declaring states, inputs and transitions.
///
/// Build errors are fatal: they signal a malformed machine declaration and
/// are surfaced immediately, before any machine instance exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("state '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("input '{name}' is already registered")]
    DuplicateInput { name: String },

    #[error("already have a transition from '{state}' via '{input}'")]
    DuplicateTransition { state: String, input: String },

    #[error("no state was marked initial. Register one with add_initial_state")]
    NoInitialState,

    #[error("initial state already set to '{first}', cannot also mark '{second}'")]
    MultipleInitialStates { first: String, second: String },

    #[error("initial state '{name}' cannot require state-specific data")]
    DataBearingInitial { name: String },

    #[error("handle does not belong to this builder")]
    ForeignHandle,

    #[error("builder is finalized; no further mutation after build()")]
    Finalized,
}
