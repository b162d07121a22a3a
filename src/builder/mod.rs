//! Builder API for declaring automatons.
//!
//! This module provides the construction-time surface: registering states,
//! inputs and transitions, validating the declaration, and freezing it
//! into an immutable [`Automaton`](crate::core::Automaton). A builder is a
//! plain value the caller owns and discards after `build()`; there is no
//! process-wide registry.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::{AutomatonBuilder, InputHandle, StateHandle};
