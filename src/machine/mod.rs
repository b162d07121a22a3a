//! Run-time machine operations.
//!
//! A [`Transitioner`] pairs a live current state (plus its data payload
//! and the caller's shared core) with a frozen
//! [`Automaton`](crate::core::Automaton). Applying an input is atomic:
//! either the whole transition commits or the machine is untouched.

pub mod error;
pub mod tracer;
pub mod transitioner;

pub use error::TransitionError;
pub use tracer::{TraceEvent, Tracer};
pub use transitioner::Transitioner;
