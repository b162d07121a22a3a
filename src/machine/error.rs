//! Run-time transition errors.

use thiserror::Error;

/// Errors that can occur while applying an input.
///
/// The control errors (`NoTransition`, `Reentrant`) are caller-recoverable
/// and guarantee the machine's state is unchanged. Output errors are the
/// user's own error type, propagated transparently; outputs that already
/// ran before the failing one are not rolled back, but the state commit
/// itself never happens.
#[derive(Debug, Error)]
pub enum TransitionError<E> {
    /// The input is not legal in the current state.
    #[error("no transition for input '{input}' in state '{state}'")]
    NoTransition { state: String, input: String },

    /// An output attempted to recursively apply another input on the same
    /// machine instance before its own transition committed.
    #[error("reentrant apply of input '{input}' while a transition from state '{state}' is in progress")]
    Reentrant { state: String, input: String },

    /// An output callable failed; the transition was not committed.
    #[error(transparent)]
    Output(E),
}

impl<E> TransitionError<E> {
    /// True for the control errors that leave the machine untouched and
    /// carry no user error.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::NoTransition { .. } | Self::Reentrant { .. })
    }

    /// The user error raised by an output, if that is what aborted the
    /// transition.
    pub fn into_output(self) -> Option<E> {
        match self {
            Self::Output(inner) => Some(inner),
            _ => None,
        }
    }
}
