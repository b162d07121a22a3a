//! The `Schema` trait bundling one machine's associated types.

use crate::core::state::{Input, State};
use std::error::Error;
use std::fmt::Debug;

/// Type bundle for one family of machines.
///
/// A schema is a zero-sized marker type that fixes every type a machine
/// works with: the state and input alphabets, the shared core object,
/// the state-specific data payload, the per-call arguments, and the value
/// types flowing out of outputs and collectors. Builders, automatons and
/// transitioners are all generic over a single `Schema` implementation, so
/// the whole pipeline type-checks as one unit.
///
/// # Example
///
/// ```rust
/// use gearbox::core::{Input, Schema, State};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum SwitchState { Off, On }
///
/// impl State for SwitchState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum SwitchInput { Flip }
///
/// impl Input for SwitchInput {
///     fn name(&self) -> &str {
///         "Flip"
///     }
/// }
///
/// struct Switch;
///
/// impl Schema for Switch {
///     type State = SwitchState;
///     type Input = SwitchInput;
///     type Core = u32;           // count of flips, owned by the machine
///     type Data = ();            // no data-bearing states
///     type Args = ();            // flip takes no arguments
///     type Value = ();           // outputs return nothing
///     type Collected = Vec<()>;  // default collector returns the list
///     type Error = std::convert::Infallible;
/// }
/// ```
pub trait Schema: Sized + 'static {
    /// State identifier type; the machine's set of positions.
    type State: State;

    /// Input identifier type; the machine's callable alphabet.
    type Input: Input;

    /// Long-lived shared object forwarded to every output invocation.
    /// The engine never inspects or mutates it directly.
    type Core;

    /// State-specific data. With more than one data-bearing state this is
    /// a tagged union with one variant per state; stateless machines use
    /// `()`.
    type Data;

    /// Arguments supplied by the caller for one `apply` call and forwarded
    /// to outputs and data factories.
    type Args;

    /// Value returned by a single output callable.
    type Value;

    /// Caller-visible result of one `apply`, produced by the transition's
    /// collector from the ordered output values.
    type Collected;

    /// Error type an output may raise to abort a transition. Propagated to
    /// the caller transparently, without wrapping.
    type Error: Error + Debug + Send + Sync + 'static;
}
