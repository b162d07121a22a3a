//! Identifier traits for state machine states and inputs.
//!
//! States and inputs are opaque tokens: the engine only ever compares them
//! and asks for their names when reporting errors or tracing.

use std::fmt::Debug;

/// Trait for state identifiers.
///
/// A state identifier names one position in a machine. The engine never
/// inspects it beyond equality checks and diagnostics; any payload attached
/// to a position in the machine lives in the schema's `Data` type, not in
/// the identifier.
///
/// # Required Traits
///
/// - `Clone`: identifiers are copied into error values and trace events
/// - `PartialEq`: duplicate registration checks compare identifiers
/// - `Debug`: identifiers must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use gearbox::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum DoorState {
///     Closed,
///     Opening,
///     Opened,
///     Closing,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opening => "Opening",
///             Self::Opened => "Opened",
///             Self::Closing => "Closing",
///         }
///     }
/// }
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for input identifiers.
///
/// An input identifier names one externally triggerable operation. The full
/// set of inputs is fixed when the automaton is built and shared across all
/// states; not every state has to handle every input.
///
/// # Example
///
/// ```rust
/// use gearbox::core::Input;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum DoorInput {
///     PushButton,
///     SensorUp,
///     SensorDown,
/// }
///
/// impl Input for DoorInput {
///     fn name(&self) -> &str {
///         match self {
///             Self::PushButton => "PushButton",
///             Self::SensorUp => "SensorUp",
///             Self::SensorDown => "SensorDown",
///         }
///     }
/// }
/// ```
pub trait Input: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Get the input's name for display/logging.
    fn name(&self) -> &str;
}
