//! Gearbox: a deterministic finite-state transducer engine.
//!
//! Gearbox lets a programmer express "behavior varies by state" without
//! guarding every method with conditionals on boolean flags. A machine is
//! declared once — states, inputs, and `(state, input) -> (target state,
//! ordered outputs)` transitions — validated up front, and frozen into an
//! immutable [`Automaton`] shared by any number of live machines.
//!
//! # Core Concepts
//!
//! - **Schema**: one marker type fixing every type a machine family works
//!   with (states, inputs, shared core, per-state data, arguments, output
//!   values)
//! - **Builder**: construction-time declaration with up-front validation
//! - **Transitioner**: the live machine; applies one input atomically and
//!   returns the collected output values
//! - **Persister**: snapshot/restore bridge with stable per-state tokens
//!
//! # Example
//!
//! ```rust
//! use gearbox::builder::AutomatonBuilder;
//! use gearbox::machine::Transitioner;
//! use gearbox::{input_enum, state_enum, Schema};
//!
//! state_enum! {
//!     enum Turnstile {
//!         Locked,
//!         Unlocked,
//!     }
//! }
//!
//! input_enum! {
//!     enum Visitor {
//!         Coin,
//!         Push,
//!     }
//! }
//!
//! struct Gate;
//!
//! impl Schema for Gate {
//!     type State = Turnstile;
//!     type Input = Visitor;
//!     type Core = u32;          // coins banked
//!     type Data = ();
//!     type Args = ();
//!     type Value = ();
//!     type Collected = Vec<()>;
//!     type Error = std::convert::Infallible;
//! }
//!
//! let mut builder = AutomatonBuilder::<Gate>::new();
//! let locked = builder.add_initial_state(Turnstile::Locked).unwrap();
//! let unlocked = builder.add_state(Turnstile::Unlocked).unwrap();
//! let coin = builder.add_input(Visitor::Coin).unwrap();
//! let push = builder.add_input(Visitor::Push).unwrap();
//! builder
//!     .add_transition(
//!         locked,
//!         coin,
//!         unlocked,
//!         vec![gearbox::Output::infallible("bank_coin", |core, _, _| {
//!             *core += 1;
//!         })],
//!     )
//!     .unwrap();
//! builder.add_transition(unlocked, push, locked, vec![]).unwrap();
//! let automaton = builder.build().unwrap();
//!
//! let gate = Transitioner::new(automaton, 0);
//! gate.apply(coin, ()).unwrap();
//! assert_eq!(gate.current_state(), &Turnstile::Unlocked);
//! gate.apply(push, ()).unwrap();
//! assert_eq!(gate.current_state(), &Turnstile::Locked);
//! gate.with_core(|coins| assert_eq!(*coins, 1));
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod persist;

// Re-export commonly used types
pub use crate::core::{Automaton, Collector, Input, Output, Schema, State};
pub use builder::{AutomatonBuilder, BuildError, InputHandle, StateHandle};
pub use machine::{TraceEvent, Tracer, TransitionError, Transitioner};
pub use persist::{PersistError, Persister, Snapshot};
