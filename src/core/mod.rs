//! Core transducer types.
//!
//! This module contains the immutable heart of the engine:
//! - Identifier traits for states and inputs
//! - The `Schema` type bundle tying one machine family together
//! - Output callables and collectors
//! - The frozen `Automaton` transition table
//!
//! Everything here is built once by the [`builder`](crate::builder) layer
//! and never mutated afterwards; all run-time mutation lives in
//! [`machine`](crate::machine).

mod automaton;
mod collector;
mod output;
mod schema;
mod state;

pub use automaton::{Automaton, DataFactory};
pub use collector::Collector;
pub use output::{Output, OutputFn};
pub use schema::Schema;
pub use state::{Input, State};

pub(crate) use automaton::{StateDecl, StateKind, TransitionRecord};
