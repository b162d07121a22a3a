//! Observability hook invoked after successful transitions.

use crate::core::Schema;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Record of one committed transition, handed to the tracer.
///
/// Trace events exist for logging and diagnostics only. They are produced
/// after the state commit, so a tracer can never affect control flow, and
/// nothing in the engine depends on one being installed.
#[derive(Clone, Debug)]
pub struct TraceEvent<M: Schema> {
    /// The input that was applied.
    pub input: M::Input,
    /// Names of the outputs that ran, in execution order.
    pub outputs: Vec<String>,
    /// The state the transition left.
    pub from: M::State,
    /// The state the machine committed to.
    pub to: M::State,
    /// When the commit happened.
    pub timestamp: DateTime<Utc>,
}

/// Callback invoked with each committed transition.
pub type Tracer<M> = Arc<dyn Fn(&TraceEvent<M>) + Send + Sync>;
