//! The run-time machine: current state plus an automaton.

use crate::builder::InputHandle;
use crate::core::{Automaton, Input, Schema, State, StateKind};
use crate::machine::error::TransitionError;
use crate::machine::tracer::{TraceEvent, Tracer};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

struct Live<M: Schema> {
    core: M::Core,
    data: Option<M::Data>,
}

/// Clears the in-flight flag when the transition attempt ends, including
/// by unwinding out of a panicking output.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The combination of a current state, its optional data payload, the
/// shared core, and an [`Automaton`].
///
/// A transitioner applies one input at a time, synchronously, on the
/// caller's thread. Its single operation is [`apply`](Self::apply): look
/// the input up in the table, run the transition's outputs in order,
/// construct the target state's data, commit the new state, and reduce
/// the output values through the transition's collector.
///
/// Two guarantees hold for every `apply`:
///
/// - **Atomic commit.** An undefined `(state, input)` pair or a failing
///   output leaves the current state (and its data) exactly as it was. A
///   transition is observable either fully applied or not at all.
/// - **No reentrancy.** An output that reaches this same instance again
///   (through shared ownership, directly or via a callback) gets
///   [`TransitionError::Reentrant`] back instead of corrupting the
///   in-progress transition.
///
/// Many transitioners may share one automaton; they share nothing else.
/// Each instance is meant for single-threaded use by its owner — a second
/// thread calling `apply` concurrently is refused the same way a
/// reentrant call is.
pub struct Transitioner<M: Schema> {
    automaton: Arc<Automaton<M>>,
    live: Mutex<Live<M>>,
    current: AtomicUsize,
    in_flight: AtomicBool,
    tracer: Mutex<Option<Tracer<M>>>,
}

impl<M: Schema> Transitioner<M> {
    /// Create a machine pinned to the automaton's initial state.
    ///
    /// The caller supplies the shared core object; the engine forwards it
    /// to every output invocation and never touches it otherwise.
    pub fn new(automaton: Arc<Automaton<M>>, core: M::Core) -> Self {
        let initial = automaton.initial_index();
        Self::at(automaton, core, initial, None)
    }

    /// Cold start at an arbitrary (state, data) pair; used by restoration.
    /// Runs no outputs.
    pub(crate) fn at(
        automaton: Arc<Automaton<M>>,
        core: M::Core,
        state: usize,
        data: Option<M::Data>,
    ) -> Self {
        Self {
            automaton,
            live: Mutex::new(Live { core, data }),
            current: AtomicUsize::new(state),
            in_flight: AtomicBool::new(false),
            tracer: Mutex::new(None),
        }
    }

    /// The automaton this machine runs against.
    pub fn automaton(&self) -> &Arc<Automaton<M>> {
        &self.automaton
    }

    /// Read-only view of the current state identifier.
    ///
    /// For diagnostics and serialization only. Business logic should not
    /// branch on this: the machine itself already knows which behaviors
    /// are legal in which state, and callers duplicating that knowledge
    /// defeats the point of declaring it once.
    pub fn current_state(&self) -> &M::State {
        self.automaton.state_id(self.current.load(Ordering::Acquire))
    }

    /// Run a closure against the shared core.
    ///
    /// # Panics
    ///
    /// Panics if called while a transition is in progress, i.e. from
    /// inside an output or tracer. Outputs already receive the core as an
    /// argument; waiting on the live lock here would deadlock instead.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut M::Core) -> R) -> R {
        assert!(
            !self.in_flight.load(Ordering::Acquire),
            "with_core called during a transition; outputs receive the core directly"
        );
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut live.core)
    }

    /// Install a tracer invoked after every successful commit.
    pub fn set_tracer(&self, tracer: Tracer<M>) {
        *self.tracer.lock().unwrap_or_else(PoisonError::into_inner) = Some(tracer);
    }

    /// Remove the installed tracer, if any.
    pub fn clear_tracer(&self) {
        *self.tracer.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Apply one input against the current state.
    ///
    /// On success the machine has committed to the transition's target
    /// state and the returned value is the transition's collector applied
    /// to the ordered list of output return values.
    ///
    /// On failure the machine is exactly where it was:
    ///
    /// - [`TransitionError::NoTransition`] if the current state defines no
    ///   transition for `input`;
    /// - [`TransitionError::Reentrant`] if a transition on this instance
    ///   is already in progress;
    /// - [`TransitionError::Output`] carrying the first output error,
    ///   verbatim. Outputs that ran before the failing one are not rolled
    ///   back; the target state's data is never constructed.
    pub fn apply(
        &self,
        input: InputHandle,
        args: M::Args,
    ) -> Result<M::Collected, TransitionError<M::Error>> {
        let source = self.current.load(Ordering::Acquire);
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(TransitionError::Reentrant {
                state: self.automaton.state_id(source).name().to_string(),
                input: self.input_name(input),
            });
        }
        let _reset = InFlightReset(&self.in_flight);

        let record = self
            .automaton
            .lookup(source, input.index())
            .ok_or_else(|| TransitionError::NoTransition {
                state: self.automaton.state_id(source).name().to_string(),
                input: self.input_name(input),
            })?;

        let mut values = Vec::with_capacity(record.outputs.len());
        {
            let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
            let live = &mut *live;
            for output in &record.outputs {
                let value = output
                    .invoke(&mut live.core, live.data.as_mut(), &args)
                    .map_err(TransitionError::Output)?;
                values.push(value);
            }
            // Target data is built only after every output has run, so a
            // failing output never leaves a half-entered state. A self-loop
            // stays in the state, so its payload survives untouched.
            if record.target != source {
                live.data = match self.automaton.kind(record.target) {
                    StateKind::Stateless => None,
                    StateKind::DataBearing { factory } => Some(factory(&mut live.core, &args)),
                };
            }
        }
        self.current.store(record.target, Ordering::Release);

        let tracer = self.tracer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tracer) = tracer.as_ref() {
            tracer(&TraceEvent {
                input: self.automaton.input_id(input.index()).clone(),
                outputs: record.outputs.iter().map(|o| o.name().to_string()).collect(),
                from: self.automaton.state_id(source).clone(),
                to: self.automaton.state_id(record.target).clone(),
                timestamp: Utc::now(),
            });
        }
        drop(tracer);

        Ok(record.collector.collect(values))
    }

    pub(crate) fn state_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    pub(crate) fn with_live<R>(&self, f: impl FnOnce(&M::Core, Option<&M::Data>) -> R) -> R {
        let live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        f(&live.core, live.data.as_ref())
    }

    fn input_name(&self, input: InputHandle) -> String {
        if input.index() < self.automaton.input_count() {
            self.automaton.input_id(input.index()).name().to_string()
        } else {
            format!("#{}", input.index())
        }
    }
}

impl<M: Schema> fmt::Debug for Transitioner<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transitioner")
            .field("state", self.current_state())
            .finish_non_exhaustive()
    }
}
