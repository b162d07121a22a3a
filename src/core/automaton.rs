//! The immutable, validated transition table.

use crate::core::collector::Collector;
use crate::core::output::Output;
use crate::core::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Factory constructing a state's data payload on entry.
///
/// Invoked with the shared core and the arguments of the transition that
/// enters the state, after all of that transition's outputs have run.
pub type DataFactory<M> = Arc<
    dyn Fn(&mut <M as Schema>::Core, &<M as Schema>::Args) -> <M as Schema>::Data + Send + Sync,
>;

/// How a state relates to state-specific data.
pub(crate) enum StateKind<M: Schema> {
    /// No attached data.
    Stateless,
    /// Carries a payload built by `factory` on entry and dropped on exit.
    DataBearing { factory: DataFactory<M> },
}

pub(crate) struct StateDecl<M: Schema> {
    pub(crate) id: M::State,
    pub(crate) kind: StateKind<M>,
}

/// One frozen transition: target state plus the ordered effect list and
/// the reduction applied to its results.
pub(crate) struct TransitionRecord<M: Schema> {
    pub(crate) target: usize,
    pub(crate) outputs: Vec<Output<M>>,
    pub(crate) collector: Collector<M>,
}

/// A declaration of a finite state machine.
///
/// Note that this is not the machine itself: it is the immutable
/// `(state, input) -> (target, outputs, collector)` table, built once and
/// then shared (via `Arc`) by every [`Transitioner`](crate::Transitioner)
/// created from it. All validation happened in the builder, so no machine
/// instance can ever observe a malformed table.
///
/// The table is dense: handles index directly into it, so run-time lookup
/// is two array reads with no hashing.
pub struct Automaton<M: Schema> {
    states: Vec<StateDecl<M>>,
    inputs: Vec<M::Input>,
    initial: usize,
    table: Vec<Option<TransitionRecord<M>>>,
}

impl<M: Schema> Automaton<M> {
    pub(crate) fn new(
        states: Vec<StateDecl<M>>,
        inputs: Vec<M::Input>,
        initial: usize,
        table: Vec<Option<TransitionRecord<M>>>,
    ) -> Self {
        debug_assert_eq!(table.len(), states.len() * inputs.len());
        Self {
            states,
            inputs,
            initial,
            table,
        }
    }

    /// The designated initial state.
    pub fn initial_state(&self) -> &M::State {
        &self.states[self.initial].id
    }

    /// All registered states, in registration order.
    pub fn states(&self) -> impl Iterator<Item = &M::State> {
        self.states.iter().map(|decl| &decl.id)
    }

    /// The full input alphabet, in registration order.
    pub fn inputs(&self) -> impl Iterator<Item = &M::Input> {
        self.inputs.iter()
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of defined transitions.
    pub fn transition_count(&self) -> usize {
        self.table.iter().filter(|cell| cell.is_some()).count()
    }

    pub(crate) fn initial_index(&self) -> usize {
        self.initial
    }

    pub(crate) fn lookup(&self, state: usize, input: usize) -> Option<&TransitionRecord<M>> {
        // an out-of-range input handle must not alias another state's row
        if input >= self.inputs.len() {
            return None;
        }
        self.table[state * self.inputs.len() + input].as_ref()
    }

    pub(crate) fn state_id(&self, index: usize) -> &M::State {
        &self.states[index].id
    }

    pub(crate) fn input_id(&self, index: usize) -> &M::Input {
        &self.inputs[index]
    }

    pub(crate) fn kind(&self, index: usize) -> &StateKind<M> {
        &self.states[index].kind
    }
}

impl<M: Schema> fmt::Debug for Automaton<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("states", &self.states.iter().map(|s| &s.id).collect::<Vec<_>>())
            .field("inputs", &self.inputs)
            .field("initial", &self.states[self.initial].id)
            .field("transitions", &self.transition_count())
            .finish()
    }
}
