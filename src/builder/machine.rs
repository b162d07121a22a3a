//! Builder for declaring and validating automatons.

use crate::builder::error::BuildError;
use crate::core::{
    Automaton, Collector, Input, Output, Schema, State, StateDecl, StateKind, TransitionRecord,
};
use std::sync::Arc;

/// Opaque reference to a state registered with an [`AutomatonBuilder`].
///
/// Handles are only meaningful with the builder (and the automaton) that
/// issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateHandle(pub(crate) usize);

/// Opaque reference to an input registered with an [`AutomatonBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputHandle(pub(crate) usize);

impl InputHandle {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Construction-time declaration of a machine.
///
/// The builder accumulates states (exactly one marked initial), the input
/// alphabet and the transition table, validating each registration as it
/// happens. [`build`](AutomatonBuilder::build) performs the remaining
/// whole-machine checks, freezes the table into an immutable
/// [`Automaton`], and finalizes the builder: every later mutation fails
/// with [`BuildError::Finalized`].
///
/// Validation happens once, at declaration time, so every machine instance
/// constructed afterwards is guaranteed internally consistent and pays no
/// per-call validation cost.
///
/// # Example
///
/// ```rust
/// use gearbox::builder::AutomatonBuilder;
/// use gearbox::machine::Transitioner;
/// use gearbox::{input_enum, state_enum, Schema};
///
/// state_enum! {
///     enum Switch {
///         Off,
///         On,
///     }
/// }
///
/// input_enum! {
///     enum Toggle {
///         Flip,
///     }
/// }
///
/// struct Lamp;
///
/// impl Schema for Lamp {
///     type State = Switch;
///     type Input = Toggle;
///     type Core = ();
///     type Data = ();
///     type Args = ();
///     type Value = ();
///     type Collected = Vec<()>;
///     type Error = std::convert::Infallible;
/// }
///
/// let mut builder = AutomatonBuilder::<Lamp>::new();
/// let off = builder.add_initial_state(Switch::Off).unwrap();
/// let on = builder.add_state(Switch::On).unwrap();
/// let flip = builder.add_input(Toggle::Flip).unwrap();
/// builder.add_transition(off, flip, on, vec![]).unwrap();
/// builder.add_transition(on, flip, off, vec![]).unwrap();
/// let automaton = builder.build().unwrap();
///
/// let machine = Transitioner::new(automaton, ());
/// machine.apply(flip, ()).unwrap();
/// assert_eq!(machine.current_state(), &Switch::On);
/// ```
pub struct AutomatonBuilder<M: Schema> {
    states: Vec<StateDecl<M>>,
    inputs: Vec<M::Input>,
    initial: Option<usize>,
    // sparse until build(); checked for duplicates at registration time
    transitions: Vec<(usize, usize, TransitionRecord<M>)>,
    default_collector: Collector<M>,
    finalized: bool,
}

impl<M> AutomatonBuilder<M>
where
    M: Schema,
    M::Collected: From<Vec<M::Value>>,
{
    /// Create a builder whose default collector returns the full ordered
    /// list of output values.
    pub fn new() -> Self {
        Self::with_default_collector(Collector::sequence())
    }
}

impl<M> Default for AutomatonBuilder<M>
where
    M: Schema,
    M::Collected: From<Vec<M::Value>>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Schema> AutomatonBuilder<M> {
    /// Create a builder with an explicit default collector, used by every
    /// transition registered without one of its own.
    pub fn with_default_collector(default_collector: Collector<M>) -> Self {
        Self {
            states: Vec::new(),
            inputs: Vec::new(),
            initial: None,
            transitions: Vec::new(),
            default_collector,
            finalized: false,
        }
    }

    /// Register a stateless state.
    pub fn add_state(&mut self, id: M::State) -> Result<StateHandle, BuildError> {
        self.register_state(id, StateKind::Stateless)
    }

    /// Register a stateless state and mark it initial.
    pub fn add_initial_state(&mut self, id: M::State) -> Result<StateHandle, BuildError> {
        let handle = self.add_state(id)?;
        self.mark_initial(handle)?;
        Ok(handle)
    }

    /// Register a data-bearing state.
    ///
    /// The factory runs when a transition enters the state, after all of
    /// that transition's outputs, with the shared core and the transition's
    /// arguments. The payload it builds lives exactly as long as the
    /// machine occupies the state.
    pub fn add_data_state<F>(&mut self, id: M::State, factory: F) -> Result<StateHandle, BuildError>
    where
        F: Fn(&mut M::Core, &M::Args) -> M::Data + Send + Sync + 'static,
    {
        self.register_state(
            id,
            StateKind::DataBearing {
                factory: Arc::new(factory),
            },
        )
    }

    /// Mark a previously registered state as the machine's initial state.
    ///
    /// Fails if another state is already initial, or if the state carries
    /// data: entry arguments do not exist at construction time, so the
    /// initial state must be stateless.
    pub fn mark_initial(&mut self, state: StateHandle) -> Result<(), BuildError> {
        self.check_open()?;
        let decl = self.states.get(state.0).ok_or(BuildError::ForeignHandle)?;
        if let Some(first) = self.initial {
            return Err(BuildError::MultipleInitialStates {
                first: self.states[first].id.name().to_string(),
                second: decl.id.name().to_string(),
            });
        }
        if matches!(decl.kind, StateKind::DataBearing { .. }) {
            return Err(BuildError::DataBearingInitial {
                name: decl.id.name().to_string(),
            });
        }
        self.initial = Some(state.0);
        Ok(())
    }

    /// Register an input symbol.
    pub fn add_input(&mut self, id: M::Input) -> Result<InputHandle, BuildError> {
        self.check_open()?;
        if self.inputs.iter().any(|existing| *existing == id) {
            return Err(BuildError::DuplicateInput {
                name: id.name().to_string(),
            });
        }
        self.inputs.push(id);
        Ok(InputHandle(self.inputs.len() - 1))
    }

    /// Register a transition using the builder's default collector.
    ///
    /// Outputs run in the given order; the order is execution order and is
    /// not validated for side-effect safety.
    pub fn add_transition(
        &mut self,
        source: StateHandle,
        input: InputHandle,
        target: StateHandle,
        outputs: Vec<Output<M>>,
    ) -> Result<(), BuildError> {
        let collector = self.default_collector.clone();
        self.add_transition_with(source, input, target, outputs, collector)
    }

    /// Register a transition with its own collector.
    pub fn add_transition_with(
        &mut self,
        source: StateHandle,
        input: InputHandle,
        target: StateHandle,
        outputs: Vec<Output<M>>,
        collector: Collector<M>,
    ) -> Result<(), BuildError> {
        self.check_open()?;
        if source.0 >= self.states.len()
            || target.0 >= self.states.len()
            || input.0 >= self.inputs.len()
        {
            return Err(BuildError::ForeignHandle);
        }
        // flat scan, automatons don't tend to have hundreds of transitions
        if self
            .transitions
            .iter()
            .any(|(from, via, _)| *from == source.0 && *via == input.0)
        {
            return Err(BuildError::DuplicateTransition {
                state: self.states[source.0].id.name().to_string(),
                input: self.inputs[input.0].name().to_string(),
            });
        }
        self.transitions.push((
            source.0,
            input.0,
            TransitionRecord {
                target: target.0,
                outputs,
                collector,
            },
        ));
        Ok(())
    }

    /// Validate the declaration, freeze the table, and return the shared
    /// automaton.
    ///
    /// The builder is finalized afterwards: building twice or registering
    /// anything else fails with [`BuildError::Finalized`], and nothing a
    /// later mutation attempt does can affect the returned automaton.
    pub fn build(&mut self) -> Result<Arc<Automaton<M>>, BuildError> {
        self.check_open()?;
        let initial = self.initial.ok_or(BuildError::NoInitialState)?;
        self.finalized = true;

        let width = self.inputs.len();
        let mut table: Vec<Option<TransitionRecord<M>>> = Vec::new();
        table.resize_with(self.states.len() * width, || None);
        for (source, input, record) in self.transitions.drain(..) {
            table[source * width + input] = Some(record);
        }

        Ok(Arc::new(Automaton::new(
            std::mem::take(&mut self.states),
            std::mem::take(&mut self.inputs),
            initial,
            table,
        )))
    }

    fn register_state(
        &mut self,
        id: M::State,
        kind: StateKind<M>,
    ) -> Result<StateHandle, BuildError> {
        self.check_open()?;
        if self.states.iter().any(|decl| decl.id == id) {
            return Err(BuildError::DuplicateState {
                name: id.name().to_string(),
            });
        }
        self.states.push(StateDecl { id, kind });
        Ok(StateHandle(self.states.len() - 1))
    }

    fn check_open(&self) -> Result<(), BuildError> {
        if self.finalized {
            Err(BuildError::Finalized)
        } else {
            Ok(())
        }
    }
}
