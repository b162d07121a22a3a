//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated input sequences.

use std::sync::{Arc, Mutex};

use gearbox::builder::AutomatonBuilder;
use gearbox::machine::{TransitionError, Transitioner};
use gearbox::{input_enum, state_enum, Output, Schema};
use proptest::prelude::*;

state_enum! {
    enum Door {
        Closed,
        Opening,
        Opened,
        Closing,
    }
}

input_enum! {
    enum Controller {
        PushButton,
        SensorUp,
        SensorDown,
    }
}

struct Garage;

impl Schema for Garage {
    type State = Door;
    type Input = Controller;
    type Core = Vec<usize>;
    type Data = ();
    type Args = ();
    type Value = usize;
    type Collected = Vec<usize>;
    type Error = std::convert::Infallible;
}

/// Reference model of the door automaton, independent of the engine.
fn model_step(state: &Door, input: &Controller) -> Option<Door> {
    match (state, input) {
        (Door::Closed, Controller::PushButton) => Some(Door::Opening),
        (Door::Opening, Controller::SensorUp) => Some(Door::Opened),
        (Door::Opened, Controller::PushButton) => Some(Door::Closing),
        (Door::Closing, Controller::SensorDown) => Some(Door::Closed),
        _ => None,
    }
}

struct Harness {
    machine: Transitioner<Garage>,
    inputs: [gearbox::InputHandle; 3],
}

/// Each transition emits one numbered effect per output so tests can
/// check both the core-side log and the collected return value.
fn build_door() -> Harness {
    let mut builder = AutomatonBuilder::<Garage>::new();
    let closed = builder.add_initial_state(Door::Closed).unwrap();
    let opening = builder.add_state(Door::Opening).unwrap();
    let opened = builder.add_state(Door::Opened).unwrap();
    let closing = builder.add_state(Door::Closing).unwrap();
    let push = builder.add_input(Controller::PushButton).unwrap();
    let up = builder.add_input(Controller::SensorUp).unwrap();
    let down = builder.add_input(Controller::SensorDown).unwrap();

    let effect = |n: usize| {
        Output::<Garage>::infallible(format!("effect_{n}"), move |core, _data, _args| {
            core.push(n);
            n
        })
    };

    builder
        .add_transition(closed, push, opening, vec![effect(1)])
        .unwrap();
    builder.add_transition(opening, up, opened, vec![]).unwrap();
    builder
        .add_transition(opened, push, closing, vec![effect(2), effect(3), effect(4)])
        .unwrap();
    builder
        .add_transition(closing, down, closed, vec![effect(5)])
        .unwrap();

    let automaton = builder.build().unwrap();
    Harness {
        machine: Transitioner::new(automaton, Vec::new()),
        inputs: [push, up, down],
    }
}

fn input_of(harness: &Harness, variant: &Controller) -> gearbox::InputHandle {
    match variant {
        Controller::PushButton => harness.inputs[0],
        Controller::SensorUp => harness.inputs[1],
        Controller::SensorDown => harness.inputs[2],
    }
}

/// Expected ordered output values for a defined transition.
fn model_outputs(state: &Door, input: &Controller) -> Vec<usize> {
    match (state, input) {
        (Door::Closed, Controller::PushButton) => vec![1],
        (Door::Opening, Controller::SensorUp) => vec![],
        (Door::Opened, Controller::PushButton) => vec![2, 3, 4],
        (Door::Closing, Controller::SensorDown) => vec![5],
        _ => vec![],
    }
}

prop_compose! {
    fn arbitrary_input()(variant in 0..3u8) -> Controller {
        match variant {
            0 => Controller::PushButton,
            1 => Controller::SensorUp,
            _ => Controller::SensorDown,
        }
    }
}

proptest! {
    #[test]
    fn machine_agrees_with_the_model(
        sequence in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let harness = build_door();
        let mut expected = Door::Closed;

        for input in &sequence {
            let result = harness.machine.apply(input_of(&harness, input), ());
            match model_step(&expected, input) {
                Some(next) => {
                    prop_assert!(result.is_ok());
                    expected = next;
                }
                None => {
                    let refused = matches!(&result, Err(TransitionError::NoTransition { .. }));
                    prop_assert!(refused, "expected NoTransition, got {:?}", result);
                }
            }
            prop_assert_eq!(harness.machine.current_state(), &expected);
        }
    }

    #[test]
    fn undefined_input_never_moves_the_state(
        sequence in prop::collection::vec(arbitrary_input(), 1..40)
    ) {
        let harness = build_door();

        for input in &sequence {
            let before = harness.machine.current_state().clone();
            let result = harness.machine.apply(input_of(&harness, input), ());
            if result.is_err() {
                prop_assert_eq!(harness.machine.current_state(), &before);
            }
        }
    }

    #[test]
    fn collected_value_is_the_ordered_output_values(
        sequence in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let harness = build_door();
        let mut state = Door::Closed;
        let mut expected_log = Vec::new();

        for input in &sequence {
            if let Some(next) = model_step(&state, input) {
                let outputs = model_outputs(&state, input);
                let collected = harness
                    .machine
                    .apply(input_of(&harness, input), ())
                    .unwrap();
                prop_assert_eq!(&collected, &outputs);
                expected_log.extend(outputs);
                state = next;
            } else {
                let _ = harness.machine.apply(input_of(&harness, input), ());
            }
        }

        harness.machine.with_core(|log| {
            prop_assert_eq!(log.as_slice(), expected_log.as_slice());
            Ok(())
        })?;
    }

    #[test]
    fn identical_sequences_produce_identical_runs(
        sequence in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let first = build_door();
        let second = build_door();

        for input in &sequence {
            let a = first.machine.apply(input_of(&first, input), ());
            let b = second.machine.apply(input_of(&second, input), ());
            prop_assert_eq!(a.is_ok(), b.is_ok());
            if let (Ok(a), Ok(b)) = (a, b) {
                prop_assert_eq!(a, b);
            }
        }

        prop_assert_eq!(
            first.machine.current_state(),
            second.machine.current_state()
        );
    }

    #[test]
    fn tracer_sees_exactly_the_committed_transitions(
        sequence in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let harness = build_door();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        harness.machine.set_tracer(Arc::new(move |event| {
            sink.lock().unwrap().push((event.from.clone(), event.to.clone()));
        }));

        let mut committed = 0usize;
        for input in &sequence {
            if harness.machine.apply(input_of(&harness, input), ()).is_ok() {
                committed += 1;
            }
        }

        let events = seen.lock().unwrap();
        prop_assert_eq!(events.len(), committed);

        // committed transitions chain up; refused inputs leave no gap
        if let Some((first_from, _)) = events.first() {
            prop_assert_eq!(first_from, &Door::Closed);
        }
        for pair in events.windows(2) {
            prop_assert_eq!(&pair[0].1, &pair[1].0);
        }
    }
}
