//! Garage Door
//!
//! A door controller where the same button means different things in
//! different states, and transitions drive hardware side effects.
//!
//! Key concepts:
//! - Outputs that act on a shared core (the motor and alarm here)
//! - Output lists running in declaration order
//! - Tracing committed transitions
//!
//! Run with: cargo run --example garage_door

use std::sync::Arc;

use gearbox::builder::AutomatonBuilder;
use gearbox::machine::Transitioner;
use gearbox::{input_enum, state_enum, Output, Schema};

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

#[derive(Default)]
struct Hardware {
    motor_running: bool,
}

struct Garage;

impl Schema for Garage {
    type State = Door;
    type Input = Controller;
    type Core = Hardware;
    type Data = ();
    type Args = ();
    type Value = ();
    type Collected = Vec<()>;
    type Error = std::convert::Infallible;
}

fn main() {
    let mut builder = AutomatonBuilder::<Garage>::new();
    let closed = builder.add_initial_state(Door::Closed).unwrap();
    let opening = builder.add_state(Door::Opening).unwrap();
    let opened = builder.add_state(Door::Opened).unwrap();
    let closing = builder.add_state(Door::Closing).unwrap();
    let push = builder.add_input(Controller::PushButton).unwrap();
    let up = builder.add_input(Controller::SensorUp).unwrap();
    let down = builder.add_input(Controller::SensorDown).unwrap();

    let motor_up = Output::<Garage>::infallible("motor_up", |hw, _data, _args| {
        hw.motor_running = true;
        println!("  [hw] motor running up");
    });
    let motor_down = Output::<Garage>::infallible("motor_down", |hw, _data, _args| {
        hw.motor_running = true;
        println!("  [hw] motor running down");
    });
    let motor_stop = Output::<Garage>::infallible("motor_stop", |hw, _data, _args| {
        hw.motor_running = false;
        println!("  [hw] motor stopped");
    });
    let alarm = Output::<Garage>::infallible("alarm", |_hw, _data, _args| {
        println!("  [hw] beep beep beep");
    });

    builder
        .add_transition(closed, push, opening, vec![motor_up])
        .unwrap();
    builder.add_transition(opening, up, opened, vec![]).unwrap();
    builder
        .add_transition(opened, push, closing, vec![motor_stop.clone(), alarm, motor_down])
        .unwrap();
    builder
        .add_transition(closing, down, closed, vec![motor_stop])
        .unwrap();

    let automaton = builder.build().unwrap();
    let door = Transitioner::new(automaton, Hardware::default());

    door.set_tracer(Arc::new(|event| {
        println!(
            "  [trace] {:?} --{:?}--> {:?} via {:?}",
            event.from, event.input, event.to, event.outputs
        );
    }));

    println!("press the button while closed:");
    door.apply(push, ()).unwrap();

    println!("press it again mid-travel:");
    if let Err(err) = door.apply(push, ()) {
        println!("  refused: {err}");
    }

    println!("the up sensor fires:");
    door.apply(up, ()).unwrap();

    println!("press the button while opened:");
    door.apply(push, ()).unwrap();

    println!("the down sensor fires:");
    door.apply(down, ()).unwrap();

    println!("door is {:?} again", door.current_state());
    door.with_core(|hw| assert!(!hw.motor_running));
}
