//! Light Switch
//!
//! The smallest useful machine: two states, one input, no outputs.
//!
//! Key concepts:
//! - Declaring states and inputs with the enum macros
//! - Building a transition table and running it
//! - Undefined inputs leave the machine where it was
//!
//! Run with: cargo run --example light_switch

use gearbox::builder::AutomatonBuilder;
use gearbox::machine::Transitioner;
use gearbox::{input_enum, state_enum, Schema};

state_enum! {
    enum Switch {
        Off,
        On,
    }
}

input_enum! {
    enum Toggle {
        Flip,
        Hold,
    }
}

struct Lamp;

impl Schema for Lamp {
    type State = Switch;
    type Input = Toggle;
    type Core = ();
    type Data = ();
    type Args = ();
    type Value = ();
    type Collected = Vec<()>;
    type Error = std::convert::Infallible;
}

fn main() {
    let mut builder = AutomatonBuilder::<Lamp>::new();
    let off = builder.add_initial_state(Switch::Off).unwrap();
    let on = builder.add_state(Switch::On).unwrap();
    let flip = builder.add_input(Toggle::Flip).unwrap();
    let hold = builder.add_input(Toggle::Hold).unwrap();
    builder.add_transition(off, flip, on, vec![]).unwrap();
    builder.add_transition(on, flip, off, vec![]).unwrap();

    let automaton = builder.build().unwrap();
    println!(
        "built a machine with {} states and {} transitions",
        automaton.state_count(),
        automaton.transition_count()
    );

    let lamp = Transitioner::new(automaton, ());
    println!("starting at {:?}", lamp.current_state());

    lamp.apply(flip, ()).unwrap();
    println!("after flip: {:?}", lamp.current_state());

    // Hold is declared but has no transition anywhere
    match lamp.apply(hold, ()) {
        Ok(_) => unreachable!(),
        Err(err) => println!("hold refused: {err}"),
    }
    println!("still at {:?}", lamp.current_state());

    lamp.apply(flip, ()).unwrap();
    println!("after flip: {:?}", lamp.current_state());
}
