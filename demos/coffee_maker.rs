//! Coffee Maker
//!
//! A brewer whose Brewing state carries data (the mixture in the
//! carafe) and whose machine state survives process restarts.
//!
//! Key concepts:
//! - Data-bearing states built by a factory on entry
//! - A custom collector returning the last output value
//! - Snapshotting a machine and restoring it elsewhere
//!
//! Run with: cargo run --example coffee_maker

use gearbox::builder::AutomatonBuilder;
use gearbox::machine::Transitioner;
use gearbox::persist::Persister;
use gearbox::{input_enum, state_enum, Collector, Output, Schema};
use serde::{Deserialize, Serialize};

state_enum! {
    enum Brewer {
        Ready,
        Brewing,
    }
}

input_enum! {
    enum Barista {
        BrewButton,
        WaitAWhile,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Mixture {
    roast: String,
    stirred: bool,
}

#[derive(Default)]
struct Kitchen {
    cups_served: u32,
}

struct Coffee;

impl Schema for Coffee {
    type State = Brewer;
    type Input = Barista;
    type Core = Kitchen;
    type Data = Mixture;
    type Args = ();
    type Value = String;
    type Collected = String;
    type Error = std::convert::Infallible;
}

fn main() {
    let last = Collector::<Coffee>::new(|mut values| values.pop().unwrap_or_default());
    let mut builder = AutomatonBuilder::<Coffee>::with_default_collector(last);

    let ready = builder.add_initial_state(Brewer::Ready).unwrap();
    let brewing = builder
        .add_data_state(Brewer::Brewing, |_kitchen, _args| Mixture {
            roast: "light".to_string(),
            stirred: false,
        })
        .unwrap();
    let brew = builder.add_input(Barista::BrewButton).unwrap();
    let wait = builder.add_input(Barista::WaitAWhile).unwrap();

    let heat = Output::<Coffee>::infallible("heat", |_kitchen, _data, _args| {
        "heating the element".to_string()
    });
    let describe = Output::<Coffee>::infallible("describe", |_kitchen, _data, _args| {
        "a rich, satisfying cup is on its way".to_string()
    });
    let pour = Output::<Coffee>::infallible("pour", |kitchen, data, _args| {
        kitchen.cups_served += 1;
        let mixture = data.expect("pouring requires a mixture");
        format!("pouring a {} roast", mixture.roast)
    });

    builder
        .add_transition(ready, brew, brewing, vec![heat, describe])
        .unwrap();
    builder
        .add_transition(brewing, wait, ready, vec![pour])
        .unwrap();

    let automaton = builder.build().unwrap();

    let mut persister = Persister::<Coffee>::new(automaton.clone());
    persister.register(ready, "brewer:ready").unwrap();
    persister
        .register_data(
            brewing,
            "brewer:brewing",
            |_kitchen, mixture| {
                serde_json::json!({ "roast": mixture.roast, "stirred": mixture.stirred })
            },
            |_kitchen, value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| gearbox::PersistError::PayloadLoadFailed(e.to_string()))
            },
        )
        .unwrap();

    let machine = Transitioner::new(automaton, Kitchen::default());
    println!("{}", machine.apply(brew, ()).unwrap());

    // power cut mid-brew: persist, drop, restore
    let snapshot = persister.snapshot(&machine).unwrap();
    let json = snapshot.to_json().unwrap();
    println!("saved: {json}");
    drop(machine);

    let snapshot = gearbox::Snapshot::from_json(&json).unwrap();
    let machine = persister.restore(&snapshot, Kitchen::default()).unwrap();
    println!("restored into {:?}", machine.current_state());

    println!("{}", machine.apply(wait, ()).unwrap());
    machine.with_core(|kitchen| println!("cups served: {}", kitchen.cups_served));
}
