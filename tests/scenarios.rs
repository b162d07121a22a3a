//! End-to-end machine scenarios.

use gearbox::builder::AutomatonBuilder;
use gearbox::machine::{TransitionError, Transitioner};
use gearbox::persist::Persister;
use gearbox::{input_enum, state_enum, Collector, Output, Schema};

mod light_switch {
    use super::*;

    state_enum! {
        enum Switch {
            Off,
            On,
        }
    }

    input_enum! {
        enum Toggle {
            Flip,
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

    struct Handles {
        off: gearbox::StateHandle,
        on: gearbox::StateHandle,
        flip: gearbox::InputHandle,
    }

    fn build() -> (std::sync::Arc<gearbox::Automaton<Lamp>>, Handles) {
        let mut builder = AutomatonBuilder::<Lamp>::new();
        let off = builder.add_initial_state(Switch::Off).unwrap();
        let on = builder.add_state(Switch::On).unwrap();
        let flip = builder.add_input(Toggle::Flip).unwrap();
        builder.add_transition(off, flip, on, vec![]).unwrap();
        builder.add_transition(on, flip, off, vec![]).unwrap();
        (builder.build().unwrap(), Handles { off, on, flip })
    }

    #[test]
    fn flip_toggles_between_off_and_on() {
        let (automaton, handles) = build();
        let lamp = Transitioner::new(automaton, ());
        assert_eq!(lamp.current_state(), &Switch::Off);

        lamp.apply(handles.flip, ()).unwrap();
        assert_eq!(lamp.current_state(), &Switch::On);

        lamp.apply(handles.flip, ()).unwrap();
        assert_eq!(lamp.current_state(), &Switch::Off);
    }

    #[test]
    fn restored_machine_is_indistinguishable() {
        let (automaton, handles) = build();
        let flip = handles.flip;

        // tokens deliberately differ from the state names
        let mut persister = Persister::<Lamp>::new(automaton.clone());
        persister.register(handles.off, "lamp:0").unwrap();
        persister.register(handles.on, "lamp:1").unwrap();

        let original = Transitioner::new(automaton.clone(), ());
        original.apply(flip, ()).unwrap();

        let snapshot = persister.snapshot(&original).unwrap();
        assert_eq!(snapshot.state, "lamp:1");

        let restored = persister.restore(&snapshot, ()).unwrap();
        assert_eq!(restored.current_state(), original.current_state());

        // both machines keep behaving identically from here
        original.apply(flip, ()).unwrap();
        restored.apply(flip, ()).unwrap();
        assert_eq!(restored.current_state(), original.current_state());
        assert_eq!(restored.current_state(), &Switch::Off);
    }
}

mod garage_door {
    use super::*;

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
        type Core = Vec<&'static str>;
        type Data = ();
        type Args = ();
        type Value = ();
        type Collected = Vec<()>;
        type Error = std::convert::Infallible;
    }

    struct Handles {
        push: gearbox::InputHandle,
        up: gearbox::InputHandle,
        down: gearbox::InputHandle,
    }

    fn build() -> (Transitioner<Garage>, Handles) {
        let mut builder = AutomatonBuilder::<Garage>::new();
        let closed = builder.add_initial_state(Door::Closed).unwrap();
        let opening = builder.add_state(Door::Opening).unwrap();
        let opened = builder.add_state(Door::Opened).unwrap();
        let closing = builder.add_state(Door::Closing).unwrap();
        let push = builder.add_input(Controller::PushButton).unwrap();
        let up = builder.add_input(Controller::SensorUp).unwrap();
        let down = builder.add_input(Controller::SensorDown).unwrap();

        let effect = |tag: &'static str| {
            Output::<Garage>::infallible(tag, move |core, _data, _args| core.push(tag))
        };

        builder
            .add_transition(closed, push, opening, vec![effect("start motor up")])
            .unwrap();
        builder.add_transition(opening, up, opened, vec![]).unwrap();
        builder
            .add_transition(
                opened,
                push,
                closing,
                vec![
                    effect("stop motor"),
                    effect("sound alarm"),
                    effect("start motor down"),
                ],
            )
            .unwrap();
        builder
            .add_transition(closing, down, closed, vec![effect("stop motor")])
            .unwrap();

        let automaton = builder.build().unwrap();
        (
            Transitioner::new(automaton, Vec::new()),
            Handles { push, up, down },
        )
    }

    #[test]
    fn push_button_from_closed_starts_the_motor() {
        let (door, handles) = build();
        door.apply(handles.push, ()).unwrap();
        assert_eq!(door.current_state(), &Door::Opening);
        door.with_core(|log| assert_eq!(log.as_slice(), ["start motor up"]));
    }

    #[test]
    fn push_button_while_opening_is_undefined() {
        let (door, handles) = build();
        door.apply(handles.push, ()).unwrap();

        let err = door.apply(handles.push, ()).unwrap_err();
        assert!(matches!(err, TransitionError::NoTransition { .. }));
        assert_eq!(door.current_state(), &Door::Opening);
    }

    #[test]
    fn sensor_up_completes_the_opening() {
        let (door, handles) = build();
        door.apply(handles.push, ()).unwrap();
        door.apply(handles.up, ()).unwrap();
        assert_eq!(door.current_state(), &Door::Opened);
    }

    #[test]
    fn closing_runs_outputs_in_exact_order() {
        let (door, handles) = build();
        door.apply(handles.push, ()).unwrap();
        door.apply(handles.up, ()).unwrap();
        door.apply(handles.push, ()).unwrap();
        assert_eq!(door.current_state(), &Door::Closing);
        door.with_core(|log| {
            assert_eq!(
                log.as_slice(),
                [
                    "start motor up",
                    "stop motor",
                    "sound alarm",
                    "start motor down",
                ]
            );
        });

        door.apply(handles.down, ()).unwrap();
        assert_eq!(door.current_state(), &Door::Closed);
    }
}

mod coffee_brewer {
    use super::*;

    state_enum! {
        enum Brewer {
            Ready,
            Brewing,
        }
    }

    input_enum! {
        enum Barista {
            BrewButton,
            Stir,
            WaitAWhile,
        }
    }

    #[derive(Default)]
    struct BrewCore {
        heat_cycles: u32,
        served: Vec<String>,
    }

    struct Coffee;

    impl Schema for Coffee {
        type State = Brewer;
        type Input = Barista;
        type Core = BrewCore;
        type Data = String; // description of the mixture in the carafe
        type Args = ();
        type Value = String;
        type Collected = String;
        type Error = std::convert::Infallible;
    }

    struct Handles {
        brew: gearbox::InputHandle,
        stir: gearbox::InputHandle,
        wait: gearbox::InputHandle,
    }

    fn build() -> (Transitioner<Coffee>, Handles) {
        let last = Collector::<Coffee>::new(|mut values| values.pop().unwrap_or_default());
        let mut builder = AutomatonBuilder::<Coffee>::with_default_collector(last);

        let ready = builder.add_initial_state(Brewer::Ready).unwrap();
        let brewing = builder
            .add_data_state(Brewer::Brewing, |_core, _args| {
                "light roast mixture".to_string()
            })
            .unwrap();
        let brew = builder.add_input(Barista::BrewButton).unwrap();
        let stir = builder.add_input(Barista::Stir).unwrap();
        let wait = builder.add_input(Barista::WaitAWhile).unwrap();

        let heat_element = Output::<Coffee>::infallible("heat_element", |core, _data, _args| {
            core.heat_cycles += 1;
            "heating".to_string()
        });
        let describe_coffee =
            Output::<Coffee>::infallible("describe_coffee", |_core, _data, _args| {
                "a rich, satisfying cup of coffee".to_string()
            });
        let swirl = Output::<Coffee>::infallible("swirl", |_core, data, _args| {
            let mixture = data.expect("stirring requires a mixture");
            mixture.push_str(", stirred");
            mixture.clone()
        });
        let pour = Output::<Coffee>::infallible("pour", |core, data, _args| {
            let mixture = data.expect("pouring requires a mixture");
            core.served.push(mixture.clone());
            format!("serving {mixture}")
        });

        builder
            .add_transition(ready, brew, brewing, vec![heat_element, describe_coffee])
            .unwrap();
        builder
            .add_transition(brewing, stir, brewing, vec![swirl])
            .unwrap();
        builder
            .add_transition(brewing, wait, ready, vec![pour])
            .unwrap();

        let automaton = builder.build().unwrap();
        (
            Transitioner::new(automaton, BrewCore::default()),
            Handles { brew, stir, wait },
        )
    }

    #[test]
    fn last_value_collector_returns_the_final_output_value() {
        let (machine, handles) = build();
        let described = machine.apply(handles.brew, ()).unwrap();
        assert_eq!(described, "a rich, satisfying cup of coffee");
        machine.with_core(|core| assert_eq!(core.heat_cycles, 1));
    }

    #[test]
    fn data_is_created_on_entry_and_visible_to_outputs() {
        let (machine, handles) = build();
        machine.apply(handles.brew, ()).unwrap();
        assert_eq!(machine.current_state(), &Brewer::Brewing);

        let served = machine.apply(handles.wait, ()).unwrap();
        assert_eq!(served, "serving light roast mixture");
        assert_eq!(machine.current_state(), &Brewer::Ready);
        machine.with_core(|core| {
            assert_eq!(core.served.as_slice(), ["light roast mixture"]);
        });
    }

    #[test]
    fn self_loop_keeps_the_state_data() {
        let (machine, handles) = build();
        machine.apply(handles.brew, ()).unwrap();

        let stirred = machine.apply(handles.stir, ()).unwrap();
        assert_eq!(stirred, "light roast mixture, stirred");

        // the loop did not rebuild the payload; the stir is still there
        let served = machine.apply(handles.wait, ()).unwrap();
        assert_eq!(served, "serving light roast mixture, stirred");
    }

    #[test]
    fn stirring_while_ready_is_undefined() {
        let (machine, handles) = build();
        let err = machine.apply(handles.stir, ()).unwrap_err();
        assert!(matches!(err, TransitionError::NoTransition { .. }));
        assert_eq!(machine.current_state(), &Brewer::Ready);
    }
}
