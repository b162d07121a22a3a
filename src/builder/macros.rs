//! Macros for ergonomic state and input declarations.

/// Generate an [`Input`](crate::core::Input) implementation for a simple
/// enum of input symbols.
///
/// # Example
///
/// ```
/// use gearbox::input_enum;
///
/// input_enum! {
///     pub enum DoorInput {
///         PushButton,
///         SensorUp,
///         SensorDown,
///     }
/// }
/// ```
#[macro_export]
macro_rules! input_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Input for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a [`State`](crate::core::State) implementation for a simple
/// enum of state identifiers.
///
/// # Example
///
/// ```
/// use gearbox::state_enum;
///
/// state_enum! {
///     pub enum DoorState {
///         Closed,
///         Opening,
///         Opened,
///         Closing,
///     }
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Input, State};

    state_enum! {
        enum TestState {
            Closed,
            Open,
        }
    }

    input_enum! {
        enum TestInput {
            Push,
            Pull,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Closed.name(), "Closed");
        assert_eq!(TestState::Open.name(), "Open");
        assert_ne!(TestState::Closed, TestState::Open);
    }

    #[test]
    fn input_enum_macro_generates_trait() {
        assert_eq!(TestInput::Push.name(), "Push");
        assert_eq!(TestInput::Pull.name(), "Pull");
    }

    #[test]
    fn macros_support_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        let _state = PublicState::A;
    }
}
