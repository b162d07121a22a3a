//! Registered output callables executed as part of a transition.

use crate::core::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Signature of an output callable.
///
/// Outputs receive the shared core, the data of the state the transition
/// is leaving (when that state is data-bearing), and the caller's
/// arguments. Returning an error aborts the transition before it commits.
pub type OutputFn<M> = Arc<
    dyn Fn(
            &mut <M as Schema>::Core,
            Option<&mut <M as Schema>::Data>,
            &<M as Schema>::Args,
        ) -> Result<<M as Schema>::Value, <M as Schema>::Error>
        + Send
        + Sync,
>;

/// A named effect function registered on a transition.
///
/// An output has no identity beyond its registration: it always runs as
/// part of exactly one transition's ordered output list. The name is used
/// only for diagnostics and trace events.
///
/// # Example
///
/// ```rust
/// use gearbox::core::{Input, Output, Schema, State};
///
/// # #[derive(Clone, PartialEq, Debug)]
/// # enum S { A }
/// # impl State for S { fn name(&self) -> &str { "A" } }
/// # #[derive(Clone, PartialEq, Debug)]
/// # enum I { Go }
/// # impl Input for I { fn name(&self) -> &str { "Go" } }
/// # struct M;
/// # impl Schema for M {
/// #     type State = S;
/// #     type Input = I;
/// #     type Core = u32;
/// #     type Data = ();
/// #     type Args = ();
/// #     type Value = u32;
/// #     type Collected = Vec<u32>;
/// #     type Error = std::convert::Infallible;
/// # }
/// let count_up: Output<M> = Output::infallible("count_up", |core, _data, _args| {
///     *core += 1;
///     *core
/// });
/// assert_eq!(count_up.name(), "count_up");
/// ```
pub struct Output<M: Schema> {
    name: String,
    call: OutputFn<M>,
}

impl<M: Schema> Output<M> {
    /// Register an effect function under a diagnostic name.
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&mut M::Core, Option<&mut M::Data>, &M::Args) -> Result<M::Value, M::Error>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(call),
        }
    }

    /// Register an effect function that cannot fail.
    pub fn infallible<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&mut M::Core, Option<&mut M::Data>, &M::Args) -> M::Value + Send + Sync + 'static,
    {
        Self::new(name, move |core, data, args| Ok(call(core, data, args)))
    }

    /// The output's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the effect function.
    pub(crate) fn invoke(
        &self,
        core: &mut M::Core,
        data: Option<&mut M::Data>,
        args: &M::Args,
    ) -> Result<M::Value, M::Error> {
        (self.call)(core, data, args)
    }
}

impl<M: Schema> Clone for Output<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            call: Arc::clone(&self.call),
        }
    }
}

impl<M: Schema> fmt::Debug for Output<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").field("name", &self.name).finish()
    }
}
