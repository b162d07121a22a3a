//! Collectors reduce a transition's ordered output values to one result.
//!
//! A collector is a pure function from the ordered list of output return
//! values to the single value handed back to the caller of `apply`. The
//! engine calls it exactly once per successful transition.

use crate::core::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Pure reduction from ordered output values to the caller-visible result.
///
/// # Example
///
/// ```rust
/// use gearbox::core::{Collector, Input, Schema, State};
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
/// #     type Core = ();
/// #     type Data = ();
/// #     type Args = ();
/// #     type Value = u32;
/// #     type Collected = u32;
/// #     type Error = std::convert::Infallible;
/// # }
/// let sum: Collector<M> = Collector::new(|values| values.into_iter().sum());
/// assert_eq!(sum.collect(vec![1, 2, 3]), 6);
/// ```
pub struct Collector<M: Schema> {
    reduce: Arc<dyn Fn(Vec<M::Value>) -> M::Collected + Send + Sync>,
}

impl<M: Schema> Collector<M> {
    /// Create a collector from a pure reduction function.
    ///
    /// The function must be free of side effects; the engine assumes it can
    /// be called at any point after the state commit without observable
    /// consequences beyond its return value.
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(Vec<M::Value>) -> M::Collected + Send + Sync + 'static,
    {
        Self {
            reduce: Arc::new(reduce),
        }
    }

    /// Reduce the ordered output values.
    pub fn collect(&self, values: Vec<M::Value>) -> M::Collected {
        (self.reduce)(values)
    }
}

impl<M> Collector<M>
where
    M: Schema,
    M::Collected: From<Vec<M::Value>>,
{
    /// The default collector: the full ordered list of output values.
    pub fn sequence() -> Self {
        Self::new(|values| values.into())
    }
}

impl<M> Collector<M>
where
    M: Schema,
    M::Collected: From<Option<M::Value>>,
{
    /// Keep only the first output's value, if any.
    pub fn first() -> Self {
        Self::new(|values| values.into_iter().next().into())
    }

    /// Keep only the last output's value, if any.
    pub fn last() -> Self {
        Self::new(|values| values.into_iter().next_back().into())
    }
}

impl<M> Collector<M>
where
    M: Schema,
    M::Collected: Default,
{
    /// Ignore every output value and return the default result.
    pub fn discard() -> Self {
        Self::new(|_values| M::Collected::default())
    }
}

impl<M: Schema> Clone for Collector<M> {
    fn clone(&self) -> Self {
        Self {
            reduce: Arc::clone(&self.reduce),
        }
    }
}

impl<M: Schema> fmt::Debug for Collector<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector").finish_non_exhaustive()
    }
}
