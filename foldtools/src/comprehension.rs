//! [`Comprehension`] dependent nested-iteration transform.
use std::marker::PhantomData;

use crate::{Reducer, Step};

/// One dependent binding level of a nested iteration.
///
/// Each incoming element is an outer binding; `bind_fn` derives the dependent
/// inner sequence from it, and every produced value is fed downstream in
/// order, yielding lexicographic (outer-to-inner) order overall. Nest
/// multiple instances for deeper comprehensions and apply the body with
/// [`Map`](crate::map::Map).
///
/// Downstream termination aborts the inner iteration immediately — the lazy
/// iterator is dropped without evaluating further bindings — and propagates
/// outward so the driver stops the outer iteration too.
#[must_use = "reducers do nothing unless driven"]
pub struct Comprehension<In, BindFn, Next> {
    bind_fn: BindFn,
    next: Next,
    _phantom: PhantomData<fn(In)>,
}

impl<In, BindFn, Next> Comprehension<In, BindFn, Next> {
    /// Create with binding function `bind_fn` and next downstream reducer.
    pub fn new(bind_fn: BindFn, next: Next) -> Self
    where
        Self: Reducer<Item = In>,
    {
        Self {
            bind_fn,
            next,
            _phantom: PhantomData,
        }
    }
}

impl<In, BindFn, IntoIter, Next> Reducer for Comprehension<In, BindFn, Next>
where
    BindFn: FnMut(In) -> IntoIter,
    IntoIter: IntoIterator,
    Next: Reducer<Item = IntoIter::Item>,
{
    type Item = In;
    type Accum = Next::Accum;
    type Output = Next::Output;

    fn init(&mut self) -> Self::Accum {
        self.next.init()
    }

    fn step(&mut self, mut accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        for bound in (self.bind_fn)(item) {
            match self.next.step(accum, bound) {
                Step::Continue(next_accum) => accum = next_accum,
                terminate @ Step::Terminate(_) => return terminate,
            }
        }
        Step::Continue(accum)
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        self.next.complete(accum)
    }
}
