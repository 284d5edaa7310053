//! [`Map`] element-mapping transform.
use std::marker::PhantomData;

use crate::{Reducer, Step};

/// Applies a function to each element and feeds the output downstream,
/// forwarding the downstream's [`Step`] signal unchanged.
#[must_use = "reducers do nothing unless driven"]
pub struct Map<In, Func, Next> {
    func: Func,
    next: Next,
    _phantom: PhantomData<fn(In)>,
}

impl<In, Func, Next> Map<In, Func, Next> {
    /// Create with mapping `func` and next downstream reducer.
    pub fn new(func: Func, next: Next) -> Self
    where
        Self: Reducer<Item = In>,
    {
        Self {
            func,
            next,
            _phantom: PhantomData,
        }
    }
}

impl<In, Func, Next> Reducer for Map<In, Func, Next>
where
    Func: FnMut(In) -> Next::Item,
    Next: Reducer,
{
    type Item = In;
    type Accum = Next::Accum;
    type Output = Next::Output;

    fn init(&mut self) -> Self::Accum {
        self.next.init()
    }

    fn step(&mut self, accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        let item = (self.func)(item);
        self.next.step(accum, item)
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        self.next.complete(accum)
    }
}
