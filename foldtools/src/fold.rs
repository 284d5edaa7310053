//! [`Fold`] terminal reducer.
use std::marker::PhantomData;

use crate::{Reducer, Step};

/// Terminal reducer built from an initializer and a fold function;
/// `complete` returns the accumulator unchanged.
#[must_use = "reducers do nothing unless driven"]
pub struct Fold<Item, Accum, InitFn, StepFn> {
    init_fn: InitFn,
    step_fn: StepFn,
    _phantom: PhantomData<fn(Item) -> Accum>,
}

impl<Item, Accum, InitFn, StepFn> Fold<Item, Accum, InitFn, StepFn> {
    /// Create with initializer `init_fn` and fold function `step_fn`.
    pub fn new(init_fn: InitFn, step_fn: StepFn) -> Self
    where
        Self: Reducer<Item = Item>,
    {
        Self {
            init_fn,
            step_fn,
            _phantom: PhantomData,
        }
    }
}

impl<Item, Accum, InitFn, StepFn> Reducer for Fold<Item, Accum, InitFn, StepFn>
where
    InitFn: FnMut() -> Accum,
    StepFn: FnMut(&mut Accum, Item),
{
    type Item = Item;
    type Accum = Accum;
    type Output = Accum;

    fn init(&mut self) -> Self::Accum {
        (self.init_fn)()
    }

    fn step(&mut self, mut accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        (self.step_fn)(&mut accum, item);
        Step::Continue(accum)
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        accum
    }
}
