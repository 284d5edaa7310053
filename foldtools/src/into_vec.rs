//! [`IntoVec`] terminal collector.
use std::marker::PhantomData;

use crate::{Reducer, Step};

/// Terminal reducer that collects elements into a [`Vec`] in arrival order.
#[must_use = "reducers do nothing unless driven"]
pub struct IntoVec<Item> {
    _phantom: PhantomData<fn(Item)>,
}

impl<Item> Default for IntoVec<Item> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<Item> IntoVec<Item> {
    /// Create a new collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Item> Reducer for IntoVec<Item> {
    type Item = Item;
    type Accum = Vec<Item>;
    type Output = Vec<Item>;

    fn init(&mut self) -> Self::Accum {
        Vec::new()
    }

    fn step(&mut self, mut accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        accum.push(item);
        Step::Continue(accum)
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        accum
    }
}
