//! [`ByKey`] keyed grouping transform.
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{Reducer, Step};

/// Routes each element to a per-key inner reducer and flushes every key's
/// output downstream on completion.
///
/// The first element with a given key opens a fresh inner reducer from the
/// factory. When an inner reducer terminates, that key alone is closed (its
/// accumulator is completed immediately and later elements for the key are
/// dropped); other keys keep receiving elements, and new keys may still open.
/// The transform itself never terminates during the input phase.
///
/// On completion, every still-open inner reducer is completed and each
/// `(key, output)` pair is stepped into the downstream reducer in first-seen
/// key order, followed by the downstream's own completion.
#[must_use = "reducers do nothing unless driven"]
pub struct ByKey<K, KeyFn, Factory, R: Reducer, Next> {
    key_fn: KeyFn,
    factory: Factory,
    // Arena of per-key reducers in first-seen order, with a hash index into it.
    index: FxHashMap<K, usize>,
    slots: Vec<(K, KeySlot<R>)>,
    next: Next,
}

enum KeySlot<R: Reducer> {
    Open {
        reducer: R,
        // `None` only transiently, while the accumulator is inside a call.
        accum: Option<R::Accum>,
    },
    Done(R::Output),
}

impl<K, KeyFn, Factory, R: Reducer, Next> ByKey<K, KeyFn, Factory, R, Next> {
    /// Create with key function `key_fn`, per-key reducer `factory`, and next
    /// downstream reducer.
    pub fn new(key_fn: KeyFn, factory: Factory, next: Next) -> Self
    where
        Self: Reducer,
    {
        Self {
            key_fn,
            factory,
            index: FxHashMap::default(),
            slots: Vec::new(),
            next,
        }
    }
}

impl<K, KeyFn, Factory, R, Next> Reducer for ByKey<K, KeyFn, Factory, R, Next>
where
    K: Clone + Eq + Hash,
    KeyFn: FnMut(&R::Item) -> K,
    Factory: FnMut() -> R,
    R: Reducer,
    Next: Reducer<Item = (K, R::Output)>,
{
    type Item = R::Item;
    type Accum = Next::Accum;
    type Output = Next::Output;

    fn init(&mut self) -> Self::Accum {
        self.next.init()
    }

    fn step(&mut self, accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        let key = (self.key_fn)(&item);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.slots.len();
                let mut reducer = (self.factory)();
                let inner_accum = reducer.init();
                self.slots.push((
                    key.clone(),
                    KeySlot::Open {
                        reducer,
                        accum: Some(inner_accum),
                    },
                ));
                self.index.insert(key, idx);
                trace!(total_keys = self.slots.len(), "opened new key group");
                idx
            }
        };

        let mut finished = None;
        if let KeySlot::Open { reducer, accum } = &mut self.slots[idx].1 {
            let inner_accum = accum.take().unwrap();
            match reducer.step(inner_accum, item) {
                Step::Continue(inner_accum) => *accum = Some(inner_accum),
                Step::Terminate(inner_accum) => {
                    // Per-key termination: close this key only.
                    finished = Some(reducer.complete(inner_accum));
                }
            }
        }
        // Elements for an already-closed key are dropped.
        if let Some(output) = finished {
            self.slots[idx].1 = KeySlot::Done(output);
        }
        Step::Continue(accum)
    }

    fn complete(&mut self, mut accum: Self::Accum) -> Self::Output {
        let mut downstream_open = true;
        for (key, slot) in self.slots.drain(..) {
            let output = match slot {
                KeySlot::Open {
                    mut reducer,
                    accum: inner_accum,
                } => reducer.complete(inner_accum.unwrap()),
                KeySlot::Done(output) => output,
            };
            // Remaining inner reducers must still be completed even once the
            // downstream stops accepting, so only the emission is skipped.
            if downstream_open {
                match self.next.step(accum, (key, output)) {
                    Step::Continue(next_accum) => accum = next_accum,
                    Step::Terminate(next_accum) => {
                        accum = next_accum;
                        downstream_open = false;
                    }
                }
            }
        }
        self.index.clear();
        self.next.complete(accum)
    }
}
