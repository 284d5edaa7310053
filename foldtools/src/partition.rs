//! [`Partition`] fixed-size run transform.
use std::mem;

use tracing::trace;

use crate::{Reducer, Step};

/// Groups elements into runs of a fixed size, reducing each run through a
/// fresh inner reducer and feeding the run's output downstream.
///
/// A run is finalized when it reaches `size` elements, or at completion for a
/// non-empty final partial run — a partial run is replayed through a fresh
/// inner reducer just like a full one, never silently dropped. If an inner
/// reducer terminates partway through a run, the rest of that run is consumed
/// by the terminated reducer's closure and the outer partitioning of
/// subsequent elements continues.
#[must_use = "reducers do nothing unless driven"]
pub struct Partition<R: Reducer, Factory, Next> {
    size: usize,
    factory: Factory,
    buffer: Vec<R::Item>,
    next: Next,
    terminated: bool,
}

impl<R: Reducer, Factory, Next> Partition<R, Factory, Next> {
    /// Create with run length `size`, per-run reducer `factory`, and next
    /// downstream reducer.
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize, factory: Factory, next: Next) -> Self
    where
        Self: Reducer,
    {
        assert!(0 < size, "partition size must be positive");
        Self {
            size,
            factory,
            buffer: Vec::with_capacity(size),
            next,
            terminated: false,
        }
    }
}

impl<R, Factory, Next> Partition<R, Factory, Next>
where
    R: Reducer,
    Factory: FnMut() -> R,
{
    /// Replays the buffered run through a fresh inner reducer.
    fn reduce_run(&mut self) -> R::Output {
        let run = mem::take(&mut self.buffer);
        trace!(len = run.len(), "reducing partition run");
        let mut reducer = (self.factory)();
        let mut accum = reducer.init();
        for item in run {
            match reducer.step(accum, item) {
                Step::Continue(next_accum) => accum = next_accum,
                Step::Terminate(next_accum) => {
                    accum = next_accum;
                    break;
                }
            }
        }
        reducer.complete(accum)
    }
}

impl<R, Factory, Next> Reducer for Partition<R, Factory, Next>
where
    R: Reducer,
    Factory: FnMut() -> R,
    Next: Reducer<Item = R::Output>,
{
    type Item = R::Item;
    type Accum = Next::Accum;
    type Output = Next::Output;

    fn init(&mut self) -> Self::Accum {
        self.next.init()
    }

    fn step(&mut self, accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        assert!(
            !self.terminated,
            "Reducer already terminated: `step` must not be called after `Terminate` is returned."
        );
        self.buffer.push(item);
        if self.size <= self.buffer.len() {
            let output = self.reduce_run();
            match self.next.step(accum, output) {
                Step::Continue(next_accum) => Step::Continue(next_accum),
                Step::Terminate(next_accum) => {
                    self.terminated = true;
                    Step::Terminate(next_accum)
                }
            }
        } else {
            Step::Continue(accum)
        }
    }

    fn complete(&mut self, mut accum: Self::Accum) -> Self::Output {
        if self.terminated {
            // The downstream asked to stop; emitting the remainder would be a
            // step after termination.
            self.buffer.clear();
        } else if !self.buffer.is_empty() {
            let output = self.reduce_run();
            accum = self.next.step(accum, output).into_inner();
        }
        self.next.complete(accum)
    }
}
