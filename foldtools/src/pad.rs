//! [`Pad`] trailing-fill transform.
use tracing::trace;

use crate::{Reducer, Step};

/// Forwards elements unchanged, counting them; on completion, if fewer than
/// `size` elements were seen, draws the difference from a filler iterator and
/// feeds each downstream before completing.
///
/// The filler is consumed lazily, in order, and only at completion time —
/// never when the stream was already long enough, and never before
/// `complete`. Infinite fillers are supported. A filler that runs out before
/// the deficit is covered is a fatal error.
#[must_use = "reducers do nothing unless driven"]
pub struct Pad<Filler, Next> {
    size: usize,
    filler: Filler,
    seen: usize,
    next: Next,
    terminated: bool,
}

impl<Filler, Next> Pad<Filler, Next> {
    /// Create with target length `size`, `filler` iterator, and next
    /// downstream reducer.
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize, filler: Filler, next: Next) -> Self
    where
        Self: Reducer,
    {
        assert!(0 < size, "pad length must be positive");
        Self {
            size,
            filler,
            seen: 0,
            next,
            terminated: false,
        }
    }
}

impl<Filler, Next> Reducer for Pad<Filler, Next>
where
    Filler: Iterator,
    Next: Reducer<Item = Filler::Item>,
{
    type Item = Filler::Item;
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
        self.seen += 1;
        match self.next.step(accum, item) {
            Step::Continue(next_accum) => Step::Continue(next_accum),
            Step::Terminate(next_accum) => {
                self.terminated = true;
                Step::Terminate(next_accum)
            }
        }
    }

    fn complete(&mut self, mut accum: Self::Accum) -> Self::Output {
        if !self.terminated && self.seen < self.size {
            trace!(deficit = self.size - self.seen, "padding from filler");
            while self.seen < self.size {
                let Some(fill) = self.filler.next() else {
                    panic!(
                        "pad filler exhausted: {} more element(s) needed",
                        self.size - self.seen
                    );
                };
                self.seen += 1;
                match self.next.step(accum, fill) {
                    Step::Continue(next_accum) => accum = next_accum,
                    Step::Terminate(next_accum) => {
                        accum = next_accum;
                        break;
                    }
                }
            }
        }
        self.next.complete(accum)
    }
}
