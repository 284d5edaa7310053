//! [`WindowByTime`] virtual-clock sliding window transform.
use std::ops::Add;

use tracing::trace;

use crate::{Reducer, Step};

/// Maintains a window of elements keyed by a timestamp extractor, advancing a
/// virtual clock in fixed-size ticks and emitting one window snapshot per
/// tick crossed.
///
/// The clock starts at the first element's timestamp and advances only in
/// response to observed timestamps, never wall-clock time. On an element with
/// timestamp `t`, while `clock + tick <= t` the clock advances one tick, the
/// eviction function drops stale elements, and the current window contents
/// are cloned and fed downstream — so all snapshots for an element's ticks
/// are emitted strictly before that element becomes visible. Only then is the
/// element folded into the window contract.
///
/// An input that crosses no tick boundary emits nothing. Timestamps behind
/// the clock would move it backward and are rejected.
#[must_use = "reducers do nothing unless driven"]
pub struct WindowByTime<Ts, TsFn, Wr: Reducer, EvictFn, Next> {
    timestamp_fn: TsFn,
    tick: Ts,
    window: Wr,
    evict_fn: EvictFn,
    // Clock and window accumulator, established by the first element.
    state: Option<(Ts, Wr::Accum)>,
    next: Next,
    terminated: bool,
}

impl<Ts, TsFn, Wr: Reducer, EvictFn, Next> WindowByTime<Ts, TsFn, Wr, EvictFn, Next> {
    /// Create with timestamp extractor `timestamp_fn`, tick size `tick`, the
    /// `window` contract elements are folded into, eviction function
    /// `evict_fn`, and next downstream reducer.
    ///
    /// Panics if `tick` is not strictly positive.
    pub fn new(timestamp_fn: TsFn, tick: Ts, window: Wr, evict_fn: EvictFn, next: Next) -> Self
    where
        Self: Reducer,
        Ts: Default + PartialOrd,
    {
        assert!(Ts::default() < tick, "tick size must be positive");
        Self {
            timestamp_fn,
            tick,
            window,
            evict_fn,
            state: None,
            next,
            terminated: false,
        }
    }
}

impl<Ts, TsFn, Wr, EvictFn, Next> Reducer for WindowByTime<Ts, TsFn, Wr, EvictFn, Next>
where
    Ts: Copy + PartialOrd + Add<Output = Ts>,
    TsFn: FnMut(&Wr::Item) -> Ts,
    Wr: Reducer,
    Wr::Accum: Clone,
    EvictFn: FnMut(Wr::Accum, Ts) -> Wr::Accum,
    Next: Reducer<Item = Wr::Accum>,
{
    type Item = Wr::Item;
    type Accum = Next::Accum;
    type Output = Next::Output;

    fn init(&mut self) -> Self::Accum {
        self.next.init()
    }

    fn step(&mut self, mut accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        assert!(
            !self.terminated,
            "Reducer already terminated: `step` must not be called after `Terminate` is returned."
        );
        let t = (self.timestamp_fn)(&item);
        let (mut clock, mut window) = match self.state.take() {
            Some(state) => state,
            None => (t, self.window.init()),
        };
        assert!(
            clock <= t,
            "timestamps must be non-decreasing: the virtual clock cannot move backward"
        );

        while clock + self.tick <= t {
            clock = clock + self.tick;
            window = (self.evict_fn)(window, clock);
            trace!("advanced window clock one tick");
            match self.next.step(accum, window.clone()) {
                Step::Continue(next_accum) => accum = next_accum,
                Step::Terminate(next_accum) => {
                    // The in-flight element is never folded in.
                    self.state = Some((clock, window));
                    self.terminated = true;
                    return Step::Terminate(next_accum);
                }
            }
        }

        match self.window.step(window, item) {
            Step::Continue(window) => {
                self.state = Some((clock, window));
                Step::Continue(accum)
            }
            Step::Terminate(window) => {
                self.state = Some((clock, window));
                self.terminated = true;
                Step::Terminate(accum)
            }
        }
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        // The window contract gets its exactly-once completion if it was ever
        // initialized; its output has nowhere to go and is discarded.
        if let Some((_clock, window)) = self.state.take() {
            let _ = self.window.complete(window);
        }
        self.next.complete(accum)
    }
}
