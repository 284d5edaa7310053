#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use std::hash::Hash;
use std::ops::Add;

pub mod by_key;
pub mod comprehension;
pub mod fold;
pub mod into_vec;
pub mod map;
pub mod pad;
pub mod partition;
pub mod window_by_time;

use by_key::ByKey;
use comprehension::Comprehension;
use fold::Fold;
use into_vec::IntoVec;
use map::Map;
use pad::Pad;
use partition::Partition;
use window_by_time::WindowByTime;

/// The result of one [`Reducer::step`] call: the accumulator, plus whether the
/// reducer wants more input.
///
/// `Terminate` means: stop driving input, unwrap, and call
/// [`Reducer::complete`] on the contained accumulator. Once a reducer has
/// returned `Terminate`, no further `step` call may be issued to it;
/// `complete` must still run exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a `Step` carries the accumulator; dropping it loses the reduction state"]
pub enum Step<Accum> {
    /// Keep feeding input.
    Continue(Accum),
    /// Stop feeding input; only `complete` remains.
    Terminate(Accum),
}

impl<Accum> Step<Accum> {
    /// Unwraps the accumulator, discarding the continue/terminate signal.
    pub fn into_inner(self) -> Accum {
        match self {
            Self::Continue(accum) | Self::Terminate(accum) => accum,
        }
    }

    /// Returns `true` for [`Step::Terminate`].
    pub fn is_terminate(&self) -> bool {
        matches!(self, Self::Terminate(_))
    }
}

/// A three-operation reduction contract.
///
/// The accumulator is a single-owner value: it moves into each `step` or
/// `complete` call and comes back out as the return value, so exactly one call
/// holds it at any instant and a stale copy cannot be reused.
///
/// Lifecycle rules every implementor and every driver must honor:
/// - `init` is called at most once per instance, before any `step`.
/// - `complete` is called exactly once, after the last `step` (or immediately
///   when there were no elements), and never twice.
/// - After `step` returns [`Step::Terminate`], no further `step` is issued.
///
/// Transforms in this crate wrap a downstream `Reducer` and present this same
/// interface outward while driving their own state and the downstream's
/// operations within these rules.
pub trait Reducer {
    /// The element type fed into `step`.
    type Item;
    /// The accumulator threaded through the calls.
    type Accum;
    /// The final result produced by `complete`.
    type Output;

    /// Creates the initial accumulator.
    fn init(&mut self) -> Self::Accum;
    /// Folds one element into the accumulator.
    fn step(&mut self, accum: Self::Accum, item: Self::Item) -> Step<Self::Accum>;
    /// Finalizes the accumulator into the output.
    fn complete(&mut self, accum: Self::Accum) -> Self::Output;
}

/// Drives `reducer` with every element of `items`: `init`, one `step` per
/// element until the input is exhausted or the reducer terminates, then
/// `complete` exactly once.
///
/// Infinite iterators are fine as long as the reducer terminates.
pub fn reduce_iter<I, R>(items: I, mut reducer: R) -> R::Output
where
    I: IntoIterator<Item = R::Item>,
    R: Reducer,
{
    let mut accum = reducer.init();
    for item in items {
        match reducer.step(accum, item) {
            Step::Continue(next) => accum = next,
            Step::Terminate(next) => {
                accum = next;
                break;
            }
        }
    }
    reducer.complete(accum)
}

/// Creates a [`ByKey`] reducer that routes each element to a per-key inner
/// reducer and flushes `(key, output)` pairs downstream on completion.
pub fn by_key<K, KeyFn, Factory, R, Next>(
    key_fn: KeyFn,
    factory: Factory,
    next: Next,
) -> ByKey<K, KeyFn, Factory, R, Next>
where
    K: Clone + Eq + Hash,
    KeyFn: FnMut(&R::Item) -> K,
    Factory: FnMut() -> R,
    R: Reducer,
    Next: Reducer<Item = (K, R::Output)>,
{
    ByKey::new(key_fn, factory, next)
}

/// Creates a [`Partition`] reducer that groups elements into runs of `size`,
/// reducing each run through a fresh inner reducer.
///
/// Panics if `size` is zero.
pub fn partition<Factory, R, Next>(
    size: usize,
    factory: Factory,
    next: Next,
) -> Partition<R, Factory, Next>
where
    Factory: FnMut() -> R,
    R: Reducer,
    Next: Reducer<Item = R::Output>,
{
    Partition::new(size, factory, next)
}

/// Creates a [`Pad`] reducer that, on completion, tops the stream up to `size`
/// elements with values drawn lazily from `filler`.
///
/// Panics if `size` is zero.
pub fn pad<Filler, Next>(size: usize, filler: Filler, next: Next) -> Pad<Filler::IntoIter, Next>
where
    Filler: IntoIterator,
    Next: Reducer<Item = Filler::Item>,
{
    Pad::new(size, filler.into_iter(), next)
}

/// Creates a [`WindowByTime`] reducer that advances a virtual clock in
/// `tick`-sized steps driven by element timestamps, evicting and emitting the
/// window contents once per tick.
///
/// Panics if `tick` is not strictly positive.
pub fn window_by_time<Ts, TsFn, Wr, EvictFn, Next>(
    timestamp_fn: TsFn,
    tick: Ts,
    window: Wr,
    evict_fn: EvictFn,
    next: Next,
) -> WindowByTime<Ts, TsFn, Wr, EvictFn, Next>
where
    Ts: Copy + Default + PartialOrd + Add<Output = Ts>,
    TsFn: FnMut(&Wr::Item) -> Ts,
    Wr: Reducer,
    Wr::Accum: Clone,
    EvictFn: FnMut(Wr::Accum, Ts) -> Wr::Accum,
    Next: Reducer<Item = Wr::Accum>,
{
    WindowByTime::new(timestamp_fn, tick, window, evict_fn, next)
}

/// Creates a [`Comprehension`] reducer: one dependent binding level of a
/// nested iteration, expanding each element into the sequence `bind_fn`
/// derives from it.
///
/// Nest multiple instances for deeper comprehensions; apply the body with
/// [`map`].
pub fn comprehension<In, BindFn, IntoIter, Next>(
    bind_fn: BindFn,
    next: Next,
) -> Comprehension<In, BindFn, Next>
where
    BindFn: FnMut(In) -> IntoIter,
    IntoIter: IntoIterator,
    Next: Reducer<Item = IntoIter::Item>,
{
    Comprehension::new(bind_fn, next)
}

/// Creates a [`Map`] reducer that applies `func` to each element.
pub fn map<In, Func, Next>(func: Func, next: Next) -> Map<In, Func, Next>
where
    Func: FnMut(In) -> Next::Item,
    Next: Reducer,
{
    Map::new(func, next)
}

/// Creates a terminal [`Fold`] reducer from an initializer and a fold
/// function; `complete` returns the accumulator.
pub fn fold<Item, Accum, InitFn, StepFn>(
    init_fn: InitFn,
    step_fn: StepFn,
) -> Fold<Item, Accum, InitFn, StepFn>
where
    InitFn: FnMut() -> Accum,
    StepFn: FnMut(&mut Accum, Item),
{
    Fold::new(init_fn, step_fn)
}

/// Creates a terminal [`IntoVec`] reducer that collects elements in order.
pub fn into_vec<Item>() -> IntoVec<Item> {
    IntoVec::new()
}
