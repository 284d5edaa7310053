//! Conformance oracle: a reducer wrapper that panics on any violation of the
//! reduction-contract lifecycle. Test-side only.
#![allow(dead_code, reason = "shared between test binaries which each use a subset")]

use std::cell::RefCell;
use std::rc::Rc;

use foldtools::{Reducer, Step};

/// Lifecycle counters shared between a [`Poison`] reducer and the test body.
#[derive(Debug, Default)]
pub struct OracleLog {
    pub inits: usize,
    pub steps: usize,
    pub terminates: usize,
    pub completes: usize,
}

/// Shareable handle to an [`OracleLog`].
pub type LogHandle = Rc<RefCell<OracleLog>>;

/// Creates a fresh shared lifecycle log.
pub fn oracle_log() -> LogHandle {
    Rc::new(RefCell::new(OracleLog::default()))
}

/// An accumulator wrapper carrying an identity token, so the oracle can tell
/// a stale or synthesized accumulator from the one it most recently returned.
pub struct PoisonAccum<A> {
    token: u64,
    value: A,
}

/// Wraps an inner reducer and panics on any contract violation: a stale or
/// foreign accumulator, `init` called twice, `step` after `Terminate` or
/// `complete`, or `complete` called twice. With a step budget, returns
/// `Terminate` on the budget-th accepted step.
pub struct Poison<R> {
    inner: R,
    budget: Option<usize>,
    steps_taken: usize,
    // Token of the accumulator we most recently handed out; `None` before `init`.
    expected_token: Option<u64>,
    next_token: u64,
    terminated: bool,
    completed: bool,
    log: LogHandle,
}

impl<R> Poison<R> {
    /// An oracle that never terminates on its own.
    pub fn new(inner: R, log: LogHandle) -> Self {
        Self {
            inner,
            budget: None,
            steps_taken: 0,
            expected_token: None,
            next_token: 0,
            terminated: false,
            completed: false,
            log,
        }
    }

    /// An oracle that terminates on the `budget`-th accepted step.
    pub fn with_budget(inner: R, budget: usize, log: LogHandle) -> Self {
        Self {
            budget: Some(budget),
            ..Self::new(inner, log)
        }
    }

    fn issue_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.expected_token = Some(token);
        token
    }
}

impl<R: Reducer> Reducer for Poison<R> {
    type Item = R::Item;
    type Accum = PoisonAccum<R::Accum>;
    type Output = R::Output;

    fn init(&mut self) -> Self::Accum {
        assert!(
            self.expected_token.is_none(),
            "`init` called twice on the same contract instance"
        );
        self.log.borrow_mut().inits += 1;
        let token = self.issue_token();
        PoisonAccum {
            token,
            value: self.inner.init(),
        }
    }

    fn step(&mut self, accum: Self::Accum, item: Self::Item) -> Step<Self::Accum> {
        assert!(!self.terminated, "`step` called after `Terminate`");
        assert!(!self.completed, "`step` called after `complete`");
        assert_eq!(
            Some(accum.token),
            self.expected_token,
            "stale or foreign accumulator passed to `step`"
        );
        self.log.borrow_mut().steps += 1;
        self.steps_taken += 1;
        let value = self.inner.step(accum.value, item).into_inner();
        let token = self.issue_token();
        let accum = PoisonAccum { token, value };
        if self.budget.is_some_and(|budget| budget <= self.steps_taken) {
            self.terminated = true;
            self.log.borrow_mut().terminates += 1;
            Step::Terminate(accum)
        } else {
            Step::Continue(accum)
        }
    }

    fn complete(&mut self, accum: Self::Accum) -> Self::Output {
        assert!(!self.completed, "`complete` called twice");
        assert_eq!(
            Some(accum.token),
            self.expected_token,
            "stale or foreign accumulator passed to `complete`"
        );
        self.completed = true;
        self.log.borrow_mut().completes += 1;
        self.inner.complete(accum.value)
    }
}
