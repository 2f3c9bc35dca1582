//! Resumable step sequences.
//!
//! A rule action is not run to completion in one call. It is a queue of
//! steps: `Run` steps mutate the table and may return further steps, `Pause`
//! steps hand a pacing hint back to whoever is driving the sequence. The
//! driver calls `resume` repeatedly; each call runs steps until the next
//! pause or the end of the sequence.
//!
//! ```
//! use solitaire_core::core::DelayHint;
//! use solitaire_core::piles::Table;
//! use solitaire_core::rules::Steps;
//!
//! let mut count = 0u32;
//! let mut table = Table::new();
//! let mut steps: Steps<u32> = Steps::new()
//!     .then_do(|n, _| *n += 1)
//!     .pause(DelayHint::Quick)
//!     .then_do(|n, _| *n += 10);
//!
//! assert_eq!(steps.resume(&mut count, &mut table), Some(DelayHint::Quick));
//! assert_eq!(count, 1);
//! assert_eq!(steps.resume(&mut count, &mut table), None);
//! assert_eq!(count, 11);
//! ```

use std::collections::VecDeque;

use crate::core::DelayHint;
use crate::piles::Table;

/// A deferred step: runs against the rule state and the table, and returns
/// whatever steps should run next.
pub type StepFn<R> = Box<dyn FnOnce(&mut R, &mut Table) -> Steps<R>>;

pub enum Step<R> {
    Pause(DelayHint),
    Run(StepFn<R>),
}

impl<R> std::fmt::Debug for Step<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Pause(hint) => f.debug_tuple("Pause").field(hint).finish(),
            Step::Run(_) => f.write_str("Run(..)"),
        }
    }
}

/// An ordered, resumable sequence of steps.
pub struct Steps<R> {
    queue: VecDeque<Step<R>>,
}

impl<R> Default for Steps<R> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<R> std::fmt::Debug for Steps<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.queue.iter()).finish()
    }
}

impl<R> Steps<R> {
    /// An empty sequence: the action does nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step that may schedule more steps.
    #[must_use]
    pub fn then(mut self, step: impl FnOnce(&mut R, &mut Table) -> Steps<R> + 'static) -> Self {
        self.queue.push_back(Step::Run(Box::new(step)));
        self
    }

    /// Append a step with no continuation.
    #[must_use]
    pub fn then_do(self, step: impl FnOnce(&mut R, &mut Table) + 'static) -> Self {
        self.then(move |rules, table| {
            step(rules, table);
            Steps::new()
        })
    }

    /// Append a pacing pause.
    #[must_use]
    pub fn pause(mut self, hint: DelayHint) -> Self {
        self.queue.push_back(Step::Pause(hint));
        self
    }

    /// Append every step of `other`.
    #[must_use]
    pub fn append(mut self, other: Steps<R>) -> Self {
        self.queue.extend(other.queue);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued steps, not counting continuations not yet produced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Run until the next pause and return its hint, or `None` once every
    /// step has run.
    ///
    /// Steps returned by a `Run` step run before anything queued after it.
    pub fn resume(&mut self, rules: &mut R, table: &mut Table) -> Option<DelayHint> {
        while let Some(step) = self.queue.pop_front() {
            match step {
                Step::Pause(hint) => return Some(hint),
                Step::Run(run) => {
                    let next = run(rules, table);
                    for step in next.queue.into_iter().rev() {
                        self.queue.push_front(step);
                    }
                }
            }
        }
        None
    }
}
