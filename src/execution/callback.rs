//! Result callbacks attached to frames and command sources.

use std::fmt;
use std::rc::Rc;

/// Result delivered once an invocation completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success(i32),
    Failure,
}

impl CommandOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }

    /// Integer result; failures report 0.
    pub fn value(self) -> i32 {
        match self {
            CommandOutcome::Success(value) => value,
            CommandOutcome::Failure => 0,
        }
    }
}

/// Reports how an invocation ended to whoever requested it.
///
/// Cheap to clone: every queue entry spawned under a frame carries a copy.
#[derive(Clone, Default)]
pub struct ReturnCallback {
    inner: Option<Rc<dyn Fn(CommandOutcome)>>,
}

impl ReturnCallback {
    /// Callback that ignores every result.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn new(callback: impl Fn(CommandOutcome) + 'static) -> Self {
        Self {
            inner: Some(Rc::new(callback)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn on_result(&self, outcome: CommandOutcome) {
        if let Some(callback) = &self.inner {
            callback(outcome);
        }
    }

    pub fn on_success(&self, value: i32) {
        self.on_result(CommandOutcome::Success(value));
    }

    pub fn on_failure(&self) {
        self.on_result(CommandOutcome::Failure);
    }

    /// Deliver every result to `self` first, then to `next`.
    pub fn chain(&self, next: ReturnCallback) -> ReturnCallback {
        match (&self.inner, &next.inner) {
            (None, _) => next,
            (_, None) => self.clone(),
            (Some(first), Some(second)) => {
                let first = Rc::clone(first);
                let second = Rc::clone(second);
                ReturnCallback::new(move |outcome| {
                    first(outcome);
                    second(outcome);
                })
            }
        }
    }
}

impl fmt::Debug for ReturnCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnCallback")
            .field("empty", &self.is_empty())
            .finish()
    }
}
