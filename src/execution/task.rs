//! Schedulable units of work and the queue entries that carry them.

use super::context::ExecutionContext;
use super::frame::{Depth, Frame};
use crate::error::CommandError;
use std::fmt;

/// Opaque unit of work.
///
/// A task runs once against the context and the frame it was queued under. It
/// may queue follow-up entries with [`ExecutionContext::queue_next`] and charge
/// extra quota with [`ExecutionContext::increment_cost`].
pub trait Task {
    fn execute(
        self: Box<Self>,
        context: &mut ExecutionContext,
        frame: &Frame,
    ) -> Result<(), CommandError>;
}

impl<F> Task for F
where
    F: FnOnce(&mut ExecutionContext, &Frame) -> Result<(), CommandError>,
{
    fn execute(
        self: Box<Self>,
        context: &mut ExecutionContext,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        (*self)(context, frame)
    }
}

/// A task paired with the frame it executes under. Consumed exactly once.
pub struct QueueEntry {
    frame: Frame,
    task: Box<dyn Task>,
}

impl QueueEntry {
    pub fn new(frame: Frame, task: impl Task + 'static) -> Self {
        Self {
            frame,
            task: Box::new(task),
        }
    }

    /// Entry running a closure. Prefer this over [`QueueEntry::new`] for
    /// closures so their argument types are inferred.
    pub fn from_fn<F>(frame: Frame, task: F) -> Self
    where
        F: FnOnce(&mut ExecutionContext, &Frame) -> Result<(), CommandError> + 'static,
    {
        Self::new(frame, task)
    }

    pub fn boxed(frame: Frame, task: Box<dyn Task>) -> Self {
        Self { frame, task }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn depth(&self) -> Depth {
        self.frame.depth()
    }

    pub(crate) fn execute(self, context: &mut ExecutionContext) -> Result<(), CommandError> {
        let QueueEntry { frame, task } = self;
        task.execute(context, &frame)
    }
}

impl fmt::Debug for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("depth", &self.frame.depth())
            .finish_non_exhaustive()
    }
}
