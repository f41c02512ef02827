//! Execution context: the command queue scheduler.
//!
//! Drains a depth-first queue of [`QueueEntry`] values under a command quota.
//! Entries spawned while an entry executes are staged, then flushed onto the
//! front of the queue in spawn order, so nested invocations finish before the
//! next sibling at the same depth runs.

use super::frame::{Depth, FrameControl};
use super::profiler::Profiler;
use super::task::QueueEntry;
use crate::config::SchedulerConfig;
use crate::error::CommandError;
use crate::trace::Tracer;
use std::collections::VecDeque;
use tracing::{debug, error, info, trace};

/// Hard ceiling on staged plus queued entries
pub const MAX_QUEUE_ENTRIES: usize = 10_000_000;

/// Why a `run_command_queue` call returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Queue drained.
    Completed,
    /// Quota hit zero; unrun entries stay queued until the context is dropped.
    QuotaExhausted,
    /// Queue ceiling breached; all pending work was discarded.
    Overflowed,
}

impl RunOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::QuotaExhausted => "quota_exhausted",
            RunOutcome::Overflowed => "overflowed",
        }
    }

    pub fn is_truncated(self) -> bool {
        !matches!(self, RunOutcome::Completed)
    }
}

/// Scheduler for one invocation batch
pub struct ExecutionContext {
    command_limit: i32,
    fork_limit: usize,
    max_queue_entries: usize,
    profiler: Box<dyn Profiler>,
    tracer: Option<Box<dyn Tracer>>,
    command_quota: i32,
    queue_overflow: bool,
    command_queue: VecDeque<QueueEntry>,
    pending_top_commands: Vec<QueueEntry>,
    current_frame_depth: Depth,
    draining: bool,
}

impl ExecutionContext {
    pub fn new(command_limit: i32, fork_limit: usize, profiler: Box<dyn Profiler>) -> Self {
        Self {
            command_limit,
            fork_limit,
            max_queue_entries: MAX_QUEUE_ENTRIES,
            profiler,
            tracer: None,
            command_quota: command_limit,
            queue_overflow: false,
            command_queue: VecDeque::new(),
            pending_top_commands: Vec::new(),
            current_frame_depth: 0,
            draining: false,
        }
    }

    pub fn from_config(config: &SchedulerConfig, profiler: Box<dyn Profiler>) -> Self {
        Self::new(config.command_limit, config.fork_limit, profiler)
            .with_max_queue_entries(config.max_queue_entries)
    }

    /// Override the overflow ceiling.
    pub fn with_max_queue_entries(mut self, max_queue_entries: usize) -> Self {
        self.max_queue_entries = max_queue_entries;
        self
    }

    pub fn command_limit(&self) -> i32 {
        self.command_limit
    }

    /// Remaining quota. Never increases.
    pub fn command_quota(&self) -> i32 {
        self.command_quota
    }

    /// Commands charged so far, clamped to the configured limit.
    pub fn commands_executed(&self) -> i32 {
        (self.command_limit - self.command_quota).clamp(0, self.command_limit.max(0))
    }

    pub fn fork_limit(&self) -> usize {
        self.fork_limit
    }

    pub fn max_queue_entries(&self) -> usize {
        self.max_queue_entries
    }

    pub fn is_overflowed(&self) -> bool {
        self.queue_overflow
    }

    pub fn current_frame_depth(&self) -> Depth {
        self.current_frame_depth
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Entries in the main queue (staged entries not included).
    pub fn queued_len(&self) -> usize {
        self.command_queue.len()
    }

    /// Entries staged by the executing task, not yet flushed.
    pub fn pending_len(&self) -> usize {
        self.pending_top_commands.len()
    }

    /// Frame depths of the main queue, front to back.
    pub fn queued_depths(&self) -> Vec<Depth> {
        self.command_queue.iter().map(QueueEntry::depth).collect()
    }

    /// Consume one unit of quota.
    pub fn increment_cost(&mut self) {
        self.command_quota -= 1;
    }

    pub fn profiler_mut(&mut self) -> &mut dyn Profiler {
        self.profiler.as_mut()
    }

    /// Attach a tracer. A previously attached tracer is closed first.
    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        if let Some(mut previous) = self.tracer.replace(tracer) {
            previous.close();
        }
    }

    pub fn tracer_mut(&mut self) -> Option<&mut (dyn Tracer + 'static)> {
        self.tracer.as_deref_mut()
    }

    pub fn has_tracer(&self) -> bool {
        self.tracer.is_some()
    }

    /// Discard control for a frame at `depth`.
    pub fn frame_control_for_depth(&self, depth: Depth) -> FrameControl {
        FrameControl::DiscardAtDepthOrHigher(depth)
    }

    /// Stage an entry spawned by the executing task.
    ///
    /// Once staged plus queued entries exceed the ceiling the context is
    /// poisoned: both collections are cleared and every later entry is dropped.
    pub fn queue_next(&mut self, entry: QueueEntry) {
        if self.pending_top_commands.len() + self.command_queue.len() > self.max_queue_entries {
            self.handle_queue_overflow();
        }
        if self.queue_overflow {
            trace!(depth = entry.depth(), "dropping entry after queue overflow");
            return;
        }
        self.pending_top_commands.push(entry);
    }

    /// Drop queued entries from the front while their depth is at least `depth`.
    ///
    /// Same-or-deeper entries are contiguous at the front as long as the queue
    /// stays depth-first, so this stops at the first shallower entry.
    pub fn discard_at_depth_or_higher(&mut self, depth: Depth) {
        let mut discarded = 0usize;
        while self
            .command_queue
            .front()
            .is_some_and(|entry| entry.depth() >= depth)
        {
            self.command_queue.pop_front();
            discarded += 1;
        }
        if discarded > 0 {
            debug!(depth, discarded, "discarded queued entries");
        }
    }

    pub(crate) fn clear_queue(&mut self) {
        let discarded = self.command_queue.len();
        self.command_queue.clear();
        if discarded > 0 {
            debug!(discarded, "cleared command queue");
        }
    }

    /// Drain the queue until it is empty, the quota runs out, or the queue
    /// overflows.
    ///
    /// Quota and overflow halts are reported through the returned outcome and
    /// the log. A fatal task error aborts the run and is returned as is.
    pub fn run_command_queue(&mut self) -> Result<RunOutcome, CommandError> {
        if self.draining {
            return Err(CommandError::ReentrantRun);
        }
        if self.queue_overflow {
            error!(
                max = self.max_queue_entries,
                "Command execution skipped: command queue previously overflowed"
            );
            return Ok(RunOutcome::Overflowed);
        }

        self.draining = true;
        let mut guard = DrainGuard(self);
        guard.0.drain()
    }

    fn drain(&mut self) -> Result<RunOutcome, CommandError> {
        self.push_new_commands();
        loop {
            if self.command_quota <= 0 {
                info!(
                    command_limit = self.command_limit,
                    abandoned = self.command_queue.len(),
                    "Command execution stopped due to limit (executed {} commands)",
                    self.command_limit
                );
                return Ok(RunOutcome::QuotaExhausted);
            }

            let Some(entry) = self.command_queue.pop_front() else {
                return Ok(RunOutcome::Completed);
            };

            self.current_frame_depth = entry.depth();
            self.command_quota -= 1;

            self.profiler.push("command_queue_entry");
            let result = entry.execute(self);
            self.profiler.pop();
            result?;

            if self.queue_overflow {
                error!(
                    max = self.max_queue_entries,
                    "Command execution stopped due to command queue overflow (max {})",
                    self.max_queue_entries
                );
                return Ok(RunOutcome::Overflowed);
            }

            self.push_new_commands();
        }
    }

    fn push_new_commands(&mut self) {
        for entry in self.pending_top_commands.drain(..).rev() {
            self.command_queue.push_front(entry);
        }
    }

    fn handle_queue_overflow(&mut self) {
        self.queue_overflow = true;
        self.pending_top_commands.clear();
        self.command_queue.clear();
    }

    /// Release the tracer. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut tracer) = self.tracer.take() {
            tracer.close();
        }
    }
}

/// Returns the context to idle however the drain exits, unwinding included.
struct DrainGuard<'a>(&'a mut ExecutionContext);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.draining = false;
        self.0.current_frame_depth = 0;
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.close();
    }
}

/// Build a context from `config`, seed it with `setup`, drain it and close it.
pub fn run_in_new_context(
    config: &SchedulerConfig,
    profiler: Box<dyn Profiler>,
    setup: impl FnOnce(&mut ExecutionContext),
) -> Result<RunOutcome, CommandError> {
    let mut context = ExecutionContext::from_config(config, profiler);
    setup(&mut context);
    let outcome = context.run_command_queue();
    context.close();
    outcome
}
