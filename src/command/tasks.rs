//! Built-in tasks: run a command line, call a function, fall through.

use super::function::{Command, Function};
use super::source::CommandSource;
use crate::error::CommandError;
use crate::execution::{ExecutionContext, Frame, QueueEntry, ReturnCallback, Task};
use std::rc::Rc;
use tracing::debug;

/// One command line bound to one source
pub struct ExecuteCommand<S> {
    label: String,
    command: Rc<Command<S>>,
    source: S,
}

impl<S: CommandSource> ExecuteCommand<S> {
    pub fn new(label: impl Into<String>, command: Rc<Command<S>>, source: S) -> Self {
        Self {
            label: label.into(),
            command,
            source,
        }
    }

    fn run(&self, context: &mut ExecutionContext, frame: &Frame) -> Result<(), CommandError> {
        match self.command.as_ref() {
            Command::Leaf(run) => {
                let result = run(&self.source)?;
                if let Some(tracer) = context.tracer_mut() {
                    tracer.on_return(frame.depth(), &self.label, result);
                }
                self.source.callback().on_success(result);
            }
            Command::Fork { redirect, then } => {
                let branches = redirect(&self.source)?;
                if branches.len() > context.fork_limit() {
                    return Err(CommandError::ForkLimitReached {
                        limit: context.fork_limit(),
                    });
                }
                if branches.is_empty() {
                    self.source.callback().on_failure();
                    return Ok(());
                }
                for branch in branches {
                    let task = ExecuteCommand::new(self.label.clone(), Rc::clone(then), branch);
                    context.queue_next(QueueEntry::new(frame.clone(), task));
                }
            }
            Command::Call(id) => {
                let function = self
                    .source
                    .function(id)
                    .ok_or_else(|| CommandError::UnknownFunction(id.clone()))?;
                CallFunction::new(function, self.source.clone(), self.source.callback())
                    .schedule(context, frame);
            }
            Command::Return(value) => {
                frame.return_success(*value);
                frame.discard(context);
            }
        }
        Ok(())
    }
}

impl<S: CommandSource> Task for ExecuteCommand<S> {
    fn execute(
        self: Box<Self>,
        context: &mut ExecutionContext,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        if let Some(tracer) = context.tracer_mut() {
            tracer.on_command(frame.depth(), &self.label);
        }
        match self.run(context, frame) {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(command = %self.label, depth = frame.depth(), error = %e, "command failed");
                if let Some(tracer) = context.tracer_mut() {
                    tracer.on_error(&e.to_string());
                }
                self.source.callback().on_failure();
                Ok(())
            }
        }
    }
}

/// Invokes a function one level below the calling frame
pub struct CallFunction<S> {
    function: Rc<Function<S>>,
    source: S,
    result_callback: ReturnCallback,
}

impl<S: CommandSource> CallFunction<S> {
    pub fn new(function: Rc<Function<S>>, source: S, result_callback: ReturnCallback) -> Self {
        Self {
            function,
            source,
            result_callback,
        }
    }

    /// Queue the body under a new frame, followed by a [`Fallthrough`].
    ///
    /// The body frame's discard covers the body and everything it spawns, so a
    /// `return` inside the function skips the remaining lines and the fallthrough.
    pub fn schedule(self, context: &mut ExecutionContext, frame: &Frame) {
        let CallFunction {
            function,
            source,
            result_callback,
        } = self;
        if let Some(tracer) = context.tracer_mut() {
            tracer.on_call(frame.depth(), function.id(), function.len());
        }

        let depth = frame.depth() + 1;
        let body_frame = Frame::new(
            depth,
            result_callback,
            context.frame_control_for_depth(depth),
        );
        let body_source = source.with_callback(ReturnCallback::empty());
        for line in function.lines() {
            let task = ExecuteCommand::new(
                line.label.clone(),
                Rc::clone(&line.command),
                body_source.clone(),
            );
            context.queue_next(QueueEntry::new(body_frame.clone(), task));
        }
        context.queue_next(QueueEntry::new(body_frame, Fallthrough));
    }
}

impl<S: CommandSource> Task for CallFunction<S> {
    fn execute(
        self: Box<Self>,
        context: &mut ExecutionContext,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        self.schedule(context, frame);
        Ok(())
    }
}

/// Reached when a function body ran out without returning
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallthrough;

impl Task for Fallthrough {
    fn execute(
        self: Box<Self>,
        context: &mut ExecutionContext,
        frame: &Frame,
    ) -> Result<(), CommandError> {
        frame.return_failure();
        frame.discard(context);
        Ok(())
    }
}
