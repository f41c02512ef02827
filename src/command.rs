//! Command domain: compiled commands, sources, and the tasks that run them.
//!
//! Entry points seed an [`ExecutionContext`] with the first frame and task of
//! an invocation. While the current frame depth is 0 they open a depth-0 frame
//! whose return clears the whole queue; deeper, they nest one level below it.

pub mod function;
pub mod source;
pub mod tasks;

pub use function::{Command, Function, FunctionLibrary, FunctionLine};
pub use source::{BasicSource, CommandSource};
pub use tasks::{CallFunction, ExecuteCommand, Fallthrough};

use crate::execution::{ExecutionContext, Frame, QueueEntry, ReturnCallback};
use std::rc::Rc;

/// Queue a call of `function` as `source`. `callback` receives the function's
/// result: the value of its `return`, or a failure if it falls through.
pub fn queue_initial_function_call<S: CommandSource>(
    context: &mut ExecutionContext,
    function: Rc<Function<S>>,
    source: S,
    callback: ReturnCallback,
) {
    let frame = Frame::create_child(context, callback.clone());
    let result_callback = source.callback().chain(callback);
    context.queue_next(QueueEntry::new(
        frame,
        CallFunction::new(function, source, result_callback),
    ));
}

/// Queue one compiled command as `source`. `input` is the text it was compiled
/// from and labels it in traces.
pub fn queue_initial_command_execution<S: CommandSource>(
    context: &mut ExecutionContext,
    input: impl Into<String>,
    command: Rc<Command<S>>,
    source: S,
    callback: ReturnCallback,
) {
    let frame = Frame::create_child(context, callback.clone());
    let source = source.with_callback(source.callback().chain(callback));
    context.queue_next(QueueEntry::new(
        frame,
        ExecuteCommand::new(input, command, source),
    ));
}
