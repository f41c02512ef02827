//! Trace domain: observer callbacks and the sinks that record them.
//!
//! A tracer never influences scheduling. Tasks report to it while they run and
//! the owning context closes it exactly once on teardown.

pub mod events;
pub mod indented;
pub mod json_lines;

pub use events::{TraceEvent, TraceRecord};
pub use indented::IndentedTracer;
pub use json_lines::JsonLinesTracer;

/// Observer for command execution
pub trait Tracer {
    fn on_command(&mut self, depth: usize, command: &str);

    fn on_return(&mut self, depth: usize, command: &str, result: i32);

    fn on_error(&mut self, message: &str);

    fn on_call(&mut self, depth: usize, function: &str, command_count: usize);

    /// Release underlying resources. Called once by the owning context.
    fn close(&mut self) {}
}
