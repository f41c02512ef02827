//! Human-readable function trace, one indented line per callback.
//!
//! ```text
//! [F] demo:main size=2
//!     [C] say hi
//!     [R = 1] say hi
//!         [E] Unknown function: demo:missing
//! ```

use super::Tracer;
use std::io::Write;
use tracing::warn;

const INDENT: &str = "    ";

pub struct IndentedTracer<W: Write> {
    writer: W,
    last_indent: usize,
    failed: bool,
}

impl<W: Write> IndentedTracer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_indent: 0,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, indent: usize, line: &str) {
        if self.failed {
            return;
        }
        let result = (0..indent)
            .try_for_each(|_| self.writer.write_all(INDENT.as_bytes()))
            .and_then(|_| writeln!(self.writer, "{}", line));
        if let Err(e) = result {
            warn!(error = %e, "trace write failed; further trace lines are dropped");
            self.failed = true;
        }
    }
}

impl<W: Write> Tracer for IndentedTracer<W> {
    fn on_command(&mut self, depth: usize, command: &str) {
        self.last_indent = depth;
        self.write_line(depth, &format!("[C] {}", command));
    }

    fn on_return(&mut self, depth: usize, command: &str, result: i32) {
        self.last_indent = depth;
        self.write_line(depth, &format!("[R = {}] {}", result, command));
    }

    // errors nest under whatever was traced last
    fn on_error(&mut self, message: &str) {
        self.write_line(self.last_indent + 1, &format!("[E] {}", message));
    }

    fn on_call(&mut self, depth: usize, function: &str, command_count: usize) {
        self.last_indent = depth;
        self.write_line(depth, &format!("[F] {} size={}", function, command_count));
    }

    fn close(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "failed to flush trace output");
        }
    }
}
