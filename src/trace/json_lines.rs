//! Tracer writing one JSON record per line.

use super::events::{TraceEvent, TraceRecord};
use super::Tracer;
use std::io::Write;
use tracing::warn;

pub struct JsonLinesTracer<W: Write> {
    writer: W,
    next_seq: u64,
    failed: bool,
}

impl<W: Write> JsonLinesTracer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
            failed: false,
        }
    }

    /// Records written so far.
    pub fn written(&self) -> u64 {
        self.next_seq - 1
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn record(&mut self, record: TraceRecord) {
        if self.failed {
            return;
        }
        let event = TraceEvent::with_now(self.next_seq, record);
        let result = serde_json::to_writer(&mut self.writer, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => self.next_seq += 1,
            Err(e) => {
                warn!(error = %e, "trace write failed; further trace records are dropped");
                self.failed = true;
            }
        }
    }
}

impl<W: Write> Tracer for JsonLinesTracer<W> {
    fn on_command(&mut self, depth: usize, command: &str) {
        self.record(TraceRecord::Command {
            depth,
            command: command.to_string(),
        });
    }

    fn on_return(&mut self, depth: usize, command: &str, result: i32) {
        self.record(TraceRecord::Return {
            depth,
            command: command.to_string(),
            result,
        });
    }

    fn on_error(&mut self, message: &str) {
        self.record(TraceRecord::Error {
            message: message.to_string(),
        });
    }

    fn on_call(&mut self, depth: usize, function: &str, command_count: usize) {
        self.record(TraceRecord::Call {
            depth,
            function: function.to_string(),
            command_count,
        });
    }

    fn close(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "failed to flush trace output");
        }
    }
}
