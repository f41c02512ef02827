//! Shared helpers for integration tests

use cmdexec::error::CommandError;
use cmdexec::execution::{
    Depth, ExecutionContext, Frame, InactiveProfiler, QueueEntry, ReturnCallback,
};
use cmdexec::trace::Tracer;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

/// Serializes tests that change HOME or CMDEXEC_* variables
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn context(limit: i32) -> ExecutionContext {
    ExecutionContext::new(limit, 64, Box::new(InactiveProfiler))
}

/// Entry at `frame` that records `name` and does nothing else.
pub fn record(log: &Log, frame: Frame, name: &'static str) -> QueueEntry {
    let log = log.clone();
    QueueEntry::from_fn(frame, move |_, _| {
        log.borrow_mut().push(name.to_string());
        Ok(())
    })
}

/// Frame one level below `depth` with the context's discard control.
pub fn child_of(context: &ExecutionContext, depth: Depth) -> Frame {
    Frame::new(
        depth + 1,
        ReturnCallback::empty(),
        context.frame_control_for_depth(depth + 1),
    )
}

pub fn failing(frame: Frame, error: CommandError) -> QueueEntry {
    QueueEntry::from_fn(frame, move |_, _| Err(error))
}

/// Tracer that counts callbacks into shared cells
#[derive(Default, Clone)]
pub struct CountingTracer {
    pub events: Rc<RefCell<Vec<String>>>,
    pub closes: Rc<RefCell<u32>>,
}

impl Tracer for CountingTracer {
    fn on_command(&mut self, depth: usize, command: &str) {
        self.events.borrow_mut().push(format!("C{} {}", depth, command));
    }

    fn on_return(&mut self, depth: usize, command: &str, result: i32) {
        self.events
            .borrow_mut()
            .push(format!("R{} {} = {}", depth, command, result));
    }

    fn on_error(&mut self, message: &str) {
        self.events.borrow_mut().push(format!("E {}", message));
    }

    fn on_call(&mut self, depth: usize, function: &str, command_count: usize) {
        self.events
            .borrow_mut()
            .push(format!("F{} {} {}", depth, function, command_count));
    }

    fn close(&mut self) {
        *self.closes.borrow_mut() += 1;
    }
}
