//! Tracer callbacks and teardown

use super::test_utils::{context, failing, CountingTracer};
use cmdexec::command::{queue_initial_function_call, BasicSource, Command, Function, FunctionLibrary};
use cmdexec::error::CommandError;
use cmdexec::execution::{Frame, QueueEntry, ReturnCallback};
use cmdexec::trace::IndentedTracer;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

#[test]
fn tracer_closed_once_after_failed_run() {
    let tracer = CountingTracer::default();
    let closes = tracer.closes.clone();
    {
        let mut ctx = context(10);
        ctx.set_tracer(Box::new(tracer));
        let top = Frame::create_child(&ctx, ReturnCallback::empty());
        ctx.queue_next(failing(top, CommandError::Aborted("boom".to_string())));
        assert!(ctx.run_command_queue().is_err());

        ctx.close();
        ctx.close();
        assert_eq!(*closes.borrow(), 1);
    }
    assert_eq!(*closes.borrow(), 1);
}

#[test]
fn tracer_closed_on_drop() {
    let tracer = CountingTracer::default();
    let closes = tracer.closes.clone();
    {
        let mut ctx = context(10);
        ctx.set_tracer(Box::new(tracer));
    }
    assert_eq!(*closes.borrow(), 1);
}

#[test]
fn replacing_tracer_closes_the_old_one() {
    let first = CountingTracer::default();
    let second = CountingTracer::default();
    let first_closes = first.closes.clone();
    let second_closes = second.closes.clone();

    let mut ctx = context(10);
    ctx.set_tracer(Box::new(first));
    ctx.set_tracer(Box::new(second));
    assert_eq!(*first_closes.borrow(), 1);
    assert_eq!(*second_closes.borrow(), 0);

    drop(ctx);
    assert_eq!(*second_closes.borrow(), 1);
}

fn traced_library() -> Rc<FunctionLibrary<BasicSource>> {
    let mut library = FunctionLibrary::new();
    library.register(
        Function::new("demo:main")
            .with_line("say hi", Command::leaf(|_: &BasicSource| Ok(1)))
            .with_line("function demo:missing", Command::call("demo:missing"))
            .with_line("function demo:leaf", Command::call("demo:leaf")),
    );
    library.register(
        Function::new("demo:leaf").with_line("return 3", Command::return_value(3)),
    );
    Rc::new(library)
}

#[test]
fn callbacks_carry_depths() {
    let tracer = CountingTracer::default();
    let events = tracer.events.clone();
    let library = traced_library();
    let main = library.get("demo:main").unwrap();

    let mut ctx = context(100);
    ctx.set_tracer(Box::new(tracer));
    queue_initial_function_call(&mut ctx, main, BasicSource::new("s", library), ReturnCallback::empty());
    ctx.run_command_queue().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            "F0 demo:main 3",
            "C1 say hi",
            "R1 say hi = 1",
            "C1 function demo:missing",
            "E Unknown function: demo:missing",
            "C1 function demo:leaf",
            "F1 demo:leaf 1",
            "C2 return 3",
        ]
    );
}

/// Writer whose buffer outlives the tracer that owns it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn indented_trace_of_a_function() {
    let buffer = SharedBuffer::default();
    let library = traced_library();
    let main = library.get("demo:main").unwrap();

    let mut ctx = context(100);
    ctx.set_tracer(Box::new(IndentedTracer::new(buffer.clone())));
    queue_initial_function_call(&mut ctx, main, BasicSource::new("s", library), ReturnCallback::empty());
    ctx.run_command_queue().unwrap();
    ctx.close();

    let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
    let expected = "\
[F] demo:main size=3
    [C] say hi
    [R = 1] say hi
    [C] function demo:missing
        [E] Unknown function: demo:missing
    [C] function demo:leaf
    [F] demo:leaf size=1
        [C] return 3
";
    assert_eq!(text, expected);
}

#[test]
fn tracer_is_reachable_from_tasks() {
    let tracer = CountingTracer::default();
    let events = tracer.events.clone();
    let mut ctx = context(10);
    ctx.set_tracer(Box::new(tracer));
    assert!(ctx.has_tracer());

    let top = Frame::create_child(&ctx, ReturnCallback::empty());
    ctx.queue_next(QueueEntry::from_fn(top, |ctx, frame| {
        if let Some(tracer) = ctx.tracer_mut() {
            tracer.on_command(frame.depth(), "custom");
        }
        Ok(())
    }));
    ctx.run_command_queue().unwrap();
    assert_eq!(*events.borrow(), vec!["C0 custom"]);
}
