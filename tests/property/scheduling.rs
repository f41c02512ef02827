//! Property-based tests for scheduling guarantees

use cmdexec::execution::{
    ExecutionContext, Frame, FrameControl, InactiveProfiler, QueueEntry, ReturnCallback,
    RunOutcome,
};
use proptest::prelude::*;
use proptest::sample::Index;
use std::cell::RefCell;
use std::rc::Rc;

type Tree = Rc<Vec<Vec<usize>>>;
type Visits = Rc<RefCell<Vec<usize>>>;

/// Children lists from a parent choice per node; node 0 is the root.
fn tree_from_parents(parents: &[Index]) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); parents.len() + 1];
    for (i, parent) in parents.iter().enumerate() {
        let node = i + 1;
        children[parent.index(node)].push(node);
    }
    children
}

fn preorder(tree: &[Vec<usize>], node: usize, out: &mut Vec<usize>) {
    out.push(node);
    for &child in &tree[node] {
        preorder(tree, child, out);
    }
}

/// Entry that records `node` and queues its children one level down.
fn node_entry(tree: Tree, node: usize, frame: Frame, visits: Visits) -> QueueEntry {
    QueueEntry::from_fn(frame, move |ctx, frame| {
        visits.borrow_mut().push(node);
        let depth = frame.depth() + 1;
        for &child in &tree[node] {
            let child_frame = Frame::new(
                depth,
                ReturnCallback::empty(),
                ctx.frame_control_for_depth(depth),
            );
            ctx.queue_next(node_entry(tree.clone(), child, child_frame, visits.clone()));
        }
        Ok(())
    })
}

/// Any spawn tree is executed in depth-first pre-order
#[test]
fn test_execution_is_preorder_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(any::<Index>(), 0..60),
            |parents| {
                let tree: Tree = Rc::new(tree_from_parents(&parents));
                let visits: Visits = Rc::new(RefCell::new(Vec::new()));

                let mut ctx = ExecutionContext::new(10_000, 8, Box::new(InactiveProfiler));
                let root = Frame::create_child(&ctx, ReturnCallback::empty());
                ctx.queue_next(node_entry(tree.clone(), 0, root, visits.clone()));
                prop_assert_eq!(ctx.run_command_queue(), Ok(RunOutcome::Completed));

                let mut expected = Vec::new();
                preorder(&tree, 0, &mut expected);
                prop_assert_eq!(&*visits.borrow(), &expected);
                prop_assert_eq!(ctx.current_frame_depth(), 0);
                Ok(())
            },
        )
        .unwrap();
}

/// Quota after N executed entries equals limit - N
#[test]
fn test_quota_accounting_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1i32..50, 0usize..80), |(limit, entries)| {
            let mut ctx = ExecutionContext::new(limit, 8, Box::new(InactiveProfiler));
            for _ in 0..entries {
                let frame = Frame::create_child(&ctx, ReturnCallback::empty());
                ctx.queue_next(QueueEntry::from_fn(frame, |_, _| Ok(())));
            }
            let outcome = ctx.run_command_queue().unwrap();

            let executed = entries.min(limit as usize) as i32;
            prop_assert_eq!(ctx.commands_executed(), executed);
            prop_assert_eq!(ctx.command_quota(), limit - executed);
            if (entries as i32) < limit {
                prop_assert_eq!(outcome, RunOutcome::Completed);
            } else {
                prop_assert_eq!(outcome, RunOutcome::QuotaExhausted);
            }
            Ok(())
        })
        .unwrap();
}

/// Discard removes exactly the leading run of entries at or deeper than the threshold
#[test]
fn test_discard_removes_leading_run_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0usize..6, 0..30), 0usize..6),
            |(depths, threshold)| {
                let mut ctx = ExecutionContext::new(10_000, 8, Box::new(InactiveProfiler));
                let observed: Rc<RefCell<Option<Vec<usize>>>> = Rc::new(RefCell::new(None));
                let sink = observed.clone();
                let queued = depths.clone();

                let top = Frame::create_child(&ctx, ReturnCallback::empty());
                ctx.queue_next(QueueEntry::from_fn(top, move |ctx, _| {
                    let sink = sink.clone();
                    let probe = Frame::new(0, ReturnCallback::empty(), FrameControl::DiscardAll);
                    ctx.queue_next(QueueEntry::from_fn(probe, move |ctx, _| {
                        ctx.discard_at_depth_or_higher(threshold);
                        *sink.borrow_mut() = Some(ctx.queued_depths());
                        Ok(())
                    }));
                    for depth in queued {
                        let frame =
                            Frame::new(depth, ReturnCallback::empty(), FrameControl::DiscardAll);
                        ctx.queue_next(QueueEntry::from_fn(frame, |_, _| Ok(())));
                    }
                    Ok(())
                }));
                ctx.run_command_queue().unwrap();

                let skip = depths.iter().take_while(|&&d| d >= threshold).count();
                let expected = depths[skip..].to_vec();
                prop_assert_eq!(observed.borrow().clone(), Some(expected));
                Ok(())
            },
        )
        .unwrap();
}

/// Overflow leaves nothing queued no matter how much was spawned
#[test]
fn test_overflow_clears_everything_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..20, 0usize..60), |(ceiling, spawned)| {
            let mut ctx = ExecutionContext::new(10_000, 8, Box::new(InactiveProfiler))
                .with_max_queue_entries(ceiling);
            let top = Frame::create_child(&ctx, ReturnCallback::empty());
            ctx.queue_next(QueueEntry::from_fn(top, move |ctx, frame| {
                for _ in 0..spawned {
                    ctx.queue_next(QueueEntry::from_fn(frame.clone(), |_, _| Ok(())));
                }
                Ok(())
            }));
            let outcome = ctx.run_command_queue().unwrap();

            // the ceiling check runs before each push, so one entry past it still fits
            if spawned > ceiling + 1 {
                prop_assert_eq!(outcome, RunOutcome::Overflowed);
                prop_assert_eq!(ctx.queued_len() + ctx.pending_len(), 0);
                prop_assert_eq!(ctx.commands_executed(), 1);
            } else {
                prop_assert_eq!(outcome, RunOutcome::Completed);
                prop_assert_eq!(ctx.commands_executed() as usize, spawned + 1);
            }
            Ok(())
        })
        .unwrap();
}
