//! Synthetic workloads for exercising the scheduler end to end.
//!
//! A tree workload is a function per level: each one ticks, calls the next
//! level `fanout` times and returns its level. A runaway workload is a single
//! function that ticks and calls itself, so only the quota or the queue
//! ceiling stops it.

use crate::command::{
    queue_initial_function_call, BasicSource, Command, Function, FunctionLibrary,
};
use crate::config::SchedulerConfig;
use crate::error::{CommandError, EngineError};
use crate::execution::{
    CommandOutcome, ExecutionContext, ReturnCallback, RunOutcome, SectionProfiler, SectionTiming,
};
use crate::trace::Tracer;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

const TREE_PREFIX: &str = "sim:node_";
const RUNAWAY_ID: &str = "sim:runaway";

/// What to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Tree { depth: usize, fanout: usize },
    Runaway,
}

impl Workload {
    pub fn describe(&self) -> String {
        match self {
            Workload::Tree { depth, fanout } => format!("tree(depth={}, fanout={})", depth, fanout),
            Workload::Runaway => "runaway".to_string(),
        }
    }

    pub fn entry_function(&self) -> String {
        match self {
            Workload::Tree { .. } => format!("{}0", TREE_PREFIX),
            Workload::Runaway => RUNAWAY_ID.to_string(),
        }
    }

    /// Queue entries a full tree run executes: per node the tick, the return
    /// and the line that called it. The root is called by its own entry.
    ///
    /// `None` for the runaway workload, or when the count does not fit a `u64`.
    pub fn expected_entries(&self) -> Option<u64> {
        match *self {
            Workload::Tree { depth, fanout } => {
                let fanout = u64::try_from(fanout).ok()?;
                let mut nodes = 0u64;
                let mut level = 1u64;
                for l in 0..=depth {
                    nodes = nodes.checked_add(level)?;
                    if l < depth {
                        level = level.checked_mul(fanout)?;
                    }
                }
                nodes.checked_mul(3)
            }
            Workload::Runaway => None,
        }
    }
}

/// Summary of one simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub workload: String,
    pub outcome: String,
    pub truncated: bool,
    pub command_limit: i32,
    pub commands_executed: i32,
    pub quota_remaining: i32,
    pub ticks: u64,
    pub result: Option<i32>,
    pub elapsed_micros: u128,
    pub sections: Vec<SectionTiming>,
}

/// Build the function library for `workload`.
pub fn build_library(workload: &Workload, ticks: Rc<Cell<u64>>) -> FunctionLibrary<BasicSource> {
    let tick = move || {
        let ticks = ticks.clone();
        Command::leaf(move |_: &BasicSource| {
            let count = ticks.get() + 1;
            ticks.set(count);
            i32::try_from(count)
                .map_err(|_| CommandError::Rejected(format!("tick count {} exceeds i32", count)))
        })
    };

    let mut library = FunctionLibrary::new();
    match *workload {
        Workload::Tree { depth, fanout } => {
            for level in 0..=depth {
                let mut function = Function::new(format!("{}{}", TREE_PREFIX, level))
                    .with_line("tick", tick());
                if level < depth {
                    let child = format!("{}{}", TREE_PREFIX, level + 1);
                    for _ in 0..fanout {
                        function = function.with_line(
                            format!("function {}", child),
                            Command::call(child.clone()),
                        );
                    }
                }
                function = function.with_line(
                    format!("return {}", level),
                    Command::return_value(i32::try_from(level).unwrap_or(i32::MAX)),
                );
                library.register(function);
            }
        }
        Workload::Runaway => {
            library.register(
                Function::new(RUNAWAY_ID)
                    .with_line("tick", tick())
                    .with_line(
                        format!("function {}", RUNAWAY_ID),
                        Command::call(RUNAWAY_ID),
                    ),
            );
        }
    }
    library
}

/// Run `workload` in a fresh context and summarize it.
pub fn run_simulation(
    workload: &Workload,
    scheduler: &SchedulerConfig,
    tracer: Option<Box<dyn Tracer>>,
) -> Result<SimulationReport, EngineError> {
    scheduler.validate().map_err(EngineError::ConfigError)?;

    let ticks = Rc::new(Cell::new(0u64));
    let library = Rc::new(build_library(workload, ticks.clone()));
    let entry_id = workload.entry_function();
    let entry = library
        .get(&entry_id)
        .ok_or_else(|| EngineError::ConfigError(format!("missing entry function {}", entry_id)))?;

    let result = Rc::new(Cell::new(None));
    let sink = result.clone();
    let callback = ReturnCallback::new(move |outcome| {
        if let CommandOutcome::Success(value) = outcome {
            sink.set(Some(value));
        }
    });

    let profiler = Rc::new(RefCell::new(SectionProfiler::new()));
    let mut context = ExecutionContext::from_config(scheduler, Box::new(profiler.clone()));
    if let Some(tracer) = tracer {
        context.set_tracer(tracer);
    }

    debug!(workload = %workload.describe(), "starting simulation");
    let started = Instant::now();
    queue_initial_function_call(
        &mut context,
        entry,
        BasicSource::new("simulation", library),
        callback,
    );
    let outcome = context.run_command_queue();
    let elapsed = started.elapsed();
    context.close();
    let outcome: RunOutcome = outcome?;

    info!(
        workload = %workload.describe(),
        outcome = outcome.as_str(),
        executed = context.commands_executed(),
        "simulation finished"
    );

    let sections = profiler.borrow().report();
    Ok(SimulationReport {
        workload: workload.describe(),
        outcome: outcome.as_str().to_string(),
        truncated: outcome.is_truncated(),
        command_limit: context.command_limit(),
        commands_executed: context.commands_executed(),
        quota_remaining: context.command_quota(),
        ticks: ticks.get(),
        result: result.get(),
        elapsed_micros: elapsed.as_micros(),
        sections,
    })
}
