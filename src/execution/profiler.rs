//! Profiler sinks receiving section markers from the run loop.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Section marker sink. Purely diagnostic.
pub trait Profiler {
    fn push(&mut self, section: &str);
    fn pop(&mut self);
}

/// Profiler that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct InactiveProfiler;

impl Profiler for InactiveProfiler {
    fn push(&mut self, _section: &str) {}
    fn pop(&mut self) {}
}

impl<P: Profiler> Profiler for Rc<RefCell<P>> {
    fn push(&mut self, section: &str) {
        self.borrow_mut().push(section);
    }

    fn pop(&mut self) {
        self.borrow_mut().pop();
    }
}

/// Aggregated timing for one section path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionTiming {
    pub path: String,
    pub calls: u64,
    #[serde(serialize_with = "serialize_micros")]
    pub total: Duration,
}

fn serialize_micros<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_micros())
}

/// Accumulates call counts and wall time per nested section path (`a/b/c`).
#[derive(Debug, Default)]
pub struct SectionProfiler {
    stack: Vec<(String, Instant)>,
    sections: BTreeMap<String, SectionTiming>,
}

impl SectionProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections in path order.
    pub fn report(&self) -> Vec<SectionTiming> {
        self.sections.values().cloned().collect()
    }

    pub fn section(&self, path: &str) -> Option<&SectionTiming> {
        self.sections.get(path)
    }
}

impl Profiler for SectionProfiler {
    fn push(&mut self, section: &str) {
        let path = match self.stack.last() {
            Some((parent, _)) => format!("{}/{}", parent, section),
            None => section.to_string(),
        };
        self.stack.push((path, Instant::now()));
    }

    fn pop(&mut self) {
        let Some((path, started)) = self.stack.pop() else {
            tracing::warn!("profiler pop without matching push");
            return;
        };
        let elapsed = started.elapsed();
        let entry = self
            .sections
            .entry(path.clone())
            .or_insert_with(|| SectionTiming {
                path,
                ..SectionTiming::default()
            });
        entry.calls += 1;
        entry.total += elapsed;
    }
}
