//! cmdexec: depth-bounded cooperative command scheduling
//!
//! Nested command invocations are flattened into a single queue and drained
//! depth-first under a per-run command quota. Functions open frames one level
//! below their caller; `return` discards whatever remains of its frame.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod simulate;
pub mod trace;
