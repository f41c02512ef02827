//! CLI parse: clap types for cmdexec. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cmdexec CLI - depth-bounded command scheduling
#[derive(Parser)]
#[command(name = "cmdexec")]
#[command(about = "Run synthetic command trees through a depth-bounded cooperative scheduler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drain a synthetic function tree and summarize the run
    Simulate {
        /// Levels of nested calls below the entry function
        #[arg(long, default_value = "3")]
        depth: usize,
        /// Calls each function makes to the next level
        #[arg(long, default_value = "4")]
        fanout: usize,
        /// Run a self-recursive function instead of a tree
        #[arg(long, conflicts_with_all = ["depth", "fanout"])]
        runaway: bool,
        /// Override scheduler.command_limit
        #[arg(long)]
        command_limit: Option<i32>,
        /// Override scheduler.fork_limit
        #[arg(long)]
        fork_limit: Option<usize>,
        /// Override scheduler.max_queue_entries
        #[arg(long)]
        max_queue_entries: Option<usize>,
        /// Write a function trace to this file
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Trace file format
        #[arg(long, value_enum, default_value_t = TraceFormat::Text)]
        trace_format: TraceFormat,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceFormat {
    Text,
    Json,
}
