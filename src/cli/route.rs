//! CLI route: single route table and run context. Dispatches to the simulation and config services.

use crate::cli::parse::{Commands, TraceFormat};
use crate::cli::presentation::{
    format_config_toml, format_simulation_json, format_simulation_text,
};
use crate::config::{CmdexecConfig, ConfigLoader, SchedulerConfig};
use crate::error::EngineError;
use crate::simulate::{run_simulation, Workload};
use crate::trace::{IndentedTracer, JsonLinesTracer, Tracer};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and the loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: CmdexecConfig,
}

impl RunContext {
    /// Load and validate configuration for `workspace_root`, or from `config_path` when given.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, EngineError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self {
            workspace_root,
            config: config.validated()?,
        })
    }

    /// Context over an already built configuration.
    pub fn with_config(workspace_root: PathBuf, config: CmdexecConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &CmdexecConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, EngineError> {
        debug!(workspace = %self.workspace_root.display(), "dispatching command");
        match command {
            Commands::Simulate {
                depth,
                fanout,
                runaway,
                command_limit,
                fork_limit,
                max_queue_entries,
                trace,
                trace_format,
                format,
            } => {
                let workload = if *runaway {
                    Workload::Runaway
                } else {
                    Workload::Tree {
                        depth: *depth,
                        fanout: *fanout,
                    }
                };
                let scheduler = self.scheduler_with_overrides(
                    *command_limit,
                    *fork_limit,
                    *max_queue_entries,
                );
                let tracer = match trace {
                    Some(path) => Some(open_tracer(path, *trace_format)?),
                    None => None,
                };
                let report = run_simulation(&workload, &scheduler, tracer)?;
                info!(
                    outcome = %report.outcome,
                    executed = report.commands_executed,
                    "simulate finished"
                );
                if format == "json" {
                    format_simulation_json(&report)
                } else {
                    Ok(format_simulation_text(&report))
                }
            }
            Commands::Config => format_config_toml(&self.config),
        }
    }

    fn scheduler_with_overrides(
        &self,
        command_limit: Option<i32>,
        fork_limit: Option<usize>,
        max_queue_entries: Option<usize>,
    ) -> SchedulerConfig {
        let base = &self.config.scheduler;
        SchedulerConfig {
            command_limit: command_limit.unwrap_or(base.command_limit),
            fork_limit: fork_limit.unwrap_or(base.fork_limit),
            max_queue_entries: max_queue_entries.unwrap_or(base.max_queue_entries),
        }
    }
}

fn open_tracer(path: &Path, format: TraceFormat) -> Result<Box<dyn Tracer>, EngineError> {
    let file = File::create(path).map_err(|e| {
        EngineError::Trace(format!("Failed to create trace file {}: {}", path.display(), e))
    })?;
    let writer = BufWriter::new(file);
    Ok(match format {
        TraceFormat::Text => Box::new(IndentedTracer::new(writer)),
        TraceFormat::Json => Box::new(JsonLinesTracer::new(writer)),
    })
}
