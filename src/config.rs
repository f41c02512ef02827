//! Configuration System
//!
//! Layered configuration for the scheduler and logging. Values come from
//! built-in defaults, the user-level file, workspace files and `CMDEXEC__*`
//! environment variables, in increasing order of precedence.

use crate::error::EngineError;
use crate::execution::MAX_QUEUE_ENTRIES;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmdexecConfig {
    /// Scheduler limits
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Limits applied to one execution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Queue entries a single drain may execute
    #[serde(default = "default_command_limit")]
    pub command_limit: i32,

    /// Most sources one fork may produce
    #[serde(default = "default_fork_limit")]
    pub fork_limit: usize,

    /// Queue length at which the context overflows
    #[serde(default = "default_max_queue_entries")]
    pub max_queue_entries: usize,
}

pub(crate) fn default_command_limit() -> i32 {
    65536
}

pub(crate) fn default_fork_limit() -> usize {
    65536
}

pub(crate) fn default_max_queue_entries() -> usize {
    MAX_QUEUE_ENTRIES
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            command_limit: default_command_limit(),
            fork_limit: default_fork_limit(),
            max_queue_entries: default_max_queue_entries(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.command_limit <= 0 {
            return Err(format!(
                "command_limit must be positive (got {})",
                self.command_limit
            ));
        }
        if self.fork_limit == 0 {
            return Err("fork_limit must be at least 1".to_string());
        }
        if self.max_queue_entries == 0 {
            return Err("max_queue_entries must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Scheduler(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scheduler(msg) => write!(f, "Scheduler: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CmdexecConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.scheduler.validate() {
            errors.push(ValidationError::Scheduler(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and collapse every problem into one error.
    pub fn validated(self) -> Result<Self, EngineError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Render as TOML, the format the loader reads.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
