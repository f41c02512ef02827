//! Error types for the command execution scheduler.

use thiserror::Error;

/// Errors raised while a task or command executes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Fork limit reached: a single command may produce at most {limit} branches")]
    ForkLimitReached { limit: usize },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Task aborted: {0}")]
    Aborted(String),

    #[error("Command queue is already draining")]
    ReentrantRun,
}

impl CommandError {
    /// Fatal errors abort the whole `run_command_queue` call. Everything else is
    /// reported to the issuing source and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Aborted(_) | CommandError::ReentrantRun)
    }
}

/// Setup and front-end errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Trace error: {0}")]
    Trace(String),

    #[error("Command execution failed: {0}")]
    Command(#[from] CommandError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}
