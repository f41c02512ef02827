//! Merge rules: defaults sit underneath every other source.

use crate::config::{default_command_limit, default_fork_limit, default_max_queue_entries};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with scheduler defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("scheduler.command_limit", i64::from(default_command_limit()))?
        .set_default("scheduler.fork_limit", default_fork_limit() as i64)?
        .set_default(
            "scheduler.max_queue_entries",
            default_max_queue_entries() as i64,
        )
}
