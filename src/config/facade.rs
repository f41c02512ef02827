//! Loader entry points: the full layered stack or a single explicit file.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::CmdexecConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{CMDEXEC_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<CmdexecConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: CmdexecConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            command_limit = config.scheduler.command_limit,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load from one file on top of the defaults. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<CmdexecConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
