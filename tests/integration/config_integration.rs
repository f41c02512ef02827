//! Integration tests for the configuration system

use super::test_utils::ENV_MUTEX;
use cmdexec::config::{CmdexecConfig, ConfigLoader};
use cmdexec::execution::{ExecutionContext, InactiveProfiler};
use tempfile::TempDir;

#[test]
fn test_config_file_drives_context_limits() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("limits.toml");
    std::fs::write(
        &config_file,
        r#"
[scheduler]
command_limit = 32
fork_limit = 2
max_queue_entries = 100
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());

    let ctx = ExecutionContext::from_config(&config.scheduler, Box::new(InactiveProfiler));
    assert_eq!(ctx.command_limit(), 32);
    assert_eq!(ctx.command_quota(), 32);
    assert_eq!(ctx.fork_limit(), 2);
    assert_eq!(ctx.max_queue_entries(), 100);
}

#[test]
fn test_env_specific_workspace_file_wins() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let original_home = std::env::var("HOME").ok();
    let original_env = std::env::var("CMDEXEC_ENV").ok();
    std::env::set_var("HOME", temp_dir.path().join("home"));
    std::env::set_var("CMDEXEC_ENV", "ci");

    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[scheduler]\ncommand_limit = 10\nfork_limit = 5\n",
    )
    .unwrap();
    std::fs::write(config_dir.join("ci.toml"), "[scheduler]\ncommand_limit = 20\n").unwrap();

    let loaded = ConfigLoader::load(temp_dir.path());

    match original_home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }
    match original_env {
        Some(env) => std::env::set_var("CMDEXEC_ENV", env),
        None => std::env::remove_var("CMDEXEC_ENV"),
    }

    let config = loaded.unwrap();
    assert_eq!(config.scheduler.command_limit, 20);
    assert_eq!(config.scheduler.fork_limit, 5);
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(
        &config_file,
        "[scheduler]\ncommand_limit = 0\n\n[logging]\noutput = \"syslog\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_rendered_config_matches_defaults() {
    let rendered = CmdexecConfig::default().to_toml().unwrap();
    let parsed: CmdexecConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.scheduler, CmdexecConfig::default().scheduler);
    assert_eq!(parsed.logging.level, "info");
}
