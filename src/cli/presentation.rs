//! CLI presentation: text and json formatters for simulation summaries and config.

use crate::config::CmdexecConfig;
use crate::error::EngineError;
use crate::simulate::SimulationReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_simulation_text(report: &SimulationReport) -> String {
    let outcome = if report.truncated {
        report.outcome.yellow().to_string()
    } else {
        report.outcome.green().to_string()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Workload".to_string(), report.workload.clone()]);
    table.add_row(vec!["Outcome".to_string(), outcome]);
    table.add_row(vec![
        "Executed".to_string(),
        format!("{} / {}", report.commands_executed, report.command_limit),
    ]);
    table.add_row(vec![
        "Quota remaining".to_string(),
        report.quota_remaining.to_string(),
    ]);
    table.add_row(vec!["Ticks".to_string(), report.ticks.to_string()]);
    table.add_row(vec![
        "Result".to_string(),
        report
            .result
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Elapsed".to_string(),
        format!("{} µs", report.elapsed_micros),
    ]);

    let mut out = table.to_string();
    if !report.sections.is_empty() {
        let mut sections = Table::new();
        sections.load_preset(UTF8_FULL);
        sections.set_header(vec!["Section", "Calls", "Total (µs)"]);
        for s in &report.sections {
            sections.add_row(vec![
                s.path.clone(),
                s.calls.to_string(),
                s.total.as_micros().to_string(),
            ]);
        }
        out.push('\n');
        out.push_str(&sections.to_string());
    }
    out
}

pub fn format_simulation_json(report: &SimulationReport) -> Result<String, EngineError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| EngineError::Trace(format!("Failed to encode summary: {}", e)))
}

pub fn format_config_toml(config: &CmdexecConfig) -> Result<String, EngineError> {
    config.to_toml()
}
