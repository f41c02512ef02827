//! CLI domain: parse, route, output, and presentation only.
//! No scheduling logic; the route table dispatches to the simulation and config services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, TraceFormat};
pub use presentation::{format_config_toml, format_simulation_json, format_simulation_text};
pub use route::RunContext;
