//! Integration tests for the cmdexec scheduler

mod config_integration;
mod test_utils;
mod tracer_lifecycle;
