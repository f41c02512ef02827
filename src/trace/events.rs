//! Event schema for recorded traces.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceRecord {
    Command {
        depth: usize,
        command: String,
    },
    Return {
        depth: usize,
        command: String,
        result: i32,
    },
    Error {
        message: String,
    },
    Call {
        depth: usize,
        function: String,
        command_count: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub ts: String,
    pub seq: u64,
    #[serde(flatten)]
    pub record: TraceRecord,
}

impl TraceEvent {
    pub fn with_now(seq: u64, record: TraceRecord) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            seq,
            record,
        }
    }
}
