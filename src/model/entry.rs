//! Public log entries.

use serde::{Deserialize, Serialize};

use super::RollResult;

/// A single line of the public log.
///
/// Created only by engine operations and never edited afterwards.
/// Identity is `id`: Unix milliseconds at creation, bumped when needed
/// so it is strictly greater than every earlier id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,

    /// Local time of day, `HH:MM`.
    pub timestamp: String,

    #[serde(rename = "type")]
    pub kind: LogKind,

    /// Display text.
    pub text: String,

    /// The roll this entry reports, for `roll` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<RollResult>,

    /// Inject body, for `inject` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// What kind of event a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    /// Briefing text read to the players.
    Info,

    /// A turn boundary.
    Phase,

    /// A dice resolution.
    Roll,

    /// A triggered inject.
    Inject,
}
