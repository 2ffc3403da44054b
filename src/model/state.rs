//! Exercise state: the single record every view renders from.

use serde::{Deserialize, Serialize};

use super::{Inject, LogEntry, RollResult};

/// The live exercise, shared by every open view.
///
/// Serialized as one JSON object under a single storage key.
/// Never patched in place on disk: each write replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseState {
    /// Catalog id of the scenario being run.
    pub scenario_id: String,

    /// Zero-based index into the scenario's turns.
    pub turn_index: usize,

    /// Public log, newest first.
    pub public_log: Vec<LogEntry>,

    /// Most recent dice resolution.
    pub last_roll: Option<RollResult>,

    /// Most recently triggered inject. Cleared when the turn advances.
    pub active_inject: Option<Inject>,

    /// Carried through every write; nothing in the core advances it.
    pub timer: u64,
}

impl ExerciseState {
    /// A fresh exercise at the first turn of `scenario_id`.
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            turn_index: 0,
            public_log: Vec::new(),
            last_roll: None,
            active_inject: None,
            timer: 0,
        }
    }

    /// Largest log id recorded so far.
    pub fn last_log_id(&self) -> Option<u64> {
        self.public_log.iter().map(|e| e.id).max()
    }
}

/// A shallow update to [`ExerciseState`].
///
/// Fields left as `None` keep their prior value. Nullable state fields
/// are doubly wrapped so a patch can clear them: `Some(None)` sets null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct StatePatch {
    pub scenario_id: Option<String>,
    pub turn_index: Option<usize>,
    pub public_log: Option<Vec<LogEntry>>,
    pub last_roll: Option<Option<RollResult>>,
    pub active_inject: Option<Option<Inject>>,
    pub timer: Option<u64>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenario_id(mut self, id: impl Into<String>) -> Self {
        self.scenario_id = Some(id.into());
        self
    }

    pub fn turn_index(mut self, index: usize) -> Self {
        self.turn_index = Some(index);
        self
    }

    pub fn public_log(mut self, log: Vec<LogEntry>) -> Self {
        self.public_log = Some(log);
        self
    }

    pub fn last_roll(mut self, roll: Option<RollResult>) -> Self {
        self.last_roll = Some(roll);
        self
    }

    pub fn active_inject(mut self, inject: Option<Inject>) -> Self {
        self.active_inject = Some(inject);
        self
    }

    pub fn timer(mut self, timer: u64) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Produces the merged snapshot without touching `base`.
    pub fn apply(self, base: &ExerciseState) -> ExerciseState {
        ExerciseState {
            scenario_id: self
                .scenario_id
                .unwrap_or_else(|| base.scenario_id.clone()),
            turn_index: self.turn_index.unwrap_or(base.turn_index),
            public_log: self
                .public_log
                .unwrap_or_else(|| base.public_log.clone()),
            last_roll: self.last_roll.unwrap_or_else(|| base.last_roll.clone()),
            active_inject: self
                .active_inject
                .unwrap_or_else(|| base.active_inject.clone()),
            timer: self.timer.unwrap_or(base.timer),
        }
    }
}
