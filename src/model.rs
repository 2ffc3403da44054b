//! Core data model for Rolls & Responders.
//!
//! These types describe one live exercise: the shared state both views
//! observe, the public log, dice results, and the read-only scenario scripts
//! the state points into.

mod entry;
mod roll;
mod scenario;
mod state;

pub use entry::{LogEntry, LogKind};
pub use roll::{RollMode, RollResult};
pub use scenario::{DifficultyRow, Inject, Scenario, ScenarioSummary, Turn};
pub use state::{ExerciseState, StatePatch};
