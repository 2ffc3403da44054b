//! Turn/event engine: the only code that changes the exercise.
//!
//! Each operation reads the current snapshot, builds one [`StatePatch`], and
//! writes it once. Preconditions that do not hold turn the operation into a
//! no-op reported as [`Transition::Ignored`]; nothing is written.

mod dice;

use std::fmt;

use jiff::{Timestamp, Zoned};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Lookup};
use crate::model::{
    ExerciseState, LogEntry, LogKind, RollMode, RollResult, Scenario, StatePatch,
};
use crate::store::{Result, SharedStore};

pub use dice::{Dice, RandomDice, resolve};

/// What an engine operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The state was rewritten.
    Applied,

    /// Preconditions did not hold; the state is untouched.
    Ignored(Ignored),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why an operation was a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    /// Already on the final turn.
    AtLastTurn,

    /// The inject is not part of the current scenario.
    UnknownInject(String),

    /// A reset was requested without confirmation.
    NotConfirmed,

    /// The log has no ids left to hand out.
    LogIdsExhausted,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLastTurn => f.write_str("already on the final turn"),
            Self::UnknownInject(id) => write!(f, "no inject '{id}' in this scenario"),
            Self::NotConfirmed => f.write_str("reset not confirmed"),
            Self::LogIdsExhausted => f.write_str("log ids exhausted, reset the exercise"),
        }
    }
}

/// Runs exercise operations against a catalog with a given dice source.
pub struct Engine<'a, D> {
    catalog: &'a Catalog,
    dice: D,
}

impl<'a, D: Dice> Engine<'a, D> {
    pub fn new(catalog: &'a Catalog, dice: D) -> Self {
        Self { catalog, dice }
    }

    /// The scenario `state` runs, falling back to the catalog default.
    pub fn scenario(&self, state: &ExerciseState) -> &'a Scenario {
        self.current(state).0
    }

    /// Begins `scenario_id` from its first turn with an empty log.
    ///
    /// An unknown id starts the default scenario instead. `timer` is kept.
    pub fn start_exercise(
        &mut self,
        store: &mut SharedStore,
        scenario_id: &str,
    ) -> Result<Transition> {
        let scenario = match self.catalog.lookup(scenario_id) {
            Lookup::Found(s) => s,
            Lookup::Missing { fallback } => {
                info!(requested = scenario_id, fallback = %fallback.id, "unknown scenario");
                fallback
            }
        };

        store.write(
            StatePatch::new()
                .scenario_id(scenario.id.clone())
                .turn_index(0)
                .public_log(Vec::new())
                .last_roll(None)
                .active_inject(None),
        )?;
        info!(scenario = %scenario.id, "exercise started");
        Ok(Transition::Applied)
    }

    /// Moves to the next turn and announces it in the public log.
    ///
    /// Clears the active inject. Two entries are added: a phase marker and
    /// the new turn's briefing, the briefing ending up newest.
    pub fn advance_turn(&mut self, store: &mut SharedStore) -> Result<Transition> {
        let state = store.read();
        let (scenario, patch) = self.current(state);
        let index = state.turn_index.min(scenario.last_turn_index());
        if index >= scenario.last_turn_index() {
            return Ok(Transition::Ignored(Ignored::AtLastTurn));
        }

        let next_index = index + 1;
        let next = &scenario.turns[next_index];
        let Some(mut stamps) = Stamps::after(state, 2) else {
            return Ok(Transition::Ignored(Ignored::LogIdsExhausted));
        };
        let phase = stamps.entry(LogKind::Phase, format!("Advanced to {}", next.title));
        let briefing = stamps.entry(LogKind::Info, next.public_text.clone());
        let log = prepend([briefing, phase], &state.public_log);

        store.write(
            patch
                .turn_index(next_index)
                .active_inject(None)
                .public_log(log),
        )?;
        debug!(turn = next_index, title = %next.title, "turn advanced");
        Ok(Transition::Applied)
    }

    /// Rolls two dice, resolves them under `mode`, and logs the result.
    pub fn roll_dice(&mut self, store: &mut SharedStore, mode: RollMode) -> Result<Transition> {
        let state = store.read();
        let (_, patch) = self.current(state);
        let Some(mut stamps) = Stamps::after(state, 1) else {
            return Ok(Transition::Ignored(Ignored::LogIdsExhausted));
        };

        let d1 = self.dice.d20();
        let d2 = self.dice.d20();
        let (value, details) = resolve(mode, d1, d2);
        let roll = RollResult {
            value,
            mode,
            details,
            timestamp: stamps.instant(),
        };
        let mut entry = stamps.entry(LogKind::Roll, format!("Rolled {value} ({mode})"));
        entry.roll = Some(roll.clone());
        let log = prepend([entry], &state.public_log);

        store.write(patch.last_roll(Some(roll)).public_log(log))?;
        debug!(d1, d2, value, %mode, "dice rolled");
        Ok(Transition::Applied)
    }

    /// Makes `inject_id` the active inject and logs it.
    ///
    /// Replaces any inject already active.
    pub fn trigger_inject(
        &mut self,
        store: &mut SharedStore,
        inject_id: &str,
    ) -> Result<Transition> {
        let state = store.read();
        let (scenario, patch) = self.current(state);
        let Some(inject) = scenario.inject(inject_id) else {
            return Ok(Transition::Ignored(Ignored::UnknownInject(
                inject_id.to_string(),
            )));
        };

        let Some(mut stamps) = Stamps::after(state, 1) else {
            return Ok(Transition::Ignored(Ignored::LogIdsExhausted));
        };
        let mut entry = stamps.entry(LogKind::Inject, inject.title.clone());
        entry.content = Some(inject.content.clone());
        let log = prepend([entry], &state.public_log);

        store.write(patch.active_inject(Some(inject.clone())).public_log(log))?;
        debug!(inject = %inject.id, "inject triggered");
        Ok(Transition::Applied)
    }

    /// Logs the current turn's briefing again without moving on.
    pub fn resend_current_briefing(&mut self, store: &mut SharedStore) -> Result<Transition> {
        let state = store.read();
        let (scenario, patch) = self.current(state);
        // Catalog validation guarantees every scenario has a turn.
        let Some(turn) = scenario.turn(state.turn_index) else {
            return Ok(Transition::Ignored(Ignored::AtLastTurn));
        };

        let turn_index = state.turn_index;
        let Some(mut stamps) = Stamps::after(state, 1) else {
            return Ok(Transition::Ignored(Ignored::LogIdsExhausted));
        };
        let entry = stamps.entry(LogKind::Info, turn.public_text.clone());
        let log = prepend([entry], &state.public_log);

        store.write(patch.public_log(log))?;
        debug!(turn = turn_index, "briefing resent");
        Ok(Transition::Applied)
    }

    /// Returns the current scenario to its first turn with a clean slate.
    ///
    /// Only acts when `confirmed`; asking is the caller's job.
    pub fn reset_exercise(
        &mut self,
        store: &mut SharedStore,
        confirmed: bool,
    ) -> Result<Transition> {
        if !confirmed {
            return Ok(Transition::Ignored(Ignored::NotConfirmed));
        }

        store.write(
            StatePatch::new()
                .turn_index(0)
                .public_log(Vec::new())
                .last_roll(None)
                .active_inject(None)
                .timer(0),
        )?;
        info!(scenario = %store.read().scenario_id, "exercise reset");
        Ok(Transition::Applied)
    }

    /// Resolves the running scenario and seeds a patch for it.
    ///
    /// When the stored id is unknown the patch repoints the state at the
    /// fallback, so the next write repairs it.
    fn current(&self, state: &ExerciseState) -> (&'a Scenario, StatePatch) {
        match self.catalog.lookup(&state.scenario_id) {
            Lookup::Found(s) => (s, StatePatch::new()),
            Lookup::Missing { fallback } => {
                warn!(stored = %state.scenario_id, fallback = %fallback.id, "unknown scenario in state");
                (fallback, StatePatch::new().scenario_id(fallback.id.clone()))
            }
        }
    }
}

/// Hands out log ids and timestamps for entries created in one operation.
///
/// Ids are Unix milliseconds, bumped past the newest id already logged so
/// entries created within the same millisecond still differ.
struct Stamps {
    now: Zoned,
    next_id: u64,
}

impl Stamps {
    /// Reserves `count` ids after the newest one in `state`.
    ///
    /// `None` if the ids would run past `u64::MAX`.
    fn after(state: &ExerciseState, count: u64) -> Option<Self> {
        let now = Zoned::now();
        let millis = u64::try_from(now.timestamp().as_millisecond()).unwrap_or(0);
        let next_id = match state.last_log_id() {
            Some(last) => millis.max(last.checked_add(1)?),
            None => millis,
        };
        next_id.checked_add(count.saturating_sub(1))?;
        Some(Self { now, next_id })
    }

    fn instant(&self) -> Timestamp {
        self.now.timestamp()
    }

    fn entry(&mut self, kind: LogKind, text: String) -> LogEntry {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        LogEntry {
            id,
            timestamp: self.now.strftime("%H:%M").to_string(),
            kind,
            text,
            roll: None,
            content: None,
        }
    }
}

/// New entries (newest first) followed by the existing log.
fn prepend<const N: usize>(entries: [LogEntry; N], log: &[LogEntry]) -> Vec<LogEntry> {
    let mut out = Vec::with_capacity(N + log.len());
    out.extend(entries);
    out.extend_from_slice(log);
    out
}
