//! Player display: the public projection.

use crate::catalog::Catalog;
use crate::model::{ExerciseState, Inject, LogEntry, RollResult};

/// Difficulty checks shown next to every roll.
const CHECKS: [(&str, u8); 3] = [("Routine", 5), ("Challenging", 10), ("Hard", 15)];

/// What the players see.
///
/// Built only from public fields; holds no reference to the scenario's turns.
#[derive(Debug)]
pub struct PlayerView<'a> {
    pub title: &'a str,
    pub description: &'a str,

    /// The current turn's public side.
    pub current: PublicTurn<'a>,

    /// Every turn in order, for the turn-structure overview.
    pub turns: Vec<PublicTurn<'a>>,

    pub active_inject: Option<&'a Inject>,
    pub last_roll: Option<&'a RollResult>,

    /// Which checks the last roll clears.
    pub checks: Vec<DifficultyCheck>,

    pub log: &'a [LogEntry],
}

/// The public side of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicTurn<'a> {
    pub title: &'a str,
    pub public_text: &'a str,
    pub current: bool,
}

/// A reference target, lit when the last roll meets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyCheck {
    pub label: &'static str,
    pub target: u8,
    pub met: bool,
}

impl<'a> PlayerView<'a> {
    pub fn project(state: &'a ExerciseState, catalog: &'a Catalog) -> Self {
        let scenario = catalog.resolve(&state.scenario_id);
        let current_index = state.turn_index.min(scenario.last_turn_index());
        let turns: Vec<PublicTurn<'a>> = scenario
            .turns
            .iter()
            .enumerate()
            .map(|(i, t)| PublicTurn {
                title: &t.title,
                public_text: &t.public_text,
                current: i == current_index,
            })
            .collect();
        let roll = state.last_roll.as_ref().map(|r| r.value);

        Self {
            title: &scenario.title,
            description: &scenario.description,
            current: turns[current_index].clone(),
            turns,
            active_inject: state.active_inject.as_ref(),
            last_roll: state.last_roll.as_ref(),
            checks: CHECKS
                .iter()
                .map(|&(label, target)| DifficultyCheck {
                    label,
                    target,
                    met: roll.is_some_and(|v| v >= target),
                })
                .collect(),
            log: &state.public_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{RollMode, StatePatch};

    fn roll(value: u8) -> RollResult {
        RollResult {
            value,
            mode: RollMode::Normal,
            details: value.to_string(),
            timestamp: Timestamp::now(),
        }
    }

    #[test]
    fn projects_public_turn_and_overview() {
        let catalog = Catalog::builtin().unwrap();
        let state = StatePatch::new()
            .turn_index(2)
            .apply(&ExerciseState::new("cloud-compromise"));

        let view = PlayerView::project(&state, &catalog);
        let scenario = catalog.resolve("cloud-compromise");
        assert_eq!(view.title, scenario.title);
        assert_eq!(view.current.public_text, scenario.turns[2].public_text);
        assert_eq!(view.turns.len(), 4);
        let current: Vec<bool> = view.turns.iter().map(|t| t.current).collect();
        assert_eq!(current, [false, false, true, false]);
    }

    #[test]
    fn checks_light_up_against_last_roll() {
        let catalog = Catalog::builtin().unwrap();
        let state = StatePatch::new()
            .last_roll(Some(roll(12)))
            .apply(&ExerciseState::new("ddos-attack"));

        let view = PlayerView::project(&state, &catalog);
        let met: Vec<(u8, bool)> = view.checks.iter().map(|c| (c.target, c.met)).collect();
        assert_eq!(met, [(5, true), (10, true), (15, false)]);
    }

    #[test]
    fn no_roll_meets_no_check() {
        let catalog = Catalog::builtin().unwrap();
        let state = ExerciseState::new("ddos-attack");

        let view = PlayerView::project(&state, &catalog);
        assert!(view.last_roll.is_none());
        assert!(view.checks.iter().all(|c| !c.met));
    }
}
