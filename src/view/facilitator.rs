//! Facilitator console: everything, including the script's private notes.

use crate::catalog::Catalog;
use crate::model::{DifficultyRow, ExerciseState, Inject, LogEntry, RollResult, Scenario, Turn};

/// What the facilitator sees.
#[derive(Debug)]
pub struct FacilitatorView<'a> {
    pub scenario: &'a Scenario,

    /// Zero-based, clamped to the scenario's turns.
    pub turn_index: usize,
    pub turn: &'a Turn,

    /// Whether another turn follows this one.
    pub can_advance: bool,

    /// The scenario's full inject catalog.
    pub injects: Vec<InjectOption<'a>>,

    pub difficulty: &'a [DifficultyRow],
    pub last_roll: Option<&'a RollResult>,
    pub log: &'a [LogEntry],
}

/// An inject the facilitator can trigger.
#[derive(Debug)]
pub struct InjectOption<'a> {
    pub inject: &'a Inject,

    /// Currently shown to the players.
    pub active: bool,
}

impl<'a> FacilitatorView<'a> {
    pub fn project(state: &'a ExerciseState, catalog: &'a Catalog) -> Self {
        let scenario = catalog.resolve(&state.scenario_id);
        let turn_index = state.turn_index.min(scenario.last_turn_index());
        let active_id = state.active_inject.as_ref().map(|i| i.id.as_str());

        Self {
            scenario,
            turn_index,
            turn: &scenario.turns[turn_index],
            can_advance: turn_index < scenario.last_turn_index(),
            injects: scenario
                .injects
                .iter()
                .map(|inject| InjectOption {
                    inject,
                    active: active_id == Some(inject.id.as_str()),
                })
                .collect(),
            difficulty: catalog.difficulty_table(),
            last_roll: state.last_roll.as_ref(),
            log: &state.public_log,
        }
    }

    /// Turn counter as shown in the header, one-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.turn_index + 1, self.scenario.turns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::StatePatch;

    #[test]
    fn projects_current_turn_with_private_notes() {
        let catalog = Catalog::builtin().unwrap();
        let state = StatePatch::new()
            .turn_index(1)
            .apply(&ExerciseState::new("ransomware"));

        let view = FacilitatorView::project(&state, &catalog);
        let turn = &catalog.resolve("ransomware").turns[1];
        assert_eq!(view.turn, turn);
        assert_eq!(view.turn.facilitator_info, turn.facilitator_info);
        assert_eq!(view.progress(), (2, 4));
        assert!(view.can_advance);
    }

    #[test]
    fn marks_active_inject() {
        let catalog = Catalog::builtin().unwrap();
        let inject = catalog.resolve("ddos-attack").inject("inject_8").cloned();
        let state = StatePatch::new()
            .active_inject(inject)
            .apply(&ExerciseState::new("ddos-attack"));

        let view = FacilitatorView::project(&state, &catalog);
        let active: Vec<&str> = view
            .injects
            .iter()
            .filter(|o| o.active)
            .map(|o| o.inject.id.as_str())
            .collect();
        assert_eq!(view.injects.len(), 3);
        assert_eq!(active, ["inject_8"]);
    }

    #[test]
    fn last_turn_cannot_advance() {
        let catalog = Catalog::builtin().unwrap();
        let state = StatePatch::new()
            .turn_index(9)
            .apply(&ExerciseState::new("ddos-attack"));

        let view = FacilitatorView::project(&state, &catalog);
        assert_eq!(view.turn_index, 3);
        assert!(!view.can_advance);
        assert_eq!(view.difficulty.len(), 5);
    }
}
