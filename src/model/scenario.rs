//! Scenario types: the read-only scripts an exercise runs through.

use serde::{Deserialize, Serialize};

/// An immutable script of turns and injects for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,

    /// Reference number from the printed scenario deck.
    pub code: String,

    pub title: String,
    pub difficulty: String,
    pub description: String,

    /// Ordered turns. A valid scenario has at least one.
    pub turns: Vec<Turn>,

    /// Events the facilitator may trigger at any point.
    #[serde(default)]
    pub injects: Vec<Inject>,
}

impl Scenario {
    /// Index of the final turn.
    pub fn last_turn_index(&self) -> usize {
        self.turns.len().saturating_sub(1)
    }

    /// The turn at `index`, clamped to the final turn.
    ///
    /// Persisted state may point past the end if the library changed
    /// underneath it.
    pub fn turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index.min(self.last_turn_index()))
    }

    pub fn inject(&self, id: &str) -> Option<&Inject> {
        self.injects.iter().find(|i| i.id == id)
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            difficulty: self.difficulty.clone(),
            description: self.description.clone(),
        }
    }
}

/// One phase of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub id: u32,
    pub title: String,

    /// Read aloud to the players.
    pub public_text: String,

    /// Background for the facilitator only.
    pub facilitator_info: String,
}

/// A scripted plot event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inject {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// The listing shown when choosing a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub description: String,
}

/// One row of the facilitator's difficulty reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRow {
    pub level: String,

    /// Target shown to the table, e.g. `10+`.
    pub roll: String,

    pub example: String,
}
