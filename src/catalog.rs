//! Scenario catalog: the read-only library of exercise scripts.
//!
//! The built-in library is embedded from `catalog/library.toml`. An alternative
//! file with the same layout can be loaded instead, which is how translated
//! content reaches the core: the catalog treats all text as opaque.
//!
//! Lookups never fail. An unknown id resolves to the library's default
//! scenario, and [`Lookup`] keeps that fallback visible to callers.

use std::{collections::HashSet, fs, io, path::Path};

use serde::Deserialize;

use crate::model::{DifficultyRow, Scenario, ScenarioSummary};

const BUILTIN_LIBRARY: &str = include_str!("catalog/library.toml");

/// Errors that can occur while loading a scenario library.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid scenario library: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("scenario library has no scenarios")]
    Empty,

    #[error("scenario {0} has no turns")]
    NoTurns(String),

    #[error("duplicate scenario id: {0}")]
    DuplicateId(String),

    #[error("default scenario {0} is not in the library")]
    UnknownDefault(String),
}

pub type Result<T> = core::result::Result<T, CatalogError>;

/// On-disk layout of a scenario library.
#[derive(Deserialize)]
struct Library {
    default: String,

    #[serde(default)]
    difficulty: Vec<DifficultyRow>,

    scenarios: Vec<Scenario>,
}

/// The outcome of looking up a scenario id.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// The id names a scenario in the library.
    Found(&'a Scenario),

    /// The id is unknown; the default scenario stands in for it.
    Missing { fallback: &'a Scenario },
}

impl<'a> Lookup<'a> {
    /// The scenario to run, whichever way the lookup went.
    pub fn scenario(self) -> &'a Scenario {
        match self {
            Self::Found(s) | Self::Missing { fallback: s } => s,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// An immutable, validated scenario library.
#[derive(Debug, Clone)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
    default_index: usize,
    difficulty: Vec<DifficultyRow>,
}

impl Catalog {
    /// The library compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_LIBRARY)
    }

    /// Loads a library file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses and validates a library document.
    pub fn parse(contents: &str) -> Result<Self> {
        let library: Library = toml::from_str(contents)?;
        Self::from_parts(library.scenarios, &library.default, library.difficulty)
    }

    fn from_parts(
        scenarios: Vec<Scenario>,
        default: &str,
        difficulty: Vec<DifficultyRow>,
    ) -> Result<Self> {
        if scenarios.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if scenario.turns.is_empty() {
                return Err(CatalogError::NoTurns(scenario.id.clone()));
            }
            if !seen.insert(scenario.id.as_str()) {
                return Err(CatalogError::DuplicateId(scenario.id.clone()));
            }
        }
        let default_index = scenarios
            .iter()
            .position(|s| s.id == default)
            .ok_or_else(|| CatalogError::UnknownDefault(default.to_string()))?;

        Ok(Self {
            scenarios,
            default_index,
            difficulty,
        })
    }

    /// Looks up a scenario, falling back to the default on an unknown id.
    pub fn lookup(&self, id: &str) -> Lookup<'_> {
        match self.scenarios.iter().find(|s| s.id == id) {
            Some(s) => Lookup::Found(s),
            None => Lookup::Missing {
                fallback: self.default_scenario(),
            },
        }
    }

    /// Shorthand for `lookup(id).scenario()`.
    pub fn resolve(&self, id: &str) -> &Scenario {
        self.lookup(id).scenario()
    }

    pub fn default_scenario(&self) -> &Scenario {
        &self.scenarios[self.default_index]
    }

    /// Summaries of every scenario, in library order.
    pub fn list_all(&self) -> Vec<ScenarioSummary> {
        self.scenarios.iter().map(Scenario::summary).collect()
    }

    /// The facilitator's difficulty reference, easiest first.
    pub fn difficulty_table(&self) -> &[DifficultyRow] {
        &self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    const MINIMAL: &str = r#"
default = "only"

[[scenarios]]
id = "only"
code = "0001"
title = "Only"
difficulty = "Easy"
description = "The only scenario."

[[scenarios.turns]]
id = 0
title = "Briefing"
publicText = "Hello."
facilitatorInfo = "Secret."
"#;

    #[test]
    fn builtin_library_loads() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<String> = catalog.list_all().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["ddos-attack", "ransomware", "cloud-compromise"]);
        assert_eq!(catalog.default_scenario().id, "ddos-attack");
    }

    #[test]
    fn builtin_scenario_shapes() {
        let catalog = Catalog::builtin().unwrap();
        let shape = |id: &str| {
            let s = catalog.resolve(id);
            (s.turns.len(), s.injects.len())
        };
        assert_eq!(shape("ddos-attack"), (4, 3));
        assert_eq!(shape("ransomware"), (4, 1));
        assert_eq!(shape("cloud-compromise"), (4, 2));
    }

    #[test]
    fn builtin_difficulty_table() {
        let catalog = Catalog::builtin().unwrap();
        let rolls: Vec<&str> = catalog
            .difficulty_table()
            .iter()
            .map(|r| r.roll.as_str())
            .collect();
        assert_eq!(rolls, ["No Roll", "5+", "10+", "15+", "20"]);
    }

    #[test]
    fn known_id_is_found() {
        let catalog = Catalog::builtin().unwrap();
        let lookup = catalog.lookup("ransomware");
        assert!(lookup.is_found());
        assert_eq!(lookup.scenario().code, "1456");
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let catalog = Catalog::builtin().unwrap();
        let lookup = catalog.lookup("unknown-id");
        assert!(!lookup.is_found());
        assert_eq!(lookup.scenario(), catalog.resolve("ddos-attack"));
    }

    #[test]
    fn loads_library_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.toml");
        fs::write(&path, MINIMAL).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.list_all().len(), 1);
        assert!(catalog.difficulty_table().is_empty());
    }

    #[test]
    fn missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = Catalog::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn rejects_unknown_default() {
        let doc = MINIMAL.replace(r#"default = "only""#, r#"default = "other""#);
        let err = Catalog::parse(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDefault(id) if id == "other"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doc = format!("{MINIMAL}{}", MINIMAL.replace(r#"default = "only""#, ""));
        let err = Catalog::parse(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "only"));
    }

    #[test]
    fn rejects_scenario_without_turns() {
        let doc = r#"
default = "bare"

[[scenarios]]
id = "bare"
code = "0002"
title = "Bare"
difficulty = "Easy"
description = "No turns."
turns = []
"#;
        let err = Catalog::parse(doc).unwrap_err();
        assert!(matches!(err, CatalogError::NoTurns(id) if id == "bare"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Catalog::parse("default = ").unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }
}
