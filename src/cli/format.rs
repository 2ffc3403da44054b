//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{LogEntry, LogKind, RollResult, ScenarioSummary};
use crate::view::{FacilitatorView, PlayerView};

/// Format a log entry as one display line.
pub(super) fn format_entry(entry: &LogEntry) -> String {
    let body = match entry.kind {
        LogKind::Phase => format!("── {} ──", entry.text),
        LogKind::Info => entry.text.clone(),
        LogKind::Roll => match &entry.roll {
            Some(roll) => format!("🎲 Action roll: {} ({})", roll.value, roll.details),
            None => format!("🎲 {}", entry.text),
        },
        LogKind::Inject => format!("[INJECT] {}", entry.text),
    };
    format!("{}  {body}", entry.timestamp)
}

pub(super) fn format_roll(roll: &RollResult) -> String {
    format!("{} [{}] {}", roll.value, roll.mode, roll.details)
}

pub(super) fn format_summary(summary: &ScenarioSummary) -> String {
    format!(
        "{}  {} ({})\n    {}",
        summary.id, summary.title, summary.difficulty, summary.description
    )
}

/// Render the facilitator console.
pub(super) fn render_facilitator(view: &FacilitatorView<'_>) -> String {
    let mut out = String::new();
    let (turn, of) = view.progress();

    let _ = writeln!(out, "FACILITATOR  {}  (turn {turn}/{of})", view.scenario.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "Current phase: {}", view.turn.title);
    if !view.can_advance {
        let _ = writeln!(out, "(final turn)");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Read to players:");
    push_indented(&mut out, &view.turn.public_text);
    let _ = writeln!(out);
    let _ = writeln!(out, "Facilitator only:");
    push_indented(&mut out, &view.turn.facilitator_info);

    let _ = writeln!(out);
    let _ = writeln!(out, "Injects:");
    if view.injects.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for option in &view.injects {
        let marker = if option.active { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {marker} {}  {}: {}",
            option.inject.id, option.inject.title, option.inject.content
        );
    }

    if !view.difficulty.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Difficulty:");
        for row in view.difficulty {
            let _ = writeln!(out, "    {:<14}{:<9}{}", row.level, row.roll, row.example);
        }
    }

    if let Some(roll) = view.last_roll {
        let _ = writeln!(out);
        let _ = writeln!(out, "Last roll: {}", format_roll(roll));
    }

    push_log(&mut out, "Player screen log:", view.log);
    out
}

/// Render the player display.
pub(super) fn render_player(view: &PlayerView<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}  |  INCIDENT ACTIVE", view.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Current phase: {}", view.current.title);
    push_indented(&mut out, view.current.public_text);

    if let Some(inject) = view.active_inject {
        let _ = writeln!(out);
        let _ = writeln!(out, "!! CRITICAL UPDATE: {}", inject.title);
        push_indented(&mut out, &inject.content);
    }

    if let Some(roll) = view.last_roll {
        let _ = writeln!(out);
        let _ = writeln!(out, "Action roll result: {}", roll.value);
        let _ = writeln!(out, "    {}", roll.details);
        let checks: Vec<String> = view
            .checks
            .iter()
            .map(|c| {
                let mark = if c.met { "✓" } else { "·" };
                format!("{mark} {} ({}+)", c.label, c.target)
            })
            .collect();
        let _ = writeln!(out, "    {}", checks.join("  "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Turn structure:");
    for turn in &view.turns {
        let marker = if turn.current { ">" } else { " " };
        let _ = writeln!(out, "  {marker} {}", turn.title);
    }

    if view.log.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Waiting for the exercise to begin...");
    } else {
        push_log(&mut out, "Log:", view.log);
    }
    out
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "    {line}");
    }
}

fn push_log(out: &mut String, heading: &str, log: &[LogEntry]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}");
    if log.is_empty() {
        let _ = writeln!(out, "    No events yet.");
    }
    for entry in log {
        let _ = writeln!(out, "  {}", format_entry(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::catalog::Catalog;
    use crate::model::{ExerciseState, RollMode, StatePatch};

    fn entry(kind: LogKind, text: &str) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: "09:15".into(),
            kind,
            text: text.into(),
            roll: None,
            content: None,
        }
    }

    fn roll() -> RollResult {
        RollResult {
            value: 15,
            mode: RollMode::Advantage,
            details: "Rolled 7 & 15 (take high)".into(),
            timestamp: Timestamp::now(),
        }
    }

    #[test]
    fn format_entry_kinds() {
        assert_eq!(
            format_entry(&entry(LogKind::Phase, "Advanced to Turn 1")),
            "09:15  ── Advanced to Turn 1 ──"
        );
        assert_eq!(format_entry(&entry(LogKind::Info, "Hello")), "09:15  Hello");
        assert_eq!(
            format_entry(&entry(LogKind::Inject, "Extortion Email")),
            "09:15  [INJECT] Extortion Email"
        );

        let mut rolled = entry(LogKind::Roll, "Rolled 15 (advantage)");
        rolled.roll = Some(roll());
        assert_eq!(
            format_entry(&rolled),
            "09:15  🎲 Action roll: 15 (Rolled 7 & 15 (take high))"
        );
    }

    #[test]
    fn format_roll_line() {
        assert_eq!(format_roll(&roll()), "15 [advantage] Rolled 7 & 15 (take high)");
    }

    #[test]
    fn player_render_never_shows_facilitator_notes() {
        let catalog = Catalog::builtin().unwrap();
        for summary in catalog.list_all() {
            let scenario = catalog.resolve(&summary.id);
            for index in 0..scenario.turns.len() {
                let state = StatePatch::new()
                    .turn_index(index)
                    .apply(&ExerciseState::new(summary.id.clone()));
                let out = render_player(&PlayerView::project(&state, &catalog));

                for turn in &scenario.turns {
                    for line in turn.facilitator_info.lines() {
                        assert!(!out.contains(line), "leaked: {line}");
                    }
                }
            }
        }
    }

    #[test]
    fn facilitator_render_shows_notes_and_injects() {
        let catalog = Catalog::builtin().unwrap();
        let state = ExerciseState::new("ddos-attack");
        let out = render_facilitator(&FacilitatorView::project(&state, &catalog));
        let scenario = catalog.resolve("ddos-attack");

        assert!(out.contains("(turn 1/4)"));
        for line in scenario.turns[0].facilitator_info.lines() {
            assert!(out.contains(line));
        }
        for inject in &scenario.injects {
            assert!(out.contains(&inject.id));
        }
        assert!(out.contains("No events yet."));
    }

    #[test]
    fn player_render_shows_inject_and_roll() {
        let catalog = Catalog::builtin().unwrap();
        let inject = catalog.resolve("ddos-attack").inject("inject_11").cloned();
        let state = StatePatch::new()
            .active_inject(inject)
            .last_roll(Some(roll()))
            .public_log(vec![entry(LogKind::Info, "Briefing text")])
            .apply(&ExerciseState::new("ddos-attack"));

        let out = render_player(&PlayerView::project(&state, &catalog));
        assert!(out.contains("CRITICAL UPDATE: Extortion Email"));
        assert!(out.contains("Action roll result: 15"));
        assert!(out.contains("✓ Hard (15+)"));
        assert!(out.contains("09:15  Briefing text"));
        assert!(!out.contains("Waiting for the exercise"));
    }
}
