//! CLI interface for Rolls.
//!
//! Each invocation is one view context: it opens the shared exercise state,
//! runs one engine operation or renders one view, and exits. Run a facilitator
//! and a player display side by side and they stay in step through the shared
//! profile store.
//!
//! - `rolls scenarios|start`: pick and begin an exercise.
//! - `rolls next|roll|inject|resend|reset`: drive it (facilitator).
//! - `rolls facilitator|player [--follow]`: look at it.

mod format;

use std::{thread, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::engine::{Dice, Engine, RandomDice, Transition};
use crate::model::{ExerciseState, RollMode};
use crate::store::{SharedStore, StoreError};
use crate::view::{FacilitatorView, PlayerView};

use format::{format_roll, format_summary, render_facilitator, render_player};

/// Rolls & Responders: tabletop incident-response exercises.
#[derive(Debug, Parser)]
#[command(name = "rolls", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: running an exercise
  1. rolls start ransomware
  2. rolls player --follow            (in a second terminal, on the big screen)
  3. rolls facilitator                (read the briefing, check your notes)
  4. rolls roll --mode advantage
  5. rolls inject inject_13
  6. rolls next

Start over:
  rolls reset --yes";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available scenarios.
    Scenarios,

    /// Start a scenario from its first turn, clearing the log.
    Start {
        /// Scenario id. Defaults to the configured default scenario.
        scenario: Option<String>,
    },

    /// Show the facilitator console, including facilitator-only notes.
    Facilitator {
        /// Keep running and redraw whenever the exercise changes.
        #[arg(long)]
        follow: bool,
    },

    /// Show the player display.
    Player {
        /// Keep running and redraw whenever the exercise changes.
        #[arg(long)]
        follow: bool,
    },

    /// Advance to the next turn.
    Next,

    /// Roll the D20.
    Roll {
        #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
        mode: ModeArg,
    },

    /// Trigger an inject from the current scenario.
    Inject {
        /// Inject id, as listed on the facilitator console.
        id: String,
    },

    /// Send the current briefing to the log again.
    Resend,

    /// Reset the exercise to the first turn with an empty log.
    Reset {
        /// Confirm the reset. Nothing happens without it.
        #[arg(long)]
        yes: bool,
    },

    /// Print the raw exercise state as JSON.
    State,
}

/// CLI-facing roll mode, mapped to the domain `RollMode`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// One die.
    Normal,
    /// Two dice, take the higher.
    Advantage,
    /// Two dice, take the lower.
    Disadvantage,
}

impl ModeArg {
    fn to_domain(self) -> RollMode {
        match self {
            Self::Normal => RollMode::Normal,
            Self::Advantage => RollMode::Advantage,
            Self::Disadvantage => RollMode::Disadvantage,
        }
    }
}

/// Run a parsed command, returning an error message on failure.
pub fn run(
    cli: Cli,
    config: &Config,
    catalog: &Catalog,
    store: &mut SharedStore,
) -> Result<(), String> {
    let mut engine = Engine::new(catalog, RandomDice::new());
    let interval = Duration::from_millis(config.follow_interval_ms);

    match cli.command {
        Command::Scenarios => {
            cmd_scenarios(catalog);
            Ok(())
        }
        Command::Start { scenario } => {
            let id = scenario.as_deref().unwrap_or(&config.default_scenario);
            if !catalog.lookup(id).is_found() {
                eprintln!(
                    "Unknown scenario '{id}', starting {} instead",
                    catalog.default_scenario().id
                );
            }
            let t = engine.start_exercise(store, id).map_err(op_error)?;
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::Facilitator { follow } => show(store, follow, interval, |state| {
            render_facilitator(&FacilitatorView::project(state, catalog))
        }),
        Command::Player { follow } => show(store, follow, interval, |state| {
            render_player(&PlayerView::project(state, catalog))
        }),
        Command::Next => {
            let t = engine.advance_turn(store).map_err(op_error)?;
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::Roll { mode } => {
            let t = engine
                .roll_dice(store, mode.to_domain())
                .map_err(op_error)?;
            if t.is_applied()
                && let Some(roll) = &store.read().last_roll
            {
                println!("{}", format_roll(roll));
            }
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::Inject { id } => {
            let t = engine.trigger_inject(store, &id).map_err(op_error)?;
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::Resend => {
            let t = engine.resend_current_briefing(store).map_err(op_error)?;
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::Reset { yes } => {
            let t = engine.reset_exercise(store, yes).map_err(op_error)?;
            if !yes {
                eprintln!("Pass --yes to reset the exercise.");
            }
            report(&engine, store.read(), &t);
            Ok(())
        }
        Command::State => {
            let json = serde_json::to_string_pretty(store.read())
                .map_err(|e| format!("failed to serialize state: {e}"))?;
            println!("{json}");
            Ok(())
        }
    }
}

fn cmd_scenarios(catalog: &Catalog) {
    for summary in catalog.list_all() {
        println!("{}", format_summary(&summary));
    }
}

/// Render once, or keep redrawing on every observed change.
fn show(
    store: &mut SharedStore,
    follow: bool,
    interval: Duration,
    render: impl Fn(&ExerciseState) -> String,
) -> Result<(), String> {
    print!("{}", render(store.read()));
    if !follow {
        return Ok(());
    }

    loop {
        thread::sleep(interval);
        if store
            .sync()
            .map_err(|e| format!("failed to sync state: {e}"))?
        {
            // Clear the terminal and home the cursor before redrawing.
            print!("\x1b[2J\x1b[H{}", render(store.read()));
        }
    }
}

/// Tell the facilitator where things stand after an operation.
fn report<D: Dice>(engine: &Engine<'_, D>, state: &ExerciseState, transition: &Transition) {
    match transition {
        Transition::Applied => {
            let scenario = engine.scenario(state);
            let index = state.turn_index.min(scenario.last_turn_index());
            eprintln!(
                "{}: turn {}/{} ({}), {} log entries",
                scenario.title,
                index + 1,
                scenario.turns.len(),
                scenario.turns[index].title,
                state.public_log.len()
            );
        }
        Transition::Ignored(reason) => eprintln!("Nothing changed: {reason}"),
    }
}

fn op_error(e: StoreError) -> String {
    format!("failed to save exercise state: {e}")
}
