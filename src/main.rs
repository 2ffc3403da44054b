mod catalog;
mod cli;
mod config;
mod engine;
mod model;
mod storage;
mod store;
mod sync;
mod view;

use std::{io, process};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use catalog::Catalog;
use cli::Cli;
use config::Config;
use storage::Storage;
use store::SharedStore;
use sync::SyncChannel;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "rolls=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let catalog = match &config.scenario_library {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    };
    let catalog = catalog.unwrap_or_else(|e| {
        eprintln!("Failed to load scenario library: {e}");
        process::exit(1);
    });

    let Some(root) = config.profile_dir.clone().or_else(Storage::default_root) else {
        eprintln!("Could not determine data directory.");
        process::exit(1);
    };

    let storage = match Storage::open(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    let channel = SyncChannel::new();
    let mut store = match SharedStore::open(storage, &channel, &config.default_scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load exercise state: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &config, &catalog, &mut store) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
