//! Headless garden runner.
//!
//! Runs scripted scenarios against the engine without any UI, validates
//! catalog data files, and inspects save files.
//!
//! # Usage
//!
//! ```bash
//! # Run a scenario and print the report as JSON
//! cargo run -p garden_headless -- run --catalog data/catalog.ron \
//!     --scenario data/scenarios/first_harvest.ron
//!
//! # Validate a catalog data file
//! cargo run -p garden_headless -- validate --catalog data/catalog.ron
//!
//! # Validate a save file against a catalog
//! cargo run -p garden_headless -- inspect --catalog data/catalog.ron \
//!     --save my_garden.json
//! ```
//!
//! Reports go to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garden_core::snapshot::SaveFile;
use garden_headless::catalog_loader::load_catalog;
use garden_headless::runner::run_scenario;
use garden_headless::scenario::Scenario;

#[derive(Parser)]
#[command(name = "garden_headless")]
#[command(about = "Headless garden scenario runner and data validator")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted scenario and print the report
    Run {
        /// Path to the catalog RON file
        #[arg(long)]
        catalog: PathBuf,
        /// Path to the scenario RON file
        #[arg(long)]
        scenario: PathBuf,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load and validate a catalog data file
    Validate {
        /// Path to the catalog RON file
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Validate a save file against a catalog
    Inspect {
        /// Path to the catalog RON file
        #[arg(long)]
        catalog: PathBuf,
        /// Path to the save JSON file
        #[arg(long)]
        save: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Run {
            catalog,
            scenario,
            output,
        } => {
            let catalog = load_catalog(&catalog).map_err(|e| e.to_string())?;
            let scenario = Scenario::load(&scenario).map_err(|e| e.to_string())?;
            let report = run_scenario(catalog, &scenario).map_err(|e| e.to_string())?;
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            match output {
                Some(path) => std::fs::write(&path, json).map_err(|e| e.to_string())?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Validate { catalog } => {
            let loaded = load_catalog(&catalog).map_err(|e| e.to_string())?;
            println!(
                "catalog ok: {} eras, {} crops, {} goals, {} visitors",
                loaded.eras.len(),
                loaded.crops.len(),
                loaded.goals.len(),
                loaded.visitors.len()
            );
            Ok(())
        }
        Commands::Inspect { catalog, save } => {
            let catalog = load_catalog(&catalog).map_err(|e| e.to_string())?;
            let json = std::fs::read_to_string(&save).map_err(|e| e.to_string())?;
            let state = SaveFile::from_json(&json, &catalog).map_err(|e| e.to_string())?;
            println!(
                "save ok: player '{}', garden '{}', era {}, {} crops planted, prestige {}",
                state.player_name,
                state.garden_name,
                state.current_era,
                state.planted.len(),
                state.prestige_count
            );
            Ok(())
        }
    }
}
