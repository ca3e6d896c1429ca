//! FX Market Simulator
//!
//! Runs a seeded market simulation from the command line. Factor inputs come
//! from a JSON script when given, and from the seeded autopilot otherwise.
//!
//! Examples:
//!   cargo run -p fx-core -- --rounds 20 --seed 7
//!   cargo run -p fx-core -- --factors factors.json --interventions shocks.json

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fx_core::{
    display_rates, load_factor_script, render_summary, Config, ConfigError, EventLogger,
    InterventionSchedule, Simulation, SimulationError, SnapshotWriter,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "fx_sim")]
#[command(about = "A round-based foreign exchange market simulator")]
struct Args {
    /// Number of rounds to simulate (defaults to the configured value)
    #[arg(long)]
    rounds: Option<u64>,

    /// Random seed for reproducibility (defaults to the configured value)
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning file; fx_tuning.toml is used when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of per-round factor inputs
    #[arg(long)]
    factors: Option<PathBuf>,

    /// JSON array of scheduled interventions, or a directory of intervention files
    #[arg(long)]
    interventions: Option<PathBuf>,

    /// Directory for snapshots, events and strength history
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip writing output files
    #[arg(long)]
    no_output: bool,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimulationError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    let rounds = args.rounds.unwrap_or(config.simulation.default_rounds);

    if args.print_config {
        let toml = config
            .to_toml()
            .map_err(|e| ConfigError::Invalid(format!("cannot serialize config: {}", e)))?;
        print!("{}", toml);
        return Ok(());
    }

    let script = match &args.factors {
        Some(path) => load_factor_script(path)?,
        None => Vec::new(),
    };
    let schedule = match &args.interventions {
        Some(path) if path.is_dir() => InterventionSchedule::from_dir(path)?,
        Some(path) => InterventionSchedule::from_file(path)?,
        None => InterventionSchedule::new(),
    };

    println!("FX Market Simulator");
    println!("===================");
    println!("Seed: {}", config.simulation.seed);
    println!("Rounds: {}", rounds);
    println!("Currencies: {}", config.currencies.len());
    println!("Scripted rounds: {}", script.len());
    println!("Scheduled interventions: {}", schedule.len());
    println!();

    let mut sim = Simulation::new(&config)?.with_interventions(schedule);

    let (mut writer, mut logger) = if args.no_output {
        (None, EventLogger::null())
    } else {
        std::fs::create_dir_all(&args.output_dir)?;
        let writer = SnapshotWriter::new(&args.output_dir, config.simulation.snapshot_interval);
        let logger = EventLogger::new(args.output_dir.join("events.jsonl"))?;
        (Some(writer), logger)
    };

    if let Some(writer) = writer.as_mut() {
        if rounds > 0 {
            writer.write(&sim.market().snapshot(sim.run_id(), "simulation_start"))?;
        }
    }
    println!("{}", display_rates(sim.market()));

    for _ in 0..rounds {
        let inputs = sim.next_inputs(&script);
        sim.run_round(&inputs)?;

        let events = sim.drain_events();
        if let Err(e) = logger.log_batch(&events) {
            warn!("Could not log events: {}", e);
        }

        let round = sim.market().round();
        println!("{}", display_rates(sim.market()));

        if let Some(writer) = writer.as_mut() {
            if writer.should_snapshot(round, rounds) {
                let snapshot = sim.market().snapshot(sim.run_id(), "periodic");
                if let Err(e) = writer.write(&snapshot) {
                    warn!("Could not write snapshot at round {}: {}", round, e);
                }
            }
        }
    }

    let final_snapshot = sim.market().snapshot(sim.run_id(), "simulation_end");
    if let Some(writer) = writer.as_mut() {
        writer.write(&final_snapshot)?;
        let path = writer.write_strength_history(sim.market())?;
        info!(path = %path.display(), "Wrote strength history");
        info!(snapshots = writer.snapshot_count(), "Wrote snapshots");
    }
    logger.flush()?;

    println!("{}", render_summary(&final_snapshot));

    println!(
        "Simulation complete. Ran {} rounds ({} events logged).",
        sim.market().round(),
        logger.event_count()
    );
    Ok(())
}
