//! NPC Brain command line
//!
//! Runs seeded decision scenarios, replays recorded context snapshots and
//! prints the default configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use npc_brain::recorder::read_contexts;
use npc_brain::scenario::{replay_contexts, DEFAULT_SEEDS};
use npc_brain::{
    default_config_toml, run_scenario, BrainConfig, DecisionBrain, DecisionRecorder,
    ScenarioConfig,
};

/// Command line arguments for the decision core
#[derive(Parser, Debug)]
#[command(name = "npc_brain")]
#[command(about = "Utility goal selection and GOAP/HTN planning for NPCs")]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "npc_brain=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the seeded synthetic scenario
    Run(RunArgs),
    /// Feed context snapshots from a JSONL file through one brain
    Replay(ReplayArgs),
    /// Print the default configuration
    DefaultConfig,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Comma separated seeds
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SEEDS)]
    seeds: Vec<u64>,

    /// Number of ticks per seed
    #[arg(long, default_value_t = 1200)]
    ticks: u32,

    /// Simulation seconds per tick
    #[arg(long, default_value_t = 0.25)]
    dt: f32,

    /// Number of synthetic agents
    #[arg(long, default_value_t = 4)]
    agents: usize,

    /// Directory for per-seed decision logs (decisions_<seed>.jsonl)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// JSONL file with one context snapshot per line
    input: PathBuf,

    /// Write decision records here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Agent id stamped on every record
    #[arg(long, default_value = "agent_0001")]
    agent_id: String,

    /// Faction used to resolve the planner policy for the replayed agent
    #[arg(long)]
    faction: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {:?}", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::DefaultConfig => {
            print!("{}", default_config_toml());
            Ok(())
        }
        Command::Run(args) => run(&load_config(&cli)?, args),
        Command::Replay(args) => replay(&load_config(&cli)?, args),
    }
}

fn load_config(cli: &Cli) -> Result<BrainConfig> {
    let mut config = match &cli.config {
        Some(path) => BrainConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BrainConfig::default(),
    };
    config
        .apply_process_env()
        .context("invalid environment override")?;
    tracing::info!(
        "config: planner={} policy={} goals={:?}",
        config.planner.mode,
        config.policy.mode,
        config.goals.library
    );
    Ok(config)
}

fn run(config: &BrainConfig, args: &RunArgs) -> Result<()> {
    println!("NPC Brain Scenario");
    println!("==================");
    println!("Seeds: {:?}", args.seeds);
    println!("Ticks: {}", args.ticks);
    println!("Dt: {}", args.dt);
    println!("Agents: {}", args.agents);
    println!();

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    for &seed in &args.seeds {
        let scenario = ScenarioConfig {
            seed,
            ticks: args.ticks,
            dt: args.dt,
            agents: args.agents,
        };

        let mut recorder = DecisionRecorder::from_config(&config.recorder);
        if let Some(dir) = &args.output_dir {
            let path = dir.join(format!("decisions_{}.jsonl", seed));
            recorder = recorder
                .with_file(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
        }

        let summary = run_scenario(&scenario, config, &mut recorder)
            .with_context(|| format!("scenario with seed {} failed", seed))?;
        recorder.flush()?;

        println!(
            "seed {:>6}: {} decisions, {} houses built, commands {:?}",
            summary.seed, summary.decisions, summary.houses_built, summary.command_counts
        );
    }

    Ok(())
}

fn replay(config: &BrainConfig, args: &ReplayArgs) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let contexts = read_contexts(BufReader::new(file))
        .with_context(|| format!("failed to read contexts from {}", args.input.display()))?;

    let mut brain = DecisionBrain::from_config(config, args.faction.as_deref())?;
    let mut recorder = DecisionRecorder::from_config(&config.recorder);
    if let Some(path) = &args.output {
        recorder = recorder
            .with_file(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }

    let records = replay_contexts(&mut brain, &contexts, &args.agent_id, &mut recorder)?;
    recorder.flush()?;

    if args.output.is_none() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for record in &records {
            writeln!(out, "{}", record.to_jsonl()?)?;
        }
    }

    tracing::info!("replayed {} contexts", records.len());
    Ok(())
}
