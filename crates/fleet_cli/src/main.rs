use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fleet_control::{Controller, Response};
use fleet_core::{Dispatch, World};
use fleet_world::{build_world, generate_scenario, load_scenario, Scenario};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::prelude::*;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "fleet_cli", about = "Fleet simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a directive script against a scenario.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Scenario JSON file. Mutually exclusive with --seed.
    #[arg(long, default_value = "./content/scenario.json", conflicts_with = "seed")]
    scenario: PathBuf,
    /// Generate a random scenario with this seed instead of loading one.
    #[arg(long)]
    seed: Option<u64>,
    /// Depots in a generated scenario.
    #[arg(long, default_value_t = 4, requires = "seed")]
    depots: usize,
    /// Vessels in a generated scenario.
    #[arg(long, default_value_t = 6, requires = "seed")]
    vessels: usize,
    /// Directive script. Reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Extra hours to run once the script ends.
    #[arg(long, default_value_t = 0)]
    ticks: u64,
    /// Write the final world as JSON to this file.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn resolve_scenario(args: &RunArgs) -> Result<Scenario> {
    match args.seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            Ok(generate_scenario(&mut rng, args.depots, args.vessels))
        }
        None => load_scenario(&args.scenario),
    }
}

fn open_script(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let scenario = resolve_scenario(args)?;
    let mut world = build_world(&scenario).context("building world from scenario")?;

    println!(
        "Starting simulation: depots={} vessels={} groups={}",
        scenario.depots.len(),
        scenario.vessels.len(),
        scenario.groups.len(),
    );
    println!("{}", "-".repeat(80));

    let mut controller = Controller::new();
    let script = open_script(args.script.as_deref())?;
    for (index, line) in script.lines().enumerate() {
        let line = line.context("reading script")?;
        match controller.run_line(&mut world, &line) {
            Ok(Some(Response::Quit)) => break,
            Ok(Some(response)) => print_response(&response),
            Ok(None) => {}
            Err(err) => println!("line {}: {err}", index + 1),
        }
    }

    if args.ticks > 0 {
        tracing::info!(ticks = args.ticks, "running past end of script");
    }
    for _ in 0..args.ticks {
        fleet_core::tick(&mut world, &[]);
    }

    println!("{}", "-".repeat(80));
    println!(
        "Done. Final state at hour {} (commands applied={} rejected={}):",
        world.time(),
        controller.applied(),
        controller.rejected(),
    );
    print_status(&world);

    if let Some(path) = &args.snapshot {
        write_snapshot(&world, path)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

fn print_response(response: &Response) {
    match response {
        Response::Applied {
            dispatch: Dispatch::Group(fan_out),
            ..
        } => {
            for (member, err) in fan_out.failures() {
                println!("{}: {member}: {err}", fan_out.group);
            }
        }
        Response::Applied { .. } | Response::Quit => {}
        Response::Advanced { time } => println!("[hour={time:04}]"),
        Response::Status(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Response::Description(text) => println!("{text}"),
    }
}

fn print_status(world: &World) {
    for line in world.status() {
        println!("{line}");
    }
}

fn write_snapshot(world: &World, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &world.snapshot())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(&args)?,
    }
    Ok(())
}
