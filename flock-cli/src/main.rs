use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use flock_cli::{load_config, run_flock, run_life, FlockRun, LifeRun};
use flock_shared::{LifeConfig, PlayerInput, SimulationConfig, Weights};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless flocking and Game of Life simulations", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the boid flock and emit JSON-lines frame snapshots
    Flock {
        /// JSON file with simulation settings; missing fields use defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of boids
        #[arg(short, long)]
        boids: Option<usize>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// Seed for spawn positions and wander drift
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Alignment weight in [0, 1]
        #[arg(long, default_value_t = 0.0)]
        alignment: f32,

        /// Separation weight in [0, 1]
        #[arg(long, default_value_t = 0.0)]
        separation: f32,

        /// Cohesion weight in [0, 1]
        #[arg(long, default_value_t = 0.0)]
        cohesion: f32,

        /// Ramp every weight up to 1.0 over the run
        #[arg(long)]
        ramp: bool,

        /// Keys held by the player for the whole run, e.g. "wd"
        #[arg(short, long, default_value = "")]
        keys: String,

        /// Write a snapshot every N ticks (0 disables snapshots)
        #[arg(short, long, default_value_t = 1)]
        every: u64,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pace ticks to the configured frame rate
        #[arg(short, long)]
        realtime: bool,
    },
    /// Run Conway's Game of Life and print each generation
    Life {
        /// JSON file with grid settings; missing fields use defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of generations to print
        #[arg(short, long, default_value_t = 10)]
        generations: u64,

        /// Seed for the initial board
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Pace generations to the configured frame rate
        #[arg(short, long)]
        realtime: bool,
    },
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    match args.command {
        Command::Flock {
            config,
            boids,
            ticks,
            seed,
            alignment,
            separation,
            cohesion,
            ramp,
            keys,
            every,
            output,
            realtime,
        } => {
            let mut config: SimulationConfig = load_config(config.as_deref())?;
            if let Some(boids) = boids {
                config.boid_count = boids;
            }
            for (name, weight) in [
                ("alignment", alignment),
                ("separation", separation),
                ("cohesion", cohesion),
            ] {
                if !(0.0..=1.0).contains(&weight) {
                    bail!("{} weight must be within [0, 1], got {}", name, weight);
                }
            }

            let run = FlockRun {
                config,
                seed,
                ticks,
                every,
                weights: Weights::new(alignment, separation, cohesion),
                ramp,
                input: PlayerInput::from_keys(&keys),
                realtime,
            };
            let mut out = open_output(output.as_ref())?;
            let summary = run_flock(&run, &mut out).context("Flock simulation failed")?;
            log::info!("Summary: {}", serde_json::to_string(&summary)?);
        }
        Command::Life {
            config,
            generations,
            seed,
            realtime,
        } => {
            let config: LifeConfig = load_config(config.as_deref())?;
            let run = LifeRun {
                config,
                seed,
                generations,
                realtime,
            };
            let mut out = open_output(None)?;
            let population = run_life(&run, &mut out).context("Life simulation failed")?;
            log::info!("Final population: {}", population);
        }
    }

    Ok(())
}
