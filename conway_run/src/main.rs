// main.rs - CLI entry point for the headless runner
//
// Runs a toroidal Game of Life on the sequential or parallel engine and logs
// its progress.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conway::PATTERNS;
use conway_run::{seed_grid, Backend, Config, Engine, Runner};
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "conway_run")]
#[command(version)]
#[command(about = "Toroidal Game of Life with a parallel step coordinator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "life.yaml")]
        config: PathBuf,

        /// Number of generations to simulate
        #[arg(short, long)]
        generations: Option<u64>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Stepping backend
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,

        /// Worker tasks for the parallel backend
        #[arg(short, long)]
        workers: Option<usize>,

        /// Start from a named pattern
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "life.yaml")]
        output: PathBuf,
    },

    /// List built-in patterns
    Patterns,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            seed,
            backend,
            workers,
            pattern,
        } => {
            let mut config = load_config(config)?;
            if generations.is_some() {
                config.run.generations = generations;
            }
            if seed.is_some() {
                config.world.seed = seed;
            }
            if let Some(backend) = backend {
                config.engine.backend = backend;
            }
            if workers.is_some() {
                config.engine.workers = workers;
            }
            if pattern.is_some() {
                config.world.pattern = pattern;
            }
            config.validate()?;
            run_simulation(config).await
        }

        Commands::Init { output } => {
            Config::default().save(&output)?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }

        Commands::Patterns => {
            for pattern in PATTERNS {
                let (w, h) = pattern.extent();
                println!("{:<20} {w}x{h}, {} cells", pattern.name, pattern.cells.len());
            }
            Ok(())
        }
    }
}

fn load_config(path: PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        log::info!("Loading config from {}", path.display());
        Config::from_file(&path)
    } else {
        log::info!("No config at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

async fn run_simulation(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let (grid, seed) = seed_grid(&config.world)?;
    if let Some(seed) = seed {
        log::info!("Using seed {seed}");
    }
    log::info!(
        "{}x{} world, {} cells alive",
        grid.width(),
        grid.height(),
        grid.population()
    );

    let engine = Engine::new(grid, config.rule.kernel(), &config.engine)?;
    let mut runner = Runner::new(engine, config.run.clone());

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Stop requested, finishing current step");
            let _ = stop_tx.send(true);
        }
    });

    let summary = runner.run(stop_rx).await?;
    runner.into_engine().shutdown().await?;

    println!(
        "Generation {}: {} cells alive ({:?})",
        summary.generation, summary.population, summary.reason
    );
    Ok(())
}
