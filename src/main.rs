//! Erosim CLI - procedural terrain with hydraulic erosion.
//!
//! Generates a heightmap, runs the erosion simulation for a number of ticks
//! and exports the resulting fields as PNG images.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use erosim::SimConfig;
use erosim::controller::Simulation;
use erosim::export::{TerrainMapOptions, export_snapshot};
use erosim::logging::init_logging;

/// Procedural terrain generator with grid hydraulic erosion.
#[derive(Parser)]
#[command(name = "erosim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level filter (error, warn, info, debug, trace). RUST_LOG wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every subcommand. Flags override the config file.
#[derive(Args)]
struct ConfigArgs {
    /// RON config file to start from.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (depth) in cells.
    #[arg(long)]
    height: Option<usize>,

    /// Random seed for reproducible terrain and rainfall.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Calm-slope threshold multiplier.
    #[arg(short, long)]
    density: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate terrain, erode it and export the result.
    Simulate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Number of erosion ticks to run.
        #[arg(short, long, default_value = "500")]
        ticks: u64,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Also export a snapshot every N ticks (0 exports only the final state).
        #[arg(long, default_value = "0")]
        snapshot_every: u64,
    },

    /// Print the resolved configuration as RON.
    Info {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Simulate {
            config,
            ticks,
            output,
            name,
            snapshot_every,
        } => {
            let config = resolve_config(&config)?;
            run_simulate(&config, ticks, &output, &name, snapshot_every)
        }
        Commands::Info { config } => {
            let config = resolve_config(&config)?;
            println!("{}", config.to_ron_string()?);
            println!("cells: {}", config.width * config.height);
            Ok(())
        }
    }
}

fn resolve_config(args: &ConfigArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(density) = args.density {
        config.density = density;
    }
    config.noise.seed = match args.seed {
        Some(seed) => seed,
        None if args.config.is_some() => config.noise.seed,
        None => clock_seed(),
    };

    config.validate()?;
    Ok(config)
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run_simulate(
    config: &SimConfig,
    ticks: u64,
    output: &Path,
    name: &str,
    snapshot_every: u64,
) -> Result<()> {
    info!(
        width = config.width,
        height = config.height,
        seed = config.noise.seed,
        density = config.density,
        ticks,
        output = %output.display(),
        "starting simulation"
    );

    let start = Instant::now();
    let mut sim = Simulation::new(config)?;
    let options = TerrainMapOptions::default();

    let stats = sim
        .run_ticks(ticks, |step, engine| {
            let due = snapshot_every != 0 && step % snapshot_every == 0 && step != ticks;
            if !due {
                return Ok(());
            }
            let base = format!("{name}_{step:06}");
            export_snapshot(engine, output, &base, &options)
                .map(drop)
                .with_context(|| format!("writing intermediate snapshot at tick {step}"))
        })?;

    info!(
        ticks = stats.ticks,
        min_height = stats.min_height,
        max_height = stats.max_height,
        total_water = stats.total_water,
        total_sediment = stats.total_sediment,
        wet_cells = stats.wet_cells,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation finished"
    );

    let written = export_snapshot(sim.engine(), output, name, &options)
        .with_context(|| format!("writing snapshot to {}", output.display()))?;
    for path in written {
        info!("wrote {}", path.display());
    }
    Ok(())
}
