use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use spatial_dilemma::config::{
    DEFAULT_CELL_SIZE, DEFAULT_OUTPUT, DEFAULT_UPDATES_PER_SECOND, validate_defect_ratio,
};
use spatial_dilemma::{
    Field, RenderConfig, Schedule, Simulation, SimulationConfig, run_viewer, save_png,
};

#[derive(Parser, Debug)]
#[command(
    name = "spatial",
    version,
    about = "Evolve a spatial Prisoner's Dilemma field and render the result"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evolve a field loaded from a file and write it as a PNG.
    Run {
        /// File with a `rows cols` line followed by rows of C and D.
        field_file: PathBuf,
        /// Reward for defecting against a cooperator; must be positive.
        #[arg(allow_negative_numbers = true)]
        b: f64,
        /// Number of synchronous steps to run.
        nsteps: usize,
        /// Where to write the final image.
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Side length of each cell in pixels.
        #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
        cell_size: u32,
        #[arg(long, value_enum, default_value_t = Schedule::Parallel)]
        schedule: Schedule,
        /// Worker threads for the parallel schedule (defaults to rayon's pool).
        #[arg(long)]
        threads: Option<usize>,
        /// Write per-step statistics as JSON to this path.
        #[arg(long)]
        stats: Option<PathBuf>,
        /// Animate the run in a window before writing the image.
        #[arg(long)]
        view: bool,
        /// Steps per second while viewing.
        #[arg(long, default_value_t = DEFAULT_UPDATES_PER_SECOND)]
        ups: u64,
    },
    /// Write a random field in the input format.
    Generate {
        rows: usize,
        cols: usize,
        /// Probability that a cell starts as a defector.
        #[arg(long, default_value_t = 0.1)]
        defect_ratio: f64,
        /// Seed for reproducible fields.
        #[arg(long)]
        seed: Option<u64>,
        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            field_file,
            b,
            nsteps,
            output,
            cell_size,
            schedule,
            threads,
            stats,
            view,
            ups,
        } => {
            let config = SimulationConfig {
                temptation: b,
                steps: nsteps,
                schedule,
                threads,
            };
            let render = RenderConfig {
                cell_size,
                output,
                updates_per_second: ups,
            };
            run(field_file, config, render, stats, view)
        }
        Command::Generate {
            rows,
            cols,
            defect_ratio,
            seed,
            output,
        } => generate(rows, cols, defect_ratio, seed, output),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(
    field_file: PathBuf,
    config: SimulationConfig,
    render: RenderConfig,
    stats_path: Option<PathBuf>,
    view: bool,
) -> Result<()> {
    config.validate().context("bad simulation parameters")?;
    render.validate().context("bad render parameters")?;

    let field = Field::from_file(&field_file)
        .with_context(|| format!("could not load field from {}", field_file.display()))?;
    info!("field dimensions are {} by {}", field.rows(), field.cols());

    let mut sim = Simulation::new(field, config)?;
    if view {
        run_viewer(&mut sim, &render)?;
    }
    sim.run();

    let (field, stats) = sim.into_parts();
    save_png(&field, render.cell_size, &render.output)
        .with_context(|| format!("could not write {}", render.output.display()))?;

    if let Some(path) = stats_path {
        let json = stats.to_json().context("could not serialise statistics")?;
        fs::write(&path, json)
            .with_context(|| format!("could not write statistics to {}", path.display()))?;
        info!(path = %path.display(), steps = stats.history.len(), "wrote statistics");
    }
    Ok(())
}

fn generate(
    rows: usize,
    cols: usize,
    defect_ratio: f64,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let defect_ratio = validate_defect_ratio(defect_ratio)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let field = Field::random(rows, cols, defect_ratio, &mut rng)?;
    match output {
        Some(path) => {
            fs::write(&path, field.to_string())
                .with_context(|| format!("could not write field to {}", path.display()))?;
            info!(path = %path.display(), rows, cols, "wrote random field");
        }
        None => print!("{field}"),
    }
    Ok(())
}
