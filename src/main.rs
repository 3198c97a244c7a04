//! Command-line interface for the tour-planner optimization core.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tour_planner::evaluator::Evaluator;
use tour_planner::haversine::HaversineMatrices;
use tour_planner::io;
use tour_planner::model::Attraction;
use tour_planner::movns::{Movns, MovnsParams};
use tour_planner::nsga2::{Nsga2, NsgaParams};
use tour_planner::transport::TransportContext;

#[derive(Parser)]
#[command(name = "tour-planner")]
#[command(about = "Multi-objective single-day tourist itinerary planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Approximate the Pareto front with the NSGA-II genetic engine
    RunNsga2 {
        /// Attractions CSV (`;`-separated)
        #[arg(long)]
        attractions: PathBuf,
        /// Directory with the four matrix CSVs; haversine estimates when omitted
        #[arg(long)]
        matrices: Option<PathBuf>,
        /// Population size
        #[arg(long, default_value_t = 100)]
        pop: usize,
        /// Number of generations
        #[arg(long, default_value_t = 100)]
        gens: usize,
        /// Output CSV for the final non-dominated set
        #[arg(long)]
        out: PathBuf,
        /// Optional CSV for the per-generation history
        #[arg(long)]
        history: Option<PathBuf>,
        /// Seed for deterministic replay
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Approximate the Pareto front with the MOVNS engine
    RunMovns {
        /// Attractions CSV (`;`-separated)
        #[arg(long)]
        attractions: PathBuf,
        /// Directory with the four matrix CSVs; haversine estimates when omitted
        #[arg(long)]
        matrices: Option<PathBuf>,
        /// Iteration limit
        #[arg(long, default_value_t = 1000)]
        iters: usize,
        /// Wall-clock limit in seconds
        #[arg(long, default_value_t = 300)]
        time: u64,
        /// Output CSV for the final non-dominated set
        #[arg(long)]
        out: PathBuf,
        /// Optional CSV for the improvement history
        #[arg(long)]
        history: Option<PathBuf>,
        /// Seed for deterministic replay
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Coverage and hypervolume reports for two result files
    Compare {
        /// First result CSV
        #[arg(long)]
        a: PathBuf,
        /// Second result CSV
        #[arg(long)]
        b: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::RunNsga2 {
            attractions,
            matrices,
            pop,
            gens,
            out,
            history,
            seed,
        } => {
            let (catalog, context) = load_inputs(&attractions, matrices.as_deref())?;
            let evaluator = Evaluator::new(&catalog, &context);
            let params = NsgaParams {
                population_size: pop,
                max_generations: gens,
                seed,
                ..NsgaParams::default()
            };
            let mut engine = Nsga2::new(&evaluator, params)?;
            let result = engine.run();

            io::write_solutions(&out, &result.archive, &catalog)?;
            if let Some(history_path) = history {
                io::write_history(&history_path, &result.history)?;
            }
            print!("{}", io::hypervolume_report(&result.archive.points()));
            info!(solutions = result.archive.len(), out = %out.display(), "results written");
            Ok(())
        }
        Command::RunMovns {
            attractions,
            matrices,
            iters,
            time,
            out,
            history,
            seed,
        } => {
            let (catalog, context) = load_inputs(&attractions, matrices.as_deref())?;
            let evaluator = Evaluator::new(&catalog, &context);
            let params = MovnsParams {
                max_iterations: iters,
                max_time_seconds: time,
                seed,
                ..MovnsParams::default()
            };
            let mut engine = Movns::new(&evaluator, params)?;
            let result = engine.run();

            io::write_solutions(&out, &result.archive, &catalog)?;
            if let Some(history_path) = history {
                io::write_history(&history_path, &result.history)?;
            }
            print!("{}", io::hypervolume_report(&result.archive.points()));
            info!(solutions = result.archive.len(), out = %out.display(), "results written");
            Ok(())
        }
        Command::Compare { a, b } => {
            let first: Vec<_> = io::read_solutions(&a)?
                .iter()
                .map(|record| record.objectives.minimized())
                .collect();
            let second: Vec<_> = io::read_solutions(&b)?
                .iter()
                .map(|record| record.objectives.minimized())
                .collect();
            print!("{}", io::coverage_report(&first, &second));
            println!("--- A ---");
            print!("{}", io::hypervolume_report(&first));
            println!("--- B ---");
            print!("{}", io::hypervolume_report(&second));
            Ok(())
        }
    }
}

fn load_inputs(
    attractions_path: &Path,
    matrices_dir: Option<&Path>,
) -> Result<(Vec<Attraction>, TransportContext), Box<dyn Error>> {
    let attractions = io::load_attractions(attractions_path)?;
    let context = match matrices_dir {
        Some(dir) => io::load_transport_context(dir, &attractions)?,
        None => {
            info!("no matrices directory given, using haversine estimates");
            let names = attractions.iter().map(|a| a.name.clone()).collect();
            TransportContext::new(names, HaversineMatrices::default().build(&attractions))
        }
    };
    Ok((attractions, context))
}
