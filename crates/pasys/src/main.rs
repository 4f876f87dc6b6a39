//! Command-line front end for the trade-space engine.

mod config;
mod export;
mod logging;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, eyre};

use pasys_core::{BatchRunner, Objective, ResultsTable, SampleMethod, evaluate_case};

use config::StudyConfig;
use export::{read_json, write_csv, write_json};
use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "pasys")]
#[command(about = "Phased array system design and trade study tool")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Grid,
    Random,
    Lhs,
}

impl From<MethodArg> for SampleMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Grid => SampleMethod::Grid,
            MethodArg::Random => SampleMethod::Random,
            MethodArg::Lhs => SampleMethod::Lhs,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the configured architecture once and print its metrics
    Run {
        /// Study config (YAML/JSON)
        config: PathBuf,
        /// Write metrics as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sample the design space and evaluate every case
    Doe {
        /// Study config (YAML/JSON)
        config: PathBuf,
        /// Number of DOE samples (ignored by grid)
        #[arg(short = 'n', long, default_value_t = 50)]
        samples: usize,
        /// Sampling method
        #[arg(long, value_enum, default_value_t = MethodArg::Lhs)]
        method: MethodArg,
        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Parallel workers
        #[arg(short = 'j', long, default_value_t = 1)]
        workers: usize,
        /// Results file; `.json` keeps full fidelity, anything else is CSV
        #[arg(short, long, default_value = "results.csv")]
        output: PathBuf,
    },
    /// Extract the Pareto frontier from saved DOE results
    Pareto {
        /// Results file written by `doe` with a `.json` output
        results: PathBuf,
        /// Metric to minimize
        #[arg(short = 'x')]
        minimize: String,
        /// Metric to maximize
        #[arg(short = 'y')]
        maximize: String,
        /// Keep only rows that passed verification first
        #[arg(long)]
        feasible_only: bool,
        /// Frontier output file (same format rules as `doe`)
        #[arg(short, long, default_value = "pareto.csv")]
        output: PathBuf,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log_level)?;

    match args.command {
        Command::Run { config, output } => cmd_run(&config, output.as_deref()),
        Command::Doe {
            config,
            samples,
            method,
            seed,
            workers,
            output,
        } => cmd_doe(&config, samples, method.into(), seed, workers, &output),
        Command::Pareto {
            results,
            minimize,
            maximize,
            feasible_only,
            output,
        } => cmd_pareto(&results, &minimize, &maximize, feasible_only, &output),
    }
}

fn cmd_run(config_path: &Path, output: Option<&Path>) -> color_eyre::Result<()> {
    let config = StudyConfig::load(config_path)?;
    let requirements = config.requirement_set()?;

    let metrics = evaluate_case(
        &config.architecture,
        &config.scenario,
        requirements.as_ref(),
        Some(&config.name),
    )?;

    println!("Results for {}", config.name);
    println!("{}", "=".repeat(60));
    for (key, value) in metrics.iter() {
        println!("  {key}: {value}");
    }

    if let Some(path) = output {
        let file = File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &metrics)?;
        tracing::info!("metrics saved to {}", path.display());
    }
    Ok(())
}

fn cmd_doe(
    config_path: &Path,
    samples: usize,
    method: SampleMethod,
    seed: u64,
    workers: usize,
    output: &Path,
) -> color_eyre::Result<()> {
    let config = StudyConfig::load(config_path)?;
    let space = config.design_space()?;
    let requirements = config.requirement_set()?;

    let doe = pasys_core::sample(&space, method, samples, seed)?;
    tracing::info!(
        cases = doe.len(),
        ?method,
        seed,
        workers,
        "starting batch evaluation"
    );

    let runner = BatchRunner::new(config.scenario.clone(), requirements)
        .with_base_architecture(config.architecture.clone());
    let results = runner.run(
        &doe,
        workers,
        Some(&|done, total| {
            if done % 50 == 0 || done == total {
                tracing::info!("evaluated {done}/{total} cases");
            }
        }),
    );

    let errors = results.len() - results.clean_rows().count();
    if errors > 0 {
        tracing::warn!("{errors} of {} cases failed; see meta.error", results.len());
    }

    if !config.objectives.is_empty() {
        let frontier = pasys_core::extract_pareto(&results, &config.objectives);
        tracing::info!(
            "{} of {} cases on the configured Pareto frontier",
            frontier.len(),
            results.len()
        );
    }

    write_results(&results, output)?;
    tracing::info!("results saved to {}", output.display());
    Ok(())
}

fn cmd_pareto(
    results_path: &Path,
    minimize: &str,
    maximize: &str,
    feasible_only: bool,
    output: &Path,
) -> color_eyre::Result<()> {
    if results_path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(eyre!(
            "pareto reads the .json results written by `pasys doe -o results.json`"
        ));
    }
    let text = std::fs::read_to_string(results_path)
        .wrap_err_with(|| format!("reading {}", results_path.display()))?;
    let mut results = read_json(&text)?;

    if feasible_only {
        results = pasys_core::filter_feasible(&results);
    }

    let objectives = vec![Objective::minimize(minimize), Objective::maximize(maximize)];
    let frontier = pasys_core::extract_pareto(&results, &objectives);
    let ranked = pasys_core::rank_pareto(&frontier, &objectives, None)?;

    tracing::info!(
        "{} of {} rows on the frontier",
        ranked.len(),
        results.len()
    );
    write_results(&ranked, output)?;
    tracing::info!("frontier saved to {}", output.display());
    Ok(())
}

fn write_results(results: &ResultsTable, path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path).wrap_err_with(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        write_json(results, &mut writer)?;
    } else {
        write_csv(results, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}
