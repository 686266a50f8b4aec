//! Within-Family Clinical Condition Simulation Binary
//!
//! Prevalence of binary conditions among embryos chosen for the lowest
//! polygenic risk, compared with randomly chosen embryos.
//!
//! Conditions come either from positionally aligned lists or from a CSV
//! table with one record per condition.
//!
//! ## Usage
//! ```bash
//! cargo run --bin within_family_clinical --release -- --ancestry EUR \
//!     --condition T2D CAD --heritability 0.4 0.5 --correlation_mz 0.5 0.6 \
//!     --prevalence 0.1 0.06 --rsquared 0.05 0.04
//!
//! cargo run --bin within_family_clinical --release -- --ancestry EUR \
//!     --conditions conditions.csv
//! ```

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use embryo_selection::cli::{exit_on_error, init_logging, RunArgs};
use embryo_selection::output::write_results;
use embryo_selection::params::{
    conditions_from_columns, conditions_from_reader, ClinicalCondition,
};
use embryo_selection::simulation::run_clinical;
use embryo_selection::{Result, SimulationError};

#[derive(Parser, Debug)]
#[command(about = "Within-family simulation of embryo selection against clinical conditions")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Ancestry of interest
    #[arg(long = "ancestry")]
    ancestry: String,

    /// Names of conditions
    #[arg(long = "condition", num_args = 1..)]
    condition: Vec<String>,

    /// Liability-scale heritabilities, aligned with --condition
    #[arg(long = "heritability", num_args = 1..)]
    heritability: Vec<f64>,

    /// Liability-scale MZ twin correlations, aligned with --condition
    #[arg(long = "correlation_mz", num_args = 1..)]
    correlation_mz: Vec<f64>,

    /// Population prevalences, aligned with --condition
    #[arg(long = "prevalence", num_args = 1..)]
    prevalence: Vec<f64>,

    /// Polygenic score R^2 values, aligned with --condition
    #[arg(long = "rsquared", num_args = 1..)]
    rsquared: Vec<f64>,

    /// CSV table with columns condition,heritability,correlation_mz,prevalence,rsquared
    #[arg(
        long = "conditions",
        value_name = "CSV",
        conflicts_with_all = ["condition", "heritability", "correlation_mz", "prevalence", "rsquared"]
    )]
    conditions: Option<PathBuf>,
}

fn load_conditions(cli: &Cli) -> Result<Vec<ClinicalCondition>> {
    match &cli.conditions {
        Some(path) => {
            info!("Reading conditions from {}", path.display());
            conditions_from_reader(File::open(path)?)
        }
        None if cli.condition.is_empty() => Err(SimulationError::Argument(
            "provide conditions with --condition and its aligned lists, or with --conditions"
                .to_string(),
        )),
        None => conditions_from_columns(
            &cli.condition,
            &cli.heritability,
            &cli.correlation_mz,
            &cli.prevalence,
            &cli.rsquared,
        ),
    }
}

fn run(cli: Cli) -> Result<()> {
    let shape = cli.run.shape()?;
    let conditions = load_conditions(&cli)?;

    info!("Within-family simulation for selection of embryos.");
    info!(
        "{} parents of {} ancestry choosing from {} embryos; {} conditions.",
        shape.families,
        cli.ancestry,
        shape.embryos,
        conditions.len()
    );

    let mut ctx = cli.run.context();
    let mut results = Vec::with_capacity(conditions.len());
    for condition in &conditions {
        results.push(run_clinical(&mut ctx, shape, condition, &cli.ancestry)?);
    }

    write_results(&results, cli.run.output.as_deref())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    exit_on_error(|| run(cli));
}
