//! Within-Family Educational Attainment Simulation Binary
//!
//! Expected gain in a continuous trait from choosing the highest-scoring
//! embryo of one couple, and optionally the change in prevalence of a
//! genetically correlated binary trait.
//!
//! ## Usage
//! ```bash
//! cargo run --bin within_family_ea --release -- --ancestry EUR --sd_pheno 3.2 \
//!     --heritability_broad 0.4 --heritability_snp 0.25 --attenuated_rsquared 0.12 \
//!     --pleiotropic_trait "Bipolar Disorder" --heritability_pleio 0.7 \
//!     --correlation_pleio 0.3 --prevalence_pleio 0.02
//! ```

use clap::Parser;
use log::info;

use embryo_selection::cli::{exit_on_error, init_logging, RunArgs};
use embryo_selection::output::write_results;
use embryo_selection::params::{ContinuousTrait, PleiotropicTrait};
use embryo_selection::simulation::run_within_family;
use embryo_selection::Result;

#[derive(Parser, Debug)]
#[command(about = "Within-family simulation of embryo selection on a continuous trait")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Ancestry of interest
    #[arg(long = "ancestry")]
    ancestry: String,

    /// Name of the main (continuous) trait
    #[arg(long = "main_pheno", default_value = "Educational Attainment")]
    main_pheno: String,

    /// Standard deviation of the main phenotype
    #[arg(long = "sd_pheno")]
    sd_pheno: f64,

    /// Broad-sense heritability of the main phenotype
    #[arg(long = "heritability_broad")]
    heritability_broad: f64,

    /// SNP heritability of the main phenotype; at most heritability_broad
    #[arg(long = "heritability_snp")]
    heritability_snp: f64,

    /// Attenuated R^2 of the polygenic score for the main phenotype
    #[arg(long = "attenuated_rsquared")]
    attenuated_rsquared: f64,

    /// Name of a binary pleiotropic trait
    #[arg(long = "pleiotropic_trait")]
    pleiotropic_trait: Option<String>,

    /// Heritability of the pleiotropic trait on the liability scale
    #[arg(long = "heritability_pleio")]
    heritability_pleio: Option<f64>,

    /// Genetic correlation between the main and pleiotropic traits
    #[arg(long = "correlation_pleio", allow_hyphen_values = true)]
    correlation_pleio: Option<f64>,

    /// Population prevalence of the pleiotropic trait
    #[arg(long = "prevalence_pleio")]
    prevalence_pleio: Option<f64>,
}

fn run(cli: Cli) -> Result<()> {
    let shape = cli.run.shape()?;
    let main_trait = ContinuousTrait::new(
        &cli.main_pheno,
        cli.sd_pheno,
        cli.heritability_broad,
        cli.heritability_snp,
        cli.attenuated_rsquared,
    )?;
    let pleiotropic = PleiotropicTrait::from_parts(
        cli.pleiotropic_trait.as_deref(),
        cli.heritability_pleio,
        cli.correlation_pleio,
        cli.prevalence_pleio,
    )?;

    info!(
        "Within-family simulation for embryo selection using the polygenic score for {}.",
        main_trait.name
    );
    info!(
        "{} parents of {} ancestry choosing between {} embryos.",
        shape.families, cli.ancestry, shape.embryos
    );
    match &pleiotropic {
        Some(companion) => info!("Considering the pleiotropic trait {}.", companion.name),
        None => info!("No pleiotropic trait is considered."),
    }

    let mut ctx = cli.run.context();
    let results = run_within_family(
        &mut ctx,
        shape,
        &main_trait,
        &cli.ancestry,
        pleiotropic.as_ref(),
    )?;

    write_results(&results, cli.run.output.as_deref())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    exit_on_error(|| run(cli));
}
