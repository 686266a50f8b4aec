//! Between-Family Educational Attainment Simulation Binary
//!
//! Expected EA gain from choosing the highest-scoring of several unrelated
//! individuals, for each built-in ancestry group.
//!
//! ## Usage
//! ```bash
//! cargo run --bin between_family_ea --release -- --n 100000 --seed 7
//! ```

use clap::Parser;
use log::info;

use embryo_selection::cli::{exit_on_error, init_logging, RunArgs};
use embryo_selection::output::write_results;
use embryo_selection::params::{
    Ancestry, AncestryScales, BetweenFamilyTrait, DEFAULT_SCALE_AFR, DEFAULT_SCALE_AMR,
    DEFAULT_SCALE_EAS,
};
use embryo_selection::simulation::run_between_family;
use embryo_selection::Result;

const TRAIT_NAME: &str = "Educational Attainment";

#[derive(Parser, Debug)]
#[command(about = "Between-family simulation of EA gains from embryo selection")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Naive heritability, or between-family heritability
    #[arg(long = "hsquared_bf", default_value_t = 0.2)]
    hsquared_bf: f64,

    /// Naive R^2, or between-family R^2 for EUR ancestry
    #[arg(long = "eur_bf_rsquared", default_value_t = 0.1)]
    eur_bf_rsquared: f64,

    /// Standard deviation of the phenotype (years of education)
    #[arg(long = "sd_pheno", default_value_t = 3.2)]
    sd_pheno: f64,

    /// Factor converting EUR R^2 to AMR
    #[arg(long = "scale_AMR", default_value_t = DEFAULT_SCALE_AMR)]
    scale_amr: f64,

    /// Factor converting EUR R^2 to EAS
    #[arg(long = "scale_EAS", default_value_t = DEFAULT_SCALE_EAS)]
    scale_eas: f64,

    /// Factor converting EUR R^2 to AFR
    #[arg(long = "scale_AFR", default_value_t = DEFAULT_SCALE_AFR)]
    scale_afr: f64,
}

fn run(cli: Cli) -> Result<()> {
    let shape = cli.run.shape()?;
    let scales = AncestryScales {
        amr: cli.scale_amr,
        eas: cli.scale_eas,
        afr: cli.scale_afr,
    };
    scales.validate()?;

    let traits: Vec<(Ancestry, BetweenFamilyTrait)> = Ancestry::all()
        .into_iter()
        .map(|ancestry| {
            let rsquared = scales.rsquared(ancestry, cli.eur_bf_rsquared);
            BetweenFamilyTrait::new(TRAIT_NAME, cli.hsquared_bf, rsquared, cli.sd_pheno)
                .map(|params| (ancestry, params))
        })
        .collect::<Result<_>>()?;

    info!(
        "Between-family simulation for {} parent pairs choosing between {} embryos.",
        shape.families, shape.embryos
    );

    let mut ctx = cli.run.context();
    let mut results = Vec::with_capacity(traits.len());
    for (ancestry, params) in &traits {
        results.push(run_between_family(&mut ctx, shape, params, ancestry.label())?);
    }

    write_results(&results, cli.run.output.as_deref())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    exit_on_error(|| run(cli));
}
