//! Command-line pieces shared by the simulation binaries.

use std::path::PathBuf;
use std::process;

use clap::Args;
use log::{error, info};

use crate::error::Result;
use crate::params::{RunShape, DEFAULT_EMBRYOS, DEFAULT_FAMILIES};
use crate::simulation::SimulationContext;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of parent pairs to simulate
    #[arg(long = "n", default_value_t = DEFAULT_FAMILIES)]
    pub n: usize,

    /// Number of embryos from which to choose
    #[arg(long = "embryos", default_value_t = DEFAULT_EMBRYOS)]
    pub embryos: usize,

    /// Seed for the random number generator; drawn from OS entropy if omitted
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the result table here instead of stdout
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    pub fn shape(&self) -> Result<RunShape> {
        RunShape::new(self.n, self.embryos)
    }

    pub fn context(&self) -> SimulationContext {
        let ctx = SimulationContext::new(self.seed);
        info!("Random seed: {}", ctx.seed());
        ctx
    }
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Runs a binary's body and turns any error into a logged message and exit
/// status 1.
pub fn exit_on_error(run: impl FnOnce() -> Result<()>) {
    if let Err(err) = run() {
        error!("{err}");
        process::exit(1);
    }
}
