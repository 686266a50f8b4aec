//! Embryo Selection Simulation Library
//!
//! Monte Carlo estimates of the expected gain from choosing among a couple's
//! embryos by polygenic score, for educational attainment and for clinical
//! conditions under the liability-threshold model.
//!
//! ## Modules
//!
//! - `params`: validated trait parameters and ancestry R² scaling
//! - `family`: sibling latent components under a relatedness structure
//! - `liability`: continuous and binary trait realization
//! - `score`: noisy polygenic scores at a given attenuated R²
//! - `pleiotropy`: genetically correlated binary companion trait
//! - `selection`: highest/lowest score selection and random counterfactual
//! - `stats`: streaming mean/variance accumulators
//! - `simulation`: the per-analysis simulation drivers
//! - `output`: CSV result table
//!
//! ## Usage
//!
//! ```bash
//! # Between-family EA gains for EUR, AMR, EAS and AFR ancestry
//! cargo run --release --bin between_family_ea -- --seed 1
//!
//! # Within-family EA gains, optionally tracking a pleiotropic trait
//! cargo run --release --bin within_family_ea -- --ancestry EUR --sd_pheno 3.2 \
//!     --heritability_broad 0.4 --heritability_snp 0.25 --attenuated_rsquared 0.12
//!
//! # Within-family clinical conditions
//! cargo run --release --bin within_family_clinical -- --ancestry EUR \
//!     --condition T2D CAD --heritability 0.4 0.5 --correlation_mz 0.5 0.6 \
//!     --prevalence 0.1 0.06 --rsquared 0.05 0.04
//! ```

pub mod cli;
pub mod error;
pub mod family;
pub mod liability;
pub mod output;
pub mod params;
pub mod pleiotropy;
pub mod score;
pub mod selection;
pub mod simulation;
pub mod stats;

pub use error::{Result, SimulationError};
