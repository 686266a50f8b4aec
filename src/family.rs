//! Family Generator
//!
//! Draws the latent components of every sibling (embryo) in one family.
//!
//! ## Variance Decomposition
//! Liability has unit variance in the population and is the sum of:
//! 1. SNP-tagged genetic value (what a polygenic score can capture)
//! 2. Residual genetic value (heritability not tagged by SNPs)
//! 3. Shared environment (constant within a family)
//! 4. Unique environment (independent per sibling)
//!
//! Each genetic component with population variance `v` is split into a
//! family-level draw with variance `relatedness * v` and a per-sibling
//! segregation draw with variance `(1 - relatedness) * v`, so the sibling
//! genetic correlation equals `relatedness`.

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::error::{Result, SimulationError};
use crate::params::{BetweenFamilyTrait, ClinicalCondition, ContinuousTrait};

pub const FULL_SIBLINGS: f64 = 0.5;
pub const MZ_TWINS: f64 = 1.0;
pub const UNRELATED: f64 = 0.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sibling {
    pub snp_value: f64,
    /// SNP-tagged plus residual genetic value.
    pub genetic_value: f64,
    pub liability: f64,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FamilyModel {
    pub relatedness: f64,
    pub snp_variance: f64,
    pub residual_genetic_variance: f64,
    pub shared_environment_variance: f64,
    pub unique_environment_variance: f64,
}

impl FamilyModel {
    pub fn new(
        relatedness: f64,
        snp_variance: f64,
        residual_genetic_variance: f64,
        shared_environment_variance: f64,
        unique_environment_variance: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&relatedness) {
            return Err(SimulationError::domain(
                "relatedness",
                relatedness,
                "must lie in [0, 1]",
            ));
        }
        for (parameter, value) in [
            ("snp_variance", snp_variance),
            ("residual_genetic_variance", residual_genetic_variance),
            ("shared_environment_variance", shared_environment_variance),
            ("unique_environment_variance", unique_environment_variance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimulationError::domain(
                    parameter,
                    value,
                    "variance components must be finite and non-negative",
                ));
            }
        }
        Ok(Self {
            relatedness,
            snp_variance,
            residual_genetic_variance,
            shared_environment_variance,
            unique_environment_variance,
        })
    }

    /// Unrelated individuals drawn from the population; all heritability is
    /// SNP heritability and the rest is unique environment.
    pub fn between_family(params: &BetweenFamilyTrait) -> Result<Self> {
        Self::new(
            UNRELATED,
            params.heritability,
            0.0,
            0.0,
            1.0 - params.heritability,
        )
    }

    /// Full-sibling embryos for a continuous trait. The phenotype is the
    /// genetic value; environment carries no selection signal.
    pub fn within_family_continuous(params: &ContinuousTrait) -> Result<Self> {
        Self::new(
            FULL_SIBLINGS,
            params.heritability_snp,
            params.heritability_broad - params.heritability_snp,
            0.0,
            0.0,
        )
    }

    /// Full-sibling embryos for a clinical condition. The MZ correlation in
    /// excess of heritability is shared environment.
    pub fn within_family_clinical(condition: &ClinicalCondition) -> Result<Self> {
        Self::new(
            FULL_SIBLINGS,
            condition.heritability,
            0.0,
            condition.correlation_mz - condition.heritability,
            1.0 - condition.correlation_mz,
        )
    }

    pub fn genetic_variance(&self) -> f64 {
        self.snp_variance + self.residual_genetic_variance
    }

    pub fn liability_variance(&self) -> f64 {
        self.genetic_variance() + self.shared_environment_variance + self.unique_environment_variance
    }

    /// Refills `siblings` with a fresh, independent family. Scores are left
    /// at zero for the score simulator to fill.
    pub fn draw_family(&self, siblings: &mut [Sibling], rng: &mut impl Rng) {
        let shared_sd = |v: f64| (self.relatedness * v).sqrt();
        let segregation_sd = |v: f64| ((1.0 - self.relatedness) * v).sqrt();

        let family_snp = shared_sd(self.snp_variance) * standard_normal(rng);
        let family_residual = shared_sd(self.residual_genetic_variance) * standard_normal(rng);
        let shared_environment = self.shared_environment_variance.sqrt() * standard_normal(rng);

        let snp_sd = segregation_sd(self.snp_variance);
        let residual_sd = segregation_sd(self.residual_genetic_variance);
        let unique_sd = self.unique_environment_variance.sqrt();

        for sibling in siblings.iter_mut() {
            let snp_value = family_snp + snp_sd * standard_normal(rng);
            let genetic_value = snp_value + family_residual + residual_sd * standard_normal(rng);
            let liability = genetic_value + shared_environment + unique_sd * standard_normal(rng);
            *sibling = Sibling {
                snp_value,
                genetic_value,
                liability,
                score: 0.0,
            };
        }
    }
}

pub(crate) fn standard_normal(rng: &mut impl Rng) -> f64 {
    rng.sample(StandardNormal)
}
