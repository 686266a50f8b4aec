//! Pleiotropic Companion Trait
//!
//! Selecting on one trait's score also shifts genetically correlated traits.
//! The companion trait's genetic value `p` is drawn conditionally on the main
//! trait's genetic value `a` (variance `h2_main`):
//!
//! ```text
//! p = r_g * sqrt(h2_p / h2_main) * a + sqrt(h2_p * (1 - r_g^2)) * noise
//! ```
//!
//! so `(a, p)` is bivariate normal with `Var(p) = h2_p` and `Corr(a, p) = r_g`.
//! Liability adds unique environment with variance `1 - h2_p`, and the binary
//! phenotype uses the threshold fixed by `prevalence_pleio`.

use rand::prelude::*;

use crate::error::{Result, SimulationError};
use crate::family::standard_normal;
use crate::liability::TraitScale;
use crate::params::PleiotropicTrait;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PleiotropyModel {
    slope: f64,
    genetic_noise_sd: f64,
    environment_sd: f64,
    pub scale: TraitScale,
}

impl PleiotropyModel {
    pub fn new(params: &PleiotropicTrait, main_genetic_variance: f64) -> Result<Self> {
        if !(main_genetic_variance.is_finite() && main_genetic_variance > 0.0) {
            return Err(SimulationError::domain(
                "heritability_broad",
                main_genetic_variance,
                "the main trait must be heritable to carry a pleiotropic signal",
            ));
        }
        let r_g = params.correlation;
        let h2 = params.heritability;
        Ok(Self {
            slope: r_g * (h2 / main_genetic_variance).sqrt(),
            genetic_noise_sd: (h2 * (1.0 - r_g * r_g)).sqrt(),
            environment_sd: (1.0 - h2).sqrt(),
            scale: TraitScale::binary(params.prevalence)?,
        })
    }

    pub fn draw_genetic(&self, main_genetic: f64, rng: &mut impl Rng) -> f64 {
        self.slope * main_genetic + self.genetic_noise_sd * standard_normal(rng)
    }

    pub fn draw_liability(&self, main_genetic: f64, rng: &mut impl Rng) -> f64 {
        self.draw_genetic(main_genetic, rng) + self.environment_sd * standard_normal(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_genetic_correlation_is_preserved() {
        let params = PleiotropicTrait::new("Bipolar", 0.6, -0.3, 0.01).unwrap();
        let h2_main = 0.4;
        let model = PleiotropyModel::new(&params, h2_main).unwrap();
        let mut rng = StdRng::seed_from_u64(31);

        let n = 100_000;
        let (mut saa, mut spp, mut sap) = (0.0, 0.0, 0.0);
        for _ in 0..n {
            let a = h2_main.sqrt() * standard_normal(&mut rng);
            let p = model.draw_genetic(a, &mut rng);
            saa += a * a;
            spp += p * p;
            sap += a * p;
        }
        assert_abs_diff_eq!(spp / n as f64, 0.6, epsilon = 0.02);
        assert_abs_diff_eq!(sap / (saa * spp).sqrt(), -0.3, epsilon = 0.02);
    }

    #[test]
    fn test_companion_case_rate_matches_prevalence() {
        let params = PleiotropicTrait::new("ADHD", 0.7, 0.5, 0.05).unwrap();
        let model = PleiotropyModel::new(&params, 0.4).unwrap();
        let mut rng = StdRng::seed_from_u64(32);
        let n = 200_000;
        let cases: f64 = (0..n)
            .map(|_| {
                let a = 0.4_f64.sqrt() * standard_normal(&mut rng);
                let liability = model.draw_liability(a, &mut rng);
                model.scale.realize(liability)
            })
            .sum();
        assert_abs_diff_eq!(cases / n as f64, 0.05, epsilon = 0.005);
    }
}
