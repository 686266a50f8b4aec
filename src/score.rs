//! Polygenic Score Simulator
//!
//! A score is a noisy, standardized observation of a sibling's SNP-tagged
//! genetic value:
//!
//! ```text
//! score = rho * snp / sd_snp + sqrt(1 - rho^2) * noise,   rho = sqrt(r2 / h2_snp)
//! ```
//!
//! Because `Corr(snp, liability) = sd_snp`, this gives
//! `Corr(score, liability) = sqrt(r2)`. Up to a positive rescaling it is the
//! same predictor as `ghat = g + N(0, h2^2 / r2 - h2)`, but it stays defined
//! when `r2 = 0` (pure noise).

use rand::prelude::*;

use crate::error::{Result, SimulationError};
use crate::family::{standard_normal, Sibling};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreModel {
    /// Correlation between the score and the SNP-tagged genetic value.
    signal_correlation: f64,
    snp_sd: f64,
}

impl ScoreModel {
    pub fn new(rsquared: f64, snp_variance: f64) -> Result<Self> {
        if !(snp_variance.is_finite() && snp_variance > 0.0) {
            return Err(SimulationError::domain(
                "snp_variance",
                snp_variance,
                "a polygenic score needs positive SNP heritability",
            ));
        }
        if !(0.0..=snp_variance).contains(&rsquared) {
            return Err(SimulationError::domain(
                "rsquared",
                rsquared,
                format!("must lie in [0, {snp_variance}]"),
            ));
        }
        Ok(Self {
            signal_correlation: (rsquared / snp_variance).sqrt(),
            snp_sd: snp_variance.sqrt(),
        })
    }

    /// Population correlation between the score and a unit-variance liability.
    pub fn liability_correlation(&self) -> f64 {
        self.signal_correlation * self.snp_sd
    }

    pub fn draw(&self, snp_value: f64, rng: &mut impl Rng) -> f64 {
        let rho = self.signal_correlation;
        let noise_weight = (1.0 - rho * rho).max(0.0).sqrt();
        let noise = if noise_weight > 0.0 {
            standard_normal(rng)
        } else {
            0.0
        };
        rho * snp_value / self.snp_sd + noise_weight * noise
    }

    pub fn assign(&self, siblings: &mut [Sibling], rng: &mut impl Rng) {
        for sibling in siblings.iter_mut() {
            sibling.score = self.draw(sibling.snp_value, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{FamilyModel, UNRELATED};
    use approx::assert_abs_diff_eq;

    fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len() as f64;
        let mx = xs.iter().sum::<f64>() / n;
        let my = ys.iter().sum::<f64>() / n;
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            sxx += (x - mx) * (x - mx);
            syy += (y - my) * (y - my);
            sxy += (x - mx) * (y - my);
        }
        sxy / (sxx * syy).sqrt()
    }

    #[test]
    fn test_score_liability_correlation_matches_rsquared() {
        let h2 = 0.4;
        let model = FamilyModel::new(UNRELATED, h2, 0.0, 0.0, 1.0 - h2).unwrap();
        for (seed, r2) in [(21_u64, 0.05), (22, 0.2), (23, 0.4)] {
            let scores = ScoreModel::new(r2, h2).unwrap();
            assert_abs_diff_eq!(scores.liability_correlation(), f64::sqrt(r2), epsilon = 1e-12);

            let mut rng = StdRng::seed_from_u64(seed);
            let mut one = [Sibling::default()];
            let mut score = Vec::with_capacity(100_000);
            let mut liability = Vec::with_capacity(100_000);
            for _ in 0..100_000 {
                model.draw_family(&mut one, &mut rng);
                scores.assign(&mut one, &mut rng);
                score.push(one[0].score);
                liability.push(one[0].liability);
            }
            assert_abs_diff_eq!(correlation(&score, &liability), r2.sqrt(), epsilon = 0.015);
        }
    }

    #[test]
    fn test_full_rsquared_gives_noiseless_score() {
        let scores = ScoreModel::new(0.25, 0.25).unwrap();
        let mut rng = StdRng::seed_from_u64(24);
        assert_abs_diff_eq!(scores.draw(0.3, &mut rng), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_rsquared_above_heritability_is_rejected() {
        assert!(ScoreModel::new(0.3, 0.2).is_err());
        assert!(ScoreModel::new(-0.01, 0.2).is_err());
        assert!(ScoreModel::new(0.1, 0.0).is_err());
        assert!(ScoreModel::new(0.0, 0.2).is_ok());
    }
}
