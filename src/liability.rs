//! Liability-Threshold Trait Realization
//!
//! Maps a latent liability to the phenotype that is actually observed.
//!
//! ## Scales
//! - Continuous: phenotype = `sd * liability` (e.g. years of education)
//! - Binary: affected iff `liability > Φ⁻¹(1 - prevalence)`
//!
//! The threshold is computed once per trait and reused for every family in a
//! run, so case rates from different selection rules are comparable.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, SimulationError};

/// Liability cutoff `t` such that `P(L > t) = prevalence` for `L ~ N(0, 1)`.
pub fn liability_threshold(prevalence: f64) -> Result<f64> {
    if !(prevalence > 0.0 && prevalence < 1.0) {
        return Err(SimulationError::domain(
            "prevalence",
            prevalence,
            "must lie strictly between 0 and 1",
        ));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|err| SimulationError::Distribution(err.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - prevalence))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraitScale {
    Continuous { sd: f64 },
    Binary { threshold: f64 },
}

impl TraitScale {
    pub fn continuous(sd: f64) -> Result<Self> {
        if !(sd.is_finite() && sd > 0.0) {
            return Err(SimulationError::domain(
                "sd_pheno",
                sd,
                "must be a positive finite number",
            ));
        }
        Ok(Self::Continuous { sd })
    }

    pub fn binary(prevalence: f64) -> Result<Self> {
        let threshold = liability_threshold(prevalence)?;
        Ok(Self::Binary { threshold })
    }

    /// Observed phenotype for a liability. Binary traits yield 1.0 for cases
    /// and 0.0 for controls so that means read as case rates.
    pub fn realize(&self, liability: f64) -> f64 {
        match *self {
            Self::Continuous { sd } => sd * liability,
            Self::Binary { threshold } => {
                if liability > threshold {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Continuous { .. } => "continuous",
            Self::Binary { .. } => "binary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    #[test]
    fn test_threshold_matches_known_quantiles() {
        assert_abs_diff_eq!(liability_threshold(0.5).unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(liability_threshold(0.025).unwrap(), 1.959964, epsilon = 1e-5);
        assert_abs_diff_eq!(liability_threshold(0.1).unwrap(), 1.281552, epsilon = 1e-5);
    }

    #[test]
    fn test_threshold_rejects_degenerate_prevalence() {
        for p in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                liability_threshold(p),
                Err(SimulationError::NumericDomain { .. })
            ));
        }
    }

    #[test]
    fn test_empirical_case_rate_matches_prevalence() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 200_000;
        for prevalence in [0.01, 0.05, 0.3] {
            let scale = TraitScale::binary(prevalence).unwrap();
            let cases: f64 = (0..n)
                .map(|_| scale.realize(rng.sample::<f64, _>(StandardNormal)))
                .sum();
            assert_abs_diff_eq!(cases / n as f64, prevalence, epsilon = 0.01);
        }
    }

    #[test]
    fn test_continuous_scale_is_linear() {
        let scale = TraitScale::continuous(3.2).unwrap();
        assert_abs_diff_eq!(scale.realize(0.5), 1.6, epsilon = 1e-12);
        assert!(!scale.is_binary());
        assert!(TraitScale::continuous(0.0).is_err());
    }
}
