//! Trait Parameters
//!
//! Validated, immutable parameter records for each analysis. Every range check
//! happens here so that no sampling starts with parameters that would produce
//! an undefined threshold or a negative variance.

use serde::Deserialize;

use crate::error::{Result, SimulationError};

pub const DEFAULT_FAMILIES: usize = 1_000_000;
pub const DEFAULT_EMBRYOS: usize = 10;

pub const DEFAULT_SCALE_AMR: f64 = 1.6;
pub const DEFAULT_SCALE_EAS: f64 = 2.0;
pub const DEFAULT_SCALE_AFR: f64 = 4.5;

fn check_unit_interval(parameter: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::domain(
            parameter,
            value,
            "must lie in [0, 1]",
        ));
    }
    Ok(())
}

fn check_open_unit_interval(parameter: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(SimulationError::domain(
            parameter,
            value,
            "must lie strictly between 0 and 1",
        ));
    }
    Ok(())
}

fn check_rsquared(parameter: &str, rsquared: f64, heritability: f64) -> Result<()> {
    check_unit_interval(parameter, rsquared)?;
    if rsquared > heritability {
        return Err(SimulationError::domain(
            parameter,
            rsquared,
            format!("cannot exceed the SNP heritability ({heritability})"),
        ));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunShape {
    pub families: usize,
    pub embryos: usize,
}

impl RunShape {
    pub fn new(families: usize, embryos: usize) -> Result<Self> {
        if families == 0 {
            return Err(SimulationError::Argument(
                "at least one family must be simulated".to_string(),
            ));
        }
        if embryos == 0 {
            return Err(SimulationError::Argument(
                "each family needs at least one embryo".to_string(),
            ));
        }
        Ok(Self { families, embryos })
    }
}

impl Default for RunShape {
    fn default() -> Self {
        Self {
            families: DEFAULT_FAMILIES,
            embryos: DEFAULT_EMBRYOS,
        }
    }
}

/// Population-level ("naive") EA parameters for comparisons between families.
#[derive(Clone, Debug, PartialEq)]
pub struct BetweenFamilyTrait {
    pub name: String,
    pub heritability: f64,
    pub rsquared: f64,
    pub sd_pheno: f64,
}

impl BetweenFamilyTrait {
    pub fn new(name: &str, heritability: f64, rsquared: f64, sd_pheno: f64) -> Result<Self> {
        check_open_unit_interval("hsquared_bf", heritability)?;
        check_rsquared("bf_rsquared", rsquared, heritability)?;
        Ok(Self {
            name: name.to_string(),
            heritability,
            rsquared,
            sd_pheno,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ancestry {
    Eur,
    Amr,
    Eas,
    Afr,
}

impl Ancestry {
    pub fn all() -> Vec<Self> {
        vec![Self::Eur, Self::Amr, Self::Eas, Self::Afr]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Amr => "AMR",
            Self::Eas => "EAS",
            Self::Afr => "AFR",
        }
    }
}

/// Attenuation factors that convert a EUR R² into other ancestries' R².
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AncestryScales {
    pub amr: f64,
    pub eas: f64,
    pub afr: f64,
}

impl Default for AncestryScales {
    fn default() -> Self {
        Self {
            amr: DEFAULT_SCALE_AMR,
            eas: DEFAULT_SCALE_EAS,
            afr: DEFAULT_SCALE_AFR,
        }
    }
}

impl AncestryScales {
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("scale_AMR", self.amr),
            ("scale_EAS", self.eas),
            ("scale_AFR", self.afr),
        ] {
            if !(value.is_finite() && value >= 1.0) {
                return Err(SimulationError::domain(
                    parameter,
                    value,
                    "attenuation factors must be finite and at least 1",
                ));
            }
        }
        Ok(())
    }

    pub fn rsquared(&self, ancestry: Ancestry, eur_rsquared: f64) -> f64 {
        match ancestry {
            Ancestry::Eur => eur_rsquared,
            Ancestry::Amr => eur_rsquared / self.amr,
            Ancestry::Eas => eur_rsquared / self.eas,
            Ancestry::Afr => eur_rsquared / self.afr,
        }
    }
}

/// Continuous main trait for the within-family analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousTrait {
    pub name: String,
    pub sd_pheno: f64,
    pub heritability_broad: f64,
    pub heritability_snp: f64,
    pub attenuated_rsquared: f64,
}

impl ContinuousTrait {
    pub fn new(
        name: &str,
        sd_pheno: f64,
        heritability_broad: f64,
        heritability_snp: f64,
        attenuated_rsquared: f64,
    ) -> Result<Self> {
        check_unit_interval("heritability_broad", heritability_broad)?;
        check_unit_interval("heritability_snp", heritability_snp)?;
        if heritability_snp <= 0.0 {
            return Err(SimulationError::domain(
                "heritability_snp",
                heritability_snp,
                "must be positive",
            ));
        }
        if heritability_snp > heritability_broad {
            return Err(SimulationError::domain(
                "heritability_snp",
                heritability_snp,
                format!(
                    "SNP heritability must be less than or equal to broad-sense heritability ({heritability_broad})"
                ),
            ));
        }
        check_rsquared("attenuated_rsquared", attenuated_rsquared, heritability_snp)?;
        Ok(Self {
            name: name.to_string(),
            sd_pheno,
            heritability_broad,
            heritability_snp,
            attenuated_rsquared,
        })
    }
}

/// Binary trait genetically correlated with the continuous main trait.
#[derive(Clone, Debug, PartialEq)]
pub struct PleiotropicTrait {
    pub name: String,
    pub heritability: f64,
    pub correlation: f64,
    pub prevalence: f64,
}

impl PleiotropicTrait {
    pub fn new(name: &str, heritability: f64, correlation: f64, prevalence: f64) -> Result<Self> {
        check_unit_interval("heritability_pleio", heritability)?;
        if !(-1.0..=1.0).contains(&correlation) {
            return Err(SimulationError::domain(
                "correlation_pleio",
                correlation,
                "must lie in [-1, 1]",
            ));
        }
        check_open_unit_interval("prevalence_pleio", prevalence)?;
        Ok(Self {
            name: name.to_string(),
            heritability,
            correlation,
            prevalence,
        })
    }

    /// Builds the trait only when every field is present. A partially
    /// specified group is rejected rather than silently ignored.
    pub fn from_parts(
        name: Option<&str>,
        heritability: Option<f64>,
        correlation: Option<f64>,
        prevalence: Option<f64>,
    ) -> Result<Option<Self>> {
        match (name, heritability, correlation, prevalence) {
            (None, None, None, None) => Ok(None),
            (Some(name), Some(h), Some(r), Some(p)) => Self::new(name, h, r, p).map(Some),
            _ => Err(SimulationError::Argument(
                "pleiotropy requires all of --pleiotropic_trait, --heritability_pleio, \
                 --correlation_pleio and --prevalence_pleio"
                    .to_string(),
            )),
        }
    }
}

/// Binary clinical condition under the liability-threshold model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClinicalCondition {
    #[serde(rename = "condition")]
    pub name: String,
    pub heritability: f64,
    pub correlation_mz: f64,
    pub prevalence: f64,
    pub rsquared: f64,
}

impl ClinicalCondition {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("heritability", self.heritability)?;
        if self.heritability <= 0.0 {
            return Err(SimulationError::domain(
                "heritability",
                self.heritability,
                "must be positive",
            ));
        }
        check_unit_interval("correlation_mz", self.correlation_mz)?;
        if self.correlation_mz < self.heritability {
            return Err(SimulationError::domain(
                "correlation_mz",
                self.correlation_mz,
                format!(
                    "MZ correlation for {} must be at least its heritability ({})",
                    self.name, self.heritability
                ),
            ));
        }
        check_open_unit_interval("prevalence", self.prevalence)?;
        check_rsquared("rsquared", self.rsquared, self.heritability)?;
        Ok(())
    }
}

/// Zips positionally aligned per-condition lists into records. Lengths are
/// compared before anything else so a mismatch never reaches the sampler.
pub fn conditions_from_columns(
    names: &[String],
    heritability: &[f64],
    correlation_mz: &[f64],
    prevalence: &[f64],
    rsquared: &[f64],
) -> Result<Vec<ClinicalCondition>> {
    let expected = names.len();
    let lengths = [
        ("heritability", heritability.len()),
        ("correlation_mz", correlation_mz.len()),
        ("prevalence", prevalence.len()),
        ("rsquared", rsquared.len()),
    ];
    if let Some((flag, found)) = lengths.iter().find(|(_, len)| *len != expected) {
        return Err(SimulationError::Argument(format!(
            "--{flag} has {found} values but --condition has {expected}; lists must be the same length"
        )));
    }
    if expected == 0 {
        return Err(SimulationError::Argument(
            "at least one condition is required".to_string(),
        ));
    }

    let conditions: Vec<ClinicalCondition> = (0..expected)
        .map(|i| ClinicalCondition {
            name: names[i].clone(),
            heritability: heritability[i],
            correlation_mz: correlation_mz[i],
            prevalence: prevalence[i],
            rsquared: rsquared[i],
        })
        .collect();

    for condition in &conditions {
        condition.validate()?;
    }
    Ok(conditions)
}

/// Reads one condition per record from a CSV table with the columns
/// `condition,heritability,correlation_mz,prevalence,rsquared`.
pub fn conditions_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ClinicalCondition>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut conditions = Vec::new();
    for record in csv_reader.deserialize() {
        let condition: ClinicalCondition = record?;
        condition.validate()?;
        conditions.push(condition);
    }
    if conditions.is_empty() {
        return Err(SimulationError::Argument(
            "the conditions table contains no records".to_string(),
        ));
    }
    Ok(conditions)
}
