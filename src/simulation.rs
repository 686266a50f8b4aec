//! Embryo Selection Simulation
//!
//! Runs many independent families through one pass of:
//! 1. Draw latent sibling components (family generator)
//! 2. Draw a polygenic score for every sibling
//! 3. Select by score and pick a random sibling as the counterfactual
//! 4. Realize both phenotypes and accumulate selected, random, and difference
//!
//! ## Analyses
//! - Between-family EA: unrelated individuals, naive heritability and R²
//! - Within-family EA: full-sibling embryos, optional pleiotropic binary trait
//! - Within-family clinical: full-sibling embryos, liability-threshold traits

use log::debug;
use rand::prelude::*;

use crate::error::Result;
use crate::family::{FamilyModel, Sibling};
use crate::liability::TraitScale;
use crate::params::{BetweenFamilyTrait, ClinicalCondition, ContinuousTrait, PleiotropicTrait, RunShape};
use crate::pleiotropy::PleiotropyModel;
use crate::score::ScoreModel;
use crate::selection::{random_index, SelectionRule};
use crate::stats::OutcomeTally;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Analysis {
    BetweenFamily,
    WithinFamily,
    WithinFamilyClinical,
}

impl Analysis {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BetweenFamily => "between_family",
            Self::WithinFamily => "within_family",
            Self::WithinFamilyClinical => "within_family_clinical",
        }
    }
}

/// Owns the random state for a run. Every stage borrows it mutably, so a
/// fixed seed reproduces the whole run.
pub struct SimulationContext {
    rng: StdRng,
    seed: u64,
    siblings: Vec<Sibling>,
}

impl SimulationContext {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            siblings: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Everything needed to simulate one trait under one family model.
#[derive(Clone, Copy, Debug)]
pub struct SelectionScenario<'a> {
    pub family: FamilyModel,
    pub scores: ScoreModel,
    pub rule: SelectionRule,
    pub scale: TraitScale,
    pub pleiotropy: Option<&'a PleiotropyModel>,
}

#[derive(Clone, Debug, Default)]
pub struct ScenarioTallies {
    pub main: OutcomeTally,
    pub pleiotropic: Option<OutcomeTally>,
}

/// Simulates `shape.families` independent families. Families share nothing
/// but the RNG stream; the sibling buffer is overwritten each time.
pub fn simulate_families(
    ctx: &mut SimulationContext,
    shape: RunShape,
    scenario: &SelectionScenario<'_>,
) -> ScenarioTallies {
    let mut tallies = ScenarioTallies {
        main: OutcomeTally::default(),
        pleiotropic: scenario.pleiotropy.map(|_| OutcomeTally::default()),
    };

    let SimulationContext { rng, siblings, .. } = ctx;
    siblings.clear();
    siblings.resize(shape.embryos, Sibling::default());

    for _ in 0..shape.families {
        scenario.family.draw_family(siblings, rng);
        scenario.scores.assign(siblings, rng);

        let chosen = scenario.rule.select(siblings);
        let counterfactual = random_index(shape.embryos, rng);

        tallies.main.record(
            scenario.scale.realize(siblings[chosen].liability),
            scenario.scale.realize(siblings[counterfactual].liability),
        );

        if let (Some(model), Some(tally)) = (scenario.pleiotropy, tallies.pleiotropic.as_mut()) {
            let chosen_liability = model.draw_liability(siblings[chosen].genetic_value, rng);
            let counterfactual_liability = if counterfactual == chosen {
                chosen_liability
            } else {
                model.draw_liability(siblings[counterfactual].genetic_value, rng)
            };
            tally.record(
                model.scale.realize(chosen_liability),
                model.scale.realize(counterfactual_liability),
            );
        }
    }

    tallies
}

#[derive(Clone, Debug)]
pub struct SelectionResult {
    pub analysis: Analysis,
    pub trait_name: String,
    pub ancestry: String,
    pub scale: TraitScale,
    pub rule: SelectionRule,
    pub families: usize,
    pub embryos: usize,
    pub seed: u64,
    pub tally: OutcomeTally,
}

impl SelectionResult {
    /// Half-width of the 95% prediction interval for the per-family gain.
    pub fn interval_95(&self) -> f64 {
        1.96 * self.tally.difference.std_dev()
    }

    pub fn summary(&self) -> String {
        match self.scale {
            TraitScale::Continuous { .. } => format!(
                "For parents of {} ancestry, the {} 95-percent prediction interval for the difference in {} \
                 between random and selected embryos is {:.2} +/- {:.2}.",
                self.ancestry,
                self.analysis.name().replace('_', "-"),
                self.trait_name,
                self.tally.difference.mean(),
                self.interval_95(),
            ),
            TraitScale::Binary { .. } => format!(
                "For parents of {} ancestry, {} has a within-family prevalence of {:.2}% in selected embryos \
                 and {:.2}% in random embryos.",
                self.ancestry,
                self.trait_name,
                self.tally.selected.mean() * 100.0,
                self.tally.random.mean() * 100.0,
            ),
        }
    }
}

fn result(
    ctx: &SimulationContext,
    analysis: Analysis,
    trait_name: &str,
    ancestry: &str,
    scale: TraitScale,
    rule: SelectionRule,
    shape: RunShape,
    tally: OutcomeTally,
) -> SelectionResult {
    SelectionResult {
        analysis,
        trait_name: trait_name.to_string(),
        ancestry: ancestry.to_string(),
        scale,
        rule,
        families: shape.families,
        embryos: shape.embryos,
        seed: ctx.seed(),
        tally,
    }
}

pub fn run_between_family(
    ctx: &mut SimulationContext,
    shape: RunShape,
    params: &BetweenFamilyTrait,
    ancestry: &str,
) -> Result<SelectionResult> {
    let scenario = SelectionScenario {
        family: FamilyModel::between_family(params)?,
        scores: ScoreModel::new(params.rsquared, params.heritability)?,
        rule: SelectionRule::HighestScore,
        scale: TraitScale::continuous(params.sd_pheno)?,
        pleiotropy: None,
    };
    debug!(
        "{ancestry}: h2_bf={:.4}, r2={:.4}, score/liability correlation {:.4}",
        params.heritability,
        params.rsquared,
        scenario.scores.liability_correlation()
    );

    let tallies = simulate_families(ctx, shape, &scenario);
    Ok(result(
        ctx,
        Analysis::BetweenFamily,
        &params.name,
        ancestry,
        scenario.scale,
        scenario.rule,
        shape,
        tallies.main,
    ))
}

/// Returns the main-trait result, followed by the pleiotropic trait's result
/// when one is configured. Both come from the same families and selections.
pub fn run_within_family(
    ctx: &mut SimulationContext,
    shape: RunShape,
    main: &ContinuousTrait,
    ancestry: &str,
    pleiotropic: Option<&PleiotropicTrait>,
) -> Result<Vec<SelectionResult>> {
    let family = FamilyModel::within_family_continuous(main)?;
    let pleiotropy = pleiotropic
        .map(|trait_params| PleiotropyModel::new(trait_params, family.genetic_variance()))
        .transpose()?;

    let scenario = SelectionScenario {
        family,
        scores: ScoreModel::new(main.attenuated_rsquared, main.heritability_snp)?,
        rule: SelectionRule::HighestScore,
        scale: TraitScale::continuous(main.sd_pheno)?,
        pleiotropy: pleiotropy.as_ref(),
    };
    debug!(
        "{}: snp variance {:.4}, residual genetic variance {:.4}, score/liability correlation {:.4}",
        main.name,
        family.snp_variance,
        family.residual_genetic_variance,
        scenario.scores.liability_correlation()
    );

    let tallies = simulate_families(ctx, shape, &scenario);

    let mut results = vec![result(
        ctx,
        Analysis::WithinFamily,
        &main.name,
        ancestry,
        scenario.scale,
        scenario.rule,
        shape,
        tallies.main,
    )];
    if let (Some(trait_params), Some(model), Some(tally)) =
        (pleiotropic, pleiotropy.as_ref(), tallies.pleiotropic)
    {
        results.push(result(
            ctx,
            Analysis::WithinFamily,
            &trait_params.name,
            ancestry,
            model.scale,
            scenario.rule,
            shape,
            tally,
        ));
    }
    Ok(results)
}

pub fn run_clinical(
    ctx: &mut SimulationContext,
    shape: RunShape,
    condition: &ClinicalCondition,
    ancestry: &str,
) -> Result<SelectionResult> {
    condition.validate()?;
    let scenario = SelectionScenario {
        family: FamilyModel::within_family_clinical(condition)?,
        scores: ScoreModel::new(condition.rsquared, condition.heritability)?,
        rule: SelectionRule::LowestScore,
        scale: TraitScale::binary(condition.prevalence)?,
        pleiotropy: None,
    };
    if let TraitScale::Binary { threshold } = scenario.scale {
        debug!(
            "{}: liability threshold {:.4}, shared environment {:.4}",
            condition.name, threshold, scenario.family.shared_environment_variance
        );
    }

    let tallies = simulate_families(ctx, shape, &scenario);
    Ok(result(
        ctx,
        Analysis::WithinFamilyClinical,
        &condition.name,
        ancestry,
        scenario.scale,
        scenario.rule,
        shape,
        tallies.main,
    ))
}
