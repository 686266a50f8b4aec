use approx::assert_abs_diff_eq;
use embryo_selection::family::{FamilyModel, Sibling, FULL_SIBLINGS};
use embryo_selection::output::write_results;
use embryo_selection::params::{
    conditions_from_columns, Ancestry, AncestryScales, BetweenFamilyTrait, ContinuousTrait,
    RunShape,
};
use embryo_selection::score::ScoreModel;
use embryo_selection::selection::SelectionRule;
use embryo_selection::simulation::{run_between_family, run_within_family, SimulationContext};
use embryo_selection::SimulationError;

// --- Helper: run the between-family analysis for every ancestry ---
fn between_family_gains(families: usize, seed: u64) -> Vec<f64> {
    let shape = RunShape::new(families, 10).unwrap();
    let scales = AncestryScales::default();
    let mut ctx = SimulationContext::new(Some(seed));
    Ancestry::all()
        .into_iter()
        .map(|ancestry| {
            let params = BetweenFamilyTrait::new(
                "Educational Attainment",
                0.2,
                scales.rsquared(ancestry, 0.1),
                3.2,
            )
            .unwrap();
            run_between_family(&mut ctx, shape, &params, ancestry.label())
                .unwrap()
                .tally
                .difference
                .mean()
        })
        .collect()
}

#[test]
fn gains_shrink_with_attenuated_rsquared() {
    let gains = between_family_gains(50_000, 101);
    // EUR > AMR > EAS > AFR because R² is divided by 1.6, 2.0 and 4.5.
    assert!(gains.iter().all(|&gain| gain > 0.0));
    assert!(gains[0] > gains[2]);
    assert!(gains[2] > gains[3]);
}

#[test]
fn between_family_gain_matches_order_statistic_expectation() {
    // E[max of 10 standard normals] ≈ 1.5388; gain = sd * sqrt(r2) * E[max].
    let gains = between_family_gains(100_000, 102);
    let expected = 3.2 * 0.1_f64.sqrt() * 1.5388;
    assert_abs_diff_eq!(gains[0], expected, epsilon = 0.06);
}

#[test]
fn within_family_gain_is_smaller_than_between_family_gain() {
    // Siblings share half their additive variance, so only part of the
    // score's spread is available within a family.
    let shape = RunShape::new(100_000, 10).unwrap();
    let mut ctx = SimulationContext::new(Some(103));
    let main = ContinuousTrait::new("Educational Attainment", 1.0, 0.2, 0.2, 0.1).unwrap();
    let results = run_within_family(&mut ctx, shape, &main, "EUR", None).unwrap();
    let within = results[0].tally.difference.mean();

    let params = BetweenFamilyTrait::new("Educational Attainment", 0.2, 0.1, 1.0).unwrap();
    let between = run_between_family(&mut ctx, shape, &params, "EUR")
        .unwrap()
        .tally
        .difference
        .mean();

    assert!(within > 0.0);
    assert!(within < between);
}

#[test]
fn perfect_score_with_two_embryos_always_picks_higher_liability() {
    let main = ContinuousTrait::new("Height", 1.0, 1.0, 1.0, 1.0).unwrap();
    let family = FamilyModel::within_family_continuous(&main).unwrap();
    let scores = ScoreModel::new(main.attenuated_rsquared, main.heritability_snp).unwrap();
    let mut ctx = SimulationContext::new(Some(104));
    let mut pair = [Sibling::default(); 2];

    for _ in 0..20_000 {
        family.draw_family(&mut pair, ctx.rng());
        scores.assign(&mut pair, ctx.rng());
        let chosen = SelectionRule::HighestScore.select(&pair);
        assert!(pair[chosen].liability > pair[1 - chosen].liability);
    }
    assert_eq!(family.relatedness, FULL_SIBLINGS);
}

#[test]
fn mismatched_lists_fail_before_simulation() {
    let names: Vec<String> = ["T2D", "CAD", "Breast Cancer"].iter().map(|s| s.to_string()).collect();
    let err = conditions_from_columns(&names, &[0.4, 0.5], &[0.5, 0.6, 0.6], &[0.1, 0.06, 0.12], &[0.05, 0.04, 0.06])
        .unwrap_err();
    assert!(matches!(err, SimulationError::Argument(_)));
}

#[test]
fn full_run_writes_one_row_per_ancestry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("between.csv");
    let shape = RunShape::new(1_000, 4).unwrap();
    let mut ctx = SimulationContext::new(Some(105));
    let results: Vec<_> = Ancestry::all()
        .into_iter()
        .map(|ancestry| {
            let params = BetweenFamilyTrait::new("Educational Attainment", 0.2, 0.05, 3.2).unwrap();
            run_between_family(&mut ctx, shape, &params, ancestry.label()).unwrap()
        })
        .collect();

    write_results(&results, Some(path.as_path())).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let ancestries: Vec<String> = reader
        .records()
        .map(|record| record.unwrap()[3].to_string())
        .collect();
    assert_eq!(ancestries, vec!["EUR", "AMR", "EAS", "AFR"]);
}
