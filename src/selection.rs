//! Embryo Selection Rules

use rand::prelude::*;

use crate::family::Sibling;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRule {
    /// Pick the embryo with the highest score (e.g. educational attainment).
    HighestScore,
    /// Pick the embryo with the lowest score (lowest disease risk).
    LowestScore,
}

impl SelectionRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HighestScore => "highest_score",
            Self::LowestScore => "lowest_score",
        }
    }

    /// Index of the selected sibling. Ties keep the first index.
    pub fn select(&self, siblings: &[Sibling]) -> usize {
        let mut best = 0;
        for (i, sibling) in siblings.iter().enumerate().skip(1) {
            let better = match self {
                Self::HighestScore => sibling.score > siblings[best].score,
                Self::LowestScore => sibling.score < siblings[best].score,
            };
            if better {
                best = i;
            }
        }
        best
    }
}

/// Counterfactual choice: an embryo picked uniformly at random.
pub fn random_index(embryos: usize, rng: &mut impl Rng) -> usize {
    rng.gen_range(0..embryos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_scores(scores: &[f64]) -> Vec<Sibling> {
        scores
            .iter()
            .map(|&score| Sibling {
                score,
                ..Sibling::default()
            })
            .collect()
    }

    #[test]
    fn test_highest_and_lowest_selection() {
        let siblings = with_scores(&[0.1, 1.5, -2.0, 0.7]);
        assert_eq!(SelectionRule::HighestScore.select(&siblings), 1);
        assert_eq!(SelectionRule::LowestScore.select(&siblings), 2);
    }

    #[test]
    fn test_ties_break_to_first_index() {
        let siblings = with_scores(&[0.3, 0.9, 0.9, -0.9, -0.9]);
        assert_eq!(SelectionRule::HighestScore.select(&siblings), 1);
        assert_eq!(SelectionRule::LowestScore.select(&siblings), 3);
    }

    #[test]
    fn test_single_embryo_is_always_selected() {
        let siblings = with_scores(&[4.2]);
        assert_eq!(SelectionRule::HighestScore.select(&siblings), 0);
        let mut rng = StdRng::seed_from_u64(41);
        assert_eq!(random_index(1, &mut rng), 0);
    }

    #[test]
    fn test_random_index_covers_all_embryos() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [0usize; 5];
        for _ in 0..5_000 {
            seen[random_index(5, &mut rng)] += 1;
        }
        assert!(seen.iter().all(|&count| count > 800));
    }
}
