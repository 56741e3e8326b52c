//! Probability distribution over the sum of two fair six-sided dice

use crate::state::{MAX_DICE_TOTAL, MIN_DICE_TOTAL, NUM_DICE_TOTALS};
use itertools::iproduct;

/// Fixed distribution over dice totals 2..=12, shared by every state.
///
/// Built once by counting the 36 ordered (i, j) pairs: P(total) =
/// pairs summing to total / 36. P(2) = P(12) = 1/36, P(7) = 6/36, and the
/// distribution is symmetric around 7.
#[derive(Debug, Clone)]
pub struct DiceDistribution {
    probs: [f64; NUM_DICE_TOTALS],
}

impl DiceDistribution {
    pub fn new() -> Self {
        let mut probs = [0.0_f64; NUM_DICE_TOTALS];
        for (i, j) in iproduct!(1..=6u8, 1..=6u8) {
            probs[(i + j - MIN_DICE_TOTAL) as usize] += 1.0 / 36.0;
        }
        DiceDistribution { probs }
    }

    /// Probability of the given total. The total must lie in [2, 12].
    pub fn probability(&self, total: u8) -> f64 {
        assert!(
            (MIN_DICE_TOTAL..=MAX_DICE_TOTAL).contains(&total),
            "dice total must be 2-12"
        );
        self.probs[(total - MIN_DICE_TOTAL) as usize]
    }

    /// All (total, probability) pairs in ascending total order. Always 11
    /// entries with strictly positive probabilities summing to 1.
    pub fn outcomes(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        (MIN_DICE_TOTAL..=MAX_DICE_TOTAL).map(move |t| (t, self.probability(t)))
    }
}

impl Default for DiceDistribution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let dist = DiceDistribution::new();
        let total: f64 = dist.outcomes().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_probabilities() {
        let dist = DiceDistribution::new();
        assert!((dist.probability(2) - 1.0 / 36.0).abs() < 1e-12);
        assert!((dist.probability(12) - 1.0 / 36.0).abs() < 1e-12);
        assert!((dist.probability(7) - 6.0 / 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry_around_seven() {
        let dist = DiceDistribution::new();
        for k in 2..=12u8 {
            assert!(
                (dist.probability(k) - dist.probability(14 - k)).abs() < 1e-12,
                "P({}) != P({})",
                k,
                14 - k
            );
        }
    }

    #[test]
    fn test_exactly_eleven_outcomes_all_positive() {
        let dist = DiceDistribution::new();
        let outcomes: Vec<(u8, f64)> = dist.outcomes().collect();
        assert_eq!(outcomes.len(), 11);
        assert!(outcomes.iter().all(|&(_, p)| p > 0.0));
        assert_eq!(outcomes[0].0, 2);
        assert_eq!(outcomes[10].0, 12);
    }
}
