//! Stochastic transitions between states
//!
//! Taking an action removes its numbers from the remaining set; the next
//! dice total is then drawn from the fixed two-dice distribution. The model
//! is pure: no side effects, and the distribution is computed once.

use crate::dice::DiceDistribution;
use crate::error::{EngineError, Result};
use crate::state::{Action, NumberSet, State};

/// Produces the distribution over next states for a (remaining, action) pair.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    dist: DiceDistribution,
}

impl TransitionModel {
    pub fn new() -> Self {
        TransitionModel {
            dist: DiceDistribution::new(),
        }
    }

    /// The underlying dice-total distribution.
    pub fn distribution(&self) -> &DiceDistribution {
        &self.dist
    }

    /// All possible next states with their probabilities, after taking
    /// `action` from `remaining`.
    ///
    /// Always exactly 11 entries (one per dice total 2..=12), each with a
    /// positive probability, summing to 1. Fails with
    /// [`EngineError::IllegalAction`] if the action references numbers not
    /// present in `remaining`.
    pub fn next_states(&self, remaining: NumberSet, action: Action) -> Result<Vec<(State, f64)>> {
        if !action.numbers().is_subset_of(remaining) {
            return Err(EngineError::IllegalAction { action, remaining });
        }
        Ok(self.successors(remaining, action).collect())
    }

    /// Unchecked fan-out for callers holding actions drawn from the state
    /// space, where legality is established at construction.
    pub(crate) fn successors(
        &self,
        remaining: NumberSet,
        action: Action,
    ) -> impl Iterator<Item = (State, f64)> + '_ {
        let next = remaining.difference(action.numbers());
        self.dist
            .outcomes()
            .map(move |(total, prob)| (State::new(next, total), prob))
    }
}

impl Default for TransitionModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_entries_summing_to_one() {
        let model = TransitionModel::new();
        let remaining: NumberSet = [1, 2, 3, 4, 5, 6, 7, 8, 9].into_iter().collect();
        let action = Action::new([1, 2].into_iter().collect());
        let next = model.next_states(remaining, action).unwrap();
        assert_eq!(next.len(), 11);
        let total: f64 = next.iter().map(|&(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_action_numbers_are_removed() {
        let model = TransitionModel::new();
        let remaining: NumberSet = [1, 3, 5, 7].into_iter().collect();
        let action = Action::new([3, 5].into_iter().collect());
        let expected: NumberSet = [1, 7].into_iter().collect();
        for (state, _) in model.next_states(remaining, action).unwrap() {
            assert_eq!(state.remaining(), expected);
        }
    }

    #[test]
    fn test_next_totals_cover_two_through_twelve() {
        let model = TransitionModel::new();
        let remaining: NumberSet = [4, 8].into_iter().collect();
        let action = Action::new([4, 8].into_iter().collect());
        let totals: Vec<u8> = model
            .next_states(remaining, action)
            .unwrap()
            .iter()
            .map(|&(s, _)| s.dice_total())
            .collect();
        assert_eq!(totals, (2..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let model = TransitionModel::new();
        let remaining: NumberSet = [1, 2].into_iter().collect();
        let action = Action::new([3].into_iter().collect());
        assert_eq!(
            model.next_states(remaining, action).unwrap_err(),
            EngineError::IllegalAction { action, remaining }
        );
    }
}
