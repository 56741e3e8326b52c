//! Exhaustive enumeration of states and legal actions
//!
//! The state space is built once at construction and never mutated: every
//! subset of {1..N} is paired with every dice total in [2, 12], and each
//! state's legal actions are precomputed by walking the powerset of its
//! remaining numbers. For the standard N = 9 box this is 2^9 × 11 = 5632
//! states, enumerated in well under a millisecond.

use crate::error::{EngineError, Result};
use crate::state::{Action, NumberSet, State, MAX_DICE_TOTAL, MIN_DICE_TOTAL, NUM_DICE_TOTALS};
use itertools::Itertools;

/// Immutable index of all reachable states and their legal actions.
///
/// States live in a flat `Vec` in a stable order (subset bitmask major, dice
/// total minor), so a state's position is `mask * 11 + (total - 2)` and the
/// action lists sit in a parallel `Vec` indexed the same way.
#[derive(Debug, Clone)]
pub struct StateSpace {
    total_numbers: u8,
    full_set: NumberSet,
    states: Vec<State>,
    actions: Vec<Vec<Action>>,
}

impl StateSpace {
    /// Enumerate the state space for a box with numbers 1..=`total_numbers`.
    ///
    /// Fails fast with [`EngineError::InvalidGameSize`] when the size is 0
    /// or exceeds [`NumberSet::MAX_NUMBERS`].
    pub fn new(total_numbers: u8) -> Result<Self> {
        if total_numbers == 0 || total_numbers > NumberSet::MAX_NUMBERS {
            return Err(EngineError::InvalidGameSize { got: total_numbers });
        }

        let subset_count = 1usize << total_numbers;
        let mut states = Vec::with_capacity(subset_count * NUM_DICE_TOTALS);
        for mask in 0..subset_count {
            let remaining = NumberSet::from_mask(mask as u16);
            for total in MIN_DICE_TOTAL..=MAX_DICE_TOTAL {
                states.push(State::new(remaining, total));
            }
        }

        // For each subset, every sub-subset whose sum lands in [2, 12] is a
        // legal action of the state keyed by (subset, that sum). The empty
        // sub-subset sums to 0 and is filtered out here.
        let mut actions = vec![Vec::new(); states.len()];
        for mask in 0..subset_count {
            let remaining = NumberSet::from_mask(mask as u16);
            for subset in remaining.iter().powerset() {
                let picked: NumberSet = subset.into_iter().collect();
                let sum = picked.sum();
                if sum >= MIN_DICE_TOTAL as u32 && sum <= MAX_DICE_TOTAL as u32 {
                    actions[Self::position(mask as u16, sum as u8)].push(Action::new(picked));
                }
            }
        }

        Ok(StateSpace {
            total_numbers,
            full_set: NumberSet::full(total_numbers),
            states,
            actions,
        })
    }

    /// Position of the (mask, total) state in the flat storage.
    fn position(mask: u16, total: u8) -> usize {
        mask as usize * NUM_DICE_TOTALS + (total - MIN_DICE_TOTAL) as usize
    }

    /// Game size N.
    pub fn total_numbers(&self) -> u8 {
        self.total_numbers
    }

    /// The full set {1..N} (the remaining set at the start of a round).
    pub fn full_set(&self) -> NumberSet {
        self.full_set
    }

    /// All states, in an order that is stable across calls and across
    /// constructions with the same game size.
    pub fn all_states(&self) -> &[State] {
        &self.states
    }

    /// Number of enumerated states (2^N × 11).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the space is empty (never true for a valid game size).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Position of a state in [`all_states`](Self::all_states), or
    /// [`EngineError::StateNotFound`] if its remaining set is not a subset
    /// of {1..N}.
    pub fn index_of(&self, state: &State) -> Result<usize> {
        if !state.remaining().is_subset_of(self.full_set) {
            return Err(EngineError::StateNotFound(*state));
        }
        Ok(Self::position(state.remaining().mask(), state.dice_total()))
    }

    /// Legal actions of a state. An empty slice means giving up is the only
    /// option; it is never an error.
    pub fn legal_actions(&self, state: &State) -> Result<&[Action]> {
        Ok(&self.actions[self.index_of(state)?])
    }

    /// Legal actions by state position. The position must come from
    /// [`index_of`](Self::index_of) or an enumeration of
    /// [`all_states`](Self::all_states).
    pub(crate) fn actions_at(&self, index: usize) -> &[Action] {
        &self.actions[index]
    }

    /// Score for ending the round with the given numbers still open:
    /// N(N+1)/2 − sum(remaining). Zero exactly when the full set remains,
    /// N(N+1)/2 when the box is shut.
    pub fn give_up_reward(&self, remaining: NumberSet) -> f64 {
        let c = self.total_numbers as u32;
        f64::from(c * (c + 1) / 2) - f64::from(remaining.sum())
    }
}
