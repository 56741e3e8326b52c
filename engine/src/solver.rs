//! Value iteration over the enumerated state space
//!
//! Jacobi-style sweeps: every state's new value is computed from a snapshot
//! of the previous table, so the per-state loop is embarrassingly parallel
//! and runs under Rayon. Writes target disjoint cells of the new table and
//! all reads hit the snapshot, making the parallel sweep observationally
//! identical to the serial one.
//!
//! Two per-action scoring rules are provided (see [`UpdateRule`]); both are
//! acyclic in the remaining set (every action strictly shrinks it), so the
//! undiscounted iteration reaches its fixed point in at most N + 1 sweeps.

use crate::error::Result;
use crate::space::StateSpace;
use crate::state::{Action, NumberSet, State};
use crate::transition::TransitionModel;
use rayon::prelude::*;

/// Convergence tolerance: iteration stops once the largest per-state change
/// in one sweep falls below this.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// How a legal action is scored during a backup, with `R` the state's
/// remaining set, `a` the action and `U` the previous sweep's table.
///
/// Both rules score an action by the expected utility of the 11 successor
/// states; they differ in where the give-up score enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// `candidate(a) = give_up(R) + γ · Σ_t P(t) · U[(R∖a, t)]`.
    ///
    /// Folds the current state's give-up score into every action as if that
    /// reward were collected immediately, so utilities are inflated by the
    /// accumulated give-up terms along action paths. Within a single backup
    /// the candidates differ from [`UpdateRule::Bellman`] only by the
    /// per-state constant `give_up(R)`, but the converged tables diverge,
    /// so policies extracted under the two rules are not interchangeable.
    RewardAdditive,
    /// `candidate(a) = γ · Σ_t P(t) · U[(R∖a, t)]`, with the give-up score
    /// competing in the outer max. The standard expected-utility backup:
    /// the round's score is collected exactly once, when play stops.
    #[default]
    Bellman,
}

/// Converged utilities, one `f64` per state in the space's stable order.
///
/// Written only by [`ValueIterationSolver::solve`]; read-only afterwards.
#[derive(Debug, Clone)]
pub struct UtilityTable {
    values: Vec<f64>,
}

impl UtilityTable {
    /// All utilities, positionally parallel to `StateSpace::all_states`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Utility by state position.
    pub fn value_at(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Utility of a state, resolved through the space the table was built
    /// for. Fails with `StateNotFound` for states outside the space.
    ///
    /// Contract: `space` must be the space this table was solved against;
    /// pairing a table with a foreign space is a caller bug.
    pub fn utility(&self, space: &StateSpace, state: &State) -> Result<f64> {
        debug_assert_eq!(
            self.values.len(),
            space.len(),
            "utility table and state space sizes differ"
        );
        Ok(self.values[space.index_of(state)?])
    }

    /// Table with externally supplied values, for tests that need full
    /// control over action scores.
    #[cfg(test)]
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        UtilityTable { values }
    }
}

/// Score one action against a utility table.
///
/// Shared by the solver's backup and the policy extractor so that extracted
/// policies are consistent with the converged utilities by construction.
pub(crate) fn action_value(
    space: &StateSpace,
    model: &TransitionModel,
    values: &[f64],
    rule: UpdateRule,
    discount: f64,
    remaining: NumberSet,
    action: Action,
) -> f64 {
    let expected: f64 = model
        .successors(remaining, action)
        .map(|(next, prob)| {
            let j = space
                .index_of(&next)
                .expect("successor state missing from state space");
            prob * values[j]
        })
        .sum();
    match rule {
        UpdateRule::RewardAdditive => space.give_up_reward(remaining) + discount * expected,
        UpdateRule::Bellman => discount * expected,
    }
}

/// Synchronous value-iteration solver.
///
/// The game is finite-horizon, so the discount factor is fixed at 1.0.
pub struct ValueIterationSolver {
    epsilon: f64,
    discount: f64,
    rule: UpdateRule,
}

impl ValueIterationSolver {
    /// Solver with the default tolerance and the [`UpdateRule::Bellman`]
    /// backup.
    pub fn new() -> Self {
        Self::with_rule(UpdateRule::default())
    }

    /// Solver with an explicit scoring rule.
    pub fn with_rule(rule: UpdateRule) -> Self {
        ValueIterationSolver {
            epsilon: DEFAULT_EPSILON,
            discount: 1.0,
            rule,
        }
    }

    /// Convergence tolerance the solve loop stops at.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Discount factor applied to continuation values (fixed at 1.0).
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Scoring rule used for every backup.
    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Iterate to convergence and return the utility table.
    ///
    /// Starts from an all-zero table and sweeps until the maximum per-state
    /// change drops below epsilon. Guaranteed to terminate: both update
    /// rules recurse only into strictly smaller remaining sets.
    pub fn solve(&self, space: &StateSpace, model: &TransitionModel) -> UtilityTable {
        let mut values = vec![0.0_f64; space.len()];
        loop {
            let next = self.sweep(space, model, &values);
            let delta = next
                .iter()
                .zip(values.iter())
                .map(|(n, o)| (n - o).abs())
                .fold(0.0_f64, f64::max);
            values = next;
            if delta < self.epsilon {
                break;
            }
        }
        UtilityTable { values }
    }

    /// One Jacobi sweep: every state's new value from the previous snapshot.
    fn sweep(&self, space: &StateSpace, model: &TransitionModel, prev: &[f64]) -> Vec<f64> {
        (0..prev.len())
            .into_par_iter()
            .map(|i| self.backup(space, model, prev, i))
            .collect()
    }

    /// New value for the state at `index`.
    fn backup(&self, space: &StateSpace, model: &TransitionModel, prev: &[f64], index: usize) -> f64 {
        let state = space.all_states()[index];
        let give_up = space.give_up_reward(state.remaining());
        let actions = space.actions_at(index);
        if actions.is_empty() {
            return give_up;
        }
        let best = actions
            .iter()
            .map(|&a| {
                action_value(
                    space,
                    model,
                    prev,
                    self.rule,
                    self.discount,
                    state.remaining(),
                    a,
                )
            })
            .fold(f64::NEG_INFINITY, f64::max);
        match self.rule {
            UpdateRule::RewardAdditive => best,
            UpdateRule::Bellman => give_up.max(best),
        }
    }
}

impl Default for ValueIterationSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn solve_two_number_box(rule: UpdateRule) -> (StateSpace, TransitionModel, UtilityTable) {
        let space = StateSpace::new(2).unwrap();
        let model = TransitionModel::new();
        let table = ValueIterationSolver::with_rule(rule).solve(&space, &model);
        (space, model, table)
    }

    fn utility(space: &StateSpace, table: &UtilityTable, numbers: &[u8], total: u8) -> f64 {
        let state = State::new(numbers.iter().copied().collect(), total);
        table.utility(space, &state).unwrap()
    }

    // Hand-checked fixed point for the 2-number box, Bellman rule:
    //   {} has no actions anywhere        → U = give_up = 3
    //   {1} has no actions (1 < 2)        → U = give_up = 2
    //   {2} at total 2 can clear the 2    → U = Σ P(t)·U({}, t) = 3
    //   {1,2} at total 2 clears the 2     → U = Σ P(t)·U({1}, t) = 2
    //   {1,2} at total 3 clears both      → U = Σ P(t)·U({}, t) = 3
    #[test]
    fn test_two_number_box_bellman_fixed_point() {
        let (space, _, table) = solve_two_number_box(UpdateRule::Bellman);
        assert_approx_eq!(utility(&space, &table, &[], 7), 3.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1], 7), 2.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[2], 2), 3.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[2], 5), 1.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1, 2], 2), 2.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1, 2], 3), 3.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1, 2], 7), 0.0, 1e-9);
    }

    // Same box under the reward-additive rule: action states additionally
    // collect their own give-up score, so {2} at total 2 gains its give-up
    // of 1 on top of the continuation value.
    #[test]
    fn test_two_number_box_reward_additive_fixed_point() {
        let (space, _, table) = solve_two_number_box(UpdateRule::RewardAdditive);
        assert_approx_eq!(utility(&space, &table, &[2], 2), 4.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1, 2], 2), 2.0, 1e-9);
        assert_approx_eq!(utility(&space, &table, &[1, 2], 3), 3.0, 1e-9);
        // actionless states keep the plain give-up score
        assert_approx_eq!(utility(&space, &table, &[1], 7), 2.0, 1e-9);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let space = StateSpace::new(6).unwrap();
        let model = TransitionModel::new();
        let solver = ValueIterationSolver::new();
        let a = solver.solve(&space, &model);
        let b = solver.solve(&space, &model);
        for (x, y) in a.values().iter().zip(b.values().iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_converged_table_is_idempotent() {
        let space = StateSpace::new(9).unwrap();
        let model = TransitionModel::new();
        let solver = ValueIterationSolver::new();
        let table = solver.solve(&space, &model);
        let once_more = solver.sweep(&space, &model, table.values());
        let delta = once_more
            .iter()
            .zip(table.values().iter())
            .map(|(n, o)| (n - o).abs())
            .fold(0.0_f64, f64::max);
        assert!(delta < solver.epsilon(), "post-convergence delta {}", delta);
    }

    #[test]
    fn test_bellman_utilities_dominate_give_up() {
        // Giving up is always available, so no state is worth less than its
        // give-up score; and nothing can beat shutting the whole box.
        let space = StateSpace::new(9).unwrap();
        let model = TransitionModel::new();
        let table = ValueIterationSolver::new().solve(&space, &model);
        let max_score = space.give_up_reward(NumberSet::empty());
        for (i, state) in space.all_states().iter().enumerate() {
            let u = table.value_at(i);
            assert!(u.is_finite());
            assert!(u >= space.give_up_reward(state.remaining()) - 1e-9);
            assert!(u <= max_score + 1e-9);
        }
    }

    #[test]
    #[should_panic]
    fn test_table_paired_with_foreign_space_is_rejected() {
        let small = StateSpace::new(2).unwrap();
        let model = TransitionModel::new();
        let table = ValueIterationSolver::new().solve(&small, &model);
        let large = StateSpace::new(3).unwrap();
        let state = State::new(large.full_set(), 12);
        let _ = table.utility(&large, &state);
    }

    #[test]
    fn test_partial_box_has_finite_utility() {
        let space = StateSpace::new(9).unwrap();
        let model = TransitionModel::new();
        let table = ValueIterationSolver::new().solve(&space, &model);
        let u = utility(&space, &table, &[1, 3, 5, 6, 7, 8, 9], 12);
        assert!(u.is_finite());
        assert!(u > 0.0);
    }
}
