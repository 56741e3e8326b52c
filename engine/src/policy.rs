//! Optimal-action extraction from a converged utility table

use crate::error::Result;
use crate::solver::{action_value, UpdateRule, UtilityTable, ValueIterationSolver};
use crate::space::StateSpace;
use crate::state::{Action, State};
use crate::transition::TransitionModel;

/// Tolerance for treating two action values as tied. Exact float equality
/// would split genuine ties on round-off; 1e-9 is far below any real utility
/// gap in this integer-reward game.
pub const TIE_EPSILON: f64 = 1e-9;

/// Pure reader over a converged [`UtilityTable`].
///
/// Scores actions with the same formula the solver used (rule and discount
/// are taken from the solver), so the returned policy is consistent with the
/// converged utilities by construction.
pub struct PolicyExtractor<'a> {
    space: &'a StateSpace,
    model: &'a TransitionModel,
    utilities: &'a UtilityTable,
    rule: UpdateRule,
    discount: f64,
}

impl<'a> PolicyExtractor<'a> {
    pub fn new(
        space: &'a StateSpace,
        model: &'a TransitionModel,
        utilities: &'a UtilityTable,
        solver: &ValueIterationSolver,
    ) -> Self {
        PolicyExtractor {
            space,
            model,
            utilities,
            rule: solver.rule(),
            discount: solver.discount(),
        }
    }

    /// All actions tied for the maximal value at `state`, within
    /// [`TIE_EPSILON`].
    ///
    /// An empty result means the state has no legal actions and the caller
    /// must give up. Fails with `StateNotFound` for states outside the
    /// enumerated space.
    pub fn policy(&self, state: &State) -> Result<Vec<Action>> {
        let actions = self.space.legal_actions(state)?;
        if actions.is_empty() {
            return Ok(Vec::new());
        }
        let scored: Vec<(Action, f64)> = actions
            .iter()
            .map(|&a| {
                let v = action_value(
                    self.space,
                    self.model,
                    self.utilities.values(),
                    self.rule,
                    self.discount,
                    state.remaining(),
                    a,
                );
                (a, v)
            })
            .collect();
        let best = scored
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        Ok(scored
            .into_iter()
            .filter(|&(_, v)| best - v <= TIE_EPSILON)
            .map(|(a, _)| a)
            .collect())
    }

    /// Converged utility of `state`.
    pub fn utility(&self, state: &State) -> Result<f64> {
        self.utilities.utility(self.space, state)
    }
}
