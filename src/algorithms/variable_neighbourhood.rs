//! [`VariableNeighbourhoodSearch`]: escalating "shake, then descend" perturbation over a
//! prioritised list of neighbourhoods.

use std::sync::Arc;

use crate::error::{ConfigurationError, SearchException};
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// Owns a prioritised list of "shake" neighbourhoods `N_0, ..., N_{k-1}` and an embedded local
/// search (typically [`SteepestDescent`][super::steepest_descent::SteepestDescent]).
///
/// At each step, starting from the current shake level `l`:
/// 1. Shake: draw `l + 1` random moves from `N_l` and apply them in sequence to a copy of the
///    current solution (a larger, more disruptive perturbation at higher levels).
/// 2. Descend: run the embedded local search from the shaken solution to its own local optimum
///    (repeated `step` calls on the same [`SearchCore`] until it signals
///    [`StepOutcome::Stop`]).
/// 3. If the result strictly improves on the pre-shake solution, keep it and reset `l = 0`;
///    otherwise revert to the pre-shake solution and advance `l` (wrapping to `0` once
///    `l >= k`).
///
/// Never stops on its own; run under an external stop criterion.
pub struct VariableNeighbourhoodSearch<S, D> {
    shake_neighbourhoods: Vec<Arc<dyn Neighbourhood<S>>>,
    local_search: Box<dyn SearchStep<S, D>>,
    level: usize,
}

impl<S: Clone + Send + Sync + 'static, D: Send + Sync + 'static> VariableNeighbourhoodSearch<S, D> {
    /// Builds a `VariableNeighbourhoodSearch` over a non-empty, priority-ordered list of shake
    /// neighbourhoods and an embedded `local_search`.
    pub fn new(
        shake_neighbourhoods: Vec<Arc<dyn Neighbourhood<S>>>,
        local_search: Box<dyn SearchStep<S, D>>,
    ) -> Result<Self, ConfigurationError> {
        if shake_neighbourhoods.is_empty() {
            return Err(ConfigurationError::Invalid(
                "VariableNeighbourhoodSearch requires at least one shake neighbourhood".to_string(),
            ));
        }
        Ok(VariableNeighbourhoodSearch {
            shake_neighbourhoods,
            local_search,
            level: 0,
        })
    }

    /// The current shake level (`0`-indexed into the neighbourhood list).
    pub fn level(&self) -> usize {
        self.level
    }

    fn shake(&mut self, core: &mut SearchCore<S, D>) {
        let neighbourhood = &self.shake_neighbourhoods[self.level % self.shake_neighbourhoods.len()];
        let mut solution = core
            .current()
            .expect("VariableNeighbourhoodSearch::step requires a current solution")
            .solution()
            .clone();
        for _ in 0..=self.level {
            match neighbourhood.random_move(&solution, core.rng()) {
                Some(mov) => mov.apply(&mut solution),
                None => break,
            }
        }
        core.update_current_solution(solution);
    }
}

impl<S, D> SearchStep<S, D> for VariableNeighbourhoodSearch<S, D>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
{
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let minimizing = core.problem().is_minimizing();
        let pre_shake = core
            .current()
            .expect("VariableNeighbourhoodSearch::step requires a current solution")
            .solution()
            .clone();
        let pre_shake_value = core
            .current()
            .expect("VariableNeighbourhoodSearch::step requires a current solution")
            .evaluation()
            .value(minimizing);

        self.shake(core);
        loop {
            match self.local_search.step(core)? {
                StepOutcome::Continue => continue,
                StepOutcome::Stop => break,
            }
        }

        let descended = core.current().expect("embedded local search must leave a current solution");
        let descended_value = descended.evaluation().value(minimizing);
        let improved = descended.is_valid()
            && if minimizing {
                descended_value < pre_shake_value
            } else {
                descended_value > pre_shake_value
            };

        if improved {
            self.level = 0;
        } else {
            core.update_current_solution(pre_shake);
            self.level = (self.level + 1) % self.shake_neighbourhoods.len();
        }

        Ok(StepOutcome::Continue)
    }
}
