//! [`LRSubsetSearch`]: the `(l, r)` construction heuristic for [`SubsetSolution`] — repeatedly
//! adds the `l` most promising unselected ids and drops the `r` least promising selected ids,
//! in a single combined move.

use std::sync::Arc;

use crate::error::{ConfigurationError, SearchException};
use crate::search::{SearchCore, SearchStep, StepOutcome};
use crate::subset::moves::{AdditionMove, DeletionMove, GeneralSubsetMove};
use crate::subset::SubsetSolution;

/// Starts from the empty subset (if `l > r`) or the full universe (if `r > l`) and, each step,
/// ranks every unselected id by the marginal value of adding it alone and every selected id by
/// the marginal value of dropping it alone, then commits a single [`GeneralSubsetMove`] that
/// adds the `l` best-ranked unselected ids and removes the `r` best-ranked selected ids.
///
/// `l == r` is rejected at construction: it neither grows nor shrinks the subset, so the
/// candidate ranking never changes and the search could loop forever without ever converging.
///
/// Stops once the binding side of `(l, r)` runs dry — fewer than `l` additions when growing
/// (`l > r`), or fewer than `r` deletions when shrinking (`r > l`) — or once the combined move
/// is rejected (the resulting subset would violate a mandatory constraint). The other side is
/// never required to be fully available: a growing search with no selected ids yet simply
/// contributes zero deletions for as long as that lasts, and symmetrically while shrinking.
pub struct LRSubsetSearch {
    l: usize,
    r: usize,
}

impl LRSubsetSearch {
    /// Builds an `LRSubsetSearch` that adds `l` ids and removes `r` ids per step.
    pub fn new(l: usize, r: usize) -> Result<Self, ConfigurationError> {
        if l == r {
            return Err(ConfigurationError::Invalid(format!(
                "LRSubsetSearch requires l != r, got l=r={l}"
            )));
        }
        Ok(LRSubsetSearch { l, r })
    }
}

impl SearchStep<SubsetSolution, ()> for LRSubsetSearch {
    fn init(&mut self, core: &mut SearchCore<SubsetSolution, ()>) -> Result<(), SearchException> {
        let universe = core
            .current()
            .expect("LRSubsetSearch::init requires a current solution")
            .solution()
            .universe_arc();
        let initial = if self.l > self.r {
            SubsetSolution::empty(universe)
        } else {
            let all_ids: Vec<u64> = universe.iter().copied().collect();
            SubsetSolution::with_selected(Arc::clone(&universe), all_ids)
                .expect("universe ids are trivially members of their own universe")
        };
        core.update_current_solution(initial);
        Ok(())
    }

    fn step(&mut self, core: &mut SearchCore<SubsetSolution, ()>) -> Result<StepOutcome, SearchException> {
        let minimizing = core.problem().is_minimizing();
        let solution = core
            .current()
            .expect("LRSubsetSearch::step requires a current solution")
            .solution()
            .clone();

        let mut addition_candidates: Vec<(u64, f64)> = Vec::new();
        for &id in solution.unselected() {
            if let Some(value) = core.evaluate_move(&AdditionMove(id))? {
                addition_candidates.push((id, value));
            }
        }
        let mut deletion_candidates: Vec<(u64, f64)> = Vec::new();
        for &id in solution.selected() {
            if let Some(value) = core.evaluate_move(&DeletionMove(id))? {
                deletion_candidates.push((id, value));
            }
        }

        // Only the binding side of (l, r) must be fully available: when growing (l > r) the
        // deletion side is free to contribute fewer than r candidates (there may not be r
        // selected ids yet); when shrinking (r > l) the addition side is free to contribute
        // fewer than l. The search has converged once the binding side itself runs dry.
        let binding_side_exhausted = if self.l > self.r {
            addition_candidates.len() < self.l
        } else {
            deletion_candidates.len() < self.r
        };
        if binding_side_exhausted {
            return Ok(StepOutcome::Stop);
        }

        sort_best_first(&mut addition_candidates, minimizing);
        sort_best_first(&mut deletion_candidates, minimizing);

        let to_add: Vec<u64> = addition_candidates.into_iter().take(self.l).map(|(id, _)| id).collect();
        let to_remove: Vec<u64> = deletion_candidates.into_iter().take(self.r).map(|(id, _)| id).collect();

        let mov = GeneralSubsetMove { to_add, to_remove };
        if core.accept(&mov)? {
            Ok(StepOutcome::Continue)
        } else {
            Ok(StepOutcome::Stop)
        }
    }
}

fn sort_best_first(candidates: &mut [(u64, f64)], minimizing: bool) {
    candidates.sort_by(|(_, a), (_, b)| {
        if minimizing {
            a.partial_cmp(b).expect("evaluations must be comparable")
        } else {
            b.partial_cmp(a).expect("evaluations must be comparable")
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use crate::evaluation::{Evaluation, SimpleEvaluation};
    use crate::objective::Objective;
    use crate::problem::Problem;
    use crate::random_generator::RandomSolutionGenerator;
    use crate::search::Search;
    use crate::validation::{SimpleValidation, Validation};
    use std::collections::HashSet;

    struct SumSelected;
    impl Objective<SubsetSolution, ()> for SumSelected {
        fn evaluate(&self, solution: &SubsetSolution, _data: &()) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::new(solution.selected().iter().sum::<u64>() as f64))
        }
        fn is_minimizing(&self) -> bool {
            false
        }
    }

    struct AlwaysValid;
    impl Constraint<SubsetSolution, ()> for AlwaysValid {
        fn validate(&self, _solution: &SubsetSolution, _data: &()) -> Box<dyn Validation> {
            Box::new(SimpleValidation::PASSED)
        }
        fn name(&self) -> &str {
            "always_valid"
        }
    }

    struct EmptyGenerator {
        universe: Arc<HashSet<u64>>,
    }
    impl RandomSolutionGenerator<SubsetSolution, ()> for EmptyGenerator {
        fn create(&self, _rng: &mut rand::rngs::StdRng, _data: &()) -> SubsetSolution {
            SubsetSolution::empty(Arc::clone(&self.universe))
        }
    }

    fn problem(n: u64) -> Arc<Problem<SubsetSolution, ()>> {
        let universe: Arc<HashSet<u64>> = Arc::new((0..n).collect());
        Arc::new(Problem::new(
            Arc::new(()),
            Arc::new(SumSelected),
            vec![Arc::new(AlwaysValid)],
            Vec::new(),
            Arc::new(EmptyGenerator { universe }),
        ))
    }

    #[test]
    fn equal_l_and_r_is_rejected() {
        assert!(LRSubsetSearch::new(2, 2).is_err());
    }

    #[test]
    fn growing_first_step_adds_the_two_highest_valued_ids() {
        let problem = problem(5);
        let mut core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let mut algorithm = LRSubsetSearch::new(2, 1).unwrap();
        core.update_current_solution(SubsetSolution::empty(Arc::new((0..5).collect())));
        algorithm.init(&mut core).unwrap();
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![3, 4]);
    }

    #[test]
    fn shrinking_first_step_removes_the_lowest_valued_id() {
        let problem = problem(5);
        let mut core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let mut algorithm = LRSubsetSearch::new(0, 1).unwrap();
        core.update_current_solution(SubsetSolution::empty(Arc::new((0..5).collect())));
        algorithm.init(&mut core).unwrap();
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn pure_growth_converges_on_the_full_universe() {
        let problem = problem(4);
        let core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let algorithm = LRSubsetSearch::new(1, 0).unwrap();
        let mut search = Search::new(core, algorithm, None);
        search.start().unwrap();
        let (solution, _, _) = search.best_solution().unwrap();
        let mut selected: Vec<u64> = solution.selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![0, 1, 2, 3]);
    }

    #[test]
    fn pure_shrinkage_converges_on_the_empty_subset() {
        let problem = problem(4);
        let core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let algorithm = LRSubsetSearch::new(0, 1).unwrap();
        let mut search = Search::new(core, algorithm, None);
        search.start().unwrap();
        let (solution, _, _) = search.best_solution().unwrap();
        assert!(solution.selected().is_empty());
    }
}
