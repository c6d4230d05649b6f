//! [`FirstBestAdmissibleTabuSearch`]: the first-improvement counterpart of [`TabuSearch`][super::TabuSearch].

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::SearchException;
use crate::moves::Move;
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

use super::{AspirationCriterion, BestSoFarAspiration, TabuMemory};

/// At each step, shuffles the neighbourhood's enumeration order and scans it for the *first*
/// admissible move that improves on the current solution, instead of evaluating the whole
/// neighbourhood to find the best one — cheaper per step than [`TabuSearch`][super::TabuSearch]
/// on large neighbourhoods, at the cost of a less greedy trajectory. If the (shuffled) scan
/// finds no improving admissible move, it falls back to the best admissible move found during
/// that same scan (which may not improve), matching ordinary [`TabuSearch`][super::TabuSearch]
/// semantics — the aspiration criterion still applies either way. Stops only when no admissible
/// move exists at all.
pub struct FirstBestAdmissibleTabuSearch<S, D, T> {
    neighbourhood: Arc<dyn Neighbourhood<S>>,
    attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
    memory: Box<dyn TabuMemory<T>>,
    aspiration: Box<dyn AspirationCriterion>,
    step_counter: u64,
    _data: PhantomData<D>,
}

impl<S, D, T> FirstBestAdmissibleTabuSearch<S, D, T> {
    /// Builds a `FirstBestAdmissibleTabuSearch` with [`BestSoFarAspiration`].
    pub fn new(
        neighbourhood: Arc<dyn Neighbourhood<S>>,
        attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
        memory: Box<dyn TabuMemory<T>>,
    ) -> Self {
        Self::with_aspiration(neighbourhood, attributes_of, memory, Box::new(BestSoFarAspiration))
    }

    /// Builds a `FirstBestAdmissibleTabuSearch` with an explicit [`AspirationCriterion`].
    pub fn with_aspiration(
        neighbourhood: Arc<dyn Neighbourhood<S>>,
        attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
        memory: Box<dyn TabuMemory<T>>,
        aspiration: Box<dyn AspirationCriterion>,
    ) -> Self {
        FirstBestAdmissibleTabuSearch {
            neighbourhood,
            attributes_of,
            memory,
            aspiration,
            step_counter: 0,
            _data: PhantomData,
        }
    }
}

impl<S, D, T> SearchStep<S, D> for FirstBestAdmissibleTabuSearch<S, D, T>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        use rand::seq::SliceRandom;

        let solution = core
            .current()
            .expect("FirstBestAdmissibleTabuSearch::step requires a current solution")
            .solution()
            .clone();
        let minimizing = core.problem().is_minimizing();
        let current_value = core
            .current()
            .expect("FirstBestAdmissibleTabuSearch::step requires a current solution")
            .evaluation()
            .value(minimizing);
        let best_value = core.best().map(|b| b.evaluation().value(minimizing));

        let mut candidates: Vec<Box<dyn Move<S>>> = self.neighbourhood.all_moves(&solution).collect();
        candidates.shuffle(core.rng());

        let mut best_admissible: Option<(Box<dyn Move<S>>, f64, Vec<T>)> = None;
        for mov in candidates {
            let value = match core.evaluate_move(mov.as_ref())? {
                Some(value) => value,
                None => continue,
            };
            let attributes = (self.attributes_of)(mov.as_ref());
            let tabu = attributes.iter().any(|attribute| self.memory.is_tabu(attribute));
            if tabu && !self.aspiration.admits(value, best_value, minimizing) {
                continue;
            }
            let improves = if minimizing {
                value < current_value
            } else {
                value > current_value
            };
            if improves {
                return self.commit(core, mov, attributes);
            }
            let better_than_best = match &best_admissible {
                None => true,
                Some((_, best_value, _)) => {
                    if minimizing {
                        value < *best_value
                    } else {
                        value > *best_value
                    }
                }
            };
            if better_than_best {
                best_admissible = Some((mov, value, attributes));
            }
        }

        match best_admissible {
            Some((mov, _, attributes)) => self.commit(core, mov, attributes),
            None => Ok(StepOutcome::Stop),
        }
    }
}

impl<S, D, T> FirstBestAdmissibleTabuSearch<S, D, T>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn commit(
        &mut self,
        core: &mut SearchCore<S, D>,
        mov: Box<dyn Move<S>>,
        attributes: Vec<T>,
    ) -> Result<StepOutcome, SearchException> {
        core.accept(mov.as_ref())?;
        self.step_counter += 1;
        for attribute in attributes {
            self.memory.record(attribute, self.step_counter);
        }
        self.memory.advance(self.step_counter);
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::memory::FixedSizeTabuMemory;
    use super::*;
    use crate::constraint::Constraint;
    use crate::evaluation::{Evaluation, SimpleEvaluation};
    use crate::objective::Objective;
    use crate::problem::Problem;
    use crate::random_generator::RandomSolutionGenerator;
    use crate::subset::moves::SwapMove;
    use crate::subset::neighbourhoods::SingleSwap;
    use crate::subset::SubsetSolution;
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

    fn remove_attribute(mov: &dyn Move<SubsetSolution>) -> Vec<u64> {
        match mov.as_any().downcast_ref::<SwapMove>() {
            Some(swap) => vec![swap.remove],
            None => Vec::new(),
        }
    }

    fn start(problem: &Arc<Problem<SubsetSolution, ()>>, universe_size: u64, ids: &[u64]) -> SearchCore<SubsetSolution, ()> {
        let mut core = SearchCore::new(Arc::clone(problem), crate::rng::default_rng(), Vec::new());
        let universe = Arc::new((0..universe_size).collect());
        core.update_current_solution(SubsetSolution::with_selected(universe, ids.iter().copied()).unwrap());
        core
    }

    #[test]
    fn takes_the_first_improving_move_it_finds() {
        // From {0,1} (sum 1) every swap that adds 2, 3 or 4 improves, so whichever the shuffled
        // scan lands on first must be taken without evaluating the rest of the neighbourhood.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut algorithm = FirstBestAdmissibleTabuSearch::new(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(FixedSizeTabuMemory::new(1)),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let value = core.current().unwrap().evaluation().value(false);
        assert!(value > 1.0, "expected an improving swap, got value {value}");
    }

    #[test]
    fn falls_back_to_the_best_non_improving_move_once_optimal() {
        // {3,4} is already the optimal pair out of {0,1,2,3,4}: no swap improves on it, so the
        // scan must fall back to the best admissible move found, not stop outright.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[3, 4]);
        let mut algorithm = FirstBestAdmissibleTabuSearch::new(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(FixedSizeTabuMemory::new(1)),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![2, 4]);
    }

    #[test]
    fn stops_once_the_neighbourhood_is_empty() {
        let problem = problem(2);
        let mut core = start(&problem, 2, &[0, 1]);
        let mut algorithm = FirstBestAdmissibleTabuSearch::new(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(FixedSizeTabuMemory::new(1)),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Stop);
    }

    #[test]
    fn no_aspiration_excludes_every_move_that_removes_a_tabu_id() {
        // Banning "remove 0" rules out every swap that drops it, with no aspiration override to
        // let one back in; the search is still free to act on the other selected id, 1.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut memory = FixedSizeTabuMemory::new(2);
        memory.record(0u64, 0);
        let mut algorithm = FirstBestAdmissibleTabuSearch::with_aspiration(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(memory),
            Box::new(crate::algorithms::tabu::NoAspiration),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let solution = core.current().unwrap().solution();
        assert!(solution.is_selected(0), "removing 0 is tabu and must not have been taken");
        assert!(solution.selected().len() == 2);
        let value = core.current().unwrap().evaluation().value(false);
        assert!(value > 1.0, "the only admissible moves all improve on the starting sum of 1, got {value}");
    }
}
