//! [`TabuSearch`]: at each step, evaluates the whole neighbourhood and takes the best move that
//! is either non-tabu or admitted by the [`AspirationCriterion`], even if it does not improve
//! on the current solution (this is what lets tabu search climb out of local optima). See
//! [`first_best_admissible`] for a first-improvement variant, and [`memory`] for the tabu-memory
//! strategies.

pub mod first_best_admissible;
pub mod memory;

pub use first_best_admissible::FirstBestAdmissibleTabuSearch;
pub use memory::TabuMemory;

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::SearchException;
use crate::moves::Move;
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// Decides whether a tabu move may be taken anyway because its candidate value is good enough.
pub trait AspirationCriterion: Send + Sync {
    /// `true` if a tabu move with this `candidate_value` should be admitted regardless.
    fn admits(&self, candidate_value: f64, best_value: Option<f64>, minimizing: bool) -> bool;
}

/// Admits a tabu move iff it would strictly improve on the best solution seen so far (or no
/// valid solution has been seen yet). The standard aspiration criterion.
pub struct BestSoFarAspiration;

impl AspirationCriterion for BestSoFarAspiration {
    fn admits(&self, candidate_value: f64, best_value: Option<f64>, minimizing: bool) -> bool {
        match best_value {
            None => true,
            Some(best) => {
                if minimizing {
                    candidate_value < best
                } else {
                    candidate_value > best
                }
            }
        }
    }
}

/// Never overrides a tabu decision. Useful when aspiration is not wanted, or for testing a
/// memory strategy in isolation.
pub struct NoAspiration;

impl AspirationCriterion for NoAspiration {
    fn admits(&self, _candidate_value: f64, _best_value: Option<f64>, _minimizing: bool) -> bool {
        false
    }
}

/// At each step, evaluates every move in the neighbourhood (via delta), extracts each move's
/// tabu attributes with `attributes_of`, and takes the best admissible one (non-tabu, or tabu
/// but admitted by the aspiration criterion) — regardless of whether it improves on the current
/// solution. Stops once no move is admissible.
pub struct TabuSearch<S, D, T> {
    neighbourhood: Arc<dyn Neighbourhood<S>>,
    attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
    memory: Box<dyn TabuMemory<T>>,
    aspiration: Box<dyn AspirationCriterion>,
    step_counter: u64,
    _data: PhantomData<D>,
}

impl<S, D, T> TabuSearch<S, D, T> {
    /// Builds a `TabuSearch` with [`BestSoFarAspiration`].
    pub fn new(
        neighbourhood: Arc<dyn Neighbourhood<S>>,
        attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
        memory: Box<dyn TabuMemory<T>>,
    ) -> Self {
        Self::with_aspiration(neighbourhood, attributes_of, memory, Box::new(BestSoFarAspiration))
    }

    /// Builds a `TabuSearch` with an explicit [`AspirationCriterion`].
    pub fn with_aspiration(
        neighbourhood: Arc<dyn Neighbourhood<S>>,
        attributes_of: Arc<dyn Fn(&dyn Move<S>) -> Vec<T> + Send + Sync>,
        memory: Box<dyn TabuMemory<T>>,
        aspiration: Box<dyn AspirationCriterion>,
    ) -> Self {
        TabuSearch {
            neighbourhood,
            attributes_of,
            memory,
            aspiration,
            step_counter: 0,
            _data: PhantomData,
        }
    }
}

impl<S, D, T> SearchStep<S, D> for TabuSearch<S, D, T>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let solution = core
            .current()
            .expect("TabuSearch::step requires a current solution")
            .solution()
            .clone();
        let minimizing = core.problem().is_minimizing();
        let best_value = core.best().map(|b| b.evaluation().value(minimizing));

        let mut chosen: Option<(Box<dyn Move<S>>, f64, Vec<T>)> = None;
        for mov in self.neighbourhood.all_moves(&solution) {
            let value = match core.evaluate_move(mov.as_ref())? {
                Some(value) => value,
                None => continue,
            };
            let attributes = (self.attributes_of)(mov.as_ref());
            let tabu = attributes.iter().any(|attribute| self.memory.is_tabu(attribute));
            if tabu && !self.aspiration.admits(value, best_value, minimizing) {
                continue;
            }
            let better_than_chosen = match &chosen {
                None => true,
                Some((_, chosen_value, _)) => {
                    if minimizing {
                        value < *chosen_value
                    } else {
                        value > *chosen_value
                    }
                }
            };
            if better_than_chosen {
                chosen = Some((mov, value, attributes));
            }
        }

        match chosen {
            None => Ok(StepOutcome::Stop),
            Some((mov, _, attributes)) => {
                core.accept(mov.as_ref())?;
                self.step_counter += 1;
                for attribute in attributes {
                    self.memory.record(attribute, self.step_counter);
                }
                self.memory.advance(self.step_counter);
                Ok(StepOutcome::Continue)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{FixedSizeTabuMemory, RejectAllTabuMemory};
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

    // Universe {0,1,2,3,4}, selecting 2 ids to maximise their sum: the unique optimum is {3,4}.
    // TabuSearch takes the best admissible swap every step, improving or not, so it can walk
    // past the optimum once it is reached rather than stopping there.

    #[test]
    fn takes_the_single_best_swap_each_step_regardless_of_improvement() {
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut algorithm = TabuSearch::new(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(FixedSizeTabuMemory::new(1)),
        );

        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 4]);

        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![3, 4]);
        let best_value = core.best().unwrap().evaluation().value(false);
        assert_eq!(best_value, 7.0);

        // No swap out of {3,4} improves on 7, but the best admissible one is still taken,
        // leaving the current solution worse while the tracked best stays at 7.
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![2, 4]);
        assert_eq!(core.best().unwrap().evaluation().value(false), 7.0);
    }

    #[test]
    fn stops_once_the_neighbourhood_is_empty() {
        // Selecting the whole universe leaves no unselected id to swap in.
        let problem = problem(2);
        let mut core = start(&problem, 2, &[0, 1]);
        let mut algorithm = TabuSearch::new(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(FixedSizeTabuMemory::new(1)),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Stop);
    }

    #[test]
    fn aspiration_admits_a_tabu_move_that_beats_the_best_so_far() {
        // Ban removing 0 up front (as if it had just been re-added), even though the only
        // improving move removes 0: BestSoFarAspiration overrides the ban since no solution has
        // been recorded as best yet.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut memory = FixedSizeTabuMemory::new(2);
        memory.record(0u64, 0);
        let mut algorithm = TabuSearch::new(Arc::new(SingleSwap::new()), Arc::new(remove_attribute), Box::new(memory));
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 4]);
    }

    #[test]
    fn no_aspiration_rejects_every_tabu_candidate() {
        // With NoAspiration, banning id 0 forces the search to settle for the best swap that
        // does not remove it, even though removing it would be the true best move.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut memory = FixedSizeTabuMemory::new(2);
        memory.record(0u64, 0);
        let mut algorithm = TabuSearch::with_aspiration(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(memory),
            Box::new(NoAspiration),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![0, 4]);
    }

    #[test]
    fn best_so_far_aspiration_is_the_only_path_past_a_reject_all_memory() {
        // Every move is tabu under RejectAllTabuMemory, so the first step can only proceed
        // because BestSoFarAspiration admits everything while no best solution is recorded yet.
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut algorithm =
            TabuSearch::new(Arc::new(SingleSwap::new()), Arc::new(remove_attribute), Box::new(RejectAllTabuMemory));
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 4]);

        // Now that a best solution is recorded (sum 5), the reject-all memory combined with
        // BestSoFarAspiration only admits moves that strictly beat it.
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Continue);
        let mut selected: Vec<u64> = core.current().unwrap().solution().selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![3, 4]);
    }

    #[test]
    fn no_aspiration_with_a_reject_all_memory_never_admits_a_move() {
        let problem = problem(5);
        let mut core = start(&problem, 5, &[0, 1]);
        let mut algorithm = TabuSearch::with_aspiration(
            Arc::new(SingleSwap::new()),
            Arc::new(remove_attribute),
            Box::new(RejectAllTabuMemory),
            Box::new(NoAspiration),
        );
        assert_eq!(algorithm.step(&mut core).unwrap(), StepOutcome::Stop);
    }
}
