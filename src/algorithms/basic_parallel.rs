//! [`BasicParallelSearch`]: a bag of heterogeneous algorithms run concurrently on independent
//! threads, reporting their combined best solution to a single parent.

use std::sync::{Arc, Mutex};

use crate::error::{ConfigurationError, SearchException};
use crate::problem::Problem;
use crate::search::{SearchCore, SearchStep, StepOutcome};

struct SubSearch<S, D> {
    core: SearchCore<S, D>,
    algorithm: Box<dyn SearchStep<S, D>>,
}

/// Runs `algorithms.len()` independent [`SearchStep`] implementations concurrently, each on its
/// own [`SearchCore`] (and so its own current/best solution and RNG), seeded with a copy of the
/// parent's current solution if one was set before `start()` (a fresh random solution
/// otherwise, per sub-search). Every global step, each sub-search advances up to
/// `steps_per_round` of its own steps (stopping early if it signals
/// [`StepOutcome::Stop`]) on its own OS thread via [`rayon::scope`], then the best solution
/// across all sub-searches is reported to the parent core. Never stops on its own; run under an
/// external stop criterion — an outer `stop()` cascades naturally, since the next global step
/// simply never begins.
pub struct BasicParallelSearch<S, D> {
    sub_searches: Vec<SubSearch<S, D>>,
    steps_per_round: u64,
}

impl<S: Clone + Send + 'static, D: Send + Sync + 'static> BasicParallelSearch<S, D> {
    /// Builds a `BasicParallelSearch` from a non-empty bag of heterogeneous `algorithms`, all
    /// searching the same `problem`. Each gets `500` steps per round by default; see
    /// [`with_steps_per_round`][Self::with_steps_per_round].
    pub fn new(problem: Arc<Problem<S, D>>, algorithms: Vec<Box<dyn SearchStep<S, D>>>) -> Result<Self, ConfigurationError> {
        if algorithms.is_empty() {
            return Err(ConfigurationError::NonPositiveReplicaCount { count: 0 });
        }
        let sub_searches = algorithms
            .into_iter()
            .map(|algorithm| SubSearch {
                core: SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new()),
                algorithm,
            })
            .collect();
        Ok(BasicParallelSearch {
            sub_searches,
            steps_per_round: 500,
        })
    }

    /// Overrides the default step budget each sub-search is given per global step.
    pub fn with_steps_per_round(mut self, steps_per_round: u64) -> Self {
        self.steps_per_round = steps_per_round;
        self
    }
}

impl<S, D> SearchStep<S, D> for BasicParallelSearch<S, D>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
{
    fn init(&mut self, core: &mut SearchCore<S, D>) -> Result<(), SearchException> {
        let seed_solution = core.current().map(|c| c.solution().clone());
        for sub in &mut self.sub_searches {
            match &seed_solution {
                Some(solution) => sub.core.update_current_solution(solution.clone()),
                None => {
                    let solution = core.problem().create_random(sub.core.rng());
                    sub.core.update_current_solution(solution);
                }
            }
            sub.algorithm.init(&mut sub.core)?;
        }
        Ok(())
    }

    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let error: Mutex<Option<SearchException>> = Mutex::new(None);
        let steps_per_round = self.steps_per_round;
        rayon::scope(|scope| {
            for sub in self.sub_searches.iter_mut() {
                let error = &error;
                scope.spawn(move |_| {
                    for _ in 0..steps_per_round {
                        match sub.algorithm.step(&mut sub.core) {
                            Ok(StepOutcome::Continue) => continue,
                            Ok(StepOutcome::Stop) => break,
                            Err(err) => {
                                *error.lock().expect("error mutex poisoned") = Some(err);
                                break;
                            }
                        }
                    }
                });
            }
        });
        if let Some(err) = error.into_inner().expect("error mutex poisoned") {
            return Err(err);
        }

        for sub in &self.sub_searches {
            if let Some(best) = sub.core.best() {
                core.observe(best.solution());
            }
        }
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::random_descent::RandomDescent;
    use crate::algorithms::steepest_descent::SteepestDescent;
    use crate::constraint::Constraint;
    use crate::evaluation::{Evaluation, SimpleEvaluation};
    use crate::objective::Objective;
    use crate::random_generator::RandomSolutionGenerator;
    use crate::search::Search;
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

    struct FixedStartGenerator {
        universe: Arc<HashSet<u64>>,
    }
    impl RandomSolutionGenerator<SubsetSolution, ()> for FixedStartGenerator {
        fn create(&self, _rng: &mut rand::rngs::StdRng, _data: &()) -> SubsetSolution {
            SubsetSolution::with_selected(Arc::clone(&self.universe), [0, 1, 2]).unwrap()
        }
    }

    #[test]
    fn basic_parallel_search_reports_the_best_across_sub_searches() {
        let universe: Arc<HashSet<u64>> = Arc::new((0..10).collect());
        let problem = Arc::new(Problem::new(
            Arc::new(()),
            Arc::new(SumSelected),
            vec![Arc::new(AlwaysValid)],
            Vec::new(),
            Arc::new(FixedStartGenerator { universe: Arc::clone(&universe) }),
        ));
        let neighbourhood = Arc::new(SingleSwap::new());
        let algorithms: Vec<Box<dyn SearchStep<SubsetSolution, ()>>> = vec![
            Box::new(RandomDescent::new(Arc::clone(&neighbourhood) as Arc<dyn crate::neighbourhood::Neighbourhood<SubsetSolution>>)),
            Box::new(SteepestDescent::new(neighbourhood as Arc<dyn crate::neighbourhood::Neighbourhood<SubsetSolution>>)),
        ];
        let parallel = BasicParallelSearch::new(Arc::clone(&problem), algorithms)
            .unwrap()
            .with_steps_per_round(20);
        let core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let mut search = Search::new(
            core,
            parallel,
            Some(crate::stop_criterion::StopCriterionChecker::with_interval(
                vec![Box::new(crate::stop_criterion::MaxSteps(3))],
                std::time::Duration::from_millis(5),
            )),
        );
        search.start().unwrap();
        let (solution, _, _) = search.best_solution().unwrap();
        let mut selected: Vec<u64> = solution.selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![7, 8, 9]);
    }
}
