//! [`ExhaustiveSearch`]: enumerates a problem-supplied solution iterator and keeps the best
//! valid solution seen.

use std::marker::PhantomData;

use crate::error::SearchException;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// Drives a [`SearchCore`] through every solution yielded by a problem-supplied iterator
/// (rather than through moves on a neighbourhood), relying entirely on
/// [`SearchCore::update_current_solution`]'s best-so-far tracking to keep the best valid
/// solution seen. Intended for solution spaces small enough to enumerate outright. Stops once
/// the iterator is exhausted.
pub struct ExhaustiveSearch<S, D> {
    solutions: Box<dyn Iterator<Item = S> + Send + Sync>,
    _data: PhantomData<D>,
}

impl<S, D> ExhaustiveSearch<S, D> {
    /// Builds an `ExhaustiveSearch` over `solutions`, enumerated in the order given.
    pub fn new(solutions: impl Iterator<Item = S> + Send + Sync + 'static) -> Self {
        ExhaustiveSearch {
            solutions: Box::new(solutions),
            _data: PhantomData,
        }
    }
}

impl<S: Clone + Send + Sync, D: Send + Sync> SearchStep<S, D> for ExhaustiveSearch<S, D> {
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        match self.solutions.next() {
            Some(solution) => {
                core.update_current_solution(solution);
                Ok(StepOutcome::Continue)
            }
            None => Ok(StepOutcome::Stop),
        }
    }
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
    use std::sync::Arc;

    struct SumObjective;
    impl Objective<i64, ()> for SumObjective {
        fn evaluate(&self, solution: &i64, _data: &()) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::new(*solution as f64))
        }
        fn is_minimizing(&self) -> bool {
            false
        }
    }

    struct AlwaysValid;
    impl Constraint<i64, ()> for AlwaysValid {
        fn validate(&self, _solution: &i64, _data: &()) -> Box<dyn Validation> {
            Box::new(SimpleValidation::PASSED)
        }
        fn name(&self) -> &str {
            "always_valid"
        }
    }

    struct ZeroGenerator;
    impl RandomSolutionGenerator<i64, ()> for ZeroGenerator {
        fn create(&self, _rng: &mut rand::rngs::StdRng, _data: &()) -> i64 {
            0
        }
    }

    #[test]
    fn exhaustive_search_finds_the_maximum_of_an_explicit_range() {
        let problem = Arc::new(Problem::new(
            Arc::new(()),
            Arc::new(SumObjective),
            vec![Arc::new(AlwaysValid)],
            Vec::new(),
            Arc::new(ZeroGenerator),
        ));
        let core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let algorithm = ExhaustiveSearch::new(0..10i64);
        let mut search = Search::new(core, algorithm, None);
        search.start().unwrap();
        let (solution, evaluation, _) = search.best_solution().unwrap();
        assert_eq!(*solution, 9);
        assert_eq!(evaluation.value(false), 9.0);
    }
}
