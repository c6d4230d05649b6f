//! [`PipedLocalSearch`]: sequential composition of independent searches, each picking up where
//! the previous one left off.

use crate::error::{ConfigurationError, SearchException};
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// Runs a sequence of algorithms `A_1, ..., A_n` one after another on the same
/// [`SearchCore`]: each stage is driven to its own completion (repeated `step` calls until it
/// signals [`StepOutcome::Stop`]) before the next stage's `init` runs and it takes over — so
/// `A_i` always starts from wherever `A_{i-1}` left the current solution. The final current (and
/// best) solution, after the last stage completes, is the pipe's result.
///
/// Each call to [`PipedLocalSearch::step`] runs exactly one stage to completion, so
/// `total_steps` on the owning [`Search`][crate::search::Search] counts *stages*, not the
/// sub-steps within them.
pub struct PipedLocalSearch<S, D> {
    stages: Vec<Box<dyn SearchStep<S, D>>>,
    current_stage: usize,
}

impl<S, D> PipedLocalSearch<S, D> {
    /// Builds a `PipedLocalSearch` over a non-empty sequence of `stages`, run in order.
    pub fn new(stages: Vec<Box<dyn SearchStep<S, D>>>) -> Result<Self, ConfigurationError> {
        if stages.is_empty() {
            return Err(ConfigurationError::Invalid(
                "PipedLocalSearch requires at least one stage".to_string(),
            ));
        }
        Ok(PipedLocalSearch { stages, current_stage: 0 })
    }
}

impl<S, D> SearchStep<S, D> for PipedLocalSearch<S, D>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
{
    fn init(&mut self, core: &mut SearchCore<S, D>) -> Result<(), SearchException> {
        self.current_stage = 0;
        self.stages[0].init(core)
    }

    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        if self.current_stage >= self.stages.len() {
            return Ok(StepOutcome::Stop);
        }
        loop {
            match self.stages[self.current_stage].step(core)? {
                StepOutcome::Continue => continue,
                StepOutcome::Stop => break,
            }
        }
        self.current_stage += 1;
        if self.current_stage < self.stages.len() {
            self.stages[self.current_stage].init(core)?;
            Ok(StepOutcome::Continue)
        } else {
            Ok(StepOutcome::Stop)
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
    use crate::subset::moves::AdditionMove;
    use crate::subset::SubsetSolution;
    use crate::validation::{SimpleValidation, Validation};
    use std::collections::HashSet;
    use std::sync::Arc;

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

    /// A trivial single-step stage: adds one fixed id, once, then stops.
    struct AddOnce(u64, bool);
    impl SearchStep<SubsetSolution, ()> for AddOnce {
        fn step(&mut self, core: &mut SearchCore<SubsetSolution, ()>) -> Result<StepOutcome, SearchException> {
            if self.1 {
                return Ok(StepOutcome::Stop);
            }
            self.1 = true;
            core.accept(&AdditionMove(self.0))?;
            Ok(StepOutcome::Continue)
        }
    }

    #[test]
    fn piped_search_runs_stages_in_order() {
        let universe = Arc::new((0..5).collect());
        let problem = Arc::new(Problem::new(
            Arc::new(()),
            Arc::new(SumSelected),
            vec![Arc::new(AlwaysValid)],
            Vec::new(),
            Arc::new(EmptyGenerator { universe: Arc::clone(&universe) }),
        ));
        let core = SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new());
        let algorithm = PipedLocalSearch::new(vec![
            Box::new(AddOnce(1, false)),
            Box::new(AddOnce(3, false)),
        ])
        .unwrap();
        let mut search = Search::new(core, algorithm, None);
        search.start().unwrap();
        let (solution, _, _) = search.best_solution().unwrap();
        let mut selected: Vec<u64> = solution.selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 3]);
    }
}
