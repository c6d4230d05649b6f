//! Walks the subset-selection toy problem from the crate's test suite through several
//! algorithms, printed side by side so the differences in trajectory are visible.
//!
//! Universe {0, ..., 9}, select exactly 3 ids, objective = sum of selected ids (maximising).
//! The unique optimum is {7, 8, 9} with value 24.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;

use trajectory_search::algorithms::metropolis::MetropolisSearch;
use trajectory_search::algorithms::random_descent::RandomDescent;
use trajectory_search::algorithms::steepest_descent::SteepestDescent;
use trajectory_search::algorithms::tabu::memory::FixedSizeTabuMemory;
use trajectory_search::algorithms::tabu::TabuSearch;
use trajectory_search::constraint::Constraint;
use trajectory_search::error::SearchException;
use trajectory_search::evaluation::{Evaluation, SimpleEvaluation};
use trajectory_search::moves::Move;
use trajectory_search::objective::Objective;
use trajectory_search::problem::Problem;
use trajectory_search::random_generator::RandomSolutionGenerator;
use trajectory_search::search::{Search, SearchCore};
use trajectory_search::stop_criterion::{MaxSteps, MaxStepsWithoutImprovement, StopCriterionChecker};
use trajectory_search::subset::moves::SwapMove;
use trajectory_search::subset::neighbourhoods::SingleSwap;
use trajectory_search::subset::SubsetSolution;
use trajectory_search::validation::{SimpleValidation, Validation};

const UNIVERSE_SIZE: u64 = 10;
const SELECT_SIZE: usize = 3;

/// Sum of the selected ids. Delta-evaluated directly from the swap's two ids, rather than
/// resumming the whole selected set.
struct SumSelected;

impl Objective<SubsetSolution, ()> for SumSelected {
    fn evaluate(&self, solution: &SubsetSolution, _data: &()) -> Box<dyn Evaluation> {
        Box::new(SimpleEvaluation::new(solution.selected().iter().sum::<u64>() as f64))
    }

    fn evaluate_delta(
        &self,
        mov: &dyn Move<SubsetSolution>,
        _current_solution: &mut SubsetSolution,
        current_evaluation: &dyn Evaluation,
        _data: &(),
    ) -> Result<Box<dyn Evaluation>, trajectory_search::error::IncompatibleDelta> {
        let swap = mov
            .as_any()
            .downcast_ref::<SwapMove>()
            .ok_or(trajectory_search::error::IncompatibleDelta)?;
        let delta = swap.add as f64 - swap.remove as f64;
        Ok(Box::new(SimpleEvaluation::new(
            current_evaluation.value(self.is_minimizing()) + delta,
        )))
    }

    fn is_minimizing(&self) -> bool {
        false
    }
}

/// Exactly `SELECT_SIZE` ids must be selected. `SingleSwap` never changes the subset's size, so
/// this is trivially preserved after construction and every swap; it exists to document the
/// invariant, not to reject anything in practice.
struct ExactlySelected(usize);

impl Constraint<SubsetSolution, ()> for ExactlySelected {
    fn validate(&self, solution: &SubsetSolution, _data: &()) -> Box<dyn Validation> {
        Box::new(SimpleValidation::new(solution.selected().len() == self.0))
    }

    fn name(&self) -> &str {
        "exactly_selected"
    }
}

struct FixedSizeRandomStart {
    universe: Arc<HashSet<u64>>,
    size: usize,
}

impl RandomSolutionGenerator<SubsetSolution, ()> for FixedSizeRandomStart {
    fn create(&self, rng: &mut StdRng, _data: &()) -> SubsetSolution {
        let chosen = trajectory_search::subset::sampling::sample_k(self.universe.iter().copied(), self.size, rng);
        SubsetSolution::with_selected(Arc::clone(&self.universe), chosen).expect("sampled from the universe")
    }
}

fn build_problem() -> Arc<Problem<SubsetSolution, ()>> {
    let universe: Arc<HashSet<u64>> = Arc::new((0..UNIVERSE_SIZE).collect());
    Arc::new(Problem::new(
        Arc::new(()),
        Arc::new(SumSelected),
        vec![Arc::new(ExactlySelected(SELECT_SIZE))],
        Vec::new(),
        Arc::new(FixedSizeRandomStart {
            universe,
            size: SELECT_SIZE,
        }),
    ))
}

fn print_best(label: &str, search: &Search<SubsetSolution, (), impl trajectory_search::search::SearchStep<SubsetSolution, ()>>) {
    match search.best_solution() {
        Some((solution, evaluation, _)) => {
            println!(
                "{label}: best {solution} value={:.0} steps={}",
                evaluation.value(SumSelected.is_minimizing()),
                search.total_steps()
            );
        }
        None => println!("{label}: no valid solution found"),
    }
}

fn main() -> Result<(), SearchException> {
    trajectory_search::rng::set_default_seed(7);
    let problem = build_problem();
    let neighbourhood = Arc::new(SingleSwap::new());

    // Steepest descent: exact, deterministic, one best-admissible swap per step.
    {
        let core = SearchCore::new(Arc::clone(&problem), trajectory_search::rng::default_rng(), Vec::new());
        let algorithm = SteepestDescent::new(Arc::clone(&neighbourhood) as Arc<dyn trajectory_search::neighbourhood::Neighbourhood<SubsetSolution>>);
        let mut search = Search::new(core, algorithm, None);
        search.start()?;
        print_best("steepest descent", &search);
    }

    // Random descent: needs an external stop criterion, since the neighbourhood never empties.
    {
        let core = SearchCore::new(Arc::clone(&problem), trajectory_search::rng::default_rng(), Vec::new());
        let algorithm = RandomDescent::new(Arc::clone(&neighbourhood) as Arc<dyn trajectory_search::neighbourhood::Neighbourhood<SubsetSolution>>);
        let checker = StopCriterionChecker::new(vec![Box::new(MaxStepsWithoutImprovement(50))]);
        let mut search = Search::new(core, algorithm, Some(checker));
        search.start()?;
        print_best("random descent", &search);
    }

    // Tabu search: each accepted swap forbids re-adding the id it just removed, for 3 steps.
    {
        let core = SearchCore::new(Arc::clone(&problem), trajectory_search::rng::default_rng(), Vec::new());
        let neighbourhood_for_attrs = Arc::clone(&neighbourhood) as Arc<dyn trajectory_search::neighbourhood::Neighbourhood<SubsetSolution>>;
        let attributes_of = Arc::new(|mov: &dyn Move<SubsetSolution>| -> Vec<u64> {
            match mov.as_any().downcast_ref::<SwapMove>() {
                Some(swap) => vec![swap.remove],
                None => Vec::new(),
            }
        });
        let algorithm = TabuSearch::new(neighbourhood_for_attrs, attributes_of, Box::new(FixedSizeTabuMemory::new(3)));
        let checker = StopCriterionChecker::new(vec![Box::new(MaxStepsWithoutImprovement(20))]);
        let mut search = Search::new(core, algorithm, Some(checker));
        search.start()?;
        print_best("tabu search", &search);
    }

    // Metropolis at a high temperature: a broad, mostly-accepting random walk.
    {
        let core = SearchCore::new(Arc::clone(&problem), trajectory_search::rng::default_rng(), Vec::new());
        let algorithm = MetropolisSearch::new(Arc::clone(&neighbourhood) as Arc<dyn trajectory_search::neighbourhood::Neighbourhood<SubsetSolution>>, 50.0);
        let checker = StopCriterionChecker::new(vec![Box::new(MaxSteps(200))]);
        let mut search = Search::new(core, algorithm, Some(checker));
        search.start()?;
        print_best("metropolis (T=50)", &search);
    }

    Ok(())
}
