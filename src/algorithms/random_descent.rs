//! [`RandomDescent`]: repeatedly draws a single random move and takes it only if it improves
//! on the current solution.

use std::sync::Arc;

use crate::error::SearchException;
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// At each step, draws one random move from the neighbourhood and accepts it iff it is an
/// improvement (per [`SearchCore::is_improvement`]); otherwise the move is rejected and the
/// current solution is unchanged. Stops once the neighbourhood yields no move at all (an empty
/// or exhausted neighbourhood), leaving the decision of "when to give up on improving moves" to
/// an external stop criterion (e.g. `MaxStepsWithoutImprovement`).
pub struct RandomDescent<S, D> {
    neighbourhood: Arc<dyn Neighbourhood<S>>,
    _data: std::marker::PhantomData<D>,
}

impl<S, D> RandomDescent<S, D> {
    /// Builds a `RandomDescent` over `neighbourhood`.
    pub fn new(neighbourhood: Arc<dyn Neighbourhood<S>>) -> Self {
        RandomDescent {
            neighbourhood,
            _data: std::marker::PhantomData,
        }
    }
}

impl<S: Clone + Send + Sync, D: Send + Sync> SearchStep<S, D> for RandomDescent<S, D> {
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let solution = core
            .current()
            .expect("RandomDescent::step requires a current solution")
            .solution()
            .clone();
        let mov = match self.neighbourhood.random_move(&solution, core.rng()) {
            Some(mov) => mov,
            None => return Ok(StepOutcome::Stop),
        };
        if core.is_improvement(mov.as_ref())? {
            core.accept(mov.as_ref())?;
        } else {
            core.reject();
        }
        Ok(StepOutcome::Continue)
    }
}
