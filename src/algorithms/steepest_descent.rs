//! [`SteepestDescent`]: at each step, evaluates the entire neighbourhood and takes the best
//! improving move.

use std::sync::Arc;

use crate::error::SearchException;
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// At each step, evaluates every move in the neighbourhood (via delta) and takes the one with
/// the best resulting evaluation, provided it improves on the current solution. Stops as soon
/// as no move improves — a genuine local optimum under this neighbourhood.
pub struct SteepestDescent<S, D> {
    neighbourhood: Arc<dyn Neighbourhood<S>>,
    _data: std::marker::PhantomData<D>,
}

impl<S, D> SteepestDescent<S, D> {
    /// Builds a `SteepestDescent` over `neighbourhood`.
    pub fn new(neighbourhood: Arc<dyn Neighbourhood<S>>) -> Self {
        SteepestDescent {
            neighbourhood,
            _data: std::marker::PhantomData,
        }
    }
}

impl<S: Clone + Send + Sync, D: Send + Sync> SearchStep<S, D> for SteepestDescent<S, D> {
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let solution = core
            .current()
            .expect("SteepestDescent::step requires a current solution")
            .solution()
            .clone();
        let moves = self.neighbourhood.all_moves(&solution);
        match core.best_move(moves, true, false, None)? {
            Some(mov) => {
                core.accept(mov.as_ref())?;
                Ok(StepOutcome::Continue)
            }
            None => Ok(StepOutcome::Stop),
        }
    }
}
