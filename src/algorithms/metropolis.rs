//! [`MetropolisSearch`]: random moves, always accepting improvements and accepting worsening
//! moves with probability `exp(delta / temperature)`.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::SearchException;
use crate::neighbourhood::Neighbourhood;
use crate::search::{SearchCore, SearchStep, StepOutcome};

/// At each step, draws one random move. If it improves on the current solution it is always
/// accepted; otherwise it is accepted with probability `exp(delta / temperature)`, where
/// `delta` is the (non-positive, orientation-aware) change in evaluation. Never stops on its
/// own — intended to run under an external stop criterion (steps, runtime, or target value).
pub struct MetropolisSearch<S, D> {
    neighbourhood: Arc<dyn Neighbourhood<S>>,
    temperature: f64,
    _data: PhantomData<D>,
}

impl<S, D> MetropolisSearch<S, D> {
    /// Builds a `MetropolisSearch` at a fixed `temperature` (must be strictly positive).
    pub fn new(neighbourhood: Arc<dyn Neighbourhood<S>>, temperature: f64) -> Self {
        MetropolisSearch {
            neighbourhood,
            temperature,
            _data: PhantomData,
        }
    }

    /// The current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Replaces the temperature — used by [`ParallelTempering`][super::parallel_tempering::ParallelTempering]
    /// to keep a fixed ladder of replica temperatures constant across the run while still
    /// allowing a caller to implement an annealing schedule on a standalone `MetropolisSearch`.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }
}

impl<S: Clone + Send + Sync, D: Send + Sync> SearchStep<S, D> for MetropolisSearch<S, D> {
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let solution = core
            .current()
            .expect("MetropolisSearch::step requires a current solution")
            .solution()
            .clone();
        let mov = match self.neighbourhood.random_move(&solution, core.rng()) {
            Some(mov) => mov,
            None => return Ok(StepOutcome::Stop),
        };
        let minimizing = core.problem().is_minimizing();
        let current_value = core
            .current()
            .expect("MetropolisSearch::step requires a current solution")
            .evaluation()
            .value(minimizing);
        let candidate_value = match core.evaluate_move(mov.as_ref())? {
            Some(value) => value,
            None => {
                core.reject();
                return Ok(StepOutcome::Continue);
            }
        };
        let delta = if minimizing {
            current_value - candidate_value
        } else {
            candidate_value - current_value
        };
        let accept = if delta > 0.0 {
            true
        } else {
            let probability = (delta / self.temperature).exp();
            core.random_unit() < probability
        };
        if accept {
            core.accept(mov.as_ref())?;
        } else {
            core.reject();
        }
        Ok(StepOutcome::Continue)
    }
}
