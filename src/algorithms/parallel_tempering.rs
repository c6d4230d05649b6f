//! [`ParallelTempering`]: a ladder of [`MetropolisSearch`] replicas at geometrically-spaced
//! temperatures, stepped concurrently on OS threads and periodically offered a swap of their
//! current solutions.

use std::sync::{Arc, Mutex};

use crate::error::{ConfigurationError, SearchException};
use crate::neighbourhood::Neighbourhood;
use crate::problem::Problem;
use crate::search::{SearchCore, SearchStep, StepOutcome};

use super::metropolis::MetropolisSearch;

struct Replica<S, D> {
    core: SearchCore<S, D>,
    algorithm: MetropolisSearch<S, D>,
}

/// Runs `replica_count` [`MetropolisSearch`] instances at temperatures spaced linearly between
/// `t_min` and `t_max` (`T_i = t_min + i * (t_max - t_min) / (replica_count - 1)`), each on its
/// own [`SearchCore`] with its own best-so-far tracking. Every step:
///
/// 1. All replicas advance their own `MetropolisSearch` internal loop concurrently, via
///    `rayon::scope`, each running up to `replica_steps` steps (`500` by default; see
///    [`with_replica_steps`][Self::with_replica_steps]).
/// 2. Alternating pairs of adjacent replicas (`(0,1),(2,3),...` on even rounds, `(1,2),(3,4),...`
///    on odd rounds) are offered a swap of their current solutions, accepted with probability
///    `min(1, exp((1/T_i - 1/T_j) * (E_i - E_j)))`, where `E` is the orientation-normalised
///    ("lower is better") evaluation.
/// 3. The best solution across all replicas is reported to the parent [`SearchCore`] passed
///    into [`step`][crate::search::SearchStep::step], under that core's own best-so-far
///    bookkeeping (so `new_best_solution` listeners observe a consistent value no matter which
///    replica found it).
///
/// Never stops on its own; run under an external stop criterion.
pub struct ParallelTempering<S, D> {
    replicas: Vec<Replica<S, D>>,
    round: u64,
    replica_steps: u64,
}

impl<S: Clone + Send + 'static, D: Send + Sync + 'static> ParallelTempering<S, D> {
    /// Builds a `ParallelTempering` with `replica_count` rungs between `t_min` and `t_max`
    /// (`t_min < t_max`, both strictly positive; `replica_count >= 1`).
    pub fn new(
        problem: Arc<Problem<S, D>>,
        neighbourhood: Arc<dyn Neighbourhood<S>>,
        replica_count: usize,
        t_min: f64,
        t_max: f64,
    ) -> Result<Self, ConfigurationError> {
        if replica_count == 0 {
            return Err(ConfigurationError::NonPositiveReplicaCount { count: replica_count });
        }
        if t_min <= 0.0 || t_max <= 0.0 || t_min >= t_max {
            return Err(ConfigurationError::InvalidTemperatureRange { t_min, t_max });
        }
        let replicas = (0..replica_count)
            .map(|i| {
                let temperature = if replica_count == 1 {
                    t_min
                } else {
                    t_min + (i as f64) * (t_max - t_min) / ((replica_count - 1) as f64)
                };
                Replica {
                    core: SearchCore::new(Arc::clone(&problem), crate::rng::default_rng(), Vec::new()),
                    algorithm: MetropolisSearch::new(Arc::clone(&neighbourhood), temperature),
                }
            })
            .collect();
        Ok(ParallelTempering { replicas, round: 0, replica_steps: 500 })
    }

    /// Overrides the default step budget (`500`) each replica is given per global step before
    /// the swap phase runs.
    pub fn with_replica_steps(mut self, replica_steps: u64) -> Self {
        self.replica_steps = replica_steps;
        self
    }

    /// The temperature ladder, lowest to highest.
    pub fn temperatures(&self) -> Vec<f64> {
        self.replicas.iter().map(|r| r.algorithm.temperature()).collect()
    }

    fn attempt_swaps(&mut self, core: &mut SearchCore<S, D>) {
        let minimizing = core.problem().is_minimizing();
        let offset = (self.round % 2) as usize;
        let mut i = offset;
        while i + 1 < self.replicas.len() {
            self.attempt_swap(i, i + 1, minimizing);
            i += 2;
        }
        self.round += 1;
    }

    fn attempt_swap(&mut self, i: usize, j: usize, minimizing: bool) {
        let (value_i, value_j) = match (
            self.replicas[i].core.current().map(|c| c.evaluation().value(minimizing)),
            self.replicas[j].core.current().map(|c| c.evaluation().value(minimizing)),
        ) {
            (Some(vi), Some(vj)) => (vi, vj),
            _ => return,
        };
        let energy = |value: f64| if minimizing { value } else { -value };
        let (energy_i, energy_j) = (energy(value_i), energy(value_j));
        let beta_i = 1.0 / self.replicas[i].algorithm.temperature();
        let beta_j = 1.0 / self.replicas[j].algorithm.temperature();
        let exponent = (beta_i - beta_j) * (energy_i - energy_j);
        let accept = if exponent >= 0.0 {
            true
        } else {
            self.replicas[i].core.random_unit() < exponent.exp()
        };
        if !accept {
            return;
        }
        let solution_i = self.replicas[i]
            .core
            .current()
            .expect("checked above")
            .solution()
            .clone();
        let solution_j = self.replicas[j]
            .core
            .current()
            .expect("checked above")
            .solution()
            .clone();
        self.replicas[i].core.install_swapped_solution(solution_j);
        self.replicas[j].core.install_swapped_solution(solution_i);
    }
}

impl<S, D> SearchStep<S, D> for ParallelTempering<S, D>
where
    S: Clone + Send + Sync,
    D: Send + Sync,
{
    fn init(&mut self, core: &mut SearchCore<S, D>) -> Result<(), SearchException> {
        let seed_solution = core.current().map(|c| c.solution().clone());
        for replica in &mut self.replicas {
            match &seed_solution {
                Some(solution) => replica.core.update_current_solution(solution.clone()),
                None => {
                    let solution = core.problem().create_random(replica.core.rng());
                    replica.core.update_current_solution(solution);
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException> {
        let error: Mutex<Option<SearchException>> = Mutex::new(None);
        let replica_steps = self.replica_steps;
        rayon::scope(|scope| {
            for replica in self.replicas.iter_mut() {
                let error = &error;
                scope.spawn(move |_| {
                    for _ in 0..replica_steps {
                        match replica.algorithm.step(&mut replica.core) {
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

        self.attempt_swaps(core);

        let minimizing = core.problem().is_minimizing();
        let leader = self
            .replicas
            .iter()
            .filter_map(|r| r.core.current().map(|c| (c.solution().clone(), c.evaluation().value(minimizing))))
            .reduce(|best, candidate| {
                let is_better = if minimizing {
                    candidate.1 < best.1
                } else {
                    candidate.1 > best.1
                };
                if is_better {
                    candidate
                } else {
                    best
                }
            });
        if let Some((leader_solution, _)) = leader {
            core.update_current_solution(leader_solution);
        }
        for replica in &self.replicas {
            if let Some(best) = replica.core.best() {
                core.observe(best.solution());
            }
        }
        Ok(StepOutcome::Continue)
    }
}
