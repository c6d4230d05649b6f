//! Contains [`SearchCore`], the best-so-far/counter/listener bookkeeping shared by every
//! neighbourhood-based algorithm, and the `accept`/`reject`/`is_improvement`/`best_move`
//! convenience operations described in the module documentation of [`super`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::error::IncompatibleDelta;
use crate::evaluation::{is_better, Evaluation};
use crate::moves::Move;
use crate::problem::Problem;
use crate::validation::Validation;

use super::SearchListener;

/// A solution together with its evaluation and validation, as held by [`SearchCore`] for the
/// current and best solution. Exposed to listeners and callers via copy-on-read accessors.
pub struct EvaluatedSolution<S> {
    solution: S,
    evaluation: Box<dyn Evaluation>,
    validation: Box<dyn Validation>,
}

impl<S> EvaluatedSolution<S> {
    fn new(solution: S, evaluation: Box<dyn Evaluation>, validation: Box<dyn Validation>) -> Self {
        EvaluatedSolution {
            solution,
            evaluation,
            validation,
        }
    }

    /// The solution.
    pub fn solution(&self) -> &S {
        &self.solution
    }

    /// Its evaluation.
    pub fn evaluation(&self) -> &dyn Evaluation {
        self.evaluation.as_ref()
    }

    /// Its validation.
    pub fn validation(&self) -> &dyn Validation {
        self.validation.as_ref()
    }

    /// Whether this solution satisfies all mandatory constraints.
    pub fn is_valid(&self) -> bool {
        self.validation.passed()
    }
}

/// The mutable state every [`Search`][super::Search] carries, regardless of which algorithm
/// drives its `searchStep`: the current and best solution (each with their evaluation and
/// validation), step/move counters, the dedicated RNG, and the registered listeners.
///
/// On every observed *valid* evaluated solution, if it is strictly better than the current
/// best under the objective's orientation (or if best is unset), the core replaces best with a
/// **copy** of the solution together with its evaluation and validation, and fires
/// `new_best_solution` listeners. Ties do not replace.
pub struct SearchCore<S, D> {
    problem: Arc<Problem<S, D>>,
    rng: StdRng,
    current: Option<EvaluatedSolution<S>>,
    best: Option<EvaluatedSolution<S>>,
    listeners: Vec<Arc<dyn SearchListener<S>>>,
    accepted_moves: u64,
    rejected_moves: u64,
    total_steps: u64,
    steps_since_improvement: u64,
    last_improvement_delta: Option<f64>,
    start_time: Option<Instant>,
    last_improvement_time: Option<Instant>,
    min_step_time: Option<Duration>,
    max_step_time: Option<Duration>,
}

impl<S: Clone, D> SearchCore<S, D> {
    /// Builds a fresh `SearchCore` for `problem`, with no current or best solution yet.
    pub fn new(problem: Arc<Problem<S, D>>, rng: StdRng, listeners: Vec<Arc<dyn SearchListener<S>>>) -> Self {
        SearchCore {
            problem,
            rng,
            current: None,
            best: None,
            listeners,
            accepted_moves: 0,
            rejected_moves: 0,
            total_steps: 0,
            steps_since_improvement: 0,
            last_improvement_delta: None,
            start_time: None,
            last_improvement_time: None,
            min_step_time: None,
            max_step_time: None,
        }
    }

    /// The problem this core is searching over.
    pub fn problem(&self) -> &Arc<Problem<S, D>> {
        &self.problem
    }

    /// Mutable access to this search's dedicated RNG.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// The current solution, if `update_current_solution` has been called.
    pub fn current(&self) -> Option<&EvaluatedSolution<S>> {
        self.current.as_ref()
    }

    /// The best solution observed so far, if any valid solution has been observed.
    pub fn best(&self) -> Option<&EvaluatedSolution<S>> {
        self.best.as_ref()
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener<S>>) {
        self.listeners.push(listener);
    }

    /// The registered listeners, for cloning onto the stop-criterion checker's background
    /// thread (which fires `stop_criterion_checked` independently of the main search loop).
    pub fn listeners(&self) -> &[Arc<dyn SearchListener<S>>] {
        &self.listeners
    }

    /// Marks the start of the run, for runtime accounting, and fires `search_started`.
    pub fn mark_started(&mut self) {
        self.start_time = Some(Instant::now());
        for listener in &self.listeners {
            listener.search_started();
        }
    }

    /// Fires `search_stopped`.
    pub fn mark_stopped(&self) {
        for listener in &self.listeners {
            listener.search_stopped();
        }
    }

    /// Total steps completed so far.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Steps completed since the last best-solution improvement.
    pub fn steps_since_improvement(&self) -> u64 {
        self.steps_since_improvement
    }

    /// Accepted-move counter.
    pub fn accepted_moves(&self) -> u64 {
        self.accepted_moves
    }

    /// Rejected-move counter.
    pub fn rejected_moves(&self) -> u64 {
        self.rejected_moves
    }

    /// Wall-clock time elapsed since the run started; `Duration::ZERO` before the first step.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Wall-clock time elapsed since the last best-solution improvement.
    pub fn time_since_improvement(&self) -> Duration {
        self.last_improvement_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// The smallest observed single-step duration, `None` before the first step.
    pub fn min_step_time(&self) -> Option<Duration> {
        self.min_step_time
    }

    /// The largest observed single-step duration, `None` before the first step.
    pub fn max_step_time(&self) -> Option<Duration> {
        self.max_step_time
    }

    /// Records the wall-clock duration of a completed step and fires `step_completed`.
    pub fn complete_step(&mut self, step_duration: Duration) {
        self.total_steps += 1;
        self.min_step_time = Some(match self.min_step_time {
            Some(min) => min.min(step_duration),
            None => step_duration,
        });
        self.max_step_time = Some(match self.max_step_time {
            Some(max) => max.max(step_duration),
            None => step_duration,
        });
        for listener in &self.listeners {
            listener.step_completed(self.total_steps);
        }
    }

    /// Replaces the current solution with a copy of `solution`, computing its full evaluation
    /// and validation, and updates the best-so-far if it is valid and better.
    pub fn update_current_solution(&mut self, solution: S) {
        let evaluation = self.problem.evaluate(&solution);
        let validation = self.problem.validate(&solution);
        self.set_current(EvaluatedSolution::new(solution, evaluation, validation));
    }

    /// A cheap progress snapshot for the stop-criterion checker.
    pub fn progress(&self) -> crate::stop_criterion::SearchProgress {
        let minimizing = self.problem.is_minimizing();
        crate::stop_criterion::SearchProgress {
            total_steps: self.total_steps,
            elapsed: self.elapsed(),
            steps_since_improvement: self.steps_since_improvement,
            time_since_improvement: self.time_since_improvement(),
            best_value: self.best.as_ref().map(|b| b.evaluation.value(minimizing)),
            last_improvement_delta: self.last_improvement_delta,
        }
    }

    /// Validates `mov` (via delta) against the current solution; if invalid, counts a
    /// rejection and returns `Ok(false)`. Otherwise evaluates `mov` (via delta), applies it to
    /// the current solution, installs the new evaluation/validation, updates best-so-far if
    /// improved, counts an acceptance, and returns `Ok(true)`.
    pub fn accept(&mut self, mov: &dyn Move<S>) -> Result<bool, IncompatibleDelta> {
        let current = self.current.as_mut().expect("accept requires a current solution");
        let new_validation = self
            .problem
            .validate_delta(mov, &mut current.solution, current.validation.as_ref())?;
        if !new_validation.passed() {
            self.rejected_moves += 1;
            self.steps_since_improvement += 1;
            return Ok(false);
        }
        let new_evaluation = self
            .problem
            .evaluate_delta(mov, &mut current.solution, current.evaluation.as_ref())?;
        mov.apply(&mut current.solution);
        let new_solution = current.solution.clone();
        self.accepted_moves += 1;
        let improved = self.set_current(EvaluatedSolution::new(new_solution, new_evaluation, new_validation));
        if !improved {
            self.steps_since_improvement += 1;
        }
        Ok(true)
    }

    /// Counts a rejection without changing any state.
    pub fn reject(&mut self) {
        self.rejected_moves += 1;
        self.steps_since_improvement += 1;
    }

    /// Validates `mov` (via delta); if invalid, returns `Ok(false)`. Otherwise evaluates `mov`
    /// (via delta) and compares it against the current evaluation under the objective's
    /// orientation.
    ///
    /// Special case: if the current solution is itself invalid, any move yielding a valid
    /// neighbour counts as an improvement — this lets the search escape an invalid start.
    pub fn is_improvement(&mut self, mov: &dyn Move<S>) -> Result<bool, IncompatibleDelta> {
        let current = self.current.as_mut().expect("is_improvement requires a current solution");
        let new_validation = self
            .problem
            .validate_delta(mov, &mut current.solution, current.validation.as_ref())?;
        if !new_validation.passed() {
            return Ok(false);
        }
        if !current.validation.passed() {
            return Ok(true);
        }
        let new_evaluation = self
            .problem
            .evaluate_delta(mov, &mut current.solution, current.evaluation.as_ref())?;
        let minimizing = self.problem.is_minimizing();
        Ok(is_better(new_evaluation.as_ref(), current.evaluation.as_ref(), minimizing))
    }

    /// Iterates `moves`, skipping those `filter` rejects, and returns the best valid move by
    /// delta evaluation.
    ///
    /// * If `accept_first_improvement` is set and a strictly improving move is found, it is
    ///   returned immediately.
    /// * If `require_improvement` is set and no improving move exists among the valid moves,
    ///   returns `Ok(None)`.
    /// * Otherwise returns the best valid move even if it does not improve on the current
    ///   solution (used by tabu search, which always moves to the best admissible neighbour).
    pub fn best_move(
        &mut self,
        moves: impl Iterator<Item = Box<dyn Move<S>>>,
        require_improvement: bool,
        accept_first_improvement: bool,
        filter: Option<&dyn Fn(&dyn Move<S>) -> bool>,
    ) -> Result<Option<Box<dyn Move<S>>>, IncompatibleDelta> {
        let minimizing = self.problem.is_minimizing();
        let mut best: Option<(Box<dyn Move<S>>, f64, bool)> = None; // (move, value, is_improvement)
        for mov in moves {
            if let Some(filter) = filter {
                if !filter(mov.as_ref()) {
                    continue;
                }
            }
            let current = self.current.as_mut().expect("best_move requires a current solution");
            let new_validation =
                self.problem
                    .validate_delta(mov.as_ref(), &mut current.solution, current.validation.as_ref())?;
            if !new_validation.passed() {
                continue;
            }
            let new_evaluation =
                self.problem
                    .evaluate_delta(mov.as_ref(), &mut current.solution, current.evaluation.as_ref())?;
            let value = new_evaluation.value(minimizing);
            let is_improvement = if !current.validation.passed() {
                true
            } else {
                is_better(new_evaluation.as_ref(), current.evaluation.as_ref(), minimizing)
            };
            let better_than_best = match &best {
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
                best = Some((mov, value, is_improvement));
            }
            if accept_first_improvement && is_improvement {
                break;
            }
        }
        match best {
            Some((mov, _, is_improvement)) => {
                if require_improvement && !is_improvement {
                    Ok(None)
                } else {
                    Ok(Some(mov))
                }
            }
            None => Ok(None),
        }
    }

    /// Considers `solution` for best-so-far, without changing the current solution or firing
    /// `new_current_solution` listeners. Used by composite algorithms
    /// (`ParallelTempering`, `BasicParallelSearch`) that track several independent
    /// current-solution slots internally and want to report improvements to a single parent
    /// core without claiming any one slot as *the* current solution.
    pub fn observe(&mut self, solution: &S) {
        let evaluation = self.problem.evaluate(solution);
        let validation = self.problem.validate(solution);
        let candidate = EvaluatedSolution::new(solution.clone(), evaluation, validation);
        self.consider_best(&candidate);
    }

    /// Validates and evaluates `mov` (via delta) against the current solution without
    /// mutating anything: `Ok(Some(value))` if the move would be valid, `Ok(None)` if it would
    /// not. Used by algorithms (tabu search, variable neighbourhood search) that need a move's
    /// candidate value alongside side information (tabu status, a shake level) before deciding
    /// whether to take it.
    pub fn evaluate_move(&mut self, mov: &dyn Move<S>) -> Result<Option<f64>, IncompatibleDelta> {
        let minimizing = self.problem.is_minimizing();
        let current = self.current.as_mut().expect("evaluate_move requires a current solution");
        let new_validation =
            self.problem
                .validate_delta(mov, &mut current.solution, current.validation.as_ref())?;
        if !new_validation.passed() {
            return Ok(None);
        }
        let new_evaluation =
            self.problem
                .evaluate_delta(mov, &mut current.solution, current.evaluation.as_ref())?;
        Ok(Some(new_evaluation.value(minimizing)))
    }

    /// Draws a uniformly random `f64` in `[0, 1)` from this core's dedicated RNG — the
    /// acceptance-probability coin flip shared by `MetropolisSearch` and `ParallelTempering`.
    pub fn random_unit(&mut self) -> f64 {
        use rand::Rng;
        self.rng.gen::<f64>()
    }

    /// Installs `solution` as the current solution with a freshly computed evaluation and
    /// validation — used by parallel tempering's swap phase, which exchanges raw solutions
    /// between replicas and lets each replica re-derive its own evaluation/validation against
    /// its own (shared) problem.
    pub fn install_swapped_solution(&mut self, solution: S) {
        self.update_current_solution(solution);
    }

    fn set_current(&mut self, candidate: EvaluatedSolution<S>) -> bool {
        let improved = self.consider_best(&candidate);
        for listener in &self.listeners {
            listener.new_current_solution(&candidate.solution, candidate.evaluation.as_ref(), candidate.validation.as_ref());
        }
        self.current = Some(candidate);
        improved
    }

    fn consider_best(&mut self, candidate: &EvaluatedSolution<S>) -> bool {
        if !candidate.is_valid() {
            return false;
        }
        let minimizing = self.problem.is_minimizing();
        let is_improvement = match &self.best {
            None => true,
            Some(best) => is_better(candidate.evaluation.as_ref(), best.evaluation.as_ref(), minimizing),
        };
        if !is_improvement {
            return false;
        }
        let delta = self.best.as_ref().map(|best| {
            crate::evaluation::signed_delta(candidate.evaluation.as_ref(), best.evaluation.as_ref(), minimizing)
        });
        let copied_evaluation = self.problem.evaluate(&candidate.solution);
        let copied_validation = self.problem.validate(&candidate.solution);
        let copy = EvaluatedSolution::new(candidate.solution.clone(), copied_evaluation, copied_validation);
        for listener in &self.listeners {
            listener.new_best_solution(&copy.solution, copy.evaluation.as_ref(), copy.validation.as_ref());
        }
        self.best = Some(copy);
        self.steps_since_improvement = 0;
        self.last_improvement_time = Some(Instant::now());
        self.last_improvement_delta = delta;
        true
    }
}
