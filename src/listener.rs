//! Contains the [`SearchListener`] trait: an observer of search lifecycle events, and the
//! default logging listener.

use std::fmt;

use crate::evaluation::Evaluation;
use crate::validation::Validation;

/// Observes the lifecycle of a [`Search`][crate::search::Search]. All methods are optional
/// (no-op by default); implement only the ones you care about.
///
/// Ordering guarantee within a single-threaded search: `search_started` → (`searchStep`
/// interleaved with `step_completed`) → `search_stopped`. `new_best_solution` is fired
/// synchronously from whatever thread mutated the best-so-far; in
/// [`ParallelTempering`][crate::algorithms::parallel_tempering::ParallelTempering] this happens
/// under the parent's best-solution mutex, so listeners always observe a consistent
/// (solution, evaluation, validation) triple.
///
/// A listener callback that panics aborts the current step
/// ([`SearchException::ListenerFailure`][crate::error::SearchException::ListenerFailure]).
pub trait SearchListener<S>: Send + Sync {
    /// Fired once, after `init`, before the first `searchStep`.
    fn search_started(&self) {}

    /// Fired once, when the search transitions to `Terminating`.
    fn search_stopped(&self) {}

    /// Fired whenever the tracked best solution is replaced (strict improvement, or the first
    /// valid solution observed).
    fn new_best_solution(&self, solution: &S, evaluation: &dyn Evaluation, validation: &dyn Validation) {
        let _ = (solution, evaluation, validation);
    }

    /// Fired whenever the current solution changes (acceptance of a move, or an explicit
    /// `set_current_solution`).
    fn new_current_solution(&self, solution: &S, evaluation: &dyn Evaluation, validation: &dyn Validation) {
        let _ = (solution, evaluation, validation);
    }

    /// Fired after each completed `searchStep`, with the total number of steps taken so far.
    fn step_completed(&self, steps_so_far: u64) {
        let _ = steps_so_far;
    }

    /// Fired each time the stop-criterion checker polls its criteria.
    fn stop_criterion_checked(&self) {}
}

/// The default [`SearchListener`]: logs lifecycle events through the `log` facade (`info!` for
/// start/stop/new-best, `debug!` for step completion, `trace!` for stop-criterion polls). No
/// logger implementation is bundled; the host binary picks one, matching this crate's
/// library-not-application posture.
pub struct LoggingListener;

impl<S: fmt::Display> SearchListener<S> for LoggingListener {
    fn search_started(&self) {
        log::info!("search started");
    }

    fn search_stopped(&self) {
        log::info!("search stopped");
    }

    fn new_best_solution(&self, solution: &S, evaluation: &dyn Evaluation, _validation: &dyn Validation) {
        log::info!(
            "new best solution: {} (value={:0.4})",
            solution,
            evaluation.value(true)
        );
    }

    fn new_current_solution(&self, solution: &S, evaluation: &dyn Evaluation, _validation: &dyn Validation) {
        log::debug!(
            "new current solution: {} (value={:0.4})",
            solution,
            evaluation.value(true)
        );
    }

    fn step_completed(&self, steps_so_far: u64) {
        log::debug!("step {steps_so_far} completed");
    }

    fn stop_criterion_checked(&self) {
        log::trace!("stop criteria checked");
    }
}
