//! The search lifecycle: [`SearchStatus`], the [`Search`] state machine that owns it, and
//! [`SearchCore`] (in [`core`]), the counters/best-so-far bookkeeping every algorithm shares.
//!
//! A [`Search`] is a thin, algorithm-agnostic shell around a [`SearchCore`] and a
//! [`SearchStep`] implementation (one per algorithm in [`crate::algorithms`]). It owns exactly
//! the state needed to answer "is this search idle, running, or winding down" and to run the
//! cooperative stop-criterion checker on its own background thread, so that algorithms
//! themselves only ever have to implement one method: `step`.
//!
//! ```text
//!       start()                 (stop-criterion fires, or
//!  Idle ───────► Initializing ─► Running ─► Terminating ─► Idle
//!                                   ▲  stop()        dispose()
//!                                   └───────────────┘           Disposed
//! ```

pub mod core;

pub use core::SearchCore;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::error::{SearchException, StatusError};
use crate::evaluation::Evaluation;
use crate::stop_criterion::{SearchProgress, StopCriterionChecker};
use crate::validation::Validation;

/// Observes the lifecycle of a [`Search`]. See [`crate::listener`] for the trait and the
/// bundled [`LoggingListener`][crate::listener::LoggingListener].
pub use crate::listener::SearchListener;

/// The lifecycle state of a [`Search`]. `Idle` is both the initial state and the state every
/// run returns to; `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Not running. The only state in which `set_current_solution`, `start`, and `dispose` are
    /// accepted.
    Idle,
    /// `start` has been called; the algorithm's `init` is running and the current solution is
    /// being established (a random one, if none was set).
    Initializing,
    /// The `searchStep`/stop-criterion loop is executing.
    Running,
    /// A stop condition fired or `stop()` was called; the loop is unwinding and listeners are
    /// being notified.
    Terminating,
    /// `dispose()` has been called; the search can no longer be started.
    Disposed,
}

/// What an algorithm's `step` returns: whether the search should keep stepping, or has reached
/// a terminal condition of its own (e.g. steepest descent finding no improving neighbour).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep calling `step`.
    Continue,
    /// The algorithm has nothing further to do; stop the search.
    Stop,
}

/// The one method every local-search algorithm implements: advance the search by exactly one
/// step, mutating `core`'s current (and, transitively, best) solution.
///
/// `init` runs once, after a current solution has been established (either by an earlier
/// `set_current_solution` or, absent that, a fresh random solution) and before the first
/// `step` — algorithms that carry their own state (tabu memory, a replica ladder) set it up
/// here.
pub trait SearchStep<S, D>: Send + Sync {
    /// One-time setup, run once per `start()` after the initial current solution is in place.
    fn init(&mut self, core: &mut SearchCore<S, D>) -> Result<(), SearchException> {
        let _ = core;
        Ok(())
    }

    /// Advances the search by one step.
    fn step(&mut self, core: &mut SearchCore<S, D>) -> Result<StepOutcome, SearchException>;
}

/// A running (or idle) local search: a [`SearchCore`] plus the [`SearchStep`] algorithm driving
/// it, and the status/stop-request bookkeeping shared by every algorithm.
pub struct Search<S, D, A> {
    core: SearchCore<S, D>,
    algorithm: A,
    status: SearchStatus,
    stop_requested: Arc<AtomicBool>,
    checker_fired: Arc<AtomicBool>,
    checker: Option<Arc<StopCriterionChecker>>,
    progress: Arc<Mutex<SearchProgress>>,
    checker_thread: Option<JoinHandle<()>>,
}

impl<S, D, A> Search<S, D, A>
where
    S: Clone + Send + 'static,
    D: Send + Sync + 'static,
    A: SearchStep<S, D>,
{
    /// Builds an idle search around `core` and `algorithm`, optionally with a
    /// [`StopCriterionChecker`] polling on its own background thread.
    pub fn new(core: SearchCore<S, D>, algorithm: A, checker: Option<StopCriterionChecker>) -> Self {
        Search {
            core,
            algorithm,
            status: SearchStatus::Idle,
            stop_requested: Arc::new(AtomicBool::new(false)),
            checker_fired: Arc::new(AtomicBool::new(false)),
            checker: checker.map(Arc::new),
            progress: Arc::new(Mutex::new(SearchProgress::initial())),
            checker_thread: None,
        }
    }

    /// The current lifecycle status.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// The current solution and its evaluation/validation, if one has been established.
    pub fn current_solution(&self) -> Option<(&S, &dyn Evaluation, &dyn Validation)> {
        self.core
            .current()
            .map(|c| (c.solution(), c.evaluation(), c.validation()))
    }

    /// The best solution observed so far and its evaluation/validation, if any valid solution
    /// has been observed.
    pub fn best_solution(&self) -> Option<(&S, &dyn Evaluation, &dyn Validation)> {
        self.core.best().map(|b| (b.solution(), b.evaluation(), b.validation()))
    }

    /// Total steps completed across all runs of this search.
    pub fn total_steps(&self) -> u64 {
        self.core.total_steps()
    }

    /// Direct access to the underlying core, for algorithm-specific accessors.
    pub fn core(&self) -> &SearchCore<S, D> {
        &self.core
    }

    /// Explicitly sets the current solution before starting. Only valid while `Idle`.
    pub fn set_current_solution(&mut self, solution: S) -> Result<(), StatusError> {
        self.require_idle()?;
        self.core.update_current_solution(solution);
        Ok(())
    }

    fn require_idle(&self) -> Result<(), StatusError> {
        if self.status == SearchStatus::Idle {
            Ok(())
        } else {
            Err(StatusError(self.status))
        }
    }

    /// Runs the search to completion: establishes a current solution if none was set
    /// (generating one at random), runs the algorithm's `init`, then repeatedly calls `step`
    /// until the algorithm signals [`StepOutcome::Stop`], `stop()` is called from another
    /// thread, or the stop-criterion checker fires.
    ///
    /// Blocking: returns only once the run has wound down to `Idle`.
    pub fn start(&mut self) -> Result<(), SearchException> {
        self.require_idle()?;
        self.status = SearchStatus::Initializing;
        self.stop_requested.store(false, Ordering::SeqCst);
        self.checker_fired.store(false, Ordering::SeqCst);

        if self.core.current().is_none() {
            let problem = Arc::clone(self.core.problem());
            let solution = problem.create_random(self.core.rng());
            self.core.update_current_solution(solution);
        }

        let init_result = self.algorithm.init(&mut self.core);
        if let Err(err) = init_result {
            self.status = SearchStatus::Idle;
            return Err(err);
        }

        self.core.mark_started();
        self.status = SearchStatus::Running;
        *self.progress.lock().expect("progress mutex poisoned") = self.core.progress();

        self.spawn_checker_thread();

        let run_result = self.run_loop();

        self.stop_requested.store(true, Ordering::SeqCst);
        self.status = SearchStatus::Terminating;
        self.core.mark_stopped();
        if let Some(handle) = self.checker_thread.take() {
            let _ = handle.join();
        }
        self.status = SearchStatus::Idle;

        run_result
    }

    fn run_loop(&mut self) -> Result<(), SearchException> {
        loop {
            if self.stop_requested.load(Ordering::SeqCst) || self.checker_fired.load(Ordering::SeqCst) {
                return Ok(());
            }
            let step_start = Instant::now();
            let outcome = self.algorithm.step(&mut self.core)?;
            self.core.complete_step(step_start.elapsed());
            *self.progress.lock().expect("progress mutex poisoned") = self.core.progress();
            if outcome == StepOutcome::Stop {
                return Ok(());
            }
        }
    }

    fn spawn_checker_thread(&mut self) {
        let Some(checker) = self.checker.clone() else {
            return;
        };
        let stop_requested = Arc::clone(&self.stop_requested);
        let checker_fired = Arc::clone(&self.checker_fired);
        let progress = Arc::clone(&self.progress);
        let interval = checker.interval();
        let listeners: Vec<Arc<dyn SearchListener<S>>> = self.core.listeners().to_vec();
        self.checker_thread = Some(std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if stop_requested.load(Ordering::SeqCst) {
                return;
            }
            let snapshot = *progress.lock().expect("progress mutex poisoned");
            for listener in &listeners {
                listener.stop_criterion_checked();
            }
            if checker.should_stop(&snapshot) {
                checker_fired.store(true, Ordering::SeqCst);
                return;
            }
        }));
    }

    /// Requests the current run to stop after its in-flight step completes. Idempotent, and a
    /// no-op if the search is not running.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Releases this search permanently. Only valid while `Idle`.
    pub fn dispose(&mut self) -> Result<(), StatusError> {
        self.require_idle()?;
        self.status = SearchStatus::Disposed;
        Ok(())
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
