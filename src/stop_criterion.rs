//! Contains the [`StopCriterion`] trait and the common criteria, plus [`SearchProgress`], the
//! cheap snapshot they are checked against.

use std::time::Duration;

/// A cheap, point-in-time snapshot of a running search's progress. Checking a
/// [`StopCriterion`] against a `SearchProgress` never invokes the objective — this is what
/// keeps the stop-criterion checker cheap enough to run on its own cooperative background
/// task.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    /// Total completed steps so far.
    pub total_steps: u64,
    /// Wall-clock time elapsed since the search started.
    pub elapsed: Duration,
    /// Steps completed since the last best-solution improvement.
    pub steps_since_improvement: u64,
    /// Wall-clock time elapsed since the last best-solution improvement.
    pub time_since_improvement: Duration,
    /// The current best evaluation's orientation-aware value, if a valid solution has been
    /// seen yet.
    pub best_value: Option<f64>,
    /// The signed magnitude of the most recent best-solution improvement, if any occurred yet.
    pub last_improvement_delta: Option<f64>,
}

impl SearchProgress {
    /// The initial snapshot, before any step has completed.
    pub fn initial() -> Self {
        SearchProgress {
            total_steps: 0,
            elapsed: Duration::ZERO,
            steps_since_improvement: 0,
            time_since_improvement: Duration::ZERO,
            best_value: None,
            last_improvement_delta: None,
        }
    }
}

/// A termination oracle, polled periodically by the
/// [`StopCriterionChecker`][crate::stop_criterion::StopCriterionChecker] owned by a running
/// search.
pub trait StopCriterion: Send + Sync {
    /// Whether the search should stop, given the current progress snapshot. Must never invoke
    /// the objective or constraints.
    fn should_stop(&self, progress: &SearchProgress) -> bool;
}

/// Stops once the search has run for at least `max_runtime`.
pub struct MaxRuntime(pub Duration);
impl StopCriterion for MaxRuntime {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.elapsed >= self.0
    }
}

/// Stops once `max_steps` steps have completed.
pub struct MaxSteps(pub u64);
impl StopCriterion for MaxSteps {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.total_steps >= self.0
    }
}

/// Stops once `max_steps_without_improvement` steps have completed without a best-solution
/// improvement.
pub struct MaxStepsWithoutImprovement(pub u64);
impl StopCriterion for MaxStepsWithoutImprovement {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.steps_since_improvement >= self.0
    }
}

/// Stops once `max_time_without_improvement` has elapsed without a best-solution improvement.
pub struct MaxTimeWithoutImprovement(pub Duration);
impl StopCriterion for MaxTimeWithoutImprovement {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.time_since_improvement >= self.0
    }
}

/// Stops once the most recent best-solution improvement was smaller in magnitude than
/// `min_delta` (the search has converged to the point of diminishing returns). Has no effect
/// until at least one improvement has been observed.
pub struct MinDeltaThreshold(pub f64);
impl StopCriterion for MinDeltaThreshold {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress
            .last_improvement_delta
            .is_some_and(|delta| delta.abs() < self.0)
    }
}

/// Stops once the best evaluation reaches or surpasses `target`, given the problem's
/// orientation.
pub struct TargetValueReached {
    /// The target value.
    pub target: f64,
    /// Whether the objective is minimised (`true`) or maximised (`false`).
    pub minimizing: bool,
}
impl StopCriterion for TargetValueReached {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        match progress.best_value {
            Some(value) if self.minimizing => value <= self.target,
            Some(value) => value >= self.target,
            None => false,
        }
    }
}

/// Owns a collection of [`StopCriterion`] predicates and the interval at which a running
/// search's background task polls them (default 1s).
pub struct StopCriterionChecker {
    criteria: Vec<Box<dyn StopCriterion>>,
    interval: Duration,
}

impl StopCriterionChecker {
    /// Builds a checker with the default 1s polling interval.
    pub fn new(criteria: Vec<Box<dyn StopCriterion>>) -> Self {
        StopCriterionChecker {
            criteria,
            interval: Duration::from_secs(1),
        }
    }

    /// Builds a checker with an explicit polling interval.
    pub fn with_interval(criteria: Vec<Box<dyn StopCriterion>>, interval: Duration) -> Self {
        StopCriterionChecker { criteria, interval }
    }

    /// The configured polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether any criterion fires for `progress`.
    pub fn should_stop(&self, progress: &SearchProgress) -> bool {
        self.criteria.iter().any(|c| c.should_stop(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_steps_fires_at_threshold() {
        let checker = StopCriterionChecker::new(vec![Box::new(MaxSteps(10))]);
        let mut progress = SearchProgress::initial();
        progress.total_steps = 9;
        assert!(!checker.should_stop(&progress));
        progress.total_steps = 10;
        assert!(checker.should_stop(&progress));
    }

    #[test]
    fn target_value_reached_respects_orientation() {
        let minimizing = TargetValueReached {
            target: 5.0,
            minimizing: true,
        };
        assert!(minimizing.should_stop(&SearchProgress {
            best_value: Some(4.0),
            ..SearchProgress::initial()
        }));
        assert!(!minimizing.should_stop(&SearchProgress {
            best_value: Some(6.0),
            ..SearchProgress::initial()
        }));

        let maximizing = TargetValueReached {
            target: 5.0,
            minimizing: false,
        };
        assert!(maximizing.should_stop(&SearchProgress {
            best_value: Some(6.0),
            ..SearchProgress::initial()
        }));
    }
}
