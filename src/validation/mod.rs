//! Validation values: immutable, pluggable value objects answering "is this solution (or move)
//! admissible?".

mod subset;
mod unanimous;

pub use subset::SubsetValidation;
pub use unanimous::UnanimousValidation;

use std::any::Any;
use std::fmt;

/// Answers "passed?" for a solution or move against some set of constraints.
///
/// Validation values are immutable once returned to the search engine. The aggregate
/// containers ([`UnanimousValidation`], [`SubsetValidation`]) may be built up incrementally
/// during construction but are frozen on return.
pub trait Validation: fmt::Debug + Send + Sync {
    /// Whether the validated solution/move satisfies the constraint(s) this value describes.
    fn passed(&self) -> bool;

    /// Returns `self` as `&dyn Any`, so that aggregate validations can recover sub-results
    /// (e.g. [`Problem::validate_move`][crate::problem::Problem::validate_move] recomputing a
    /// constraint's prior validation).
    fn as_any(&self) -> &dyn Any;
}

/// The trivial validation: either unconditionally passed, or unconditionally failed. Used by
/// [`Problem::validate`][crate::problem::Problem::validate] when there are no mandatory
/// constraints, and by constraint implementations with boolean semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleValidation(bool);

impl SimpleValidation {
    /// The constant `PASSED` validation.
    pub const PASSED: SimpleValidation = SimpleValidation(true);
    /// The constant `FAILED` validation.
    pub const FAILED: SimpleValidation = SimpleValidation(false);

    /// Builds a [`SimpleValidation`] from a boolean.
    pub fn new(passed: bool) -> Self {
        SimpleValidation(passed)
    }
}

impl Validation for SimpleValidation {
    fn passed(&self) -> bool {
        self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A non-negative penalty magnitude attached to a soft (penalising) constraint. `passed()` is
/// `true` iff the penalty is zero; this has no bearing on mandatory-constraint aggregation —
/// [`PenalizingValidation`] values only ever feed into
/// [`PenalizedEvaluation`][crate::evaluation::PenalizedEvaluation].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenalizingValidation {
    penalty: f64,
}

impl PenalizingValidation {
    /// Builds a [`PenalizingValidation`] from a non-negative penalty magnitude.
    ///
    /// # Panics
    /// Panics if `penalty` is negative — a negative penalty is a programmer error in the
    /// [`PenalizingConstraint`][crate::constraint::PenalizingConstraint] implementation, not a
    /// recoverable runtime condition.
    pub fn new(penalty: f64) -> Self {
        assert!(penalty >= 0.0, "penalty must be non-negative, got {penalty}");
        PenalizingValidation { penalty }
    }

    /// The penalty magnitude.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

impl Validation for PenalizingValidation {
    fn passed(&self) -> bool {
        self.penalty == 0.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
