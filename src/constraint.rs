//! Contains the [`Constraint`] and [`PenalizingConstraint`] traits: pure functions computing
//! [`Validation`][crate::validation::Validation] values from a solution and the problem data.

use crate::error::IncompatibleDelta;
use crate::moves::Move;
use crate::validation::{PenalizingValidation, Validation};

/// A mandatory constraint: a solution that fails any mandatory constraint is invalid and is
/// never recorded as a best solution.
pub trait Constraint<S, D>: Send + Sync {
    /// Computes the full [`Validation`] of `solution` given the problem `data`.
    fn validate(&self, solution: &S, data: &D) -> Box<dyn Validation>;

    /// Computes the [`Validation`] after `mov` would be applied, given `current_solution`'s
    /// prior validation. Mirrors [`Objective::evaluate_delta`][crate::objective::Objective::evaluate_delta]:
    /// the default applies the move, validates, and undoes the move.
    fn validate_delta(
        &self,
        mov: &dyn Move<S>,
        current_solution: &mut S,
        _current_validation: &dyn Validation,
        data: &D,
    ) -> Result<Box<dyn Validation>, IncompatibleDelta> {
        mov.apply(current_solution);
        let validation = self.validate(current_solution, data);
        mov.undo(current_solution);
        Ok(validation)
    }

    /// A human-readable name, used for diagnostics (e.g.
    /// [`Problem::violated_constraints`][crate::problem::Problem::violated_constraints]).
    fn name(&self) -> &str;
}

/// A soft constraint: violating it never invalidates the solution, but instead adds a signed
/// penalty to the evaluated score via [`PenalizedEvaluation`][crate::evaluation::PenalizedEvaluation].
pub trait PenalizingConstraint<S, D>: Send + Sync {
    /// Computes the full [`PenalizingValidation`] of `solution` given the problem `data`.
    fn validate(&self, solution: &S, data: &D) -> PenalizingValidation;

    /// Computes the [`PenalizingValidation`] after `mov` would be applied, given
    /// `current_solution`'s prior validation. Mirrors [`Constraint::validate_delta`].
    fn validate_delta(
        &self,
        mov: &dyn Move<S>,
        current_solution: &mut S,
        _current_validation: &PenalizingValidation,
        data: &D,
    ) -> Result<PenalizingValidation, IncompatibleDelta> {
        mov.apply(current_solution);
        let validation = self.validate(current_solution, data);
        mov.undo(current_solution);
        Ok(validation)
    }

    /// A human-readable name, used for diagnostics.
    fn name(&self) -> &str;
}
