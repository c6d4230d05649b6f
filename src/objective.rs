//! Contains the [`Objective`] trait: a pure function computing an
//! [`Evaluation`][crate::evaluation::Evaluation] from a solution and the problem data.

use crate::error::IncompatibleDelta;
use crate::evaluation::Evaluation;
use crate::moves::Move;

/// Computes the numeric quality of a solution. An objective instance is stable and constant
/// throughout a search: `is_minimizing()` never changes for a given instance.
pub trait Objective<S, D>: Send + Sync {
    /// Computes the full [`Evaluation`] of `solution` given the problem `data`.
    fn evaluate(&self, solution: &S, data: &D) -> Box<dyn Evaluation>;

    /// Computes the [`Evaluation`] of `current_solution` after `mov` would be applied, given
    /// `current_solution`'s prior evaluation, without requiring the caller to mutate
    /// `current_solution`.
    ///
    /// The default implementation applies the move, evaluates, and undoes the move — correct
    /// for every [`Move`] but forgoing the performance benefit of a true delta. Override this
    /// whenever a closed-form incremental update exists; this is the primary performance lever
    /// of the framework. Implementations that only support a known closed set of move kinds
    /// should downcast via [`Move::as_any`] and return [`IncompatibleDelta`] for anything else.
    fn evaluate_delta(
        &self,
        mov: &dyn Move<S>,
        current_solution: &mut S,
        _current_evaluation: &dyn Evaluation,
        data: &D,
    ) -> Result<Box<dyn Evaluation>, IncompatibleDelta> {
        mov.apply(current_solution);
        let evaluation = self.evaluate(current_solution, data);
        mov.undo(current_solution);
        Ok(evaluation)
    }

    /// Whether this objective is to be minimised (`true`) or maximised (`false`). A stable
    /// property of the objective instance.
    fn is_minimizing(&self) -> bool;
}
