//! Contains the [`Move`] trait: an apply/undo transformation on a
//! [`Solution`][crate::solution::Solution].

use std::any::Any;

/// Holds the parameters of a single transformation of a solution.
///
/// * `apply` mutates `solution` in place.
/// * `undo` restores `solution` to the state observed immediately before the paired `apply`.
///   `undo` is only guaranteed to work when `solution` has not been modified between the
///   paired `apply`/`undo`, and when called at most once per `apply`.
///
/// [`as_any`] is the escape hatch that lets delta evaluators/validators recover the concrete
/// move type behind the trait object (see [`IncompatibleDelta`][crate::error::IncompatibleDelta]);
/// it is the closed-sum-type redesign called for in the design notes: the core owns a closed
/// set of known move kinds (the subset moves) and falls back to `as_any`-based downcasting for
/// opaque, user-defined moves.
pub trait Move<S>: Any + Send + Sync {
    /// Mutates `solution` to reflect this move.
    fn apply(&self, solution: &mut S);

    /// Restores `solution` to the state observed immediately before the paired `apply`.
    fn undo(&self, solution: &mut S);

    /// Returns `self` as `&dyn Any`, so that delta evaluators/validators can downcast to a
    /// known move kind.
    fn as_any(&self) -> &dyn Any;
}
