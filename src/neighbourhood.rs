//! Contains the [`Neighbourhood`] trait, a factory over [`Moves`][crate::moves::Move] for a
//! given current solution.

use rand::rngs::StdRng;

use crate::moves::Move;

/// The set of solutions reachable from a given solution by a single move, represented by the
/// factory that produces those moves.
///
/// * `random_move` returns `None` iff `all_moves` is empty for that solution — every concrete
///   neighbourhood must keep this invariant (typically by reservoir-sampling over the same
///   candidate set `all_moves` enumerates).
/// * Moves returned must be applicable to the given solution.
/// * Enumeration in `all_moves` may be in any order unless a concrete neighbourhood documents
///   otherwise.
pub trait Neighbourhood<S>: Send + Sync {
    /// Draws a single uniformly random move, using `rng`. Returns `None` iff [`all_moves`] is
    /// empty for `solution`.
    fn random_move(&self, solution: &S, rng: &mut StdRng) -> Option<Box<dyn Move<S>>>;

    /// Enumerates every move applicable to `solution`.
    fn all_moves<'a>(&'a self, solution: &'a S) -> Box<dyn Iterator<Item = Box<dyn Move<S>>> + 'a>;
}
