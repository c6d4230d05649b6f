//! Contains the [`RandomSolutionGenerator`] trait.

use rand::rngs::StdRng;

/// Produces independent random starting solutions.
///
/// `create` must produce an instance independent of any previously produced instance — no
/// shared mutable state may leak between calls.
pub trait RandomSolutionGenerator<S, D>: Send + Sync {
    /// Creates a new random solution for `data`, drawing randomness from `rng`.
    fn create(&self, rng: &mut StdRng, data: &D) -> S;
}
