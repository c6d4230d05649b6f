//! Contains the [`Solution`] trait, the opaque carrier of a candidate answer.

use std::fmt;

/// A candidate answer to the combinatorial optimization problem.
///
/// * `copy(s) == s`, and mutating the copy must never mutate `s` (enforced by requiring
///   [`Clone`], whose contract is exactly "an independent instance equal by content").
/// * Content equality and a stable hash are required so that solutions can be placed in the
///   full-solution tabu memory ([`NeverForgetTabuMemory`][crate::algorithms::tabu::memory::NeverForgetTabuMemory]).
/// * [`Display`][fmt::Display] gives a human-readable rendering, used by the default
///   [`SearchListener`][crate::listener::SearchListener].
///
/// Solutions are mutated in place only by [`Move::apply`][crate::moves::Move::apply]/
/// [`undo`][crate::moves::Move::undo]; the search engine otherwise treats them as values,
/// cloning on read (`best_solution()`, `current_solution()`).
pub trait Solution: Clone + PartialEq + Eq + std::hash::Hash + fmt::Display + Send + Sync {}

impl<T> Solution for T where T: Clone + PartialEq + Eq + std::hash::Hash + fmt::Display + Send + Sync
{}
