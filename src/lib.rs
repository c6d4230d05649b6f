#![warn(missing_docs)]
//! This library provides a metaheuristic framework for single-solution (trajectory) local
//! search over combinatorial optimization problems.
//!
//! # Overview
//! ### Algorithms
//! The following [algorithms][algorithms] are included, all driving the same
//! [`Search`][search::Search] state machine:
//! - [random descent][algorithms::random_descent] and [steepest
//!   descent][algorithms::steepest_descent]
//! - [tabu search][algorithms::tabu] (five [tabu-memory][algorithms::tabu::memory] strategies,
//!   an aspiration criterion, and a first-best-admissible variant)
//! - [Metropolis search][algorithms::metropolis] and [parallel
//!   tempering][algorithms::parallel_tempering] (a replica ladder of Metropolis searches
//!   exchanging solutions across OS threads)
//! - [variable neighbourhood search][algorithms::variable_neighbourhood]
//! - [piped][algorithms::piped] and [basic parallel][algorithms::basic_parallel] composition of
//!   independent searches
//! - [exhaustive search][algorithms::exhaustive] over small solution spaces
//! - [greedy subset construction][algorithms::lr_subset]
//!
//! ### Problem model
//! A [`Problem`][problem::Problem] composes an [`Objective`][objective::Objective], mandatory
//! [`Constraint`s][constraint::Constraint], penalising
//! [`PenalizingConstraint`s][constraint::PenalizingConstraint], and a
//! [`RandomSolutionGenerator`][random_generator::RandomSolutionGenerator]. Solutions are
//! mutated in place through [`Move`s][moves::Move] drawn from a
//! [`Neighbourhood`][neighbourhood::Neighbourhood]; every contract that can be evaluated
//! incrementally (objective, constraints) supports a delta form that is given the move and the
//! solution's *prior* evaluation/validation, avoiding a full recomputation at each step.
//!
//! ### Representative problem
//! As a worked example we provide a [subset-selection problem][subset]: choose a subset of a
//! fixed universe of ids, subject to an optional size range and comparator-based ordering, with
//! addition/deletion/swap moves and the neighbourhoods built from them.
//!
//! # How to use this library (step-by-step example)
//! Suppose you have a combinatorial optimization problem and a solution type that can be
//! mutated in place. To run a local-search algorithm you need to:
//! 1. Implement [`Solution`][solution::Solution] for your type (a blanket impl covers any
//!    `Clone + PartialEq + Eq + Hash + Display + Send + Sync`).
//! 2. Define [`Move`s][moves::Move] (`apply`/`undo`) and a [`Neighbourhood`][neighbourhood::Neighbourhood]
//!    that enumerates or samples them.
//! 3. Implement [`Objective`][objective::Objective] and any [`Constraint`s][constraint::Constraint].
//! 4. Compose them, along with a [`RandomSolutionGenerator`][random_generator::RandomSolutionGenerator],
//!    into a [`Problem`][problem::Problem], build a [`SearchCore`][search::SearchCore] and the
//!    algorithm of your choice, and call [`Search::start`][search::Search::start].
//!
//! We demonstrate these steps on a simple (but artificial) example: the solution type is a
//! fixed-size vector of integers, and a move flips the sign of one entry.
//!
//! ```rust
//! # use trajectory_search::moves::Move;
//! # use trajectory_search::neighbourhood::Neighbourhood;
//! # use trajectory_search::objective::Objective;
//! # use trajectory_search::evaluation::{Evaluation, SimpleEvaluation};
//! # use rand::rngs::StdRng;
//! # use std::any::Any;
//! # use std::fmt;
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Solution(Vec<i64>);
//!
//! impl fmt::Display for Solution {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "{:?}", self.0)
//!     }
//! }
//!
//! struct FlipSign(usize);
//!
//! impl Move<Solution> for FlipSign {
//!     fn apply(&self, solution: &mut Solution) {
//!         solution.0[self.0] = -solution.0[self.0];
//!     }
//!     fn undo(&self, solution: &mut Solution) {
//!         solution.0[self.0] = -solution.0[self.0];
//!     }
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! struct FlipAnyEntry;
//!
//! impl Neighbourhood<Solution> for FlipAnyEntry {
//!     fn random_move(&self, solution: &Solution, rng: &mut StdRng) -> Option<Box<dyn Move<Solution>>> {
//!         use rand::Rng;
//!         if solution.0.is_empty() {
//!             return None;
//!         }
//!         Some(Box::new(FlipSign(rng.gen_range(0..solution.0.len()))))
//!     }
//!     fn all_moves<'a>(&'a self, solution: &'a Solution) -> Box<dyn Iterator<Item = Box<dyn Move<Solution>>> + 'a> {
//!         Box::new((0..solution.0.len()).map(|i| Box::new(FlipSign(i)) as Box<dyn Move<Solution>>))
//!     }
//! }
//!
//! struct SumOfSquares;
//!
//! impl Objective<Solution, ()> for SumOfSquares {
//!     fn evaluate(&self, solution: &Solution, _data: &()) -> Box<dyn Evaluation> {
//!         Box::new(SimpleEvaluation::new(solution.0.iter().map(|v| (v * v) as f64).sum()))
//!     }
//!     fn is_minimizing(&self) -> bool {
//!         true
//!     }
//! }
//! ```
//!
//! Composing a [`Problem`][problem::Problem] from these pieces and driving it with
//! [`RandomDescent`][algorithms::random_descent::RandomDescent] is covered end to end in the
//! subset-selection demo binary and in this crate's tests.
pub mod algorithms;
pub mod constraint;
pub mod error;
pub mod evaluation;
pub mod listener;
pub mod moves;
pub mod neighbourhood;
pub mod objective;
pub mod problem;
pub mod random_generator;
pub mod rng;
pub mod search;
pub mod solution;
pub mod stop_criterion;
pub mod subset;
pub mod validation;
