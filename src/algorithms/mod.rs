//! Concrete [`SearchStep`][crate::search::SearchStep] implementations. Each algorithm owns only
//! the state specific to its strategy (a neighbourhood, a temperature, a tabu memory); the
//! shared counters, best-so-far tracking and listener dispatch live in
//! [`SearchCore`][crate::search::SearchCore].

pub mod basic_parallel;
pub mod exhaustive;
pub mod lr_subset;
pub mod metropolis;
pub mod parallel_tempering;
pub mod piped;
pub mod random_descent;
pub mod steepest_descent;
pub mod tabu;
pub mod variable_neighbourhood;
