//! The error taxonomy surfaced by this crate. Each kind corresponds to one of the failure
//! modes a problem/search implementation can run into; see the module documentation of the
//! component that raises it for details.

use thiserror::Error;

/// A programmer error detected while constructing a [`Problem`][crate::problem::Problem],
/// [`Search`][crate::search::Search], or algorithm: a missing collaborator or an
/// out-of-range parameter. Reported at construction time; the offending object is never
/// created.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// An [`Objective`][crate::objective::Objective] is required but was not supplied.
    #[error("an objective is required")]
    MissingObjective,
    /// A [`RandomSolutionGenerator`][crate::random_generator::RandomSolutionGenerator] is
    /// required but was not supplied.
    #[error("a random solution generator is required")]
    MissingRandomGenerator,
    /// Parallel tempering requires `0 < t_min < t_max`.
    #[error("invalid temperature range: t_min={t_min} must be strictly less than t_max={t_max}, and both must be positive")]
    InvalidTemperatureRange {
        /// the minimum temperature
        t_min: f64,
        /// the maximum temperature
        t_max: f64,
    },
    /// Parallel tempering and basic parallel search require at least one replica/sub-search.
    #[error("replica count must be positive, got {count}")]
    NonPositiveReplicaCount {
        /// the offending count
        count: usize,
    },
    /// A subset neighbourhood or solution was built with `min_size > max_size`.
    #[error("min size {min} must not exceed max size {max}")]
    InvalidSizeRange {
        /// the requested minimum size
        min: usize,
        /// the requested maximum size
        max: usize,
    },
    /// A generic out-of-range construction argument, used where no dedicated variant exists.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// An operation on a [`Solution`][crate::solution::Solution] referred to an identity that does
/// not exist in its universe (e.g. selecting an unknown id). Fatal for the operation; the
/// solution is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolutionModificationError {
    /// The given id is not part of the solution's universe of ids.
    #[error("id {0} does not exist in this solution's universe")]
    UnknownId(u64),
    /// The operation expected the id to be in a different one of the disjoint sets.
    #[error("id {0} is not currently selected")]
    NotSelected(u64),
    /// The operation expected the id to be in a different one of the disjoint sets.
    #[error("id {0} is not currently unselected")]
    NotUnselected(u64),
}

/// A [`Move`][crate::moves::Move]'s concrete type was not recognised by a delta evaluator or
/// delta validator. Fatal to the current search step; not retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("move is not compatible with this delta evaluator/validator")]
pub struct IncompatibleDelta;

/// An API call required the search to be [`Idle`][crate::search::SearchStatus::Idle] (e.g.
/// `set_current_solution` while `Running`). Rejected without side effects.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation requires the search to be idle, but it is {0:?}")]
pub struct StatusError(pub crate::search::SearchStatus);

/// Any internal invariant violation surfaced from [`Search::start`][crate::search::Search::start],
/// including incompatible-delta failures and executor/thread-join failures in parallel
/// tempering or basic parallel search.
#[derive(Debug, Error)]
pub enum SearchException {
    /// [`Search::start`][crate::search::Search::start] was called while the search was not
    /// [`Idle`][crate::search::SearchStatus::Idle].
    #[error("cannot start: {0}")]
    NotIdle(#[from] StatusError),
    /// A delta evaluator or validator rejected a move it did not recognise.
    #[error("incompatible delta: {0}")]
    IncompatibleDelta(#[from] IncompatibleDelta),
    /// A background replica or sub-search thread panicked.
    #[error("a replica or sub-search thread failed: {0}")]
    ThreadFailure(String),
    /// A listener callback panicked; the current step is aborted.
    #[error("listener callback failed: {0}")]
    ListenerFailure(String),
}
