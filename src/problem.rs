//! Contains the [`Problem`] struct, composing data, objective, constraints and a random
//! solution generator into the single point of contact the search engine talks to.

use std::sync::Arc;

use rand::rngs::StdRng;

use crate::constraint::{Constraint, PenalizingConstraint};
use crate::error::IncompatibleDelta;
use crate::evaluation::{Evaluation, PenalizedEvaluation};
use crate::moves::Move;
use crate::objective::Objective;
use crate::random_generator::RandomSolutionGenerator;
use crate::validation::{SimpleValidation, UnanimousValidation, Validation};

/// Composes problem `Data`, an [`Objective`], mandatory and penalising constraint lists, and a
/// [`RandomSolutionGenerator`] into the one collaborator the search engine queries.
///
/// The `Problem` exclusively owns its data, objective, constraint lists and random generator.
/// It is conceptually read-only during a search run: mutating `M`, `P`, `O`, or `G` while a
/// [`Search`][crate::search::Search] is running against this `Problem` is undefined behaviour
/// at the model level (this crate does not detect it).
pub struct Problem<S, D> {
    data: Arc<D>,
    objective: Arc<dyn Objective<S, D>>,
    mandatory: Vec<Arc<dyn Constraint<S, D>>>,
    penalizing: Vec<Arc<dyn PenalizingConstraint<S, D>>>,
    random_generator: Arc<dyn RandomSolutionGenerator<S, D>>,
}

impl<S, D> Problem<S, D> {
    /// Builds a new `Problem`. `mandatory` constraints must all pass for a solution to be
    /// valid; `penalizing` constraints never invalidate a solution but contribute a signed
    /// penalty to [`evaluate`][Self::evaluate].
    pub fn new(
        data: Arc<D>,
        objective: Arc<dyn Objective<S, D>>,
        mandatory: Vec<Arc<dyn Constraint<S, D>>>,
        penalizing: Vec<Arc<dyn PenalizingConstraint<S, D>>>,
        random_generator: Arc<dyn RandomSolutionGenerator<S, D>>,
    ) -> Self {
        Problem {
            data,
            objective,
            mandatory,
            penalizing,
            random_generator,
        }
    }

    /// The problem data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Whether the objective is to be minimised.
    pub fn is_minimizing(&self) -> bool {
        self.objective.is_minimizing()
    }

    /// Delegates to the [`RandomSolutionGenerator`] to produce an independent random start.
    pub fn create_random(&self, rng: &mut StdRng) -> S {
        self.random_generator.create(rng, &self.data)
    }

    /// Validates `solution` against the mandatory constraints.
    ///
    /// * No mandatory constraints: the constant `PASSED`.
    /// * Exactly one: that constraint's own validation, directly.
    /// * Several: a [`UnanimousValidation`] built by iterating the list in order, recording
    ///   each sub-validation, and **short-circuiting** on the first failure (remaining
    ///   constraints are not invoked).
    pub fn validate(&self, solution: &S) -> Box<dyn Validation> {
        match self.mandatory.len() {
            0 => Box::new(SimpleValidation::PASSED),
            1 => self.mandatory[0].validate(solution, &self.data),
            _ => {
                let mut aggregate = UnanimousValidation::new();
                for (index, constraint) in self.mandatory.iter().enumerate() {
                    let validation = constraint.validate(solution, &self.data);
                    let passed = validation.passed();
                    aggregate.record(index, validation);
                    if !passed {
                        break;
                    }
                }
                Box::new(aggregate)
            }
        }
    }

    /// The delta form of [`validate`][Self::validate]: computes the validation after `mov`
    /// would be applied to `current_solution`, given its prior validation `current_validation`.
    ///
    /// In the aggregate (several-mandatory-constraints) case, for each constraint whose prior
    /// sub-validation is absent from `current_validation` (because of earlier short-
    /// circuiting), its full validation against `current_solution` is recomputed on demand
    /// before the delta call.
    pub fn validate_delta(
        &self,
        mov: &dyn Move<S>,
        current_solution: &mut S,
        current_validation: &dyn Validation,
    ) -> Result<Box<dyn Validation>, IncompatibleDelta> {
        match self.mandatory.len() {
            0 => Ok(Box::new(SimpleValidation::PASSED)),
            1 => self.mandatory[0].validate_delta(mov, current_solution, current_validation, &self.data),
            _ => {
                let prior_aggregate = current_validation
                    .as_any()
                    .downcast_ref::<UnanimousValidation>()
                    .expect(
                        "Problem::validate_delta expects the prior Validation to be the \
                         UnanimousValidation this Problem previously returned",
                    );
                let mut new_aggregate = UnanimousValidation::new();
                for (index, constraint) in self.mandatory.iter().enumerate() {
                    let recomputed_fallback;
                    let prior_sub: &dyn Validation = match prior_aggregate.get(index) {
                        Some(prior) => prior,
                        None => {
                            recomputed_fallback = constraint.validate(current_solution, &self.data);
                            recomputed_fallback.as_ref()
                        }
                    };
                    let new_sub =
                        constraint.validate_delta(mov, current_solution, prior_sub, &self.data)?;
                    let passed = new_sub.passed();
                    new_aggregate.record(index, new_sub);
                    if !passed {
                        break;
                    }
                }
                Ok(Box::new(new_aggregate))
            }
        }
    }

    /// Evaluates `solution` under the objective, wrapping it in a [`PenalizedEvaluation`] with
    /// each penalising constraint's [`PenalizingValidation`][crate::validation::PenalizingValidation]
    /// when `penalizing` is non-empty.
    pub fn evaluate(&self, solution: &S) -> Box<dyn Evaluation> {
        let base = self.objective.evaluate(solution, &self.data);
        if self.penalizing.is_empty() {
            return base;
        }
        let mut by_constraint = std::collections::HashMap::new();
        for (index, constraint) in self.penalizing.iter().enumerate() {
            by_constraint.insert(index, constraint.validate(solution, &self.data));
        }
        Box::new(PenalizedEvaluation::new(base, by_constraint))
    }

    /// The delta form of [`evaluate`][Self::evaluate].
    pub fn evaluate_delta(
        &self,
        mov: &dyn Move<S>,
        current_solution: &mut S,
        current_evaluation: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>, IncompatibleDelta> {
        if self.penalizing.is_empty() {
            return self
                .objective
                .evaluate_delta(mov, current_solution, current_evaluation, &self.data);
        }
        let prior_penalized = current_evaluation
            .as_any()
            .downcast_ref::<PenalizedEvaluation>()
            .expect(
                "Problem::evaluate_delta expects the prior Evaluation to be the \
                 PenalizedEvaluation this Problem previously returned",
            );
        let new_base = self.objective.evaluate_delta(
            mov,
            current_solution,
            prior_penalized.base(),
            &self.data,
        )?;
        let mut by_constraint = std::collections::HashMap::new();
        for (index, constraint) in self.penalizing.iter().enumerate() {
            let recomputed_fallback;
            let prior_sub = match prior_penalized.penalty_for(index) {
                Some(prior) => prior,
                None => {
                    recomputed_fallback = constraint.validate(current_solution, &self.data);
                    &recomputed_fallback
                }
            };
            let new_sub = constraint.validate_delta(mov, current_solution, prior_sub, &self.data)?;
            by_constraint.insert(index, new_sub);
        }
        Ok(Box::new(PenalizedEvaluation::new(new_base, by_constraint)))
    }

    /// Scans the mandatory and penalising constraint lists and returns the names of those whose
    /// `validate` does not pass.
    pub fn violated_constraints(&self, solution: &S) -> Vec<&str> {
        let mut violated: Vec<&str> = self
            .mandatory
            .iter()
            .filter(|c| !c.validate(solution, &self.data).passed())
            .map(|c| c.name())
            .collect();
        violated.extend(
            self.penalizing
                .iter()
                .filter(|c| !c.validate(solution, &self.data).passed())
                .map(|c| c.name()),
        );
        violated
    }
}
