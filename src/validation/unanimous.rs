use std::any::Any;
use std::collections::HashMap;

use super::Validation;

/// A mapping from constraint identity (its index in the
/// [`Problem`][crate::problem::Problem]'s mandatory-constraint list) to its sub-validation.
/// `passed()` iff every recorded sub-validation passed. The mapping may be partial: the
/// short-circuiting aggregation in [`Problem::validate`][crate::problem::Problem::validate]
/// stops recording as soon as one constraint fails, so constraints after the first failure are
/// simply absent from the map.
#[derive(Debug, Default)]
pub struct UnanimousValidation {
    by_constraint: HashMap<usize, Box<dyn Validation>>,
}

impl UnanimousValidation {
    /// Creates an empty aggregate, to be filled in constraint order.
    pub fn new() -> Self {
        UnanimousValidation {
            by_constraint: HashMap::new(),
        }
    }

    /// Records the sub-validation for the constraint at `index`.
    pub fn record(&mut self, index: usize, validation: Box<dyn Validation>) {
        self.by_constraint.insert(index, validation);
    }

    /// Looks up the prior sub-validation for the constraint at `index`, if it was recorded
    /// (i.e. validation did not short-circuit before reaching it).
    pub fn get(&self, index: usize) -> Option<&dyn Validation> {
        self.by_constraint.get(&index).map(|v| v.as_ref())
    }
}

impl Validation for UnanimousValidation {
    fn passed(&self) -> bool {
        self.by_constraint.values().all(|v| v.passed())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
