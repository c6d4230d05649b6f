use std::any::Any;

use super::Validation;

/// The validation of a [`SubsetSolution`][crate::subset::SubsetSolution]: a pair of whether the
/// selected size lies within the allowed `[min_size, max_size]` range, and the validation of
/// whatever mandatory constraints apply on top of the size bound. The aggregate passes iff
/// both pass.
#[derive(Debug)]
pub struct SubsetValidation {
    size_valid: bool,
    constraint_validation: Box<dyn Validation>,
}

impl SubsetValidation {
    /// Builds a [`SubsetValidation`] from the size check and the constraint validation.
    pub fn new(size_valid: bool, constraint_validation: Box<dyn Validation>) -> Self {
        SubsetValidation {
            size_valid,
            constraint_validation,
        }
    }

    /// Whether the selected size lies within `[min_size, max_size]`.
    pub fn size_valid(&self) -> bool {
        self.size_valid
    }

    /// The validation of the constraints layered on top of the size bound.
    pub fn constraint_validation(&self) -> &dyn Validation {
        self.constraint_validation.as_ref()
    }
}

impl Validation for SubsetValidation {
    fn passed(&self) -> bool {
        self.size_valid && self.constraint_validation.passed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
