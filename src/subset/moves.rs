//! The moves that cross ids between [`SubsetSolution`]'s selected and unselected sets.

use std::any::Any;

use crate::moves::Move;

use super::SubsetSolution;

/// Selects a single unselected id.
pub struct AdditionMove(pub u64);

impl Move<SubsetSolution> for AdditionMove {
    fn apply(&self, solution: &mut SubsetSolution) {
        solution.select(self.0).expect("AdditionMove requires id to be currently unselected");
    }

    fn undo(&self, solution: &mut SubsetSolution) {
        solution.deselect(self.0).expect("AdditionMove undo requires id to be currently selected");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Deselects a single selected id.
pub struct DeletionMove(pub u64);

impl Move<SubsetSolution> for DeletionMove {
    fn apply(&self, solution: &mut SubsetSolution) {
        solution.deselect(self.0).expect("DeletionMove requires id to be currently selected");
    }

    fn undo(&self, solution: &mut SubsetSolution) {
        solution.select(self.0).expect("DeletionMove undo requires id to be currently unselected");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Deselects `remove` and selects `add` in one step, keeping the selected count unchanged.
pub struct SwapMove {
    /// The id to select.
    pub add: u64,
    /// The id to deselect.
    pub remove: u64,
}

impl Move<SubsetSolution> for SwapMove {
    fn apply(&self, solution: &mut SubsetSolution) {
        solution.deselect(self.remove).expect("SwapMove requires `remove` to be currently selected");
        solution.select(self.add).expect("SwapMove requires `add` to be currently unselected");
    }

    fn undo(&self, solution: &mut SubsetSolution) {
        solution.deselect(self.add).expect("SwapMove undo requires `add` to be currently selected");
        solution.select(self.remove).expect("SwapMove undo requires `remove` to be currently unselected");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Selects every id in `to_add` and deselects every id in `to_remove`, in one step. The general
/// form of [`AdditionMove`]/[`DeletionMove`]/[`SwapMove`], used by the `Multi*` neighbourhoods.
pub struct GeneralSubsetMove {
    /// Ids to select.
    pub to_add: Vec<u64>,
    /// Ids to deselect.
    pub to_remove: Vec<u64>,
}

impl Move<SubsetSolution> for GeneralSubsetMove {
    fn apply(&self, solution: &mut SubsetSolution) {
        for &id in &self.to_remove {
            solution.deselect(id).expect("GeneralSubsetMove requires each `to_remove` id to be currently selected");
        }
        for &id in &self.to_add {
            solution.select(id).expect("GeneralSubsetMove requires each `to_add` id to be currently unselected");
        }
    }

    fn undo(&self, solution: &mut SubsetSolution) {
        for &id in &self.to_add {
            solution.deselect(id).expect("GeneralSubsetMove undo requires each `to_add` id to be currently selected");
        }
        for &id in &self.to_remove {
            solution.select(id).expect("GeneralSubsetMove undo requires each `to_remove` id to be currently unselected");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn universe() -> Arc<HashSet<u64>> {
        Arc::new((0..10).collect())
    }

    #[test]
    fn addition_move_round_trips() {
        let mut solution = SubsetSolution::empty(universe());
        let mov = AdditionMove(3);
        mov.apply(&mut solution);
        assert!(solution.is_selected(3));
        mov.undo(&mut solution);
        assert!(!solution.is_selected(3));
    }

    #[test]
    fn swap_move_round_trips() {
        let mut solution = SubsetSolution::with_selected(universe(), [5]).unwrap();
        let mov = SwapMove { add: 2, remove: 5 };
        mov.apply(&mut solution);
        assert!(solution.is_selected(2));
        assert!(!solution.is_selected(5));
        mov.undo(&mut solution);
        assert!(!solution.is_selected(2));
        assert!(solution.is_selected(5));
    }

    #[test]
    fn general_subset_move_round_trips() {
        let mut solution = SubsetSolution::with_selected(universe(), [1, 2]).unwrap();
        let mov = GeneralSubsetMove {
            to_add: vec![3, 4],
            to_remove: vec![1, 2],
        };
        mov.apply(&mut solution);
        let mut selected: Vec<u64> = solution.selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![3, 4]);
        mov.undo(&mut solution);
        let mut selected: Vec<u64> = solution.selected().iter().copied().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 2]);
    }
}
