//! A representative problem: choosing a subset of a fixed universe of `u64` ids. Exercises the
//! full [`Move`][crate::moves::Move]/[`Neighbourhood`][crate::neighbourhood::Neighbourhood]
//! protocol with a solution type simple enough to reason about directly.
//!
//! [`SubsetSolution`] partitions its universe into `selected` and `unselected`, maintained as
//! two disjoint sets whose union is always the whole universe. [`moves`] defines the moves that
//! cross ids between them; [`neighbourhoods`] the [`Neighbourhood`][crate::neighbourhood::Neighbourhood]s
//! built from those moves; [`sampling`] the reservoir-sampling helpers used to draw uniformly
//! random moves without materialising the whole candidate set.

pub mod moves;
pub mod neighbourhoods;
pub mod sampling;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::SolutionModificationError;

/// A subset of a fixed universe of ids, tracked as two disjoint sets (`selected`,
/// `unselected`) whose union is always the full universe.
///
/// Optionally carries a comparator over ids, consulted by the greedy construction algorithms
/// (e.g. [`LRSubsetSearch`][crate::algorithms::lr_subset::LRSubsetSearch]) and by the `Multi*`
/// neighbourhoods when they need a deterministic preference order rather than a uniform random
/// draw. Two solutions are equal, and hash equally, based solely on their `selected` set
/// (comparators are behavioural, not data, and are not compared).
#[derive(Clone)]
pub struct SubsetSolution {
    universe: Arc<HashSet<u64>>,
    selected: HashSet<u64>,
    unselected: HashSet<u64>,
    comparator: Option<Arc<dyn Fn(&u64, &u64) -> Ordering + Send + Sync>>,
}

impl SubsetSolution {
    /// Builds a solution over `universe` with nothing selected.
    pub fn empty(universe: Arc<HashSet<u64>>) -> Self {
        let unselected = universe.iter().copied().collect();
        SubsetSolution {
            universe,
            selected: HashSet::new(),
            unselected,
            comparator: None,
        }
    }

    /// Builds a solution over `universe` with `selected` pre-selected.
    ///
    /// Fails if any id in `selected` is not part of `universe`.
    pub fn with_selected(
        universe: Arc<HashSet<u64>>,
        selected: impl IntoIterator<Item = u64>,
    ) -> Result<Self, SolutionModificationError> {
        let selected: HashSet<u64> = selected.into_iter().collect();
        for id in &selected {
            if !universe.contains(id) {
                return Err(SolutionModificationError::UnknownId(*id));
            }
        }
        let unselected = universe.difference(&selected).copied().collect();
        Ok(SubsetSolution {
            universe,
            selected,
            unselected,
            comparator: None,
        })
    }

    /// Attaches a preference comparator, consulted by greedy/ordered construction and
    /// neighbourhood enumeration.
    pub fn with_comparator(mut self, comparator: Arc<dyn Fn(&u64, &u64) -> Ordering + Send + Sync>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// The whole universe of ids.
    pub fn universe(&self) -> &HashSet<u64> {
        &self.universe
    }

    /// A cheap pointer clone of the shared universe, for algorithms (e.g.
    /// [`LRSubsetSearch`][crate::algorithms::lr_subset::LRSubsetSearch]) that need to build a
    /// fresh [`SubsetSolution`] over the same universe.
    pub fn universe_arc(&self) -> Arc<HashSet<u64>> {
        Arc::clone(&self.universe)
    }

    /// The currently selected ids.
    pub fn selected(&self) -> &HashSet<u64> {
        &self.selected
    }

    /// The currently unselected ids.
    pub fn unselected(&self) -> &HashSet<u64> {
        &self.unselected
    }

    /// Whether `id` is currently selected. `false` for ids outside the universe.
    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    /// The attached comparator, if any.
    pub fn comparator(&self) -> Option<&Arc<dyn Fn(&u64, &u64) -> Ordering + Send + Sync>> {
        self.comparator.as_ref()
    }

    /// Moves `id` from unselected to selected.
    pub fn select(&mut self, id: u64) -> Result<(), SolutionModificationError> {
        if !self.universe.contains(&id) {
            return Err(SolutionModificationError::UnknownId(id));
        }
        if !self.unselected.remove(&id) {
            return Err(SolutionModificationError::NotUnselected(id));
        }
        self.selected.insert(id);
        Ok(())
    }

    /// Moves `id` from selected to unselected.
    pub fn deselect(&mut self, id: u64) -> Result<(), SolutionModificationError> {
        if !self.universe.contains(&id) {
            return Err(SolutionModificationError::UnknownId(id));
        }
        if !self.selected.remove(&id) {
            return Err(SolutionModificationError::NotSelected(id));
        }
        self.unselected.insert(id);
        Ok(())
    }
}

impl PartialEq for SubsetSolution {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.universe, &other.universe) && self.selected == other.selected
    }
}

impl Eq for SubsetSolution {}

impl Hash for SubsetSolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<u64> = self.selected.iter().copied().collect();
        sorted.sort_unstable();
        sorted.hash(state);
    }
}

impl fmt::Display for SubsetSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<u64> = self.selected.iter().copied().collect();
        sorted.sort_unstable();
        write!(f, "{{{}}} ({}/{})", sorted.iter().map(u64::to_string).collect::<Vec<_>>().join(", "), sorted.len(), self.universe.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(n: u64) -> Arc<HashSet<u64>> {
        Arc::new((0..n).collect())
    }

    #[test]
    fn selected_and_unselected_partition_the_universe() {
        let mut solution = SubsetSolution::empty(universe(5));
        solution.select(2).unwrap();
        solution.select(4).unwrap();
        assert!(solution.selected().is_disjoint(solution.unselected()));
        let mut union: Vec<u64> = solution.selected().union(solution.unselected()).copied().collect();
        union.sort_unstable();
        assert_eq!(union, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn select_unknown_id_fails() {
        let mut solution = SubsetSolution::empty(universe(3));
        assert_eq!(solution.select(9), Err(SolutionModificationError::UnknownId(9)));
    }

    #[test]
    fn select_already_selected_fails() {
        let mut solution = SubsetSolution::empty(universe(3));
        solution.select(1).unwrap();
        assert_eq!(solution.select(1), Err(SolutionModificationError::NotUnselected(1)));
    }

    #[test]
    fn deselect_unselected_fails() {
        let mut solution = SubsetSolution::empty(universe(3));
        assert_eq!(solution.deselect(1), Err(SolutionModificationError::NotSelected(1)));
    }
}
