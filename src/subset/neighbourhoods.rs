//! The [`Neighbourhood`] implementations built from the [`moves`][super::moves] of a
//! [`SubsetSolution`]: single and multi variants of addition, deletion, swap, and the union
//! "perturbation" neighbourhood, each respecting an optional `[min_size, max_size]` bound and an
//! optional set of ids fixed against selection changes.

use std::collections::HashSet;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::ConfigurationError;
use crate::moves::Move;
use crate::neighbourhood::Neighbourhood;

use super::moves::{AdditionMove, DeletionMove, GeneralSubsetMove, SwapMove};
use super::sampling::{sample_k, sample_one};
use super::SubsetSolution;

/// Ids excluded from addition, deletion, and swap by every neighbourhood in this module. Shared
/// so that each neighbourhood constructor takes the same `fixed_ids` argument rather than
/// re-deriving it.
#[derive(Clone, Default)]
struct FixedIds(HashSet<u64>);

impl FixedIds {
    fn excludes(&self, id: u64) -> bool {
        self.0.contains(&id)
    }
}

fn addable(solution: &SubsetSolution, fixed: &FixedIds) -> impl Iterator<Item = u64> + '_ {
    solution.unselected().iter().copied().filter(move |id| !fixed.excludes(*id))
}

fn deletable(solution: &SubsetSolution, fixed: &FixedIds) -> impl Iterator<Item = u64> + '_ {
    solution.selected().iter().copied().filter(move |id| !fixed.excludes(*id))
}

/// All `(add, remove)` pairs that swap one selected id for one unselected id, leaving the
/// selected count unchanged. Only meaningful for fixed-size subsets — it never changes the
/// size, so it cannot repair a subset whose size is already out of range.
pub struct SingleSwap {
    fixed: FixedIds,
}

impl SingleSwap {
    /// Builds a `SingleSwap` neighbourhood with no fixed ids.
    pub fn new() -> Self {
        SingleSwap { fixed: FixedIds::default() }
    }

    /// Builds a `SingleSwap` neighbourhood that never touches any id in `fixed_ids`.
    pub fn with_fixed_ids(fixed_ids: impl IntoIterator<Item = u64>) -> Self {
        SingleSwap {
            fixed: FixedIds(fixed_ids.into_iter().collect()),
        }
    }
}

impl Default for SingleSwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbourhood<SubsetSolution> for SingleSwap {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        let add = sample_one(addable(solution, &self.fixed), rng)?;
        let remove = sample_one(deletable(solution, &self.fixed), rng)?;
        Some(Box::new(SwapMove { add, remove }))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        let adds: Vec<u64> = addable(solution, &self.fixed).collect();
        let removes: Vec<u64> = deletable(solution, &self.fixed).collect();
        Box::new(
            adds.into_iter()
                .cartesian_product(removes)
                .map(|(add, remove)| Box::new(SwapMove { add, remove }) as Box<dyn Move<SubsetSolution>>),
        )
    }
}

/// A size bound shared by the `Single*`/`Multi*` neighbourhoods below, enforced against the
/// subset's size *after* the candidate move.
#[derive(Clone, Copy)]
struct SizeBound {
    min_size: usize,
    max_size: usize,
}

impl SizeBound {
    fn new(min_size: usize, max_size: usize) -> Result<Self, ConfigurationError> {
        if min_size > max_size {
            return Err(ConfigurationError::InvalidSizeRange { min: min_size, max: max_size });
        }
        Ok(SizeBound { min_size, max_size })
    }

    fn unbounded() -> Self {
        SizeBound { min_size: 0, max_size: usize::MAX }
    }

    fn allows_addition(&self, current_size: usize) -> bool {
        current_size < self.max_size
    }

    fn allows_deletion(&self, current_size: usize) -> bool {
        current_size > self.min_size
    }
}

/// All moves that add one unselected id, provided the resulting size stays within
/// `[min_size, max_size]`.
pub struct SingleAddition {
    fixed: FixedIds,
    bound: SizeBound,
}

impl SingleAddition {
    /// Builds a `SingleAddition` neighbourhood with no size bound and no fixed ids.
    pub fn new() -> Self {
        SingleAddition {
            fixed: FixedIds::default(),
            bound: SizeBound::unbounded(),
        }
    }

    /// Builds a `SingleAddition` neighbourhood bounded to `[min_size, max_size]`, never adding
    /// an id in `fixed_ids`.
    pub fn with_options(
        min_size: usize,
        max_size: usize,
        fixed_ids: impl IntoIterator<Item = u64>,
    ) -> Result<Self, ConfigurationError> {
        Ok(SingleAddition {
            fixed: FixedIds(fixed_ids.into_iter().collect()),
            bound: SizeBound::new(min_size, max_size)?,
        })
    }
}

impl Default for SingleAddition {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbourhood<SubsetSolution> for SingleAddition {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        if !self.bound.allows_addition(solution.selected().len()) {
            return None;
        }
        let id = sample_one(addable(solution, &self.fixed), rng)?;
        Some(Box::new(AdditionMove(id)))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        if !self.bound.allows_addition(solution.selected().len()) {
            return Box::new(std::iter::empty());
        }
        Box::new(addable(solution, &self.fixed).map(|id| Box::new(AdditionMove(id)) as Box<dyn Move<SubsetSolution>>))
    }
}

/// All moves that remove one selected id, provided the resulting size stays within
/// `[min_size, max_size]`.
pub struct SingleDeletion {
    fixed: FixedIds,
    bound: SizeBound,
}

impl SingleDeletion {
    /// Builds a `SingleDeletion` neighbourhood with no size bound and no fixed ids.
    pub fn new() -> Self {
        SingleDeletion {
            fixed: FixedIds::default(),
            bound: SizeBound::unbounded(),
        }
    }

    /// Builds a `SingleDeletion` neighbourhood bounded to `[min_size, max_size]`, never removing
    /// an id in `fixed_ids`.
    pub fn with_options(
        min_size: usize,
        max_size: usize,
        fixed_ids: impl IntoIterator<Item = u64>,
    ) -> Result<Self, ConfigurationError> {
        Ok(SingleDeletion {
            fixed: FixedIds(fixed_ids.into_iter().collect()),
            bound: SizeBound::new(min_size, max_size)?,
        })
    }
}

impl Default for SingleDeletion {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbourhood<SubsetSolution> for SingleDeletion {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        if !self.bound.allows_deletion(solution.selected().len()) {
            return None;
        }
        let id = sample_one(deletable(solution, &self.fixed), rng)?;
        Some(Box::new(DeletionMove(id)))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        if !self.bound.allows_deletion(solution.selected().len()) {
            return Box::new(std::iter::empty());
        }
        Box::new(deletable(solution, &self.fixed).map(|id| Box::new(DeletionMove(id)) as Box<dyn Move<SubsetSolution>>))
    }
}

/// Which kind of move [`SinglePerturbation`] drew, used only to pick a uniform candidate within
/// the chosen kind for `random_move`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Addition,
    Deletion,
    Swap,
}

/// The union of [`AdditionMove`], [`DeletionMove`], and [`SwapMove`], emitting only those whose
/// resulting subset size stays within `[min_size, max_size]`.
///
/// `random_move` first determines which kinds are valid for the current state (addition if
/// below `max_size`, deletion if above `min_size`, swap if both an addable and a deletable id
/// exist), picks one of those kinds uniformly, then draws a uniform candidate within that kind —
/// this keeps the distribution over move *kinds* uniform regardless of how many candidates each
/// kind happens to have.
pub struct SinglePerturbation {
    fixed: FixedIds,
    bound: SizeBound,
}

impl SinglePerturbation {
    /// Builds a `SinglePerturbation` neighbourhood with no size bound and no fixed ids.
    pub fn new() -> Self {
        SinglePerturbation {
            fixed: FixedIds::default(),
            bound: SizeBound::unbounded(),
        }
    }

    /// Builds a `SinglePerturbation` neighbourhood bounded to `[min_size, max_size]`, never
    /// touching an id in `fixed_ids`.
    pub fn with_options(
        min_size: usize,
        max_size: usize,
        fixed_ids: impl IntoIterator<Item = u64>,
    ) -> Result<Self, ConfigurationError> {
        Ok(SinglePerturbation {
            fixed: FixedIds(fixed_ids.into_iter().collect()),
            bound: SizeBound::new(min_size, max_size)?,
        })
    }

    fn valid_kinds(&self, solution: &SubsetSolution) -> Vec<Kind> {
        let size = solution.selected().len();
        let has_addable = addable(solution, &self.fixed).next().is_some();
        let has_deletable = deletable(solution, &self.fixed).next().is_some();
        let can_add = self.bound.allows_addition(size) && has_addable;
        let can_delete = self.bound.allows_deletion(size) && has_deletable;
        let mut kinds = Vec::with_capacity(3);
        if can_add {
            kinds.push(Kind::Addition);
        }
        if can_delete {
            kinds.push(Kind::Deletion);
        }
        // A swap leaves the selected count unchanged, so it is valid whenever an addable and a
        // deletable id both exist, regardless of whether addition/deletion alone would respect
        // the size bound — this is the only kind available to a fixed-size subset (min == max).
        if has_addable && has_deletable {
            kinds.push(Kind::Swap);
        }
        kinds
    }
}

impl Default for SinglePerturbation {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbourhood<SubsetSolution> for SinglePerturbation {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        let kinds = self.valid_kinds(solution);
        if kinds.is_empty() {
            return None;
        }
        let kind = kinds[rng.gen_range(0..kinds.len())];
        match kind {
            Kind::Addition => sample_one(addable(solution, &self.fixed), rng).map(|id| Box::new(AdditionMove(id)) as Box<dyn Move<SubsetSolution>>),
            Kind::Deletion => sample_one(deletable(solution, &self.fixed), rng).map(|id| Box::new(DeletionMove(id)) as Box<dyn Move<SubsetSolution>>),
            Kind::Swap => {
                let add = sample_one(addable(solution, &self.fixed), rng)?;
                let remove = sample_one(deletable(solution, &self.fixed), rng)?;
                Some(Box::new(SwapMove { add, remove }))
            }
        }
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        let size = solution.selected().len();
        let additions: Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>>> = if self.bound.allows_addition(size) {
            Box::new(addable(solution, &self.fixed).map(|id| Box::new(AdditionMove(id)) as Box<dyn Move<SubsetSolution>>))
        } else {
            Box::new(std::iter::empty())
        };
        let deletions: Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>>> = if self.bound.allows_deletion(size) {
            Box::new(deletable(solution, &self.fixed).map(|id| Box::new(DeletionMove(id)) as Box<dyn Move<SubsetSolution>>))
        } else {
            Box::new(std::iter::empty())
        };
        let swaps: Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>>> = {
            let adds: Vec<u64> = addable(solution, &self.fixed).collect();
            let removes: Vec<u64> = deletable(solution, &self.fixed).collect();
            Box::new(
                adds.into_iter()
                    .cartesian_product(removes)
                    .map(|(add, remove)| Box::new(SwapMove { add, remove }) as Box<dyn Move<SubsetSolution>>),
            )
        };
        Box::new(additions.chain(deletions).chain(swaps))
    }
}

/// `k` independent additions committed in one step, aggregated into a single
/// [`GeneralSubsetMove`].
pub struct MultiAddition {
    k: usize,
    fixed: FixedIds,
}

impl MultiAddition {
    /// Builds a `MultiAddition` neighbourhood moving `k` ids per step, with no fixed ids.
    pub fn new(k: usize) -> Self {
        MultiAddition { k, fixed: FixedIds::default() }
    }

    /// Builds a `MultiAddition` neighbourhood moving `k` ids per step, never touching an id in
    /// `fixed_ids`.
    pub fn with_fixed_ids(k: usize, fixed_ids: impl IntoIterator<Item = u64>) -> Self {
        MultiAddition {
            k,
            fixed: FixedIds(fixed_ids.into_iter().collect()),
        }
    }
}

impl Neighbourhood<SubsetSolution> for MultiAddition {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        let to_add = sample_k(addable(solution, &self.fixed), self.k, rng);
        if to_add.is_empty() {
            return None;
        }
        Some(Box::new(GeneralSubsetMove { to_add, to_remove: Vec::new() }))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        let candidates: Vec<u64> = addable(solution, &self.fixed).collect();
        if candidates.len() < self.k || self.k == 0 {
            return Box::new(std::iter::empty());
        }
        Box::new(
            candidates
                .into_iter()
                .combinations(self.k)
                .map(|to_add| Box::new(GeneralSubsetMove { to_add, to_remove: Vec::new() }) as Box<dyn Move<SubsetSolution>>),
        )
    }
}

/// `k` independent deletions committed in one step, aggregated into a single
/// [`GeneralSubsetMove`].
pub struct MultiDeletion {
    k: usize,
    fixed: FixedIds,
}

impl MultiDeletion {
    /// Builds a `MultiDeletion` neighbourhood moving `k` ids per step, with no fixed ids.
    pub fn new(k: usize) -> Self {
        MultiDeletion { k, fixed: FixedIds::default() }
    }

    /// Builds a `MultiDeletion` neighbourhood moving `k` ids per step, never touching an id in
    /// `fixed_ids`.
    pub fn with_fixed_ids(k: usize, fixed_ids: impl IntoIterator<Item = u64>) -> Self {
        MultiDeletion {
            k,
            fixed: FixedIds(fixed_ids.into_iter().collect()),
        }
    }
}

impl Neighbourhood<SubsetSolution> for MultiDeletion {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        let to_remove = sample_k(deletable(solution, &self.fixed), self.k, rng);
        if to_remove.is_empty() {
            return None;
        }
        Some(Box::new(GeneralSubsetMove { to_add: Vec::new(), to_remove }))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        let candidates: Vec<u64> = deletable(solution, &self.fixed).collect();
        if candidates.len() < self.k || self.k == 0 {
            return Box::new(std::iter::empty());
        }
        Box::new(
            candidates
                .into_iter()
                .combinations(self.k)
                .map(|to_remove| Box::new(GeneralSubsetMove { to_add: Vec::new(), to_remove }) as Box<dyn Move<SubsetSolution>>),
        )
    }
}

/// `k` independent swaps (`k` additions paired with `k` deletions) committed in one step,
/// aggregated into a single [`GeneralSubsetMove`]. Like [`SingleSwap`], only meaningful for
/// fixed-size subsets.
pub struct MultiSwap {
    k: usize,
    fixed: FixedIds,
}

impl MultiSwap {
    /// Builds a `MultiSwap` neighbourhood swapping `k` pairs per step, with no fixed ids.
    pub fn new(k: usize) -> Self {
        MultiSwap { k, fixed: FixedIds::default() }
    }

    /// Builds a `MultiSwap` neighbourhood swapping `k` pairs per step, never touching an id in
    /// `fixed_ids`.
    pub fn with_fixed_ids(k: usize, fixed_ids: impl IntoIterator<Item = u64>) -> Self {
        MultiSwap {
            k,
            fixed: FixedIds(fixed_ids.into_iter().collect()),
        }
    }
}

impl Neighbourhood<SubsetSolution> for MultiSwap {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut StdRng) -> Option<Box<dyn Move<SubsetSolution>>> {
        let to_add = sample_k(addable(solution, &self.fixed), self.k, rng);
        let to_remove = sample_k(deletable(solution, &self.fixed), self.k, rng);
        if to_add.len() != self.k || to_remove.len() != self.k {
            return None;
        }
        Some(Box::new(GeneralSubsetMove { to_add, to_remove }))
    }

    fn all_moves<'a>(&'a self, solution: &'a SubsetSolution) -> Box<dyn Iterator<Item = Box<dyn Move<SubsetSolution>>> + 'a> {
        let adds: Vec<u64> = addable(solution, &self.fixed).collect();
        let removes: Vec<u64> = deletable(solution, &self.fixed).collect();
        if adds.len() < self.k || removes.len() < self.k || self.k == 0 {
            return Box::new(std::iter::empty());
        }
        Box::new(
            adds.into_iter()
                .combinations(self.k)
                .cartesian_product(removes.into_iter().combinations(self.k))
                .map(|(to_add, to_remove)| Box::new(GeneralSubsetMove { to_add, to_remove }) as Box<dyn Move<SubsetSolution>>),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn universe(n: u64) -> Arc<HashSet<u64>> {
        Arc::new((0..n).collect())
    }

    #[test]
    fn single_swap_enumerates_cartesian_product() {
        let solution = SubsetSolution::with_selected(universe(5), [0, 1]).unwrap();
        let neighbourhood = SingleSwap::new();
        let moves: Vec<_> = neighbourhood.all_moves(&solution).collect();
        assert_eq!(moves.len(), 2 * 3);
    }

    #[test]
    fn single_swap_random_move_is_none_iff_all_moves_empty() {
        let full = SubsetSolution::with_selected(universe(3), [0, 1, 2]).unwrap();
        let neighbourhood = SingleSwap::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(neighbourhood.all_moves(&full).next().is_none());
        assert!(neighbourhood.random_move(&full, &mut rng).is_none());
    }

    #[test]
    fn single_addition_respects_max_size() {
        let solution = SubsetSolution::with_selected(universe(5), [0, 1]).unwrap();
        let neighbourhood = SingleAddition::with_options(0, 2, []).unwrap();
        assert_eq!(neighbourhood.all_moves(&solution).count(), 0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(neighbourhood.random_move(&solution, &mut rng).is_none());
    }

    #[test]
    fn single_deletion_respects_min_size() {
        let solution = SubsetSolution::with_selected(universe(5), [0]).unwrap();
        let neighbourhood = SingleDeletion::with_options(1, 5, []).unwrap();
        assert_eq!(neighbourhood.all_moves(&solution).count(), 0);
    }

    #[test]
    fn single_addition_excludes_fixed_ids() {
        let solution = SubsetSolution::empty(universe(3));
        let neighbourhood = SingleAddition::with_options(0, 3, [0]).unwrap();
        let moves: Vec<_> = neighbourhood.all_moves(&solution).collect();
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn single_perturbation_at_min_size_only_offers_addition_and_swap() {
        let solution = SubsetSolution::with_selected(universe(4), [0]).unwrap();
        let neighbourhood = SinglePerturbation::with_options(1, 3, []).unwrap();
        let kinds = neighbourhood.valid_kinds(&solution);
        assert!(kinds.contains(&Kind::Addition));
        assert!(!kinds.contains(&Kind::Deletion));
        assert!(kinds.contains(&Kind::Swap));
    }

    #[test]
    fn single_perturbation_random_move_none_iff_all_moves_empty() {
        let solution = SubsetSolution::with_selected(universe(2), [0, 1]).unwrap();
        let neighbourhood = SinglePerturbation::with_options(2, 2, []).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(neighbourhood.all_moves(&solution).next().is_none());
        assert!(neighbourhood.random_move(&solution, &mut rng).is_none());
    }

    #[test]
    fn single_perturbation_on_a_fixed_size_subset_only_offers_swap() {
        // min == max == current size: addition and deletion would both violate the bound, but a
        // swap leaves the size unchanged, so it is the one kind that must remain available.
        let solution = SubsetSolution::with_selected(universe(4), [0, 1]).unwrap();
        let neighbourhood = SinglePerturbation::with_options(2, 2, []).unwrap();
        let kinds = neighbourhood.valid_kinds(&solution);
        assert_eq!(kinds, vec![Kind::Swap]);
        assert!(!neighbourhood.all_moves(&solution).next().is_none());
        let mut rng = StdRng::seed_from_u64(3);
        let mov = neighbourhood.random_move(&solution, &mut rng).unwrap();
        assert!(mov.as_any().downcast_ref::<SwapMove>().is_some());
    }

    #[test]
    fn multi_addition_enumerates_k_combinations() {
        let solution = SubsetSolution::empty(universe(4));
        let neighbourhood = MultiAddition::new(2);
        assert_eq!(neighbourhood.all_moves(&solution).count(), 6); // C(4,2)
    }

    #[test]
    fn multi_swap_random_move_picks_disjoint_k_pairs() {
        let solution = SubsetSolution::with_selected(universe(6), [0, 1, 2]).unwrap();
        let neighbourhood = MultiSwap::new(2);
        let mut rng = StdRng::seed_from_u64(5);
        let mov = neighbourhood.random_move(&solution, &mut rng).unwrap();
        let general = mov.as_any().downcast_ref::<GeneralSubsetMove>().unwrap();
        assert_eq!(general.to_add.len(), 2);
        assert_eq!(general.to_remove.len(), 2);
    }
}
