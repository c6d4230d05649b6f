//! Reservoir sampling: draws uniformly random elements (one, or a fixed count) from an iterator
//! of unknown length in a single pass, without materialising it. Used by the subset
//! neighbourhoods' `random_move` so that drawing from a large `selected`/`unselected` set costs
//! one pass rather than a `Vec` allocation plus an index draw.

use rand::rngs::StdRng;
use rand::Rng;

/// Draws a single element uniformly at random from `items` (Algorithm R, k=1). `None` if
/// `items` is empty.
pub fn sample_one(items: impl Iterator<Item = u64>, rng: &mut StdRng) -> Option<u64> {
    let mut chosen = None;
    let mut seen: u64 = 0;
    for item in items {
        seen += 1;
        if rng.gen_range(0..seen) == 0 {
            chosen = Some(item);
        }
    }
    chosen
}

/// Draws up to `k` elements uniformly at random from `items` without replacement (Algorithm R).
/// Returns fewer than `k` if `items` yields fewer than `k` elements.
pub fn sample_k(items: impl Iterator<Item = u64>, k: usize, rng: &mut StdRng) -> Vec<u64> {
    let mut reservoir: Vec<u64> = Vec::with_capacity(k);
    let mut seen: u64 = 0;
    for item in items {
        seen += 1;
        if reservoir.len() < k {
            reservoir.push(item);
        } else {
            let j = rng.gen_range(0..seen) as usize;
            if j < k {
                reservoir[j] = item;
            }
        }
    }
    reservoir
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn sample_one_from_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_one(std::iter::empty(), &mut rng), None);
    }

    #[test]
    fn sample_one_always_from_source() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let chosen = sample_one(0..10, &mut rng).unwrap();
            assert!(chosen < 10);
        }
    }

    #[test]
    fn sample_k_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let sample = sample_k(0..100, 5, &mut rng);
        assert_eq!(sample.len(), 5);
        let unique: std::collections::HashSet<_> = sample.iter().copied().collect();
        assert_eq!(unique.len(), 5);

        let short_sample = sample_k(0..3, 5, &mut rng);
        assert_eq!(short_sample.len(), 3);
    }
}
