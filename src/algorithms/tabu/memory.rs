//! [`TabuMemory`] and its strategies.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Remembers which move attributes are currently forbidden ("tabu"). `T` is the attribute type
/// a [`TabuSearch`][super::TabuSearch] extracts from each move — typically something far
/// smaller and more forgiving than the move itself (e.g. "the id that was removed", not the
/// whole swap), so that the search is kept away from an entire family of reversing moves rather
/// than only the literal inverse of the last move taken.
pub trait TabuMemory<T>: Send + Sync {
    /// Whether `attribute` is currently forbidden.
    fn is_tabu(&self, attribute: &T) -> bool;

    /// Records that `attribute` was just used, at `step` (the search's total step count at the
    /// time of recording).
    fn record(&mut self, attribute: T, step: u64);

    /// Called once per accepted step, after any `record` calls, so memories with a notion of
    /// elapsed time (tenure, frequency decay) can age out old entries.
    fn advance(&mut self, step: u64) {
        let _ = step;
    }
}

/// The classic fixed-size tabu list: a FIFO queue of the `capacity` most recently used
/// attributes. An attribute is tabu iff it is still in the queue.
pub struct FixedSizeTabuMemory<T> {
    capacity: usize,
    queue: VecDeque<T>,
}

impl<T: Eq> FixedSizeTabuMemory<T> {
    /// Builds a memory retaining the `capacity` most recently used attributes.
    pub fn new(capacity: usize) -> Self {
        FixedSizeTabuMemory {
            capacity,
            queue: VecDeque::with_capacity(capacity),
        }
    }
}

impl<T: Eq + Send + Sync> TabuMemory<T> for FixedSizeTabuMemory<T> {
    fn is_tabu(&self, attribute: &T) -> bool {
        self.queue.contains(attribute)
    }

    fn record(&mut self, attribute: T, _step: u64) {
        if self.capacity == 0 {
            return;
        }
        self.queue.push_back(attribute);
        while self.queue.len() > self.capacity {
            self.queue.pop_front();
        }
    }
}

/// Each attribute is forbidden for `tenure` steps after it was last used, then expires
/// automatically (rather than being evicted only when the list overflows).
pub struct TenureTabuMemory<T> {
    tenure: u64,
    expires_at: HashMap<T, u64>,
}

impl<T: Eq + Hash> TenureTabuMemory<T> {
    /// Builds a memory in which every recorded attribute stays tabu for `tenure` steps.
    pub fn new(tenure: u64) -> Self {
        TenureTabuMemory {
            tenure,
            expires_at: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Send + Sync> TabuMemory<T> for TenureTabuMemory<T> {
    fn is_tabu(&self, attribute: &T) -> bool {
        self.expires_at.get(attribute).is_some()
    }

    fn record(&mut self, attribute: T, step: u64) {
        self.expires_at.insert(attribute, step + self.tenure);
    }

    fn advance(&mut self, step: u64) {
        self.expires_at.retain(|_, expiry| *expiry > step);
    }
}

/// Tracks how often each attribute has been used; an attribute is tabu once it has been used
/// `max_frequency` times or more. Unlike [`FixedSizeTabuMemory`] and [`TenureTabuMemory`], bans
/// here never expire on their own — this strategy is for steering the search away from
/// attributes it keeps returning to, not for short-term cycle avoidance.
pub struct FrequencyTabuMemory<T> {
    max_frequency: u64,
    counts: HashMap<T, u64>,
}

impl<T: Eq + Hash> FrequencyTabuMemory<T> {
    /// Builds a memory that forbids an attribute once it has been recorded `max_frequency`
    /// times.
    pub fn new(max_frequency: u64) -> Self {
        FrequencyTabuMemory {
            max_frequency,
            counts: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Send + Sync> TabuMemory<T> for FrequencyTabuMemory<T> {
    fn is_tabu(&self, attribute: &T) -> bool {
        self.counts.get(attribute).is_some_and(|count| *count >= self.max_frequency)
    }

    fn record(&mut self, attribute: T, _step: u64) {
        *self.counts.entry(attribute).or_insert(0) += 1;
    }
}

/// Once an attribute has been used, it is forbidden for the remainder of the run. The simplest
/// possible memory, useful as a baseline or where the attribute space is small enough that
/// revisiting any of it would just cycle.
pub struct NeverForgetTabuMemory<T> {
    used: std::collections::HashSet<T>,
}

impl<T: Eq + Hash> NeverForgetTabuMemory<T> {
    /// Builds an empty memory.
    pub fn new() -> Self {
        NeverForgetTabuMemory {
            used: std::collections::HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> Default for NeverForgetTabuMemory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Send + Sync> TabuMemory<T> for NeverForgetTabuMemory<T> {
    fn is_tabu(&self, attribute: &T) -> bool {
        self.used.contains(attribute)
    }

    fn record(&mut self, attribute: T, _step: u64) {
        self.used.insert(attribute);
    }
}

/// Reports every attribute as tabu and never admits one, regardless of what is recorded.
/// Useful for exercising the aspiration criterion in isolation, or as a baseline that forces
/// [`TabuSearch`][super::TabuSearch] to rely on aspiration alone to ever accept a move.
#[derive(Default)]
pub struct RejectAllTabuMemory;

impl<T> TabuMemory<T> for RejectAllTabuMemory {
    fn is_tabu(&self, _attribute: &T) -> bool {
        true
    }

    fn record(&mut self, _attribute: T, _step: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_memory_forgets_beyond_capacity() {
        let mut memory = FixedSizeTabuMemory::new(2);
        memory.record(1, 0);
        memory.record(2, 1);
        assert!(memory.is_tabu(&1));
        memory.record(3, 2);
        assert!(!memory.is_tabu(&1));
        assert!(memory.is_tabu(&2));
        assert!(memory.is_tabu(&3));
    }

    #[test]
    fn tenure_memory_expires_after_advance() {
        let mut memory = TenureTabuMemory::new(2);
        memory.record("a", 0);
        assert!(memory.is_tabu(&"a"));
        memory.advance(1);
        assert!(memory.is_tabu(&"a"));
        memory.advance(2);
        assert!(!memory.is_tabu(&"a"));
    }

    #[test]
    fn frequency_memory_bans_after_threshold() {
        let mut memory = FrequencyTabuMemory::new(3);
        memory.record("a", 0);
        memory.record("a", 1);
        assert!(!memory.is_tabu(&"a"));
        memory.record("a", 2);
        assert!(memory.is_tabu(&"a"));
    }

    #[test]
    fn never_forget_memory_bans_permanently() {
        let mut memory = NeverForgetTabuMemory::new();
        memory.record("a", 0);
        memory.advance(1_000_000);
        assert!(memory.is_tabu(&"a"));
    }

    #[test]
    fn reject_all_memory_bans_everything_unconditionally() {
        let memory = RejectAllTabuMemory;
        assert!(TabuMemory::<&str>::is_tabu(&memory, &"anything"));
        assert!(TabuMemory::<u64>::is_tabu(&memory, &0));
    }
}
