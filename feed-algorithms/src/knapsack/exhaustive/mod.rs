//! Reference solver that enumerates every subset.
//!
//! Only usable on small instances, it exists to cross-check
//! `horowitz_sahni` and accepts items in any order.
use feed_structs::{Item, Solution};

pub const MAX_ITEMS: usize = 24;

pub fn solve(items: &[Item], capacity: u64) -> Option<Solution> {
    if items.len() > MAX_ITEMS {
        return None;
    }
    let mut best = Solution::new();
    for subset in 1u32..(1u32 << items.len()) {
        let chosen = items
            .iter()
            .enumerate()
            .filter(|(i, _)| subset & (1 << i) != 0)
            .map(|(_, item)| item);
        let candidate = Solution::from_items(chosen);
        if candidate.weight <= capacity && candidate.is_better_than(&best) {
            best = candidate;
        }
    }
    Some(best)
}
