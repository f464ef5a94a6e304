//! Exact 0/1 knapsack by iterative Horowitz-Sahni branch and bound.
//!
//! # Description
//! Items must be sorted by descending density. The search walks the binary
//! inclusion tree depth first: a forward move greedily packs every item that
//! still fits, and the first item that does not (the critical item) yields
//! Dantzig's bound for everything below the current node. Branches whose
//! bound cannot beat the incumbent are cut and the search backtracks by
//! dropping the closest packed item.
//!
//! # References
//! E. Horowitz, S. Sahni, "Computing partitions with applications to the
//! knapsack problem", J. ACM 21(2), 1974.
//! S. Martello, P. Toth, "Knapsack Problems", Wiley 1990, ch. 2.5.
use feed_structs::{Item, Solution};
use std::cmp::Ordering;
use tracing::trace;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub forward_moves: u64,
    pub pruned: u64,
    pub candidates: u64,
    pub improvements: u64,
}

/// Returns the best subset of `items` fitting in `capacity`.
///
/// `items` must be ordered by descending density.
pub fn solve(items: &[Item], capacity: u64) -> Solution {
    solve_with_stats(items, capacity).0
}

pub fn solve_with_stats(items: &[Item], capacity: u64) -> (Solution, SearchStats) {
    debug_assert!(
        items
            .windows(2)
            .all(|w| w[0].cmp_density(&w[1]) != Ordering::Less),
        "items are not sorted by descending density"
    );
    let mut search = Search::new(items, capacity);
    search.run();
    trace!(
        num_items = items.len(),
        capacity,
        forward_moves = search.stats.forward_moves,
        pruned = search.stats.pruned,
        candidates = search.stats.candidates,
        improvements = search.stats.improvements,
        "search finished"
    );
    (search.best_solution(), search.stats)
}

#[derive(Debug, Clone, Copy, Default)]
struct Load {
    value: u64,
    weight: u64,
    size: usize,
}

struct Search<'a> {
    items: &'a [Item],
    capacity: u64,
    mask: Vec<bool>,
    load: Load,
    best_mask: Vec<bool>,
    best: Load,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(items: &'a [Item], capacity: u64) -> Self {
        Self {
            items,
            capacity,
            mask: vec![false; items.len()],
            load: Load::default(),
            best_mask: vec![false; items.len()],
            best: Load::default(),
            stats: SearchStats::default(),
        }
    }

    fn run(&mut self) {
        let n = self.items.len();
        let mut j = 0;
        loop {
            while j < n {
                self.stats.forward_moves += 1;
                let before = self.load;
                let pos = self.forward(j);
                if pos == n {
                    break;
                }

                let critical = &self.items[pos];
                let bound = self.load.value
                    + critical.fractional_value(self.capacity - self.load.weight);
                if self.best.value > bound
                    || (self.best.value == bound && self.best.size < self.load.size)
                {
                    self.stats.pruned += 1;
                    self.mask[j..pos].fill(false);
                    self.load = before;
                    match self.backtrack(j) {
                        Some(next) => j = next,
                        None => return,
                    }
                } else {
                    // skip the critical item and keep packing after it
                    j = pos + 1;
                }
            }

            self.stats.candidates += 1;
            if self.improves_best() {
                self.stats.improvements += 1;
                self.best = self.load;
                self.best_mask.copy_from_slice(&self.mask);
            }

            match self.backtrack(n) {
                Some(next) => j = next,
                None => return,
            }
        }
    }

    /// Packs items from `start` while they fit. Returns the position of the
    /// critical item, or `n` when the scan ran off the end.
    fn forward(&mut self, start: usize) -> usize {
        let mut pos = start;
        while pos < self.items.len() {
            let item = &self.items[pos];
            if item.weight > self.capacity - self.load.weight {
                break;
            }
            self.mask[pos] = true;
            self.load.value += item.value;
            self.load.weight += item.weight;
            self.load.size += 1;
            pos += 1;
        }
        pos
    }

    /// Drops the closest packed item strictly before `end` and returns the
    /// position to resume from, or `None` once nothing is left to drop.
    fn backtrack(&mut self, end: usize) -> Option<usize> {
        let pos = self.mask[..end].iter().rposition(|&included| included)?;
        let item = &self.items[pos];
        self.mask[pos] = false;
        self.load.value -= item.value;
        self.load.weight -= item.weight;
        self.load.size -= 1;
        Some(pos + 1)
    }

    fn improves_best(&self) -> bool {
        match self.load.value.cmp(&self.best.value) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.load.size.cmp(&self.best.size) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    let candidate = sorted_ids(self.items, &self.mask);
                    let best = sorted_ids(self.items, &self.best_mask);
                    candidate < best
                }
            },
        }
    }

    fn best_solution(&self) -> Solution {
        Solution::from_items(
            self.items
                .iter()
                .zip(&self.best_mask)
                .filter_map(|(item, &included)| included.then_some(item)),
        )
    }
}

fn sorted_ids(items: &[Item], mask: &[bool]) -> Vec<u64> {
    let mut ids: Vec<u64> = items
        .iter()
        .zip(mask)
        .filter_map(|(item, &included)| included.then_some(item.id))
        .collect();
    ids.sort_unstable();
    ids
}
