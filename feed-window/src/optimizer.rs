use crate::LiveSet;
use feed_algorithms::knapsack;
use feed_structs::{FeedConfig, Item, Solution};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizerStats {
    pub inserted: u64,
    pub oversized: u64,
    pub evicted: u64,
    pub reloads: u64,
    pub cache_hits: u64,
    pub patches: u64,
    pub invalidations: u64,
    pub solves: u64,
}

/// Sliding-window feed: owns the live set, hands out story ids and remembers
/// the last optimal page so reloads only re-solve when it may have changed.
///
/// The cached solution is patched on insertion when the new story fits next
/// to it, kept when an eviction does not touch it, and dropped otherwise.
#[derive(Debug, Clone)]
pub struct FeedOptimizer {
    config: FeedConfig,
    live: LiveSet,
    cached: Option<Solution>,
    next_id: u64,
    caching: bool,
    stats: OptimizerStats,
}

impl FeedOptimizer {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            live: LiveSet::new(),
            cached: None,
            next_id: 1,
            caching: true,
            stats: OptimizerStats::default(),
        }
    }

    /// With caching off every reload runs a fresh search.
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        if !caching {
            self.cached = None;
        }
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn live_set(&self) -> &LiveSet {
        &self.live
    }

    pub fn cached(&self) -> Option<&Solution> {
        self.cached.as_ref()
    }

    pub fn stats(&self) -> &OptimizerStats {
        &self.stats
    }

    /// Registers a new story and returns its id. Stories taller than the page
    /// still consume an id but never enter the live set.
    pub fn insert(&mut self, timestamp: i64, value: u64, weight: u64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if !self.config.fits_page(weight) {
            self.stats.oversized += 1;
            debug!(id, weight, page_height = self.config.page_height, "dropping oversized story");
            return id;
        }

        let item = Item::new(id, timestamp, value, weight);
        self.stats.inserted += 1;
        if self.caching {
            self.patch_cache(&item);
        }
        self.live.insert(item);
        id
    }

    fn patch_cache(&mut self, item: &Item) {
        match self.cached.take() {
            Some(mut cached) if item.weight <= self.config.page_height - cached.weight => {
                // a zero-value story would only add cardinality, and the
                // larger page would lose the fewer-stories tie-break to the
                // current one
                if item.value > 0 {
                    cached.push(item);
                    self.stats.patches += 1;
                    debug!(id = item.id, value = cached.value, "extended cached solution");
                }
                self.cached = Some(cached);
            }
            Some(_) => {
                self.stats.invalidations += 1;
                debug!(id = item.id, "story does not fit next to cached solution");
            }
            None => {}
        }
    }

    /// Evicts stories older than `now - window` and returns the best page for
    /// what remains.
    pub fn reload(&mut self, now: i64) -> &Solution {
        self.stats.reloads += 1;
        let min_time = self.config.min_live_time(now);
        let evicted = self.live.evict_before(min_time);
        if !evicted.is_empty() {
            self.stats.evicted += evicted.len() as u64;
            let invalidated = self
                .cached
                .as_ref()
                .is_some_and(|cached| evicted.iter().any(|item| cached.contains(item.id)));
            if invalidated {
                self.cached = None;
                self.stats.invalidations += 1;
            }
            debug!(now, min_time, evicted = evicted.len(), invalidated, "evicted expired stories");
        }

        if !self.caching {
            self.cached = None;
        }
        let solution = match self.cached.take() {
            Some(cached) => {
                self.stats.cache_hits += 1;
                cached
            }
            None => {
                let (solution, search) =
                    knapsack::solve_with_stats(self.live.items(), self.config.page_height);
                self.stats.solves += 1;
                debug!(
                    now,
                    live = self.live.len(),
                    value = solution.value,
                    forward_moves = search.forward_moves,
                    pruned = search.pruned,
                    "solved live set"
                );
                solution
            }
        };
        self.cached.insert(solution)
    }
}
