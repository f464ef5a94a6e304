use feed_structs::Item;
use std::cmp::Ordering;

/// Items currently on offer, ordered by descending density.
///
/// Among equal densities the most recently inserted item comes first.
#[derive(Debug, Clone, Default)]
pub struct LiveSet {
    items: Vec<Item>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: Item) {
        let pos = self
            .items
            .partition_point(|live| item.cmp_density(live) == Ordering::Less);
        self.items.insert(pos, item);
    }

    /// Removes every item older than `min_time` and returns them in live-set
    /// order.
    pub fn evict_before(&mut self, min_time: i64) -> Vec<Item> {
        if self.items.iter().all(|item| item.timestamp >= min_time) {
            return Vec::new();
        }
        let (kept, evicted): (Vec<Item>, Vec<Item>) = self
            .items
            .drain(..)
            .partition(|item| item.timestamp >= min_time);
        self.items = kept;
        evicted
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
