use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// A story competing for space on the page.
///
/// `value` is the story's score and `weight` its height. Ids are handed out in
/// strictly increasing creation order and double as the tie-break key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub timestamp: i64,
    pub value: u64,
    pub weight: u64,
}

impl Item {
    pub fn new(id: u64, timestamp: i64, value: u64, weight: u64) -> Self {
        debug_assert!(weight > 0, "item {} has zero weight", id);
        Self {
            id,
            timestamp,
            value,
            weight,
        }
    }

    /// Value per unit of weight. Only meant for display, ordering goes through
    /// `cmp_density` which is exact.
    pub fn density(&self) -> f64 {
        self.value as f64 / self.weight as f64
    }

    /// Compares densities by cross-multiplication, so equal ratios such as
    /// 2/4 and 3/6 compare `Equal`.
    pub fn cmp_density(&self, other: &Item) -> Ordering {
        (self.value as u128 * other.weight as u128).cmp(&(other.value as u128 * self.weight as u128))
    }

    /// `floor(density * capacity)`: the value obtained by admitting the
    /// fraction `capacity / weight` of this item.
    pub fn fractional_value(&self, capacity: u64) -> u64 {
        let scaled = self.value as u128 * capacity as u128 / self.weight as u128;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// A feasible selection of items.
///
/// `ids` is kept in ascending order. The empty solution scores zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub value: u64,
    pub weight: u64,
    pub ids: Vec<u64>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut solution = Solution::new();
        for item in items {
            solution.value += item.value;
            solution.weight += item.weight;
            solution.ids.push(item.id);
        }
        solution.ids.sort_unstable();
        solution
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Adds an item whose id is larger than every id already selected.
    pub fn push(&mut self, item: &Item) {
        debug_assert!(self.ids.last().map_or(true, |&last| last < item.id));
        self.value += item.value;
        self.weight += item.weight;
        self.ids.push(item.id);
    }

    /// Orders solutions best first: higher value, then fewer items, then the
    /// lexicographically smaller id list. `Less` means `self` is preferred.
    pub fn cmp_preference(&self, other: &Solution) -> Ordering {
        other
            .value
            .cmp(&self.value)
            .then_with(|| self.ids.len().cmp(&other.ids.len()))
            .then_with(|| self.ids.cmp(&other.ids))
    }

    pub fn is_better_than(&self, other: &Solution) -> bool {
        self.cmp_preference(other) == Ordering::Less
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.ids.len())?;
        for id in &self.ids {
            write!(f, " {}", id)?;
        }
        Ok(())
    }
}

/// One parsed line of the event stream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Story {
        timestamp: i64,
        value: u64,
        weight: u64,
    },
    Reload {
        timestamp: i64,
    },
}

impl Event {
    pub fn timestamp(&self) -> i64 {
        match *self {
            Event::Story { timestamp, .. } | Event::Reload { timestamp } => timestamp,
        }
    }
}
