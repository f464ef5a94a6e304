use serde::{Deserialize, Serialize};

/// Run parameters carried by the header line of an event stream.
///
/// `window` and `page_height` stay fixed for the whole run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub event_count: usize,
    pub window: u64,
    pub page_height: u64,
}

impl FeedConfig {
    pub fn new(event_count: usize, window: u64, page_height: u64) -> Self {
        Self {
            event_count,
            window,
            page_height,
        }
    }

    /// Oldest timestamp still live at a reload issued at `now`.
    pub fn min_live_time(&self, now: i64) -> i64 {
        now.saturating_sub_unsigned(self.window)
    }

    pub fn fits_page(&self, weight: u64) -> bool {
        weight <= self.page_height
    }
}
