pub mod config;
pub mod core;

pub use crate::config::FeedConfig;
pub use crate::core::{Event, Item, Solution};
