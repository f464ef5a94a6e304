pub mod exhaustive;
pub mod horowitz_sahni;

pub use horowitz_sahni::{solve, solve_with_stats, SearchStats};
