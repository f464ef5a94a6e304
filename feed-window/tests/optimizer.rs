use feed_algorithms::knapsack::{exhaustive, horowitz_sahni};
use feed_structs::{FeedConfig, Item};
use feed_window::{verify_solution, FeedOptimizer};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::HashMap;

const MAX_STORIES: u64 = 40;

enum Step {
    Story { timestamp: i64, value: u64, weight: u64 },
    Reload { timestamp: i64 },
}

/// Random event stream with non-decreasing timestamps. With `unique` set,
/// every story carries its own bit in the low part of its value so the optimum
/// over any live set is unique.
fn random_steps(rng: &mut SmallRng, page_height: u64, unique: bool) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut now = 0i64;
    let mut stories = 0u64;
    while stories < MAX_STORIES {
        now += rng.gen_range(0..=3);
        if rng.gen_bool(0.65) {
            let value = if unique {
                (rng.gen_range(1..=50u64) << MAX_STORIES) | (1 << stories)
            } else {
                rng.gen_range(0..=30)
            };
            let weight = rng.gen_range(1..=page_height + page_height / 4);
            steps.push(Step::Story {
                timestamp: now,
                value,
                weight,
            });
            stories += 1;
        } else {
            steps.push(Step::Reload { timestamp: now });
        }
    }
    steps.push(Step::Reload { timestamp: now });
    steps
}

#[test]
fn test_end_to_end_example() {
    let mut optimizer = FeedOptimizer::new(FeedConfig::new(4, 10, 10));
    optimizer.insert(1, 10, 5);
    optimizer.insert(2, 6, 5);
    optimizer.insert(3, 5, 3);
    assert_eq!(optimizer.reload(5).to_string(), "16 2 1 2");
}

#[test]
fn test_back_to_back_reloads_are_identical() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut optimizer = FeedOptimizer::new(FeedConfig::new(0, 5, 20));
    for t in 0..12 {
        optimizer.insert(t, rng.gen_range(0..=20), rng.gen_range(1..=12));
    }
    let first = optimizer.reload(12).clone();
    let second = optimizer.reload(12).clone();
    assert_eq!(first, second);
    assert_eq!(optimizer.stats().cache_hits, 1);
}

#[test]
fn test_incremental_matches_fresh_solve() {
    let mut rng = SmallRng::seed_from_u64(2024);
    for round in 0..60 {
        let window = rng.gen_range(0..=8);
        let page_height = rng.gen_range(1..=25);
        let mut optimizer = FeedOptimizer::new(FeedConfig::new(0, window, page_height));
        for step in random_steps(&mut rng, page_height, true) {
            match step {
                Step::Story {
                    timestamp,
                    value,
                    weight,
                } => {
                    optimizer.insert(timestamp, value, weight);
                }
                Step::Reload { timestamp } => {
                    let reported = optimizer.reload(timestamp).clone();
                    let live = optimizer.live_set().items();
                    let fresh = horowitz_sahni::solve(live, page_height);
                    assert_eq!(reported, fresh, "round {} reload at {}", round, timestamp);
                    if live.len() <= 12 {
                        let reference = exhaustive::solve(live, page_height).unwrap();
                        assert_eq!(reported, reference);
                    }
                    verify_solution(live, page_height, &reported).unwrap();
                }
            }
        }
    }
}

#[test]
fn test_incremental_value_matches_fresh_solve_with_ties() {
    let mut rng = SmallRng::seed_from_u64(99);
    for _ in 0..60 {
        let window = rng.gen_range(0..=8);
        let page_height = rng.gen_range(0..=25);
        let mut optimizer = FeedOptimizer::new(FeedConfig::new(0, window, page_height));
        for step in random_steps(&mut rng, page_height.max(1), false) {
            match step {
                Step::Story {
                    timestamp,
                    value,
                    weight,
                } => {
                    optimizer.insert(timestamp, value, weight);
                }
                Step::Reload { timestamp } => {
                    let reported = optimizer.reload(timestamp).clone();
                    let live = optimizer.live_set().items();
                    let fresh = horowitz_sahni::solve(live, page_height);
                    assert_eq!(reported.value, fresh.value);
                    verify_solution(live, page_height, &reported).unwrap();
                }
            }
        }
    }
}

#[test]
fn test_expired_and_oversized_stories_never_reported() {
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..40 {
        let window = rng.gen_range(0..=6);
        let page_height = rng.gen_range(1..=20);
        let mut optimizer = FeedOptimizer::new(FeedConfig::new(0, window, page_height));
        let mut stories: HashMap<u64, Item> = HashMap::new();
        for step in random_steps(&mut rng, page_height, false) {
            match step {
                Step::Story {
                    timestamp,
                    value,
                    weight,
                } => {
                    let id = optimizer.insert(timestamp, value, weight);
                    stories.insert(id, Item::new(id, timestamp, value, weight));
                }
                Step::Reload { timestamp } => {
                    let min_time = timestamp - window as i64;
                    let reported = optimizer.reload(timestamp).clone();
                    for id in &reported.ids {
                        let story = &stories[id];
                        assert!(story.timestamp >= min_time);
                        assert!(story.weight <= page_height);
                    }
                    assert!(optimizer
                        .live_set()
                        .items()
                        .iter()
                        .all(|item| item.timestamp >= min_time && item.weight <= page_height));
                }
            }
        }
        assert_eq!(stories.len() as u64, MAX_STORIES);
    }
}

#[test]
fn test_cache_is_used() {
    let mut optimizer = FeedOptimizer::new(FeedConfig::new(0, 100, 10));
    optimizer.insert(0, 3, 2);
    optimizer.reload(0);
    optimizer.insert(1, 3, 2);
    optimizer.insert(2, 3, 2);
    optimizer.reload(2);
    optimizer.reload(3);
    let stats = optimizer.stats();
    assert_eq!(stats.solves, 1);
    assert_eq!(stats.patches, 2);
    assert_eq!(stats.cache_hits, 2);
    assert_eq!(optimizer.cached().map(|s| s.ids.clone()), Some(vec![1, 2, 3]));
}
