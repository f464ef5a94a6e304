use anyhow::{anyhow, Context, Result};
use feed_algorithms::knapsack::{self, exhaustive};
use feed_structs::{Event, Solution};
use feed_utils::{jsonify, EventReader};
use feed_window::{verify_solution, FeedOptimizer, OptimizerStats};
use serde::{Deserialize, Serialize};
use std::{
    io::{BufRead, Write},
    str::FromStr,
};
use tracing::{info, warn};

/// Live sets up to this size are also checked against brute force in
/// `--verify` runs.
const EXHAUSTIVE_CHECK_LIMIT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<value> <count> <id...>` per reload
    #[default]
    Text,
    /// one `ReloadReport` object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown output format '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub caching: bool,
    pub verify: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            caching: true,
            verify: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    pub time: i64,
    pub value: u64,
    pub weight: u64,
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub reloads: usize,
    pub truncated: bool,
    pub stats: OptimizerStats,
}

/// Reads a header and its event stream from `input` and writes one result per
/// reload to `output`.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: &RunOptions,
) -> Result<RunSummary> {
    let (config, mut events) = EventReader::new(input)?;
    info!(
        event_count = config.event_count,
        window = config.window,
        page_height = config.page_height,
        caching = options.caching,
        "starting run"
    );

    let mut optimizer = FeedOptimizer::new(config).with_caching(options.caching);
    let mut num_events = 0;
    let mut num_reloads = 0;
    let mut last_time: Option<i64> = None;
    for event in events.by_ref() {
        let event = event?;
        num_events += 1;
        if let Some(prev) = last_time.filter(|&prev| event.timestamp() < prev) {
            warn!(
                line = num_events + 1,
                time = event.timestamp(),
                previous = prev,
                "event time went backwards"
            );
        }
        last_time = Some(event.timestamp());

        match event {
            Event::Story {
                timestamp,
                value,
                weight,
            } => {
                optimizer.insert(timestamp, value, weight);
            }
            Event::Reload { timestamp } => {
                num_reloads += 1;
                let solution = optimizer.reload(timestamp).clone();
                if options.verify {
                    check_reload(&optimizer, &solution)
                        .with_context(|| format!("Reload at time {} failed verification", timestamp))?;
                }
                write_result(&mut output, options.format, timestamp, &solution)?;
            }
        }
    }

    let truncated = events.is_truncated();
    if truncated {
        warn!(
            expected = config.event_count,
            read = num_events,
            "input ended before all announced events were read"
        );
    }
    output.flush()?;

    let stats = *optimizer.stats();
    info!(
        events = num_events,
        reloads = num_reloads,
        solves = stats.solves,
        cache_hits = stats.cache_hits,
        patches = stats.patches,
        invalidations = stats.invalidations,
        "run finished"
    );
    Ok(RunSummary {
        events: num_events,
        reloads: num_reloads,
        truncated,
        stats,
    })
}

fn write_result<W: Write>(
    output: &mut W,
    format: OutputFormat,
    time: i64,
    solution: &Solution,
) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(output, "{}", solution)?,
        OutputFormat::Json => {
            let report = ReloadReport {
                time,
                value: solution.value,
                weight: solution.weight,
                ids: solution.ids.clone(),
            };
            writeln!(output, "{}", jsonify(&report)?)?
        }
    }
    Ok(())
}

/// Checks a reported page against the live set it was computed from and
/// against a fresh search.
fn check_reload(optimizer: &FeedOptimizer, solution: &Solution) -> Result<()> {
    let live = optimizer.live_set().items();
    let page_height = optimizer.config().page_height;
    verify_solution(live, page_height, solution)?;

    let fresh = knapsack::solve(live, page_height);
    if fresh.value != solution.value {
        return Err(anyhow!(
            "Reported value ({}) differs from a fresh solve ({})",
            solution.value,
            fresh.value
        ));
    }
    if fresh.ids != solution.ids {
        warn!(
            reported = ?solution.ids,
            fresh = ?fresh.ids,
            "cached and fresh solutions tie but pick different stories"
        );
    }

    if live.len() <= EXHAUSTIVE_CHECK_LIMIT {
        if let Some(reference) = exhaustive::solve(live, page_height) {
            if reference.value != solution.value {
                return Err(anyhow!(
                    "Reported value ({}) is not optimal ({})",
                    solution.value,
                    reference.value
                ));
            }
        }
    }
    Ok(())
}
