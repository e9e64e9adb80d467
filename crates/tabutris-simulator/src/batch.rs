use std::{
    num::NonZeroUsize,
    panic,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use serde::{Deserialize, Serialize};
use tabutris_stats::descriptive::DescriptiveStats;
use tracing::info;

use crate::{SimulationConfig, SimulationResult, simulate};

/// Plays one game per seed and returns the results in seed order.
///
/// One scoped worker per available CPU pulls the next unplayed seed as soon as
/// its current game ends. Game `i` uses [`SimulationConfig::for_game`]`(i)`.
#[must_use]
pub fn run_batch(seeds: &[u64], config: &SimulationConfig) -> Vec<SimulationResult> {
    let total = seeds.len();
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(total);
    let next_index = &AtomicUsize::new(0);
    let finished = &AtomicUsize::new(0);

    let mut results = thread::scope(|s| {
        let handles = (0..workers)
            .map(|_| {
                s.spawn(move || {
                    let mut played = vec![];
                    loop {
                        let index = next_index.fetch_add(1, Ordering::Relaxed);
                        let Some(&seed) = seeds.get(index) else {
                            break;
                        };
                        played.push((index, simulate(seed, &config.for_game(index))));
                        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                        info!(finished = done, total, seed, "batch progress");
                    }
                    played
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });

    results.sort_unstable_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

/// Aggregate statistics over a batch of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: usize,
    pub topped_out: usize,
    /// `None` for an empty batch.
    pub lines_cleared: Option<DescriptiveStats>,
    pub score: Option<DescriptiveStats>,
}

impl BatchSummary {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_results(results: &[SimulationResult]) -> Self {
        Self {
            games: results.len(),
            topped_out: results.iter().filter(|r| r.topped_out).count(),
            lines_cleared: DescriptiveStats::new(results.iter().map(|r| r.lines_cleared as f64)),
            score: DescriptiveStats::new(results.iter().map(|r| r.score as f64)),
        }
    }
}
