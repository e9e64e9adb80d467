use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabutris_simulator::{BatchSummary, SimulationConfig, SimulationResult};
use tracing::info;

use crate::{command::WeightArgs, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BatchArg {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Seed of the first game; game `i` uses `seed + i` (random seeds if omitted)
    #[arg(long)]
    seed: Option<u64>,
    #[clap(flatten)]
    pub(crate) weights: WeightArgs,
    /// Stop each game after this many pieces have locked
    #[arg(long)]
    piece_limit: Option<usize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    generated_at: DateTime<Utc>,
    summary: BatchSummary,
    results: Vec<SimulationResult>,
}

pub(crate) fn run(arg: &BatchArg) -> anyhow::Result<()> {
    let BatchArg {
        games,
        seed,
        weights,
        piece_limit,
        output,
    } = arg;

    let seeds: Vec<u64> = match seed {
        Some(base) => (0..*games as u64).map(|i| base.wrapping_add(i)).collect(),
        None => (0..*games).map(|_| rand::random()).collect(),
    };
    let config = SimulationConfig {
        weights: weights.source()?,
        piece_limit: *piece_limit,
    };
    info!(games, ?config, "running batch");

    let results = tabutris_simulator::run_batch(&seeds, &config);
    let summary = BatchSummary::from_results(&results);
    if let Some(lines) = &summary.lines_cleared {
        info!(
            mean = lines.mean,
            median = lines.median,
            max = lines.max,
            "lines cleared"
        );
    }

    let report = BatchReport {
        generated_at: Utc::now(),
        summary,
        results,
    };
    Output::save_json(&report, output.clone())
}
