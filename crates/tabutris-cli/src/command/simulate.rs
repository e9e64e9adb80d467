use std::path::PathBuf;

use tabutris_simulator::SimulationConfig;
use tracing::info;

use crate::{command::WeightArgs, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed of the piece sequence (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    #[clap(flatten)]
    pub(crate) weights: WeightArgs,
    /// Stop after this many pieces have locked
    #[arg(long)]
    piece_limit: Option<usize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        weights,
        piece_limit,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(rand::random);
    let config = SimulationConfig {
        weights: weights.source()?,
        piece_limit: *piece_limit,
    };
    info!(seed, ?config, "simulating");

    let result = tabutris_simulator::simulate(seed, &config);
    info!(
        lines = result.lines_cleared,
        score = result.score,
        pieces = result.pieces,
        "done"
    );

    Output::save_json(&result, output.clone())
}
