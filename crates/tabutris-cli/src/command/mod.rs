use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tabutris_agent::{HeuristicWeights, WeightSource};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

use crate::util;

use self::{batch::BatchArg, simulate::SimulateArg};

mod batch;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one game and print its result
    Simulate(#[clap(flatten)] SimulateArg),
    /// Play many games in parallel and print every result with a summary
    Batch(#[clap(flatten)] BatchArg),
}

/// Where the agent's heuristic weights come from. Defaults to OS-random jitter.
#[derive(Default, Debug, Clone, clap::Args)]
#[group(multiple = false)]
pub(crate) struct WeightArgs {
    /// Seed for the weight jitter, making weights reproducible
    #[arg(long)]
    weight_seed: Option<u64>,
    /// JSON file with a fixed weight set
    #[arg(long, value_name = "FILE")]
    weights: Option<PathBuf>,
    /// Use the base weights without jitter
    #[arg(long)]
    base_weights: bool,
}

impl WeightArgs {
    pub(crate) fn source(&self) -> anyhow::Result<WeightSource> {
        let source = match (self.weight_seed, &self.weights, self.base_weights) {
            (Some(seed), _, _) => WeightSource::SeededJitter(seed),
            (_, Some(path), _) => WeightSource::Fixed(util::read_weights_file(path)?),
            (_, _, true) => WeightSource::Fixed(HeuristicWeights::BASE),
            (None, None, false) => WeightSource::Jittered,
        };
        Ok(source)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(level)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match &args.mode {
        Mode::Simulate(arg) => simulate::run(arg)?,
        Mode::Batch(arg) => batch::run(arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_weight_flags_are_exclusive() {
        let result =
            CommandArgs::try_parse_from(["tabutris", "simulate", "--weight-seed", "1", "--base-weights"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_weight_source_selection() {
        let args = CommandArgs::try_parse_from(["tabutris", "-vv", "batch", "--weight-seed", "4"])
            .unwrap();
        assert_eq!(args.verbose, 2);
        let Mode::Batch(arg) = &args.mode else {
            panic!("expected batch");
        };
        assert_eq!(arg.weights.source().unwrap(), WeightSource::SeededJitter(4));

        let args = CommandArgs::try_parse_from(["tabutris", "simulate", "--base-weights"]).unwrap();
        let Mode::Simulate(arg) = &args.mode else {
            panic!("expected simulate");
        };
        assert_eq!(
            arg.weights.source().unwrap(),
            WeightSource::Fixed(HeuristicWeights::BASE)
        );

        assert_eq!(WeightArgs::default().source().unwrap(), WeightSource::Jittered);
    }
}
