//! Runs whole games with the heuristic agent and reports their outcome.
//!
//! - [`simulate`] - Plays one game for a seed until it tops out
//! - [`run_batch`] - Plays many seeds in parallel, one game per thread
//! - [`BatchSummary`] - Descriptive statistics over a batch
//!
//! # Example
//!
//! ```
//! use tabutris_agent::{HeuristicWeights, WeightSource};
//! use tabutris_simulator::{SimulationConfig, simulate};
//!
//! let config = SimulationConfig {
//!     weights: WeightSource::Fixed(HeuristicWeights::BASE),
//!     piece_limit: Some(30),
//! };
//! let result = simulate(42, &config);
//! assert_eq!(result.pieces, 30);
//! assert!(!result.topped_out);
//! ```

use serde::{Deserialize, Serialize};
use tabutris_agent::{HeuristicAgent, HeuristicWeights, WeightSource};
use tabutris_engine::{Agent, Game};
use tracing::debug;

pub use self::batch::*;

mod batch;

/// Options shared by every game of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationConfig {
    pub weights: WeightSource,
    /// Stop after this many pieces have locked, even if the game is still alive.
    pub piece_limit: Option<usize>,
}

impl SimulationConfig {
    /// Configuration for the `index`-th game of a batch.
    ///
    /// A [`WeightSource::SeededJitter`] seed is offset by `index` so games get
    /// distinct but reproducible weights; other sources are shared as is.
    #[must_use]
    pub fn for_game(&self, index: usize) -> Self {
        let weights = match self.weights {
            WeightSource::SeededJitter(seed) => {
                WeightSource::SeededJitter(seed.wrapping_add(index as u64))
            }
            weights => weights,
        };
        Self { weights, ..*self }
    }
}

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seed of the piece sequence.
    pub seed: u64,
    pub lines_cleared: usize,
    pub score: usize,
    pub level: usize,
    /// Pieces locked into the board.
    pub pieces: usize,
    pub ticks: u64,
    /// `false` if the game was cut short by the piece limit.
    pub topped_out: bool,
    pub weights: HeuristicWeights,
}

/// Plays one game with a [`HeuristicAgent`] until it tops out.
///
/// The piece sequence depends only on `seed`. The agent's weights come from
/// `config.weights`, so two calls with the same seed only play identically
/// when the weight source is reproducible.
#[must_use]
pub fn simulate(seed: u64, config: &SimulationConfig) -> SimulationResult {
    let agent = HeuristicAgent::from_source(&config.weights);
    let weights = *agent.weights();
    debug!(seed, ?weights, "simulation started");

    let mut game = Game::new(seed, agent);
    let topped_out = play(&mut game, config.piece_limit);

    let player = game.player();
    let result = SimulationResult {
        seed,
        lines_cleared: player.lines(),
        score: player.score(),
        level: player.level(),
        pieces: game.spawned_pieces().saturating_sub(1),
        ticks: game.ticks(),
        topped_out,
        weights,
    };
    debug!(
        seed,
        lines = result.lines_cleared,
        pieces = result.pieces,
        topped_out,
        "simulation finished"
    );
    result
}

/// Ticks `game` until it tops out or `piece_limit` pieces have locked.
///
/// Returns `true` if the game topped out. The death animation is not played.
pub fn play<A>(game: &mut Game<A>, piece_limit: Option<usize>) -> bool
where
    A: Agent,
{
    loop {
        if game.phase().is_dead() {
            return true;
        }
        // the piece after the limit has spawned, so `limit` pieces are locked
        if piece_limit.is_some_and(|limit| game.spawned_pieces() > limit) {
            return false;
        }
        game.tick();
    }
}
