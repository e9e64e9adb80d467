//! Heuristic search agent.
//!
//! - [`HeuristicWeights`] / [`WeightSource`] - Evaluation factors and how they are drawn
//! - [`evaluate`] - Scores the board a candidate placement leads to
//! - [`Move`] - A candidate placement with its action list and cached score
//! - [`search`] - Candidate enumeration and tie-aware selection
//! - [`HeuristicAgent`] - [`Agent`](tabutris_engine::Agent) tying it all together

pub use self::{candidate::*, evaluation::*, heuristic::*, weights::*};

mod candidate;
mod evaluation;
mod heuristic;
pub mod search;
mod weights;
