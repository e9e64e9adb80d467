use std::cell::OnceCell;

use tabutris_engine::{Action, Board};

use crate::{HeuristicWeights, evaluate};

/// A candidate placement: the board it produces and the actions that reach it.
///
/// The board holds the placed piece as foreign cells and still contains any
/// rows it completed. The score is computed on first request and cached.
#[derive(Debug, Clone)]
pub struct Move {
    board: Board,
    actions: Vec<Action>,
    score: OnceCell<f64>,
}

impl Move {
    #[must_use]
    pub fn new(board: Board, actions: Vec<Action>) -> Self {
        Self {
            board,
            actions,
            score: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Rotations followed by horizontal moves, applied from the spawn position.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    /// Evaluates the resulting board.
    ///
    /// Only the first call computes the score; later calls return the cached
    /// value even if given different weights.
    pub fn score(&self, weights: &HeuristicWeights) -> f64 {
        *self.score.get_or_init(|| evaluate(&self.board, weights))
    }
}
