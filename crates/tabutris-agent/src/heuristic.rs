use tabutris_engine::{Action, Agent, Board, Piece};
use tracing::{debug, trace};

use crate::{HeuristicWeights, WeightSource, search};

/// Single-piece lookahead agent driven by [`HeuristicWeights`].
///
/// On every spawn it enumerates all candidate placements of the active piece,
/// scores them, and queues the actions of the best one. The next piece is
/// ignored. If no candidate fits, it queues nothing and lets the piece fall.
///
/// # Example
///
/// ```
/// use tabutris_agent::{HeuristicAgent, HeuristicWeights};
/// use tabutris_engine::Game;
///
/// let agent = HeuristicAgent::new(HeuristicWeights::BASE);
/// let mut game = Game::new(42, agent);
/// for _ in 0..10_000 {
///     game.tick();
/// }
/// assert!(game.agent().planned_pieces() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicAgent {
    weights: HeuristicWeights,
    planned_pieces: usize,
}

impl HeuristicAgent {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self {
            weights,
            planned_pieces: 0,
        }
    }

    #[must_use]
    pub fn from_source(source: &WeightSource) -> Self {
        Self::new(source.resolve())
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Number of pieces this agent has planned for.
    #[must_use]
    pub fn planned_pieces(&self) -> usize {
        self.planned_pieces
    }
}

impl Agent for HeuristicAgent {
    fn plan(&mut self, board: &Board, active: &Piece, _next: &Piece) -> Vec<Action> {
        self.planned_pieces += 1;
        let moves = search::enumerate_moves(board, active);
        let Some(best) = search::select_best(&moves, &self.weights) else {
            debug!(%active, "no placement fits");
            return vec![];
        };
        trace!(
            %active,
            candidates = moves.len(),
            score = best.score(&self.weights),
            actions = best.actions().len(),
            "planned"
        );
        best.actions().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use tabutris_engine::{ActionQueue, Cell, PieceKind};

    use super::*;

    #[test]
    fn test_plan_fills_the_open_column() {
        let mut board = Board::EMPTY;
        for x in 0..9 {
            board.set_cell(x, 19, Cell::Piece(PieceKind::J));
        }
        let active = Piece::new(PieceKind::I);
        let next = Piece::new(PieceKind::O);

        let mut agent = HeuristicAgent::new(HeuristicWeights::BASE);
        let mut queue = ActionQueue::new();
        agent.on_new_piece(&active, &next, &board, &mut queue);

        // both vertical orientations tie; the later one wins
        let mut expected = vec![Action::RotateCw; 3];
        expected.extend([Action::MoveRight; 5]);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(agent.planned_pieces(), 1);
    }

    #[test]
    fn test_plan_is_empty_when_nothing_fits() {
        let mut board = Board::EMPTY;
        for y in 0..Board::HEIGHT {
            for x in 0..Board::WIDTH {
                board.set_cell(x, y, Cell::Piece(PieceKind::T));
            }
        }
        let mut agent = HeuristicAgent::new(HeuristicWeights::BASE);
        let piece = Piece::new(PieceKind::T);
        assert!(agent.plan(&board, &piece, &piece).is_empty());
    }

    #[test]
    fn test_from_source() {
        let weights = HeuristicWeights {
            hole: 3.0,
            ..HeuristicWeights::BASE
        };
        let agent = HeuristicAgent::from_source(&WeightSource::Fixed(weights));
        assert_eq!(agent.weights(), &weights);
    }
}
