//! Candidate enumeration and selection.
//!
//! For every new piece the agent tries each combination of a horizontal offset
//! in [`OFFSETS`] (outer loop) and a number of clockwise rotations in
//! [`ROTATIONS`] (inner loop), starting from the spawn position each time. The
//! piece is rotated, shifted one column at a time (saturating at the walls),
//! and dropped straight down; a candidate is kept only if its piece locks
//! inside the visible grid.
//!
//! Selection keeps the *last* of equally scored candidates, so the enumeration
//! order above decides ties.

use std::ops::{Range, RangeInclusive};

use tabutris_engine::{Action, Board, LockMode, Piece};

use crate::{HeuristicWeights, Move};

/// Horizontal offsets tried for every piece; negative is left.
pub const OFFSETS: RangeInclusive<i32> = -5..=5;

/// Clockwise rotation counts tried for every offset.
pub const ROTATIONS: Range<u8> = 0..4;

/// Upper bound on the number of candidates for one piece.
pub const MAX_CANDIDATES: usize = 44;

/// Lists every candidate placement of `piece` (at its spawn state) on `board`.
#[must_use]
pub fn enumerate_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut moves = Vec::with_capacity(MAX_CANDIDATES);
    for offset in OFFSETS {
        for rotations in ROTATIONS {
            if let Some(candidate) = place(board, piece, offset, rotations) {
                moves.push(candidate);
            }
        }
    }
    moves
}

fn place(board: &Board, piece: &Piece, offset: i32, rotations: u8) -> Option<Move> {
    let mut piece = *piece;
    let mut actions = Vec::with_capacity(usize::from(rotations) + 5);

    for _ in 0..rotations {
        piece.rotate_cw();
        actions.push(Action::RotateCw);
    }
    for _ in 0..offset.unsigned_abs() {
        if offset < 0 {
            piece.move_left();
            actions.push(Action::MoveLeft);
        } else {
            piece.move_right();
            actions.push(Action::MoveRight);
        }
    }
    while !board.collision(&piece) {
        piece.drop();
    }

    let mut board = board.clone();
    board.lock(&piece, LockMode::Foreign).ok()?;
    Some(Move::new(board, actions))
}

/// Returns the highest-scoring move, preferring later moves on ties.
///
/// Returns `None` if `moves` is empty.
#[must_use]
pub fn select_best<'a>(moves: &'a [Move], weights: &HeuristicWeights) -> Option<&'a Move> {
    let mut best: Option<(&Move, f64)> = None;
    for candidate in moves {
        let score = candidate.score(weights);
        if best.is_none_or(|(_, best_score)| score >= best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use tabutris_engine::{Cell, PieceKind};

    use super::*;

    const ZERO: HeuristicWeights = HeuristicWeights {
        height: 0.0,
        balance: 0.0,
        hole: 0.0,
        block: 0.0,
        line: 0.0,
    };

    fn row_19_open_at_9() -> Board {
        let mut board = Board::EMPTY;
        for x in 0..9 {
            board.set_cell(x, 19, Cell::Piece(PieceKind::J));
        }
        board
    }

    #[test]
    fn test_empty_board_yields_all_candidates() {
        for kind in PieceKind::ALL {
            let moves = enumerate_moves(&Board::EMPTY, &Piece::new(kind));
            assert_eq!(moves.len(), MAX_CANDIDATES, "{kind:?}");
            for candidate in &moves {
                let placed = candidate
                    .board()
                    .rows()
                    .flatten()
                    .filter(|cell| cell.is_foreign())
                    .count();
                assert_eq!(placed, 4);
            }
        }
    }

    #[test]
    fn test_action_lists_follow_enumeration_order() {
        let moves = enumerate_moves(&Board::EMPTY, &Piece::new(PieceKind::T));
        assert_eq!(moves[0].actions(), &[Action::MoveLeft; 5]);
        assert_eq!(
            moves[6].actions(),
            &[
                Action::RotateCw,
                Action::RotateCw,
                Action::MoveLeft,
                Action::MoveLeft,
                Action::MoveLeft,
                Action::MoveLeft,
            ]
        );
        // offset 0, no rotation
        assert!(moves[20].actions().is_empty());

        let last = moves.last().unwrap().actions();
        assert_eq!(&last[..3], &[Action::RotateCw; 3]);
        assert_eq!(&last[3..], &[Action::MoveRight; 5]);
    }

    #[test]
    fn test_far_offsets_saturate_at_wall() {
        let piece = Piece::new(PieceKind::O);
        let moves = enumerate_moves(&Board::EMPTY, &piece);
        // offset -5 and -4 both end against the left wall
        assert_eq!(moves[0].board(), moves[4].board());
        assert_eq!(moves[0].board().cell(0, 19), Cell::Foreign);
    }

    #[test]
    fn test_finds_line_clearing_placement() {
        let board = row_19_open_at_9();
        let moves = enumerate_moves(&board, &Piece::new(PieceKind::I));
        let clearing: Vec<_> = moves
            .iter()
            .filter(|candidate| candidate.board().cell(9, 19).is_foreign())
            .collect();
        assert!(!clearing.is_empty());

        let rewarded = HeuristicWeights {
            line: 1000.0,
            ..HeuristicWeights::BASE
        };
        let unrewarded = HeuristicWeights {
            line: 0.0,
            ..HeuristicWeights::BASE
        };
        for candidate in clearing {
            assert_eq!(candidate.board().full_rows().as_slice(), &[19]);
            let bonus = crate::evaluate(candidate.board(), &rewarded)
                - crate::evaluate(candidate.board(), &unrewarded);
            assert!((bonus - 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ties_prefer_last_candidate() {
        let moves = enumerate_moves(&Board::EMPTY, &Piece::new(PieceKind::L));
        let best = select_best(&moves, &ZERO).unwrap();
        assert!(std::ptr::eq(best, moves.last().unwrap()));
    }

    #[test]
    fn test_select_best_picks_highest_score() {
        let moves = enumerate_moves(&row_19_open_at_9(), &Piece::new(PieceKind::I));
        let best = select_best(&moves, &HeuristicWeights::BASE).unwrap();
        let top = moves
            .iter()
            .map(|candidate| candidate.score(&HeuristicWeights::BASE))
            .fold(f64::MIN, f64::max);
        assert_eq!(best.score(&HeuristicWeights::BASE).to_bits(), top.to_bits());
        assert!(best.board().cell(9, 19).is_foreign());
    }

    #[test]
    fn test_no_candidate_on_full_board() {
        let mut board = Board::EMPTY;
        for y in 0..Board::HEIGHT {
            for x in 0..Board::WIDTH {
                board.set_cell(x, y, Cell::Piece(PieceKind::Z));
            }
        }
        assert!(enumerate_moves(&board, &Piece::new(PieceKind::S)).is_empty());
        assert!(select_best(&[], &HeuristicWeights::BASE).is_none());
    }
}
