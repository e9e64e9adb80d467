use tabutris_engine::Board;

use crate::HeuristicWeights;

/// Scores a board reached by a candidate placement. Higher is better.
///
/// Full rows are credited with `weights.line` each and collapsed first; the
/// remaining terms look at the collapsed board:
///
/// - **Height**: `top / 20 * weights.height`, where `top` is the row of the
///   highest occupied cell. Lower stacks score higher. An empty board adds 0.
/// - **Balance**: for each pair of neighbouring columns, the squared difference
///   of their top rows scaled by `weights.balance` is subtracted. The pairs at
///   either edge weigh 2.5 when the inner column is the higher one and 0.4
///   otherwise.
/// - **Holes**: every empty cell below a column's top costs `weights.hole`.
///   Above the first hole of each column, every foreign cell in the occupied
///   run directly over it costs `weights.block`.
#[must_use]
pub fn evaluate(board: &Board, weights: &HeuristicWeights) -> f64 {
    let mut board = board.clone();
    let rows = board.full_rows();
    board.collapse(&rows);

    line_bonus(rows.len(), weights)
        + height_score(&board, weights)
        - balance_penalty(&board, weights)
        - hole_penalty(&board, weights)
}

#[expect(clippy::cast_precision_loss)]
fn line_bonus(cleared: usize, weights: &HeuristicWeights) -> f64 {
    cleared as f64 * weights.line
}

#[expect(clippy::cast_precision_loss)]
fn height_score(board: &Board, weights: &HeuristicWeights) -> f64 {
    board.top_row().map_or(0.0, |top| {
        top as f64 / Board::HEIGHT as f64 * weights.height
    })
}

const EDGE_STEEP_WEIGHT: f64 = 2.5;
const EDGE_SHALLOW_WEIGHT: f64 = 0.4;

#[expect(clippy::cast_precision_loss)]
fn balance_penalty(board: &Board, weights: &HeuristicWeights) -> f64 {
    let last = Board::WIDTH - 2;
    (0..=last)
        .map(|x| {
            let left = board.column_top(x);
            let right = board.column_top(x + 1);
            let diff = weights.balance * left.abs_diff(right) as f64;
            let scale = match x {
                // the outer column sits lower than its neighbour
                0 if left > right => EDGE_STEEP_WEIGHT,
                0 => EDGE_SHALLOW_WEIGHT,
                x if x == last && left < right => EDGE_STEEP_WEIGHT,
                x if x == last => EDGE_SHALLOW_WEIGHT,
                _ => 1.0,
            };
            scale * diff * diff
        })
        .sum()
}

fn hole_penalty(board: &Board, weights: &HeuristicWeights) -> f64 {
    let mut penalty = 0.0;
    for x in 0..Board::WIDTH {
        let top = board.column_top(x);
        let mut first_hole = true;
        for y in (top + 1)..Board::HEIGHT {
            if !board.cell(x, y).is_empty() {
                continue;
            }
            if first_hole {
                first_hole = false;
                let covering = (0..y)
                    .rev()
                    .map(|u| board.cell(x, u))
                    .take_while(|cell| !cell.is_empty());
                for _ in covering.filter(|cell| cell.is_foreign()) {
                    penalty += weights.block;
                }
            }
            penalty += weights.hole;
        }
    }
    penalty
}
