use std::fmt;

use arrayvec::ArrayVec;

use crate::LockOutError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH, MAX_PIECE_SIZE,
    piece::{Piece, PieceKind},
};

/// A single cell of the grid.
///
/// Every cell maps to a small integer marker: `0` for empty, `kind + 1` for a
/// landed piece, and [`Cell::FOREIGN_MARKER`] for a hypothetical placement made
/// while searching for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Landed piece of a specific kind.
    Piece(PieceKind),
    /// Placement marked during search, not attributed to a real kind.
    Foreign,
}

impl Cell {
    pub const FOREIGN_MARKER: u8 = 9;

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_foreign(self) -> bool {
        self == Cell::Foreign
    }

    #[must_use]
    pub const fn marker(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.marker(),
            Cell::Foreign => Self::FOREIGN_MARKER,
        }
    }

    #[must_use]
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            0 => Some(Cell::Empty),
            Self::FOREIGN_MARKER => Some(Cell::Foreign),
            _ => match PieceKind::from_marker(marker) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}

/// How [`Board::lock`] marks the cells it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Write the piece's kind marker (real placement).
    Piece,
    /// Write the foreign marker (hypothetical placement during search).
    Foreign,
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

fn is_filled(row: &Row) -> bool {
    row.iter().all(|cell| !cell.is_empty())
}

/// Indices of full rows, in ascending (top-to-bottom) order.
pub type FullRows = ArrayVec<usize, BOARD_HEIGHT>;

/// The fixed 10×20 landing grid.
///
/// Row 0 is the top of the visible grid. Pieces above it (negative rows) are
/// never stored; locking such a piece fails with [`LockOutError`].
///
/// # Example
///
/// ```
/// use tabutris_engine::{Board, LockMode, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let mut piece = Piece::new(PieceKind::O);
/// while !board.collision(&piece) {
///     piece.drop();
/// }
/// board.lock(&piece, LockMode::Piece).unwrap();
/// assert!(!board.cell(4, 18).is_empty());
/// assert!(board.full_rows().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell.marker())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Overwrites a single cell. Intended for setting up boards directly.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Returns the cell at signed coordinates, or `None` outside the grid.
    fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Tests whether the piece overlaps the floor or a landed cell.
    ///
    /// A cell below the last row always collides. Cells above the grid or
    /// beyond the side walls never collide: horizontal bounds are enforced by
    /// the piece's movement primitives, not here.
    #[must_use]
    pub fn collision(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            usize::try_from(y).is_ok_and(|y| y >= Self::HEIGHT)
                || self.get(x, y).is_some_and(|cell| !cell.is_empty())
        })
    }

    /// Writes the piece into the grid one row above its current position.
    ///
    /// `lock` is called right after a drop produced a collision, so the piece
    /// sits one row past its last valid position. Fails without modifying the
    /// board if any cell would land above the grid.
    pub fn lock(&mut self, piece: &Piece, mode: LockMode) -> Result<(), LockOutError> {
        let cell = match mode {
            LockMode::Piece => Cell::Piece(piece.kind()),
            LockMode::Foreign => Cell::Foreign,
        };

        let mut targets = ArrayVec::<_, { MAX_PIECE_SIZE * MAX_PIECE_SIZE }>::new();
        for (x, y) in piece.occupied_positions() {
            let y = usize::try_from(y - 1).map_err(|_| LockOutError)?;
            debug_assert!(
                usize::try_from(x).is_ok_and(|x| x < Self::WIDTH),
                "piece outside the side walls: {piece}"
            );
            if let Ok(x) = usize::try_from(x) {
                targets.push((x, y));
            }
        }

        for (x, y) in targets {
            if let Some(target) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *target = cell;
            }
        }
        Ok(())
    }

    /// Returns the indices of rows with no empty cell, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> FullRows {
        (0..Self::HEIGHT)
            .filter(|&y| is_filled(&self.rows[y]))
            .collect()
    }

    /// Removes the given rows, shifting everything above each one down.
    ///
    /// `rows` must be in ascending order (as returned by [`Board::full_rows`]):
    /// removing a row only moves rows above it, so the remaining indices stay
    /// valid while the list is processed front to back.
    pub fn collapse(&mut self, rows: &[usize]) {
        debug_assert!(rows.is_sorted(), "rows must be ascending: {rows:?}");
        for &row in rows {
            self.rows.copy_within(..row, 1);
            self.rows[0] = EMPTY_ROW;
        }
    }

    /// Row of the topmost occupied cell in column `x`, or [`Board::HEIGHT`] if empty.
    #[must_use]
    pub fn column_top(&self, x: usize) -> usize {
        (0..Self::HEIGHT)
            .find(|&y| !self.rows[y][x].is_empty())
            .unwrap_or(Self::HEIGHT)
    }

    /// Row of the topmost occupied cell anywhere, or `None` for an empty board.
    #[must_use]
    pub fn top_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.iter().any(|cell| !cell.is_empty()))
    }

    /// Returns `true` if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_row().is_none()
    }
}
