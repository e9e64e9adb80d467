pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns in the grid.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows in the grid.
pub const BOARD_HEIGHT: usize = 20;
/// Side length of the largest piece bounding box (the I-piece).
pub const MAX_PIECE_SIZE: usize = 4;
