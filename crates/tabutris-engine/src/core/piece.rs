use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, MAX_PIECE_SIZE};

/// Row at which every piece spawns; the top of the bounding box starts above the grid.
pub const SPAWN_Y: i32 = -2;

#[expect(clippy::cast_possible_wrap)]
const RIGHT_WALL: i32 = BOARD_WIDTH as i32 - 1;
const LEFT_WALL: i32 = 0;

/// A falling tetromino with position, orientation, and type.
///
/// The position is the top-left corner of the piece's square bounding box, in
/// grid coordinates (column `x`, row `y`, row 0 at the top). Pieces spawn
/// partially above the visible grid at [`SPAWN_Y`].
///
/// Horizontal bounds are enforced by the movement primitives themselves:
/// [`Piece::move_left`], [`Piece::move_right`], and [`Piece::fix_wall_collision`]
/// never leave an occupied cell outside `0..BOARD_WIDTH`. The board's collision
/// test relies on this and only checks the floor and occupied cells.
///
/// # Example
///
/// ```
/// use tabutris_engine::{Piece, PieceKind};
///
/// let mut piece = Piece::new(PieceKind::T);
/// piece.rotate_cw();
/// piece.move_left();
/// piece.drop();
/// assert_eq!((piece.x(), piece.y()), (2, -1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    x: i32,
    y: i32,
    orientation: u8,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#orientation@x,y" (e.g., "S#1@4,18")
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.orientation,
            self.x,
            self.y
        )
    }
}

impl Piece {
    /// Creates a piece of the given kind at its spawn position and orientation.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            x: kind.spawn_x(),
            y: SPAWN_Y,
            orientation: 0,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Orientation index, in `0..kind.orientation_count()`.
    #[must_use]
    pub const fn orientation(&self) -> u8 {
        self.orientation
    }

    /// Side length of the bounding box. Never changes under rotation.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.kind.size()
    }

    /// Returns the occupancy matrix of the bounding box, indexed `[row][column]`.
    ///
    /// Only the top-left `size() × size()` sub-matrix is meaningful.
    #[must_use]
    pub fn matrix(&self) -> &'static PieceShape {
        self.kind.shape(self.orientation)
    }

    /// Returns the occupied cells relative to the bounding box, as `(dx, dy)`.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let shape = self.matrix();
        let size = self.size();
        (0..size).flat_map(move |dy| {
            (0..size).filter_map(move |dx| shape[dy][dx].then_some((dx, dy)))
        })
    }

    /// Returns the occupied cells in grid coordinates, as `(x, y)`.
    ///
    /// Rows may be negative while the piece is above the visible grid.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (x, y) = (self.x, self.y);
        self.occupied_offsets()
            .map(move |(dx, dy)| (x + offset(dx), y + offset(dy)))
    }

    /// Leftmost occupied column of the bounding box (0 if the box is empty).
    #[must_use]
    pub fn left_bounds(&self) -> usize {
        let shape = self.matrix();
        let size = self.size();
        (0..size)
            .find(|&dx| (0..size).any(|dy| shape[dy][dx]))
            .unwrap_or(0)
    }

    /// Rightmost occupied column of the bounding box (0 if the box is empty).
    #[must_use]
    pub fn right_bounds(&self) -> usize {
        let shape = self.matrix();
        let size = self.size();
        (0..size)
            .rev()
            .find(|&dx| (0..size).any(|dy| shape[dy][dx]))
            .unwrap_or(0)
    }

    fn left_edge(&self) -> i32 {
        self.x + offset(self.left_bounds())
    }

    fn right_edge(&self) -> i32 {
        self.x + offset(self.right_bounds())
    }

    /// Shifts one column left unless the occupied cells already touch the left wall.
    pub fn move_left(&mut self) {
        if self.left_edge() > LEFT_WALL {
            self.x -= 1;
        }
    }

    /// Shifts one column right unless the occupied cells already touch the right wall.
    pub fn move_right(&mut self) {
        if self.right_edge() < RIGHT_WALL {
            self.x += 1;
        }
    }

    /// Moves down one row. Collision must be checked by the caller.
    pub fn drop(&mut self) {
        self.y += 1;
    }

    /// Rotates 90° clockwise.
    ///
    /// Two-orientation kinds (I, S, Z) toggle between their spawn and rotated
    /// orientation, so `rotate_cw` and `rotate_ccw` have the same effect on them.
    pub fn rotate_cw(&mut self) {
        self.orientation = match self.kind.orientation_count() {
            2 => self.orientation ^ 1,
            n => (self.orientation + 1) % n,
        };
    }

    /// Rotates 90° counter-clockwise. See [`Piece::rotate_cw`] for two-orientation kinds.
    pub fn rotate_ccw(&mut self) {
        self.orientation = match self.kind.orientation_count() {
            2 => self.orientation ^ 1,
            n => (self.orientation + n - 1) % n,
        };
    }

    /// Pushes the piece back inside the side walls after a rotation.
    ///
    /// Moves at most two columns right, then at most two columns left. Only the
    /// grid width is consulted, never the board contents.
    pub fn fix_wall_collision(&mut self) {
        for _ in 0..2 {
            if self.left_edge() < LEFT_WALL {
                self.x += 1;
            }
        }
        for _ in 0..2 {
            if self.right_edge() > RIGHT_WALL {
                self.x -= 1;
            }
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn offset(value: usize) -> i32 {
    // bounded by MAX_PIECE_SIZE
    value as i32
}

/// The seven tetromino kinds.
///
/// The discriminant order matches the board's cell markers: a landed cell of
/// kind `k` is stored as marker `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Line piece.
    I = 0,
    /// S-piece.
    S = 1,
    /// Z-piece.
    Z = 2,
    /// Square piece.
    O = 3,
    /// L-piece.
    L = 4,
    /// J-piece.
    J = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
    ];

    const SPAWN_X: [i32; Self::LEN] = [3, 4, 3, 4, 3, 4, 3];
    const SIZES: [usize; Self::LEN] = [4, 3, 3, 2, 3, 3, 3];

    /// Side length of this kind's bounding box.
    #[must_use]
    pub const fn size(self) -> usize {
        Self::SIZES[self as usize]
    }

    /// Number of distinct orientations the rotation cycle visits (2 or 4).
    #[must_use]
    pub const fn orientation_count(self) -> u8 {
        match self {
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::O | PieceKind::L | PieceKind::J | PieceKind::T => 4,
        }
    }

    /// Column of the bounding box's left edge at spawn.
    #[must_use]
    pub const fn spawn_x(self) -> i32 {
        Self::SPAWN_X[self as usize]
    }

    /// Cell marker written to the board when a piece of this kind locks.
    #[must_use]
    pub const fn marker(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`PieceKind::marker`].
    #[must_use]
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            1..=7 => Some(Self::ALL[(marker - 1) as usize]),
            _ => None,
        }
    }

    fn shape(self, orientation: u8) -> &'static PieceShape {
        &PIECE_SHAPES[self as usize][usize::from(orientation)]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabutris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::O.as_char(), 'O');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::T => 'T',
        }
    }
}

/// Occupancy of a piece's bounding box, indexed `[row][column]`.
pub type PieceShape = [[bool; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// Generates the 4 clockwise rotation states of a shape.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (4 for I, 2 for O, 3 for the rest)
/// * `shape` - Spawn orientation
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

// Two-orientation kinds only ever use indices 0 and 1.
const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, EEEE, [C, C, C, C], EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(piece: &Piece) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.occupied_positions().collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_every_kind_has_four_cells_in_every_orientation() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..4 {
                assert_eq!(piece.occupied_offsets().count(), 4, "{piece}");
                piece.rotate_cw();
            }
        }
    }

    #[test]
    fn test_rotation_cycle_returns_to_spawn_matrix() {
        for kind in PieceKind::ALL {
            let spawn = Piece::new(kind);
            let mut piece = spawn;
            for _ in 0..kind.orientation_count() {
                piece.rotate_cw();
            }
            assert_eq!(piece.matrix(), spawn.matrix(), "{kind:?}");
            assert_eq!(piece.orientation(), 0);
        }
    }

    #[test]
    fn test_two_state_kinds_toggle() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            let spawn = Piece::new(kind);
            let mut cw = spawn;
            cw.rotate_cw();
            let mut ccw = spawn;
            ccw.rotate_ccw();
            assert_eq!(cw, ccw, "{kind:?}");
            assert_ne!(cw.matrix(), spawn.matrix());

            cw.rotate_ccw();
            assert_eq!(cw, spawn);
        }
    }

    #[test]
    fn test_four_state_ccw_undoes_cw() {
        for kind in [PieceKind::O, PieceKind::L, PieceKind::J, PieceKind::T] {
            let spawn = Piece::new(kind);
            let mut piece = spawn;
            for _ in 0..3 {
                piece.rotate_cw();
                let mut undone = piece;
                undone.rotate_ccw();
                undone.rotate_cw();
                assert_eq!(undone, piece);
            }
            piece.rotate_ccw();
            piece.rotate_ccw();
            piece.rotate_ccw();
            assert_eq!(piece, spawn);
        }
    }

    #[test]
    fn test_vertical_line_uses_single_column() {
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_cw();
        assert_eq!(piece.left_bounds(), 1);
        assert_eq!(piece.right_bounds(), 1);
        assert_eq!(
            occupied(&piece),
            vec![(4, -2), (4, -1), (4, 0), (4, 1)]
        );
    }

    #[test]
    fn test_t_clockwise_rotation_matrix() {
        let mut piece = Piece::new(PieceKind::T);
        piece.rotate_cw();
        // .T.
        // .TT
        // .T.
        let expected = [
            [false, true, false],
            [false, true, true],
            [false, true, false],
        ];
        for (dy, row) in expected.iter().enumerate() {
            assert_eq!(&piece.matrix()[dy][..3], row);
        }
    }

    #[test]
    fn test_move_left_saturates_at_wall() {
        let mut piece = Piece::new(PieceKind::O);
        for _ in 0..10 {
            piece.move_left();
        }
        assert_eq!(piece.x(), 0);

        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_cw();
        for _ in 0..10 {
            piece.move_left();
        }
        // box column 1 sits on the wall
        assert_eq!(piece.x(), -1);
    }

    #[test]
    fn test_move_right_saturates_at_wall() {
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_cw();
        for _ in 0..10 {
            piece.move_right();
        }
        assert_eq!(piece.x(), 8);
        assert!(occupied(&piece).iter().all(|&(x, _)| x == 9));
    }

    #[test]
    fn test_fix_wall_collision_after_rotation() {
        // vertical I hugging the left wall, rotated back to horizontal
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_cw();
        for _ in 0..10 {
            piece.move_left();
        }
        piece.rotate_cw();
        assert!(occupied(&piece).iter().any(|&(x, _)| x < 0));
        piece.fix_wall_collision();
        assert_eq!(piece.x(), 0);
        assert!(occupied(&piece).iter().all(|&(x, _)| (0..=9).contains(&x)));

        // vertical I hugging the right wall
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_cw();
        for _ in 0..10 {
            piece.move_right();
        }
        piece.rotate_cw();
        piece.fix_wall_collision();
        assert_eq!(piece.x(), 6);
        assert!(occupied(&piece).iter().all(|&(x, _)| (0..=9).contains(&x)));
    }

    #[test]
    fn test_drop_is_unconditional() {
        let mut piece = Piece::new(PieceKind::S);
        for _ in 0..30 {
            piece.drop();
        }
        assert_eq!(piece.y(), SPAWN_Y + 30);
    }

    #[test]
    fn test_marker_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_marker(kind.marker()), Some(kind));
        }
        assert_eq!(PieceKind::from_marker(0), None);
        assert_eq!(PieceKind::from_marker(9), None);
    }

    #[test]
    fn test_display_format() {
        let mut piece = Piece::new(PieceKind::S);
        piece.rotate_cw();
        assert_eq!(piece.to_string(), "S#1@4,-2");
    }
}
