use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Piece, PieceKind};

/// Source of piece kinds, each drawn uniformly over the seven kinds.
///
/// A generator built with [`PieceGenerator::with_seed`] always yields the same
/// sequence for the same seed.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator seeded from the OS's random data source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Pcg32::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }

    /// Draws a kind and returns it as a piece at its spawn position.
    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}
