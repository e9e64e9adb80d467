use serde::{Deserialize, Serialize};

/// Lines that must be cleared to reach the next level.
pub const LINES_PER_LEVEL: usize = 10;

const BASE_POINTS: usize = 50;

/// Score, level, and cleared-line counters of a single game.
///
/// # Leveling
///
/// The level targets `lines / 10`, but each call to [`Player::add_lines`]
/// raises it by at most one. Clearing enough lines in a single event to cross
/// two boundaries still gains only one level; the next clear catches up by one
/// more.
///
/// # Example
///
/// ```
/// use tabutris_engine::Player;
///
/// let mut player = Player::new();
/// let points = player.add_score(4);
/// player.add_lines(4);
///
/// assert_eq!(points, 1200);
/// assert_eq!(player.score(), 1200);
/// assert_eq!(player.lines(), 4);
/// assert_eq!(player.level(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    score: usize,
    level: usize,
    lines: usize,
}

impl Player {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            lines: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Adds cleared lines and levels up by one if the level target moved past it.
    pub const fn add_lines(&mut self, cleared: usize) {
        self.lines += cleared;
        if self.lines / LINES_PER_LEVEL > self.level {
            self.level += 1;
        }
    }

    /// Awards points for clearing `cleared` rows at the current level.
    ///
    /// Must be called before [`Player::add_lines`] for the same clear, so the
    /// points use the level the rows were cleared at. Returns the points added.
    pub fn add_score(&mut self, cleared: usize) -> usize {
        let points = line_clear_points(self.level, cleared);
        self.score += points;
        points
    }
}

/// Points for clearing `cleared` rows at once: `(level + 1) * 50 * cleared!`.
///
/// Clearing nothing is worth nothing.
#[must_use]
pub fn line_clear_points(level: usize, cleared: usize) -> usize {
    if cleared == 0 {
        return 0;
    }
    (level + 1) * BASE_POINTS * factorial(cleared)
}

fn factorial(n: usize) -> usize {
    (1..=n).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(4), 24);
    }

    #[test]
    fn test_line_clear_points() {
        assert_eq!(line_clear_points(0, 0), 0);
        assert_eq!(line_clear_points(0, 1), 50);
        assert_eq!(line_clear_points(0, 2), 100);
        assert_eq!(line_clear_points(0, 3), 300);
        assert_eq!(line_clear_points(0, 4), 1200);
        assert_eq!(line_clear_points(2, 1), 150);
    }

    #[test]
    fn test_tetris_at_level_zero() {
        let mut player = Player::new();
        assert_eq!(player.add_score(4), 1200);
        assert_eq!(player.score(), 1200);
    }

    #[test]
    fn test_add_zero_lines_keeps_level() {
        let mut player = Player::new();
        player.add_lines(0);
        assert_eq!(player.level(), 0);

        player.add_lines(10);
        assert_eq!(player.level(), 1);
        player.add_lines(0);
        assert_eq!(player.level(), 1);
    }

    #[test]
    fn test_level_up_at_ten_lines() {
        let mut player = Player::new();
        for _ in 0..9 {
            player.add_lines(1);
        }
        assert_eq!(player.level(), 0);
        player.add_lines(1);
        assert_eq!(player.level(), 1);
        assert_eq!(player.lines(), 10);
    }

    #[test]
    fn test_level_rises_by_one_across_multiple_boundaries() {
        let mut player = Player::new();
        player.add_lines(25);
        assert_eq!(player.lines(), 25);
        assert_eq!(player.level(), 1);

        // the next clear catches up one more level
        player.add_lines(1);
        assert_eq!(player.level(), 2);
        player.add_lines(1);
        assert_eq!(player.level(), 2);
    }

    #[test]
    fn test_score_uses_level_before_update() {
        let mut player = Player::new();
        player.add_lines(9);
        let points = player.add_score(1);
        player.add_lines(1);
        assert_eq!(points, 50);
        assert_eq!(player.level(), 1);
        assert_eq!(player.add_score(1), 100);
        assert_eq!(player.score(), 150);
    }
}
