use std::{mem, time::Duration};

use tracing::debug;

use crate::{
    Action, ActionQueue, Agent, Board, FullRows, LockMode, LockOutError, Piece, PieceGenerator,
    Player,
};

const TICK_MILLIS: u64 = 25;

/// Virtual duration of one [`Game::tick`].
pub const TICK: Duration = Duration::from_millis(TICK_MILLIS);

/// Ticks the death animation lasts before the game accepts a restart.
pub const DEATH_ANIMATION_TICKS: u32 = 20;

/// How long full rows stay on the board before they are collapsed.
pub const LINE_CLEAR_DURATION: Duration = Duration::from_secs(1);

const BASE_FALL_INTERVAL: Duration = Duration::from_millis(100);

/// Virtual time the active piece waits before each gravity step at `level`.
///
/// A piece falls once its timer strictly exceeds this interval, so at level 0
/// it falls on every fifth tick.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    let divisor = u32::try_from(level + 1).unwrap_or(u32::MAX);
    BASE_FALL_INTERVAL / divisor
}

/// Phase of the game state machine.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    /// Nothing spawned yet; the first tick spawns the first two pieces.
    NotStarted,
    /// A piece is falling and accepts actions.
    Playing,
    /// Full rows stay on the board until [`LINE_CLEAR_DURATION`] has elapsed.
    LineClearing { rows: FullRows, elapsed: Duration },
    /// A piece locked above the grid.
    Dead { animation_ticks: u32 },
}

/// Tick-driven game: board, active and next pieces, player, and an agent.
///
/// Each [`Game::tick`] advances the game by [`TICK`] of virtual time. There is
/// no wall-clock pacing; callers drive ticks as fast as they like.
///
/// # Example
///
/// ```
/// use tabutris_engine::{Game, IdleAgent};
///
/// let mut game = Game::new(42, IdleAgent);
/// while !game.phase().is_dead() {
///     game.tick();
/// }
/// assert!(game.spawned_pieces() > 1);
/// ```
#[derive(Debug, Clone)]
pub struct Game<A> {
    board: Board,
    active: Option<Piece>,
    next: Option<Piece>,
    player: Player,
    queue: ActionQueue,
    generator: PieceGenerator,
    agent: A,
    phase: GamePhase,
    paused: bool,
    fall_timer: Duration,
    total_ticks: u64,
    spawned_pieces: usize,
}

impl<A> Game<A>
where
    A: Agent,
{
    /// Creates a game whose piece sequence is fully determined by `seed`.
    pub fn new(seed: u64, agent: A) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed), agent)
    }

    pub fn with_generator(generator: PieceGenerator, agent: A) -> Self {
        Self {
            board: Board::EMPTY,
            active: None,
            next: None,
            player: Player::new(),
            queue: ActionQueue::new(),
            generator,
            agent,
            phase: GamePhase::NotStarted,
            paused: false,
            fall_timer: Duration::ZERO,
            total_ticks: 0,
            spawned_pieces: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece, or `None` before the first spawn and after a lock.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns `true` once the death animation has finished.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Dead { animation_ticks } if animation_ticks >= DEATH_ANIMATION_TICKS
        )
    }

    #[must_use]
    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// Mutable access to the action queue, for feeding actions from outside the agent.
    pub fn queue_mut(&mut self) -> &mut ActionQueue {
        &mut self.queue
    }

    #[must_use]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    #[must_use]
    pub fn into_agent(self) -> A {
        self.agent
    }

    /// Number of ticks since the game was created or last restarted.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Virtual time elapsed since the game was created or last restarted.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.total_ticks.saturating_mul(TICK_MILLIS))
    }

    /// Number of pieces that became active since the game was created or last restarted.
    #[must_use]
    pub fn spawned_pieces(&self) -> usize {
        self.spawned_pieces
    }

    /// Advances the game by one tick.
    pub fn tick(&mut self) {
        self.total_ticks += 1;
        match self.phase {
            GamePhase::NotStarted => self.spawn_piece(),
            GamePhase::Dead { .. } => self.tick_dead(),
            GamePhase::Playing | GamePhase::LineClearing { .. } => self.tick_running(),
        }
    }

    fn tick_running(&mut self) {
        // only the first token of a tick can toggle pause
        let head = self.queue.dequeue();
        match (self.paused, head) {
            (false, Some(Action::Start)) => {
                debug!(tick = self.total_ticks, "paused");
                self.paused = true;
                return;
            }
            (true, Some(Action::Start)) => {
                debug!(tick = self.total_ticks, "resumed");
                self.paused = false;
            }
            (true, _) => return,
            (false, _) => {}
        }

        let mut pending = head;
        while let Some(action) = pending {
            // full rows on screen: the locked piece no longer takes input
            if let (GamePhase::Playing, Some(piece)) = (&self.phase, self.active.as_mut()) {
                apply_action(&self.board, piece, action);
            }
            pending = self.queue.dequeue();
        }

        if self.phase.is_playing() {
            self.fall_timer += TICK;
            if self.fall_timer > fall_interval(self.player.level()) {
                self.fall_timer = Duration::ZERO;
                self.drop_active_piece();
            }
        }

        if self.phase.is_line_clearing() {
            self.tick_line_clearing();
        }
    }

    fn drop_active_piece(&mut self) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        piece.drop();
        let piece = *piece;
        self.agent.on_drop(&piece);

        if !self.board.collision(&piece) {
            return;
        }

        self.active = None;
        match self.board.lock(&piece, LockMode::Piece) {
            Ok(()) => {
                let rows = self.board.full_rows();
                if rows.is_empty() {
                    self.spawn_piece();
                } else {
                    debug!(%piece, rows = ?rows.as_slice(), "rows completed");
                    self.phase = GamePhase::LineClearing {
                        rows,
                        elapsed: Duration::ZERO,
                    };
                }
            }
            Err(LockOutError) => {
                debug!(
                    %piece,
                    lines = self.player.lines(),
                    score = self.player.score(),
                    pieces = self.spawned_pieces,
                    "topped out"
                );
                self.phase = GamePhase::Dead { animation_ticks: 0 };
            }
        }
    }

    fn tick_line_clearing(&mut self) {
        let GamePhase::LineClearing { rows, elapsed } = &mut self.phase else {
            return;
        };
        *elapsed += TICK;
        if *elapsed < LINE_CLEAR_DURATION {
            return;
        }

        let rows = mem::take(rows);
        self.board.collapse(&rows);
        let points = self.player.add_score(rows.len());
        self.player.add_lines(rows.len());
        debug!(
            cleared = rows.len(),
            points,
            lines = self.player.lines(),
            level = self.player.level(),
            "lines cleared"
        );
        self.spawn_piece();
    }

    fn tick_dead(&mut self) {
        let GamePhase::Dead { animation_ticks } = &mut self.phase else {
            return;
        };
        if *animation_ticks < DEATH_ANIMATION_TICKS {
            *animation_ticks += 1;
            self.queue.clear();
            return;
        }
        if self.queue.dequeue() == Some(Action::Start) {
            self.restart();
        }
    }

    /// Promotes the next piece to active and draws a new next piece.
    ///
    /// The very first spawn draws the next piece before the active one.
    fn spawn_piece(&mut self) {
        let (active, next) = match self.next {
            Some(next) => (next, self.generator.next_piece()),
            None => {
                let next = self.generator.next_piece();
                (self.generator.next_piece(), next)
            }
        };
        self.active = Some(active);
        self.next = Some(next);
        self.spawned_pieces += 1;
        self.phase = GamePhase::Playing;
        debug!(%active, next = %next.kind().as_char(), count = self.spawned_pieces, "spawned");

        self.agent
            .on_new_piece(&active, &next, &self.board, &mut self.queue);
    }

    /// Resets the board, player, timers, and queue, and spawns a piece.
    ///
    /// The piece sequence continues from the same generator.
    pub fn restart(&mut self) {
        debug!("restarting");
        self.board = Board::EMPTY;
        self.active = None;
        self.player = Player::new();
        self.queue.clear();
        self.paused = false;
        self.fall_timer = Duration::ZERO;
        self.total_ticks = 0;
        self.spawned_pieces = 0;
        self.spawn_piece();
    }
}

/// Applies one action, restoring the piece if the result collides.
///
/// A rotation that fits is followed by a wall fix; if the fixed piece
/// collides, both the rotation and the fix are undone.
fn apply_action(board: &Board, piece: &mut Piece, action: Action) {
    let before = *piece;
    match action {
        Action::Start => return,
        Action::MoveLeft => piece.move_left(),
        Action::MoveRight => piece.move_right(),
        Action::RotateCw => piece.rotate_cw(),
        Action::RotateCcw => piece.rotate_ccw(),
    }
    if matches!(action, Action::RotateCw | Action::RotateCcw) && !board.collision(piece) {
        piece.fix_wall_collision();
    }
    if board.collision(piece) {
        *piece = before;
    }
}
