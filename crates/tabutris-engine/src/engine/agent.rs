use crate::{Action, ActionQueue, Board, Piece};

/// Decision maker that feeds actions to a [`Game`](crate::Game).
///
/// The game calls [`Agent::on_new_piece`] whenever a piece spawns and
/// [`Agent::on_drop`] after every gravity step of the active piece. Planning
/// runs to completion before the next tick drains the queue.
pub trait Agent {
    /// Chooses the actions to apply to `active`, which is at its spawn position.
    fn plan(&mut self, board: &Board, active: &Piece, next: &Piece) -> Vec<Action>;

    /// Called when a new piece spawns. By default enqueues [`Agent::plan`].
    fn on_new_piece(&mut self, active: &Piece, next: &Piece, board: &Board, queue: &mut ActionQueue) {
        queue.extend(self.plan(board, active, next));
    }

    /// Called after the active piece moved down one row, before lock handling.
    fn on_drop(&mut self, _piece: &Piece) {}
}

impl<A> Agent for Box<A>
where
    A: Agent + ?Sized,
{
    fn plan(&mut self, board: &Board, active: &Piece, next: &Piece) -> Vec<Action> {
        (**self).plan(board, active, next)
    }

    fn on_new_piece(&mut self, active: &Piece, next: &Piece, board: &Board, queue: &mut ActionQueue) {
        (**self).on_new_piece(active, next, board, queue);
    }

    fn on_drop(&mut self, piece: &Piece) {
        (**self).on_drop(piece);
    }
}

/// Agent that never acts; every piece falls straight down from spawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleAgent;

impl Agent for IdleAgent {
    fn plan(&mut self, _board: &Board, _active: &Piece, _next: &Piece) -> Vec<Action> {
        vec![]
    }
}
