//! Game engine logic and state management.
//!
//! This module builds tick-driven gameplay on top of the core data structures:
//!
//! - [`Game`] - State machine owning the board, active/next pieces, player, and action queue
//! - [`Agent`] - Decision maker notified on every spawn and gravity step
//! - [`ActionQueue`] - FIFO of [`Action`] tokens between an agent and the game
//! - [`Player`] - Score, level, and cleared-line counters
//! - [`PieceGenerator`] - Seeded source of piece kinds
//!
//! # Game Flow
//!
//! 1. The first [`Game::tick`] spawns the first two pieces and asks the agent to plan
//! 2. Each tick drains the action queue, then advances the fall timer
//! 3. A piece that collides after a gravity step locks one row higher
//! 4. Full rows stay on the board for one second of virtual time, then collapse
//! 5. The next piece spawns and the agent plans again
//! 6. A piece locked above the grid ends the game
//!
//! # Example
//!
//! ```
//! use tabutris_engine::{Action, Agent, Board, Game, Piece};
//!
//! struct HugLeftWall;
//!
//! impl Agent for HugLeftWall {
//!     fn plan(&mut self, _board: &Board, _active: &Piece, _next: &Piece) -> Vec<Action> {
//!         vec![Action::MoveLeft; 5]
//!     }
//! }
//!
//! let mut game = Game::new(7, HugLeftWall);
//! while !game.phase().is_dead() {
//!     game.tick();
//! }
//! println!("lines: {}", game.player().lines());
//! ```

pub use self::{action::*, agent::*, game::*, piece_generator::*, player::*};

mod action;
mod agent;
mod game;
mod piece_generator;
mod player;
