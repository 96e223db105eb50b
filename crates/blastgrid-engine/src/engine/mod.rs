//! Game rules and session state.
//!
//! This module builds a playable game on top of the core board and piece
//! types:
//!
//! - [`GameSession`] - One game: board, hand, active piece, score and game-over
//! - [`Hand`] - Three piece slots with a selection cursor
//! - [`PieceGenerator`] - Weighted, placeability-aware hand generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Score, best score and line clear counters
//! - [`Reachability`] - Whether any piece in hand can still be placed
//! - [`Command`] / [`Event`] - Serializable inputs and their effects
//!
//! # Game Flow
//!
//! 1. The generator fills the hand with three distinct pieces
//! 2. The selected piece is spawned at the top-left corner
//! 3. The player moves it around, possibly over occupied cells
//! 4. Finalizing stamps it into the board and clears full rows and columns
//! 5. The hand is refilled once all three pieces are used
//! 6. The game ends when no piece in hand can be placed
//!
//! # Example
//!
//! ```
//! use blastgrid_engine::{Command, Direction, Event, GameSession, apply};
//!
//! let mut session = GameSession::new();
//!
//! for command in [
//!     Command::Spawn,
//!     Command::Move(Direction::Down),
//!     Command::Finalize,
//! ] {
//!     for event in apply(&mut session, command) {
//!         if let Event::GameOver { score } = event {
//!             println!("Game over with {score} points");
//!         }
//!     }
//! }
//!
//! assert!(session.stats().score() >= 5);
//! ```

pub use self::{
    command::*, game_session::*, game_stats::*, hand::*, piece_generator::*, reachability::*,
};

mod command;
mod game_session;
mod game_stats;
mod hand;
mod piece_generator;
mod reachability;
