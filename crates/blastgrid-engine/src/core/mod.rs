//! Board, pieces and pure placement logic.
//!
//! - [`BitBoard`] - 8×8 occupancy with legality checks and line clearing
//! - [`PieceId`] - the fixed piece catalog
//! - [`LineClear`] - cells removed by a clear, in animation order
//! - [`simulation`] - placements projected onto a copy of the board

pub use self::{bit_board::*, line_clear::*, piece::*};

pub(crate) mod bit_board;
pub(crate) mod line_clear;
pub(crate) mod piece;
pub mod simulation;
