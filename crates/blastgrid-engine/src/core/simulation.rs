//! Hypothetical placements projected onto a copy of the board.
//!
//! Nothing here mutates the caller's board: every function works on a copy,
//! so the live occupancy can be read while a simulation runs on top of it.

use super::{
    bit_board::BitBoard,
    piece::{PieceId, Position},
};

/// Projects a placement and its line clear onto a copy of `board`.
///
/// Returns the board after clearing and the number of full lines the
/// placement produced. Only on-board footprint cells are stamped.
#[must_use]
pub fn project(board: &BitBoard, piece: PieceId, position: Position) -> (BitBoard, usize) {
    let mut projected = *board;
    projected.stamp(piece, position);
    let full = projected.full_lines();
    projected.clear_lines(full);
    (projected, full.count())
}

/// Whether placing the piece would complete at least one row or column.
#[must_use]
pub fn would_clear_after_placing(board: &BitBoard, piece: PieceId, position: Position) -> bool {
    let mut projected = *board;
    projected.stamp(piece, position);
    !projected.full_lines().is_empty()
}

/// Whether any catalog piece fits somewhere after placing this piece and
/// clearing the resulting full lines.
///
/// The search is exhaustive over every catalog entry and every origin.
#[must_use]
pub fn survives_after_clearing(board: &BitBoard, piece: PieceId, position: Position) -> bool {
    let (projected, _) = project(board, piece, position);
    PieceId::all().any(|candidate| projected.is_placeable(candidate))
}
