use serde::{Deserialize, Serialize};

use crate::core::{
    bit_board::BitBoard,
    piece::{PieceId, Placement, Position},
    simulation,
};

/// Result of searching for a move with the pieces in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum Reachability {
    /// A piece can legally be placed right now.
    FitsNow(Placement),
    /// No piece fits now, but putting this piece in bounds and clearing the
    /// completed lines would leave room for some catalog piece.
    FitsAfterClear(Placement),
    /// Nothing fits, even after a hypothetical clear.
    Blocked,
}

/// How game-over is decided.
///
/// Parses case-insensitively from the variant name (`legacy`, `handonly`).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
pub enum ReachabilityRule {
    /// Direct fit first, then the exhaustive after-clear probe over the whole
    /// catalog. Never reports a false game over.
    #[default]
    Legacy,
    /// Only direct fits of the pieces in hand count.
    HandOnly,
}

impl ReachabilityRule {
    /// Searches for a move with `pieces` on `board`.
    ///
    /// Both phases scan pieces in the given order and origins row-major, and
    /// stop at the first success.
    #[must_use]
    pub fn check(self, board: &BitBoard, pieces: &[PieceId]) -> Reachability {
        if let Some(placement) = find_direct_fit(board, pieces) {
            return Reachability::FitsNow(placement);
        }
        if self.is_legacy()
            && let Some(placement) = find_fit_after_clear(board, pieces)
        {
            return Reachability::FitsAfterClear(placement);
        }
        Reachability::Blocked
    }
}

/// Searches with [`ReachabilityRule::Legacy`].
#[must_use]
pub fn check_reachability(board: &BitBoard, pieces: &[PieceId]) -> Reachability {
    ReachabilityRule::Legacy.check(board, pieces)
}

/// Whether any of `pieces` can be placed now or after a resulting clear.
#[must_use]
pub fn can_any_piece_fit(board: &BitBoard, pieces: &[PieceId]) -> bool {
    !check_reachability(board, pieces).is_blocked()
}

fn find_direct_fit(board: &BitBoard, pieces: &[PieceId]) -> Option<Placement> {
    pieces.iter().find_map(|&piece| {
        board
            .find_first_fit(piece)
            .map(|position| Placement::new(piece, position))
    })
}

fn find_fit_after_clear(board: &BitBoard, pieces: &[PieceId]) -> Option<Placement> {
    pieces.iter().find_map(|&piece| {
        Position::board_origins()
            .filter(|&position| board.is_within_bounds(piece, position))
            .find(|&position| simulation::survives_after_clearing(board, piece, position))
            .map(|position| Placement::new(piece, position))
    })
}
