pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why a session rejected an action.
///
/// At the [`apply`] surface a rejected command is a silent no-op; the error
/// only tells callers of the `try_*` methods what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum ActionError {
    #[display("no piece is being placed")]
    NoActivePiece,
    #[display("a piece is already being placed")]
    PieceAlreadyActive,
    #[display("no piece in the selected slot")]
    EmptySlot,
    #[display("piece would leave the board")]
    OutOfBounds,
    #[display("piece overlaps occupied cells")]
    Overlapping,
    #[display("game is over")]
    GameOver,
    #[display("hand slot index out of range")]
    InvalidSlot,
}
