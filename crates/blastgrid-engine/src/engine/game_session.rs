use serde::{Deserialize, Serialize};

use crate::{
    ActionError,
    core::{
        bit_board::BitBoard,
        line_clear::LineClear,
        piece::{Direction, Placement, Position},
    },
};

use super::{
    game_stats::GameStats,
    hand::{HAND_SIZE, Hand, HandPiece},
    piece_generator::{PieceGenerator, PieceSeed},
    reachability::{Reachability, ReachabilityRule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// The piece being positioned, not yet part of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivePlacement {
    pub piece: HandPiece,
    pub position: Position,
    /// Hand slot the piece was taken from.
    pub slot: usize,
}

impl ActivePlacement {
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement::new(self.piece.piece, self.position)
    }
}

/// Result of a successful spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOutcome {
    pub active: ActivePlacement,
    /// Whether the hand had to be refilled before spawning.
    pub refilled: bool,
}

/// Result of a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub placed: ActivePlacement,
    pub line_clear: LineClear,
    pub line_bonus: u32,
    pub refilled: bool,
    /// New best score, when this placement raised it.
    pub best_score: Option<u32>,
    pub game_over: bool,
}

/// A single game: board, hand, piece generator, active piece and score.
///
/// Illegal actions are rejected by the `try_*` methods without changing any
/// state.
///
/// # Example
///
/// ```
/// use blastgrid_engine::{Direction, GameSession, PieceSeed};
///
/// let mut session = GameSession::with_seed(PieceSeed::from(1));
///
/// session.try_spawn().unwrap();
/// session.try_move(Direction::Right).unwrap();
/// let result = session.try_finalize().unwrap();
///
/// assert_eq!(session.stats().score(), 5 + result.line_bonus);
/// assert!(session.active().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: BitBoard,
    hand: Hand,
    generator: PieceGenerator,
    active: Option<ActivePlacement>,
    stats: GameStats,
    session_state: SessionState,
    rule: ReachabilityRule,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    fn with_generator(mut generator: PieceGenerator) -> Self {
        let board = BitBoard::EMPTY;
        let mut hand = Hand::new();
        hand.refill_if_empty(&mut generator, &board);
        Self {
            board,
            hand,
            generator,
            active: None,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            rule: ReachabilityRule::default(),
        }
    }

    /// Sets how game-over is decided.
    #[must_use]
    pub fn with_reachability_rule(mut self, rule: ReachabilityRule) -> Self {
        self.rule = rule;
        self
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActivePlacement> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn reachability_rule(&self) -> ReachabilityRule {
        self.rule
    }

    /// Searches for a move with the pieces currently in hand.
    #[must_use]
    pub fn reachability(&self) -> Reachability {
        let pieces: Vec<_> = self.hand.available_pieces().collect();
        self.rule.check(&self.board, &pieces)
    }

    /// Starts a new game with the same generator stream.
    ///
    /// The loaded best score survives.
    pub fn reset(&mut self) {
        self.board = BitBoard::EMPTY;
        self.hand = Hand::new();
        self.hand.refill_if_empty(&mut self.generator, &self.board);
        self.active = None;
        self.stats.reset();
        self.session_state = SessionState::Playing;
    }

    /// Seeds the advisory best score from persisted storage.
    ///
    /// Returns the resulting best score, which is at least the current score.
    pub fn set_loaded_score(&mut self, score: u32) -> u32 {
        self.stats.set_loaded_score(score)
    }

    /// Moves the hand cursor, see [`Hand::select`].
    pub fn try_select_slot(&mut self, index: usize) -> Result<usize, ActionError> {
        if index >= HAND_SIZE {
            return Err(ActionError::InvalidSlot);
        }
        if self.active.is_some() {
            return Err(ActionError::PieceAlreadyActive);
        }
        self.hand.select(index);
        Ok(self.hand.selection())
    }

    /// Steps the hand cursor up or down by one slot.
    pub fn try_step_selection(&mut self, direction: Direction) -> Result<usize, ActionError> {
        if self.active.is_some() {
            return Err(ActionError::PieceAlreadyActive);
        }
        match direction {
            Direction::Up => self.hand.select_previous(),
            Direction::Down => self.hand.select_next(),
            Direction::Left | Direction::Right => return Err(ActionError::NoActivePiece),
        }
        Ok(self.hand.selection())
    }

    /// Takes the selected piece from the hand and puts it at the top-left
    /// corner of the board.
    ///
    /// The piece may overlap occupied cells until it is finalized.
    pub fn try_spawn(&mut self) -> Result<SpawnOutcome, ActionError> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        if self.active.is_some() {
            return Err(ActionError::PieceAlreadyActive);
        }

        let mut refilled = false;
        let piece = match self.hand.selected() {
            Some(piece) => piece,
            None => {
                refilled = self.hand.refill_if_empty(&mut self.generator, &self.board);
                self.hand.selected().ok_or(ActionError::EmptySlot)?
            }
        };
        if !self.board.is_within_bounds(piece.piece, Position::ORIGIN) {
            return Err(ActionError::OutOfBounds);
        }

        let slot = self.hand.selection();
        self.hand.take_selected();
        let active = ActivePlacement {
            piece,
            position: Position::ORIGIN,
            slot,
        };
        self.active = Some(active);
        Ok(SpawnOutcome { active, refilled })
    }

    /// Moves the active piece one cell, as long as it stays on the board.
    pub fn try_move(&mut self, direction: Direction) -> Result<Position, ActionError> {
        let active = self.active.as_mut().ok_or(ActionError::NoActivePiece)?;
        let position = active
            .position
            .moved(direction)
            .filter(|&position| self.board.is_within_bounds(active.piece.piece, position))
            .ok_or(ActionError::OutOfBounds)?;
        active.position = position;
        Ok(position)
    }

    /// Commits the active piece to the board.
    ///
    /// Awards the placement score, clears full lines, refills an empty hand
    /// and then decides whether the game is over.
    pub fn try_finalize(&mut self) -> Result<FinalizeOutcome, ActionError> {
        let placed = self.active.ok_or(ActionError::NoActivePiece)?;
        let placement = placed.placement();
        if self.board.overlaps(placement.piece, placement.position) {
            return Err(ActionError::Overlapping);
        }

        self.active = None;
        self.board.stamp(placement.piece, placement.position);
        let line_clear = self.board.clear_full_lines();
        let line_bonus = self.stats.complete_placement(line_clear.lines());

        let best_score = (self.stats.score() > self.stats.best_score())
            .then(|| self.stats.update_best_score());

        let refilled = self.hand.refill_if_empty(&mut self.generator, &self.board);

        let game_over = !self.hand.is_empty() && self.reachability().is_blocked();
        if game_over {
            tracing::debug!(
                score = self.stats.score(),
                placed_pieces = self.stats.placed_pieces(),
                "no piece in hand can be placed"
            );
            self.session_state = SessionState::GameOver;
        }

        Ok(FinalizeOutcome {
            placed,
            line_clear,
            line_bonus,
            refilled,
            best_score,
            game_over,
        })
    }

    /// Drops the active piece and puts it back into the hand.
    pub fn try_cancel(&mut self) -> Result<ActivePlacement, ActionError> {
        let active = self.active.take().ok_or(ActionError::NoActivePiece)?;
        self.hand.restore(active.piece);
        Ok(active)
    }
}

#[cfg(test)]
impl GameSession {
    pub(crate) fn set_board(&mut self, board: BitBoard) {
        self.board = board;
    }

    pub(crate) fn set_hand(&mut self, pieces: [HandPiece; HAND_SIZE]) {
        self.hand.fill(pieces);
    }
}

#[cfg(test)]
mod tests {
    use crate::{PieceColor, PieceId};

    use super::*;

    fn session_with(board: BitBoard, pieces: [PieceId; HAND_SIZE]) -> GameSession {
        let mut session = GameSession::with_seed(PieceSeed::from(0));
        session.set_board(board);
        session.set_hand(pieces.map(|piece| HandPiece::new(piece, PieceColor::Blue)));
        session
    }

    #[test]
    fn test_new_session_has_full_hand() {
        let session = GameSession::with_seed(PieceSeed::from(3));
        assert_eq!(session.hand().available().count(), HAND_SIZE);
        assert!(session.board().is_empty());
        assert!(session.active().is_none());
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_place_i4_on_empty_board() {
        let mut session = session_with(
            BitBoard::EMPTY,
            [PieceId::TETROMINO_I_H, PieceId::MONO, PieceId::DOMINO_H],
        );
        let spawn = session.try_spawn().unwrap();
        assert_eq!(spawn.active.position, Position::ORIGIN);
        assert_eq!(spawn.active.slot, 0);
        assert_eq!(session.hand().slot(0), None);
        assert_eq!(session.hand().selection(), 1);

        let result = session.try_finalize().unwrap();
        assert_eq!(result.line_bonus, 0);
        assert!(result.line_clear.is_empty());
        assert_eq!(session.board().occupied_count(), 4);
        assert_eq!(session.stats().score(), 5);
        assert!(!result.game_over);
    }

    #[test]
    fn test_completing_row_zero_scores_25() {
        let board = BitBoard::from_ascii(
            r"
            #######.
            ",
        );
        let mut session = session_with(
            board,
            [PieceId::TETROMINO_I_V, PieceId::MONO, PieceId::DOMINO_H],
        );
        session.try_spawn().unwrap();
        for _ in 0..7 {
            session.try_move(Direction::Right).unwrap();
        }
        assert_eq!(
            session.try_move(Direction::Right),
            Err(ActionError::OutOfBounds)
        );

        let result = session.try_finalize().unwrap();
        assert_eq!(result.line_clear.lines(), 1);
        assert_eq!(result.line_bonus, 20);
        assert_eq!(session.stats().score(), 25);
        assert_eq!(session.board().row(0), 0);
        assert_eq!(session.board().occupied_count(), 3);
    }

    #[test]
    fn test_row_and_column_at_once() {
        let board = BitBoard::from_ascii(
            r"
            .#######
            #.......
            #.......
            #.......
            #.......
            #.......
            #.......
            #.......
            ",
        );
        let mut session = session_with(board, [PieceId::MONO, PieceId::DOMINO_H, PieceId::DOMINO_V]);
        session.try_spawn().unwrap();
        let result = session.try_finalize().unwrap();
        assert_eq!(result.line_clear.lines(), 2);
        assert_eq!(result.line_clear.cleared_count(), 15);
        assert_eq!(session.stats().score(), 45);
        assert!(session.board().is_empty());
    }

    #[test]
    fn test_finalize_rejects_overlap() {
        let board = BitBoard::from_ascii(
            r"
            #.......
            ",
        );
        let mut session = session_with(board, [PieceId::SQUARE_2, PieceId::MONO, PieceId::DOMINO_H]);
        session.try_spawn().unwrap();
        assert_eq!(session.try_finalize(), Err(ActionError::Overlapping));
        assert!(session.active().is_some());
        assert_eq!(session.stats().score(), 0);

        session.try_move(Direction::Right).unwrap();
        assert!(session.try_finalize().is_ok());
    }

    #[test]
    fn test_moving_over_occupied_cells_is_allowed() {
        let board = BitBoard::from_ascii(
            r"
            .#......
            ",
        );
        let mut session = session_with(board, [PieceId::MONO, PieceId::DOMINO_H, PieceId::DOMINO_V]);
        session.try_spawn().unwrap();
        assert_eq!(
            session.try_move(Direction::Right),
            Ok(Position::new(1, 0))
        );
        assert_eq!(session.try_move(Direction::Up), Err(ActionError::OutOfBounds));
        assert_eq!(session.try_move(Direction::Left), Ok(Position::ORIGIN));
    }

    #[test]
    fn test_spawn_twice_is_rejected() {
        let mut session = GameSession::with_seed(PieceSeed::from(5));
        session.try_spawn().unwrap();
        assert_eq!(
            session.try_spawn().unwrap_err(),
            ActionError::PieceAlreadyActive
        );
        assert_eq!(session.try_select_slot(0), Err(ActionError::PieceAlreadyActive));
    }

    #[test]
    fn test_cancel_restores_piece_and_color() {
        let mut session = session_with(
            BitBoard::EMPTY,
            [PieceId::MONO, PieceId::DOMINO_H, PieceId::DOMINO_V],
        );
        session.try_select_slot(1).unwrap();
        let spawn = session.try_spawn().unwrap();
        session.try_move(Direction::Down).unwrap();

        let cancelled = session.try_cancel().unwrap();
        assert_eq!(cancelled.piece, spawn.active.piece);
        assert_eq!(session.hand().slot(1), Some(spawn.active.piece));
        assert_eq!(session.hand().selection(), 1);
        assert!(session.board().is_empty());
        assert_eq!(session.try_cancel(), Err(ActionError::NoActivePiece));
    }

    #[test]
    fn test_hand_refills_after_last_piece() {
        let mut session = session_with(
            BitBoard::EMPTY,
            [PieceId::MONO, PieceId::DOMINO_H, PieceId::DOMINO_V],
        );
        for index in 0..HAND_SIZE {
            session.try_spawn().unwrap();
            for _ in 0..index * 2 {
                session.try_move(Direction::Down).unwrap();
            }
            let result = session.try_finalize().unwrap();
            assert_eq!(result.refilled, index == HAND_SIZE - 1);
        }
        assert_eq!(session.hand().available().count(), HAND_SIZE);
        assert_eq!(session.hand().selection(), 0);
    }

    #[test]
    fn test_select_slot_validation() {
        let mut session = GameSession::with_seed(PieceSeed::from(9));
        assert_eq!(session.try_select_slot(2), Ok(2));
        assert_eq!(session.try_select_slot(3), Err(ActionError::InvalidSlot));
        assert_eq!(session.hand().selection(), 2);
        assert_eq!(session.try_step_selection(Direction::Up), Ok(1));
        assert_eq!(
            session.try_step_selection(Direction::Left),
            Err(ActionError::NoActivePiece)
        );
    }

    fn striped_board() -> BitBoard {
        // No 3×3 area is free and the top row stays short of full.
        BitBoard::from_ascii(
            r"
            ........
            .#.#.#.#
            #.#.#.#.
            .#.#.#.#
            #.#.#.#.
            .#.#.#.#
            #.#.#.#.
            .#.#.#.#
            ",
        )
    }

    #[test]
    fn test_hand_only_rule_ends_game() {
        let mut session = session_with(
            striped_board(),
            [PieceId::MONO, PieceId::SQUARE_3, PieceId::SQUARE_3],
        )
        .with_reachability_rule(ReachabilityRule::HandOnly);
        session.try_spawn().unwrap();
        let result = session.try_finalize().unwrap();
        assert!(result.line_clear.is_empty());
        assert!(!result.refilled);
        assert!(result.game_over);
        assert!(session.is_game_over());
        assert!(session.reachability().is_blocked());
        assert_eq!(session.try_spawn().unwrap_err(), ActionError::GameOver);

        session.reset();
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_legacy_rule_counts_fits_after_clear() {
        let mut session = session_with(
            striped_board(),
            [PieceId::MONO, PieceId::SQUARE_3, PieceId::SQUARE_3],
        );
        session.try_spawn().unwrap();
        let result = session.try_finalize().unwrap();
        assert!(!result.game_over);
        assert!(session.reachability().is_fits_after_clear());
        assert!(session.try_spawn().is_ok());
    }

    #[test]
    fn test_reset_keeps_loaded_best() {
        let mut session = GameSession::with_seed(PieceSeed::from(11));
        session.set_loaded_score(300);
        session.try_spawn().unwrap();
        session.try_finalize().unwrap();
        session.reset();
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().best_score(), 300);
        assert!(session.board().is_empty());
        assert_eq!(session.hand().available().count(), HAND_SIZE);
        assert!(session.active().is_none());
    }
}
