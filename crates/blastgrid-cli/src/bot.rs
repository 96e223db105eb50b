//! Built-in players for `auto-play`.
//!
//! A bot picks one hand slot and one origin per turn, then drives the session
//! with the same commands a front-end would send: select the slot, spawn,
//! walk the piece to its origin, finalize.

use anyhow::bail;
use blastgrid_engine::{
    BitBoard, Command, Direction, Event, GameSession, Placement, Position, apply,
    line_clear_score, simulation,
};
use serde::{Deserialize, Serialize};

/// How the bot ranks candidate placements.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Strategy {
    /// Most points, then fewest sealed holes
    #[default]
    Greedy,
    /// First legal placement, slots in order and origins row-major
    First,
}

impl Strategy {
    pub fn evaluator(self) -> &'static dyn PlacementEvaluator {
        match self {
            Strategy::Greedy => &GreedyEvaluator,
            Strategy::First => &FirstFitEvaluator,
        }
    }
}

/// Scores a legal placement; higher is better.
pub trait PlacementEvaluator {
    fn evaluate(&self, board: &BitBoard, placement: Placement) -> i64;
}

#[derive(Debug, Clone, Copy)]
pub struct FirstFitEvaluator;

impl PlacementEvaluator for FirstFitEvaluator {
    fn evaluate(&self, _board: &BitBoard, _placement: Placement) -> i64 {
        0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GreedyEvaluator;

impl PlacementEvaluator for GreedyEvaluator {
    fn evaluate(&self, board: &BitBoard, placement: Placement) -> i64 {
        let (after, lines) = simulation::project(board, placement.piece, placement.position);
        i64::from(line_clear_score(lines)) * 100 - i64::from(sealed_holes(&after)) * 10
    }
}

/// Empty cells whose four neighbours are all occupied or off the board.
fn sealed_holes(board: &BitBoard) -> u32 {
    let occupied = |x: Option<usize>, y: Option<usize>| match (x, y) {
        (Some(x), Some(y)) if x < BitBoard::SIZE && y < BitBoard::SIZE => board.is_occupied(x, y),
        _ => true,
    };
    let mut count = 0;
    for y in 0..BitBoard::SIZE {
        for x in 0..BitBoard::SIZE {
            if board.is_occupied(x, y) {
                continue;
            }
            let sealed = occupied(x.checked_sub(1), Some(y))
                && occupied(Some(x + 1), Some(y))
                && occupied(Some(x), y.checked_sub(1))
                && occupied(Some(x), Some(y + 1));
            if sealed {
                count += 1;
            }
        }
    }
    count
}

/// A chosen move: which slot to play and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub slot: usize,
    pub placement: Placement,
}

impl TurnPlan {
    /// Plays the move through the command surface and returns every event.
    pub fn apply(&self, session: &mut GameSession) -> anyhow::Result<Vec<Event>> {
        let mut events = apply(session, Command::SelectSlot(self.slot));
        let spawned = apply(session, Command::Spawn);
        if spawned.is_empty() {
            bail!("spawn rejected for slot {}", self.slot);
        }
        events.extend(spawned);

        let steps = [
            (Direction::Right, self.placement.position.x()),
            (Direction::Down, self.placement.position.y()),
        ];
        for (direction, count) in steps {
            for _ in 0..count {
                let moved = apply(session, Command::Move(direction));
                if moved.is_empty() {
                    bail!("move {direction:?} rejected for {:?}", self.placement);
                }
                events.extend(moved);
            }
        }

        let finalized = apply(session, Command::Finalize);
        if finalized.is_empty() {
            bail!("finalize rejected for {:?}", self.placement);
        }
        events.extend(finalized);
        Ok(events)
    }
}

/// Picks the best legal placement among the pieces in hand.
///
/// Ties go to the earliest slot and origin. Returns `None` when no piece in
/// hand fits anywhere.
pub fn select_turn(session: &GameSession, evaluator: &dyn PlacementEvaluator) -> Option<TurnPlan> {
    let board = session.board();
    let mut best: Option<(i64, TurnPlan)> = None;
    for (slot, hand_piece) in session.hand().slots().iter().enumerate() {
        let Some(hand_piece) = hand_piece else {
            continue;
        };
        for position in Position::board_origins() {
            if !board.can_place(hand_piece.piece, position) {
                continue;
            }
            let placement = Placement::new(hand_piece.piece, position);
            let score = evaluator.evaluate(board, placement);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, TurnPlan { slot, placement }));
            }
        }
    }
    best.map(|(_, plan)| plan)
}

/// Why a bot game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GameOutcome {
    /// The session declared game over.
    GameOver,
    /// No piece in hand fits, but the session has not declared game over.
    Stalled,
    /// The turn limit was reached.
    TurnLimit,
}

/// Plays until the game ends, stalls or `max_turns` placements were made.
///
/// Returns the outcome and the number of placements made.
pub fn play_game(
    session: &mut GameSession,
    evaluator: &dyn PlacementEvaluator,
    max_turns: usize,
) -> anyhow::Result<(GameOutcome, usize)> {
    for turn in 0..max_turns {
        if session.is_game_over() {
            return Ok((GameOutcome::GameOver, turn));
        }
        let Some(plan) = select_turn(session, evaluator) else {
            tracing::debug!(turn, "no piece in hand fits");
            return Ok((GameOutcome::Stalled, turn));
        };
        let events = plan.apply(session)?;
        for event in &events {
            match event {
                Event::LinesCleared { clear, bonus } => {
                    tracing::trace!(turn, lines = clear.lines(), bonus, "lines cleared");
                }
                Event::GameOver { score } => tracing::debug!(turn, score, "game over"),
                _ => {}
            }
        }
    }
    let outcome = if session.is_game_over() {
        GameOutcome::GameOver
    } else {
        GameOutcome::TurnLimit
    };
    Ok((outcome, max_turns))
}
