use blastgrid_engine::{
    ActivePlacement, BitBoard, Event, GameSession, GameStats, HAND_SIZE, HandPiece, PieceSeed,
    ReachabilityRule, SessionState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bot::{GameOutcome, Strategy};

/// Results of an `auto-play` run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPlayReport {
    /// Timestamp when the run started (ISO 8601 format)
    pub played_at: DateTime<Utc>,
    /// Seed of the piece generator shared by all games
    pub seed: PieceSeed,
    pub strategy: Strategy,
    pub rule: ReachabilityRule,
    /// Best score after the run, including the persisted one
    pub best_score: u32,
    pub games: Vec<GameReport>,
}

/// Summary of one bot game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    /// Game number (0-indexed)
    pub game: usize,
    pub outcome: GameOutcome,
    pub turns: usize,
    pub final_stats: GameStats,
    pub final_board: BitBoard,
}

/// Observable state of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Board rows from top to bottom, `#` for occupied cells
    pub board: Vec<String>,
    pub hand: [Option<HandPiece>; HAND_SIZE],
    pub selection: usize,
    pub active: Option<ActivePlacement>,
    pub score: u32,
    pub best_score: u32,
    pub state: SessionState,
}

impl SessionSnapshot {
    pub fn new(session: &GameSession) -> Self {
        Self {
            board: session.board().to_string().lines().map(str::to_owned).collect(),
            hand: *session.hand().slots(),
            selection: session.hand().selection(),
            active: session.active().copied(),
            score: session.stats().score(),
            best_score: session.stats().best_score(),
            state: session.session_state(),
        }
    }
}

/// Output of `run-script`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub seed: PieceSeed,
    /// Number of commands the session rejected
    pub rejected: usize,
    pub events: Vec<Event>,
    pub snapshot: SessionSnapshot,
}
