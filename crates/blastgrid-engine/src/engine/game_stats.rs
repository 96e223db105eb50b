use serde::{Deserialize, Serialize};

/// Points awarded for every finalized piece.
pub const PLACEMENT_SCORE: u32 = 5;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared by one placement, capped at 4:
/// - 0 lines: 0 points
/// - 1 line: 20 points
/// - 2 lines: 40 points
/// - 3 lines: 80 points
/// - 4 or more lines: 140 points
const SCORE_TABLE: [u32; 5] = [0, 20, 40, 80, 140];

/// Returns the bonus for clearing `lines` rows and columns in one placement.
///
/// Tiers are flat per clear event, not accumulated per line.
#[must_use]
pub fn line_clear_score(lines: usize) -> u32 {
    SCORE_TABLE[lines.min(SCORE_TABLE.len() - 1)]
}

/// Game statistics tracking score, best score, and clear counts.
///
/// - **Score**: placement bonuses plus line-clear tiers; never decreases
///   within a session
/// - **Best score**: advisory value seeded from storage, raised to the current
///   score on demand
/// - **Line clear distribution**: count of placements by lines cleared
///   (0, 1, 2, 3, 4+)
///
/// # Example
///
/// ```
/// use blastgrid_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_placement(2); // row + column
///
/// assert_eq!(stats.score(), 5 + 40);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u32,
    best_score: u32,
    placed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            best_score: 0,
            placed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Returns the best score as last loaded or updated.
    ///
    /// This may lag behind [`Self::score`] until [`Self::update_best_score`]
    /// is called.
    #[must_use]
    pub const fn best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    pub const fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of placements by lines cleared.
    ///
    /// Index 4 counts every placement that cleared 4 or more lines.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Seeds the best score from persisted storage and returns the new best.
    ///
    /// The best score never drops below the current score.
    pub fn set_loaded_score(&mut self, score: u32) -> u32 {
        self.best_score = score.max(self.score);
        self.best_score
    }

    /// Raises the best score to the current score and returns it.
    pub fn update_best_score(&mut self) -> u32 {
        self.best_score = self.best_score.max(self.score);
        self.best_score
    }

    /// Records a finalized placement and returns the line-clear bonus.
    pub fn complete_placement(&mut self, cleared_lines: usize) -> u32 {
        let bonus = line_clear_score(cleared_lines);
        self.placed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines.min(4)] += 1;
        self.score = self.score.saturating_add(PLACEMENT_SCORE + bonus);
        bonus
    }

    /// Starts a new game, keeping the best score.
    pub fn reset(&mut self) {
        *self = Self {
            best_score: self.best_score,
            ..Self::new()
        };
    }
}
