use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{
    bit_board::BitBoard,
    piece::{PieceColor, PieceId, Position},
    simulation,
};

use super::hand::{HAND_SIZE, HandPiece};

/// Chance per slot to try a line-breaking rescue piece first.
const RESCUE_PROBABILITY: f64 = 0.08;
const RESCUE_ATTEMPTS: usize = 5;
const WEIGHTED_ATTEMPTS: usize = 100;

/// Seed for deterministic piece generation.
///
/// A 32-bit value consumed once when the generator is created. The same seed
/// replays the same hands for the same sequence of boards.
///
/// Serializes as an 8-character lowercase hex string.
///
/// # Example
///
/// ```
/// use blastgrid_engine::{BitBoard, PieceGenerator, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut generator1 = PieceGenerator::with_seed(seed);
/// let mut generator2 = PieceGenerator::with_seed(seed);
///
/// let board = BitBoard::EMPTY;
/// assert_eq!(generator1.generate_hand(&board), generator2.generate_hand(&board));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed(u32);

impl From<u32> for PieceSeed {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<PieceSeed> for u32 {
    fn from(seed: PieceSeed) -> Self {
        seed.0
    }
}

impl PieceSeed {
    /// Parses an 8-character hex string, as produced by serialization.
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        if hex_str.len() != 8 {
            return Err(format!(
                "invalid hex: expected 8 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u32::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num))
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(8);
        write!(&mut hex_str, "{self}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        PieceSeed(rng.random())
    }
}

/// Produces hands of three distinct pieces.
///
/// # Generation
///
/// Each slot is filled by the first step that succeeds:
///
/// 1. **Rescue**: with an 8% chance, up to 5 uniform draws from
///    [`PieceId::RESCUE`], accepting an unused piece that is placeable and
///    completes a line from some legal origin
/// 2. **Weighted**: up to 100 draws weighted by [`Rarity`](crate::Rarity),
///    accepting an unused placeable piece
/// 3. **Fallback**: the first unused placeable piece in catalog order, then
///    the first unused piece at all
///
/// Colours are drawn uniformly and independently of the piece.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    cumulative_weights: [u32; PieceId::LEN],
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    ///
    /// For deterministic generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let rng = Pcg32::seed_from_u64(u64::from(seed.0));
        let mut cumulative_weights = [0; PieceId::LEN];
        let mut total = 0;
        for (piece, cumulative) in PieceId::all().zip(&mut cumulative_weights) {
            total += piece.rarity().weight();
            *cumulative = total;
        }
        Self {
            rng,
            cumulative_weights,
        }
    }

    /// Sum of all catalog weights.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.cumulative_weights[PieceId::LEN - 1]
    }

    /// Maps a draw in `0..total_weight()` to the first piece whose cumulative
    /// weight exceeds it.
    #[must_use]
    pub fn piece_for_draw(&self, draw: u32) -> PieceId {
        let index = self
            .cumulative_weights
            .partition_point(|&cumulative| cumulative <= draw)
            .min(PieceId::LEN - 1);
        PieceId::new(index).unwrap_or(PieceId::MONO)
    }

    /// Generates three distinct pieces for the given board.
    pub fn generate_hand(&mut self, board: &BitBoard) -> [HandPiece; HAND_SIZE] {
        let mut used = [false; PieceId::LEN];
        let mut hand = [HandPiece::new(PieceId::MONO, PieceColor::Red); HAND_SIZE];
        for slot in &mut hand {
            let piece = self.generate_piece(board, &used);
            used[piece.index()] = true;
            *slot = HandPiece::new(piece, self.rng.random());
        }
        hand
    }

    fn generate_piece(&mut self, board: &BitBoard, used: &[bool; PieceId::LEN]) -> PieceId {
        let is_unused = |piece: PieceId| !used[piece.index()];

        if self.rng.random_bool(RESCUE_PROBABILITY) {
            for _ in 0..RESCUE_ATTEMPTS {
                let candidate =
                    PieceId::RESCUE[self.rng.random_range(0..PieceId::RESCUE.len())];
                if is_unused(candidate) && can_break_line(board, candidate) {
                    return candidate;
                }
            }
        }

        for _ in 0..WEIGHTED_ATTEMPTS {
            let draw = self.rng.random_range(0..self.total_weight());
            let candidate = self.piece_for_draw(draw);
            if is_unused(candidate) && board.is_placeable(candidate) {
                return candidate;
            }
        }

        if let Some(piece) = PieceId::all().find(|&p| is_unused(p) && board.is_placeable(p)) {
            tracing::debug!(%piece, "weighted draws exhausted, using first placeable piece");
            return piece;
        }

        let piece = PieceId::all().find(|&p| is_unused(p));
        debug_assert!(piece.is_some(), "catalog has fewer pieces than a hand");
        let piece = piece.unwrap_or(PieceId::MONO);
        tracing::debug!(%piece, "no unused piece is placeable");
        piece
    }
}

/// Whether the piece fits somewhere and completes a line from some legal origin.
fn can_break_line(board: &BitBoard, piece: PieceId) -> bool {
    Position::board_origins().any(|position| {
        board.can_place(piece, position)
            && simulation::would_clear_after_placing(board, piece, position)
    })
}
