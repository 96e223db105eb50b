use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::bit_board::BitBoard;

/// Bitmask representation of a piece within its 4×4 bounding box.
///
/// Element `y` holds row `y`; bit `x` of a row is set when the footprint
/// occupies column `x`.
pub(crate) type PieceMask = [u8; 4];

/// Side length of the footprint bounding box.
pub const SHAPE_SIZE: usize = 4;

/// Difficulty class of a piece, used only to weight generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Rarity {
    /// Straights and small blocks.
    Easy,
    /// Corners and L/J shapes.
    Medium,
    /// Zigzags and T shapes.
    Hard,
    /// Large or unusual pieces.
    Rare,
}

impl Rarity {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Rare];

    /// Relative spawn weight (higher is more likely).
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Rarity::Easy => 10,
            Rarity::Medium => 5,
            Rarity::Hard => 3,
            Rarity::Rare => 1,
        }
    }
}

/// Cosmetic colour assigned to a generated piece.
///
/// Colour never influences placement or scoring; it only travels with the
/// piece so front-ends can draw it consistently, including after a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PieceColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
}

impl PieceColor {
    pub const LEN: usize = 7;
    pub const ALL: [Self; Self::LEN] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
    ];
}

impl Distribution<PieceColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceColor {
        PieceColor::ALL[rng.random_range(0..PieceColor::LEN)]
    }
}

/// Identifier of a catalog piece.
///
/// Every orientation is its own entry; pieces are never rotated at runtime.
///
/// # Example
///
/// ```
/// use blastgrid_engine::{PieceId, Rarity};
///
/// let piece = PieceId::MONO;
/// assert_eq!(piece.rarity(), Rarity::Easy);
/// assert_eq!(piece.cell_count(), 1);
/// assert_eq!(PieceId::all().count(), PieceId::LEN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PieceId(u8);

impl PieceId {
    /// Number of catalog entries.
    pub const LEN: usize = CATALOG.len();

    pub const MONO: Self = Self(0);
    pub const DOMINO_H: Self = Self(1);
    pub const DOMINO_V: Self = Self(2);
    pub const TROMINO_I_H: Self = Self(3);
    pub const TROMINO_I_V: Self = Self(4);
    pub const TETROMINO_I_H: Self = Self(5);
    pub const TETROMINO_I_V: Self = Self(6);
    pub const SQUARE_2: Self = Self(7);
    pub const TETROMINO_T: Self = Self(20);
    pub const SQUARE_3: Self = Self(28);
    pub const DIAGONAL_DOWN: Self = Self(40);
    pub const DIAGONAL_UP: Self = Self(41);

    /// Small pieces the generator may offer to break a line on a tight board.
    pub const RESCUE: [Self; 7] = [
        Self::MONO,
        Self::DOMINO_H,
        Self::DOMINO_V,
        Self::TROMINO_I_H,
        Self::TROMINO_I_V,
        Self::DIAGONAL_DOWN,
        Self::DIAGONAL_UP,
    ];

    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < Self::LEN)
            .map(Self)
    }

    /// Iterates over the whole catalog in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::LEN).filter_map(Self::new)
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        CATALOG[self.index()].name
    }

    #[must_use]
    pub fn rarity(self) -> Rarity {
        CATALOG[self.index()].rarity
    }

    #[must_use]
    pub fn is_rescue(self) -> bool {
        Self::RESCUE.contains(&self)
    }

    pub(crate) fn mask(self) -> PieceMask {
        CATALOG[self.index()].mask
    }

    /// Returns whether the footprint covers `(dx, dy)` of its bounding box.
    #[must_use]
    pub fn cell(self, dx: usize, dy: usize) -> bool {
        dx < SHAPE_SIZE && dy < SHAPE_SIZE && self.mask()[dy] & (1 << dx) != 0
    }

    /// Returns an iterator of footprint cells relative to the piece origin.
    pub fn occupied_positions(self) -> impl Iterator<Item = (usize, usize)> {
        let mask = self.mask();
        (0..SHAPE_SIZE).flat_map(move |dy| {
            (0..SHAPE_SIZE).filter_map(move |dx| (mask[dy] & (1 << dx) != 0).then_some((dx, dy)))
        })
    }

    #[must_use]
    pub fn cell_count(self) -> u32 {
        self.mask().iter().map(|row| row.count_ones()).sum()
    }

    /// Width of the footprint's occupied columns.
    #[must_use]
    pub fn width(self) -> usize {
        let columns = self.mask().iter().fold(0, |acc, row| acc | row);
        (u8::BITS - columns.leading_zeros()) as usize
    }

    /// Height of the footprint's occupied rows.
    #[must_use]
    pub fn height(self) -> usize {
        self.mask()
            .iter()
            .rposition(|&row| row != 0)
            .map_or(0, |y| y + 1)
    }
}

impl From<PieceId> for u8 {
    fn from(id: PieceId) -> Self {
        id.0
    }
}

impl TryFrom<u8> for PieceId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PieceId::new(usize::from(value))
            .ok_or_else(|| format!("piece id must be below {}, got {value}", PieceId::LEN))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Origin of a piece footprint on the board.
///
/// Coordinates are signed: a footprint may be probed anywhere and bounds are
/// checked per occupied cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    x: i8,
    y: i8,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn x(self) -> i32 {
        i32::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> i32 {
        i32::from(self.y)
    }

    /// Translates by `(dx, dy)`, or `None` on coordinate overflow.
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    #[must_use]
    pub fn moved(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Iterates over every origin that keeps the box's corner on the board,
    /// row-major (y outer, x inner).
    pub fn board_origins() -> impl Iterator<Item = Self> {
        (0..BitBoard::SIZE_I8).flat_map(|y| (0..BitBoard::SIZE_I8).map(move |x| Self::new(x, y)))
    }
}

/// A cardinal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A piece at an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Placement {
    pub piece: PieceId,
    pub position: Position,
}

impl Placement {
    #[must_use]
    pub const fn new(piece: PieceId, position: Position) -> Self {
        Self { piece, position }
    }

    /// Absolute board coordinates of the footprint, including off-board ones.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, y0) = (self.position.x(), self.position.y());
        self.piece.occupied_positions().map(move |(dx, dy)| {
            #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let (dx, dy) = (dx as i32, dy as i32);
            (x0 + dx, y0 + dy)
        })
    }
}

struct PieceDef {
    name: &'static str,
    rarity: Rarity,
    mask: PieceMask,
}

/// Builds a footprint from ASCII rows where `#` marks an occupied cell.
const fn shape(rows: &[&str]) -> PieceMask {
    assert!(rows.len() <= SHAPE_SIZE);
    let mut mask = [0; SHAPE_SIZE];
    let mut y = 0;
    while y < rows.len() {
        let bytes = rows[y].as_bytes();
        assert!(bytes.len() <= SHAPE_SIZE);
        let mut x = 0;
        while x < bytes.len() {
            if bytes[x] == b'#' {
                mask[y] |= 1 << x;
            }
            x += 1;
        }
        y += 1;
    }
    mask
}

const fn def(name: &'static str, rarity: Rarity, rows: &[&str]) -> PieceDef {
    PieceDef {
        name,
        rarity,
        mask: shape(rows),
    }
}

const CATALOG: [PieceDef; 44] = {
    use Rarity::{Easy, Hard, Medium, Rare};
    [
        def("mono", Easy, &["#"]),
        def("domino-h", Easy, &["##"]),
        def("domino-v", Easy, &["#", "#"]),
        def("tromino-i-h", Easy, &["###"]),
        def("tromino-i-v", Easy, &["#", "#", "#"]),
        def("tetromino-i-h", Easy, &["####"]),
        def("tetromino-i-v", Easy, &["#", "#", "#", "#"]),
        def("square-2", Easy, &["##", "##"]),
        def("corner-3-a", Medium, &["##", "#."]),
        def("corner-3-b", Medium, &["##", ".#"]),
        def("corner-3-c", Medium, &["#.", "##"]),
        def("corner-3-d", Medium, &[".#", "##"]),
        def("tetromino-l-0", Medium, &["#.", "#.", "##"]),
        def("tetromino-l-90", Medium, &["###", "#.."]),
        def("tetromino-l-180", Medium, &["##", ".#", ".#"]),
        def("tetromino-l-270", Medium, &["..#", "###"]),
        def("tetromino-j-0", Medium, &[".#", ".#", "##"]),
        def("tetromino-j-90", Medium, &["#..", "###"]),
        def("tetromino-j-180", Medium, &["##", "#.", "#."]),
        def("tetromino-j-270", Medium, &["###", "..#"]),
        def("tetromino-t-0", Hard, &["###", ".#."]),
        def("tetromino-t-90", Hard, &[".#", "##", ".#"]),
        def("tetromino-t-180", Hard, &[".#.", "###"]),
        def("tetromino-t-270", Hard, &["#.", "##", "#."]),
        def("tetromino-s-h", Hard, &[".##", "##."]),
        def("tetromino-s-v", Hard, &["#.", "##", ".#"]),
        def("tetromino-z-h", Hard, &["##.", ".##"]),
        def("tetromino-z-v", Hard, &[".#", "##", "#."]),
        def("square-3", Rare, &["###", "###", "###"]),
        def("rect-3x2", Rare, &["###", "###"]),
        def("rect-2x3", Rare, &["##", "##", "##"]),
        def("corner-5-a", Rare, &["###", "#..", "#.."]),
        def("corner-5-b", Rare, &["###", "..#", "..#"]),
        def("corner-5-c", Rare, &["#..", "#..", "###"]),
        def("corner-5-d", Rare, &["..#", "..#", "###"]),
        def("plus", Rare, &[".#.", "###", ".#."]),
        def("pentomino-u-0", Rare, &["#.#", "###"]),
        def("pentomino-u-90", Rare, &["##", "#.", "##"]),
        def("pentomino-u-180", Rare, &["###", "#.#"]),
        def("pentomino-u-270", Rare, &["##", ".#", "##"]),
        def("diagonal-down", Rare, &["#.", ".#"]),
        def("diagonal-up", Rare, &[".#", "#."]),
        def("rect-4x2", Rare, &["####", "####"]),
        def("rect-2x4", Rare, &["##", "##", "##", "##"]),
    ]
};
