use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::{
    line_clear::{Cell, ClearFrame, FullLines, LineClear},
    piece::{PieceId, Position},
};

/// Side length of the square board.
pub const BOARD_SIZE: usize = 8;

const FULL_ROW: u8 = u8::MAX;

/// Occupancy of the 8×8 board.
///
/// Each row is a `u8` where bit `x` is set when column `x` is occupied.
/// Only occupancy is stored; which piece filled a cell is forgotten as soon as
/// the piece is stamped.
///
/// The board is `Copy`, so simulations project onto a copy and never touch
/// the live board.
///
/// # Example
///
/// ```
/// use blastgrid_engine::{BitBoard, PieceId, Position};
///
/// let mut board = BitBoard::EMPTY;
/// let origin = Position::new(0, 0);
/// assert!(board.can_place(PieceId::TETROMINO_I_H, origin));
///
/// board.stamp(PieceId::TETROMINO_I_H, origin);
/// assert_eq!(board.occupied_count(), 4);
/// assert!(!board.can_place(PieceId::MONO, origin));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard {
    rows: [u8; BOARD_SIZE],
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "ff,00,81,..." (comma-separated hex rows, top to bottom)
        let mut hex_string = String::with_capacity(BOARD_SIZE * 3);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{row:02x}").unwrap();
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for BitBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                BOARD_SIZE,
                parts.len()
            )));
        }

        let mut rows = [0; BOARD_SIZE];
        for (i, hex_str) in parts.iter().enumerate() {
            rows[i] = u8::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
        }

        Ok(BitBoard { rows })
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows {
            for x in 0..BOARD_SIZE {
                f.write_char(if row & (1 << x) != 0 { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Splits a footprint row shifted right by `x` into its on-board bits, and
/// reports whether any occupied cell fell off the board.
#[expect(clippy::cast_possible_truncation)]
fn translate_row(row: u8, x: i32) -> (u8, bool) {
    let wide = u32::from(row);
    let on_board = if x <= -BitBoard::SIZE_I32 || x >= BitBoard::SIZE_I32 {
        0
    } else if x >= 0 {
        ((wide << x) & u32::from(FULL_ROW)) as u8
    } else {
        (wide >> -x) as u8
    };
    (on_board, on_board.count_ones() != row.count_ones())
}

impl BitBoard {
    pub const SIZE: usize = BOARD_SIZE;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SIZE_I8: i8 = BOARD_SIZE as i8;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SIZE_I32: i32 = BOARD_SIZE as i32;

    pub const EMPTY: Self = Self {
        rows: [0; BOARD_SIZE],
    };

    /// Returns the occupancy bits of row `y`.
    #[must_use]
    pub fn row(&self, y: usize) -> u8 {
        self.rows[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y] & (1 << x) != 0
    }

    /// Marks a single cell as occupied.
    pub fn occupy_cell(&mut self, x: usize, y: usize) {
        self.rows[y] |= 1 << x;
    }

    #[must_use]
    pub fn occupied_count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    /// Visits each non-empty footprint row as `(board_y, on_board_bits, lost)`.
    ///
    /// `board_y` is `None` when the row itself is above or below the board.
    fn footprint_rows(
        piece: PieceId,
        position: Position,
    ) -> impl Iterator<Item = (Option<usize>, u8, bool)> {
        piece
            .mask()
            .into_iter()
            .zip(0..)
            .filter(|&(row, _)| row != 0)
            .map(move |(row, dy)| {
                let y = position.y() + dy;
                match usize::try_from(y).ok().filter(|&y| y < BOARD_SIZE) {
                    Some(y) => {
                        let (bits, lost) = translate_row(row, position.x());
                        (Some(y), bits, lost)
                    }
                    None => (None, 0, true),
                }
            })
    }

    /// Checks that every footprint cell lands on the board.
    ///
    /// Empty cells of the footprint's bounding box are not checked.
    #[must_use]
    pub fn is_within_bounds(&self, piece: PieceId, position: Position) -> bool {
        Self::footprint_rows(piece, position).all(|(y, _, lost)| y.is_some() && !lost)
    }

    /// Checks whether any on-board footprint cell is already occupied.
    ///
    /// Footprint cells that fall off the board are ignored here; only
    /// [`Self::is_within_bounds`] rejects them.
    #[must_use]
    pub fn overlaps(&self, piece: PieceId, position: Position) -> bool {
        Self::footprint_rows(piece, position)
            .any(|(y, bits, _)| y.is_some_and(|y| self.rows[y] & bits != 0))
    }

    #[must_use]
    pub fn can_place(&self, piece: PieceId, position: Position) -> bool {
        self.is_within_bounds(piece, position) && !self.overlaps(piece, position)
    }

    /// Marks every on-board footprint cell as occupied.
    ///
    /// The placement is not validated; callers check [`Self::can_place`] first.
    pub fn stamp(&mut self, piece: PieceId, position: Position) {
        for (y, bits, _) in Self::footprint_rows(piece, position) {
            if let Some(y) = y {
                self.rows[y] |= bits;
            }
        }
    }

    /// Detects full rows and columns without modifying the board.
    #[must_use]
    pub fn full_lines(&self) -> FullLines {
        let mut rows = 0;
        let mut cols = FULL_ROW;
        for (y, &row) in self.rows.iter().enumerate() {
            if row == FULL_ROW {
                rows |= 1 << y;
            }
            cols &= row;
        }
        FullLines { rows, cols }
    }

    /// Empties every cell lying on one of the given lines, all at once.
    pub fn clear_lines(&mut self, full: FullLines) {
        for (y, row) in self.rows.iter_mut().enumerate() {
            if full.rows & (1 << y) != 0 {
                *row = 0;
            } else {
                *row &= !full.cols;
            }
        }
    }

    /// Clears all full rows and columns and returns what was cleared.
    ///
    /// Cleared cells are reported in sweep order, see [`LineClear`].
    #[must_use = "the clear result carries the line count used for scoring"]
    pub fn clear_full_lines(&mut self) -> LineClear {
        let full = self.full_lines();
        let mut clear = LineClear::new(full);
        if full.is_empty() {
            return clear;
        }

        for step in 0..BOARD_SIZE {
            let mut frame = ClearFrame::new();
            for y in full.full_rows() {
                self.take_cell(step, y, &mut frame);
            }
            for x in full.full_cols() {
                self.take_cell(x, step, &mut frame);
            }
            clear.push_frame(frame);
        }
        debug_assert!(self.full_lines().is_empty());
        clear
    }

    #[expect(clippy::cast_possible_truncation)]
    fn take_cell(&mut self, x: usize, y: usize, frame: &mut ClearFrame) {
        if self.is_occupied(x, y) {
            self.rows[y] &= !(1 << x);
            frame.push(Cell::new(x as u8, y as u8));
        }
    }

    /// Returns the first origin, row-major, where the piece can be placed.
    #[must_use]
    pub fn find_first_fit(&self, piece: PieceId) -> Option<Position> {
        Position::board_origins().find(|&position| self.can_place(piece, position))
    }

    /// Whether the piece can be placed at any origin.
    #[must_use]
    pub fn is_placeable(&self, piece: PieceId) -> bool {
        self.find_first_fit(piece).is_some()
    }

    /// Creates a `BitBoard` from ASCII art representation for testing.
    /// '#' represents an occupied cell, '.' represents an empty cell.
    /// Rows are specified from top to bottom, up to 8 rows of 8 cells.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= BOARD_SIZE, "at most {BOARD_SIZE} rows");

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                BOARD_SIZE,
                "Each row must have exactly {} cells, got {} at row {}",
                BOARD_SIZE,
                chars.len(),
                y
            );

            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.occupy_cell(x, y);
                }
            }
        }
        board
    }
}
