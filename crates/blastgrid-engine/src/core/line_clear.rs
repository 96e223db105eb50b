use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::bit_board::BOARD_SIZE;

/// A single board cell, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Full rows and columns of a board, one bit per line.
///
/// Bit `y` of `rows` is set when row `y` is full; bit `x` of `cols` when
/// column `x` is full.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FullLines {
    pub rows: u8,
    pub cols: u8,
}

impl FullLines {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    /// Number of full rows plus number of full columns.
    #[must_use]
    pub fn count(self) -> usize {
        (self.rows.count_ones() + self.cols.count_ones()) as usize
    }

    pub fn full_rows(self) -> impl Iterator<Item = usize> {
        (0..BOARD_SIZE).filter(move |y| self.rows & (1 << y) != 0)
    }

    pub fn full_cols(self) -> impl Iterator<Item = usize> {
        (0..BOARD_SIZE).filter(move |x| self.cols & (1 << x) != 0)
    }

    /// Whether the cell lies on any full line.
    #[must_use]
    pub fn covers(self, x: usize, y: usize) -> bool {
        self.rows & (1 << y) != 0 || self.cols & (1 << x) != 0
    }
}

/// Cells cleared during one animation step.
pub type ClearFrame = ArrayVec<Cell, { 2 * BOARD_SIZE }>;

/// Outcome of clearing the full lines of a board.
///
/// The clear is a sweep of [`BOARD_SIZE`] steps. At step `s` every full row
/// loses its cell in column `s`, then every full column loses its cell in
/// row `s`. A cell shared by a full row and a full column is cleared once, by
/// whichever comes first. Each step is one frame for the renderer to pace.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineClear {
    full: FullLines,
    frames: ArrayVec<ClearFrame, BOARD_SIZE>,
}

impl LineClear {
    pub(crate) fn new(full: FullLines) -> Self {
        Self {
            full,
            frames: ArrayVec::new(),
        }
    }

    pub(crate) fn push_frame(&mut self, frame: ClearFrame) {
        self.frames.push(frame);
    }

    #[must_use]
    pub fn full_lines(&self) -> FullLines {
        self.full
    }

    /// Total full rows plus full columns.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.full.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    #[must_use]
    pub fn frames(&self) -> &[ClearFrame] {
        &self.frames
    }

    /// Cleared cells in sweep order.
    pub fn cleared_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.frames.iter().flatten().copied()
    }

    #[must_use]
    pub fn cleared_count(&self) -> usize {
        self.frames.iter().map(ArrayVec::len).sum()
    }
}
