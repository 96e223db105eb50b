use serde::{Deserialize, Serialize};

use crate::core::{
    bit_board::BitBoard,
    piece::{PieceColor, PieceId},
};

use super::piece_generator::PieceGenerator;

/// Number of slots in the hand.
pub const HAND_SIZE: usize = 3;

/// A generated piece waiting in the hand, with its cosmetic colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct HandPiece {
    pub piece: PieceId,
    pub color: PieceColor,
}

impl HandPiece {
    #[must_use]
    pub const fn new(piece: PieceId, color: PieceColor) -> Self {
        Self { piece, color }
    }
}

/// Three piece slots and a selection cursor.
///
/// The cursor points at a non-empty slot whenever one exists. Slots are only
/// refilled as a batch, once all three have been used.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hand {
    slots: [Option<HandPiece>; HAND_SIZE],
    selection: usize,
}

impl Hand {
    /// Creates a hand with all slots empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; HAND_SIZE],
            selection: 0,
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<HandPiece>; HAND_SIZE] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<HandPiece> {
        self.slots.get(index).copied().flatten()
    }

    #[must_use]
    pub fn selection(&self) -> usize {
        self.selection
    }

    #[must_use]
    pub fn selected(&self) -> Option<HandPiece> {
        self.slot(self.selection)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Iterates over the pieces still in the hand, in slot order.
    pub fn available(&self) -> impl Iterator<Item = HandPiece> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Ids of the pieces still in the hand, in slot order.
    pub fn available_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.available().map(|hp| hp.piece)
    }

    /// Moves the cursor to the first non-empty slot at or after `index`,
    /// wrapping around.
    ///
    /// Out-of-range indices are ignored. With every slot empty the cursor is
    /// set to `index` as requested.
    pub fn select(&mut self, index: usize) {
        if index >= HAND_SIZE {
            return;
        }
        self.selection = self.next_filled_from(index).unwrap_or(index);
    }

    /// Steps the cursor one slot back. Does nothing at the first slot.
    pub fn select_previous(&mut self) {
        if let Some(index) = self.selection.checked_sub(1) {
            self.select(index);
        }
    }

    /// Steps the cursor one slot forward. Does nothing at the last slot.
    pub fn select_next(&mut self) {
        if self.selection + 1 < HAND_SIZE {
            self.select(self.selection + 1);
        }
    }

    /// Empties the selected slot and returns its piece.
    ///
    /// The cursor then moves to the next non-empty slot in cyclic order, if
    /// there is one.
    pub fn take_selected(&mut self) -> Option<HandPiece> {
        let taken = self.slots.get_mut(self.selection)?.take()?;
        if let Some(index) = self.next_filled_from(self.selection) {
            self.selection = index;
        }
        Some(taken)
    }

    /// Puts a piece back into the first empty slot and selects it.
    ///
    /// When every slot is filled, the selected slot is overwritten.
    pub fn restore(&mut self, piece: HandPiece) {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(piece);
                self.selection = index;
            }
            None => {
                if let Some(slot) = self.slots.get_mut(self.selection) {
                    *slot = Some(piece);
                }
            }
        }
    }

    /// Replaces all slots and resets the cursor to the first one.
    pub fn fill(&mut self, pieces: [HandPiece; HAND_SIZE]) {
        self.slots = pieces.map(Some);
        self.selection = 0;
    }

    /// Generates a new batch if, and only if, every slot is empty.
    ///
    /// Returns whether the hand was refilled.
    pub fn refill_if_empty(&mut self, generator: &mut PieceGenerator, board: &BitBoard) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.fill(generator.generate_hand(board));
        true
    }

    fn next_filled_from(&self, start: usize) -> Option<usize> {
        (0..HAND_SIZE)
            .map(|offset| (start + offset) % HAND_SIZE)
            .find(|&index| self.slots[index].is_some())
    }
}
