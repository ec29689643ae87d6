/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Sets of grid positions packed into a single word.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{Position, ALL_POSITIONS, GRID_SIZE, STRIDE};
use crate::WumpusError;

/// Bits of the sixteen on-grid positions in the stride-5 layout. Bits 4, 9, 14 and 19 are the
/// padding column and must always stay clear.
pub const VALID_MASK: u32 = 0b1111011110111101111;

/// Set of grid positions. Bit `5 * row + col` is set when `(row, col)` is a member.
///
/// Every constructor and operation keeps bits outside [`VALID_MASK`] clear. Mutating operations
/// (`insert_all`, `retain`, `remove_all`, `invert`, ...) each have a pure counterpart
/// (`union`, `intersect`, `difference`, `complement`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BitBoard(u32);

impl BitBoard {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every square on the grid.
    pub const fn full() -> Self {
        Self(VALID_MASK)
    }

    /// Build from a raw word. Bits outside the grid are dropped.
    pub const fn from_word(word: u32) -> Self {
        Self(word & VALID_MASK)
    }

    /// Set holding only `position`.
    pub fn from_position(position: Position) -> Self {
        Self(bit(position))
    }

    /// Random set where each square is present independently with probability `density`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, density: f64) -> Self {
        ALL_POSITIONS
            .iter()
            .filter(|_| rng.gen_bool(density))
            .copied()
            .collect()
    }

    /// Raw word.
    pub fn word(&self) -> u32 {
        self.0
    }

    /// Whether `position` is a member.
    pub fn contains(&self, position: Position) -> bool {
        (self.0 >> position.index()) & 1 == 1
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of positions in the set.
    pub fn size(&self) -> u32 {
        self.0.count_ones()
    }

    /// Members of either set.
    pub fn union(&self, other: BitBoard) -> Self {
        Self(self.0 | other.0)
    }

    /// Members of both sets.
    pub fn intersect(&self, other: BitBoard) -> Self {
        Self(self.0 & other.0)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: BitBoard) -> Self {
        Self(self.0 & !other.0)
    }

    /// Every on-grid position not in `self`.
    pub fn complement(&self) -> Self {
        Self(!self.0 & VALID_MASK)
    }

    /// Positions orthogonally adjacent to some member. Members are not kept unless they are
    /// themselves adjacent to another member.
    ///
    /// A shift by 1 moves a square sideways and a shift by 5 moves it a row. Sideways shifts off
    /// the edge of a row land in the padding column, and vertical shifts off the grid land past
    /// bit 18 or fall off the word, so masking afterwards is all it takes.
    pub fn neighbors(&self) -> Self {
        let b = self.0;
        Self((b << 1 | b >> 1 | b << STRIDE | b >> STRIDE) & VALID_MASK)
    }

    /// In-place union.
    pub fn insert_all(&mut self, other: BitBoard) {
        self.0 |= other.0;
    }

    /// In-place intersection.
    pub fn retain(&mut self, other: BitBoard) {
        self.0 &= other.0;
    }

    /// In-place difference.
    pub fn remove_all(&mut self, other: BitBoard) {
        self.0 &= !other.0;
    }

    /// In-place complement.
    pub fn invert(&mut self) {
        self.0 = !self.0 & VALID_MASK;
    }

    /// Add a single position.
    pub fn insert(&mut self, position: Position) {
        self.0 |= bit(position);
    }

    /// Remove a single position.
    pub fn remove(&mut self, position: Position) {
        self.0 &= !bit(position);
    }

    /// Members in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        ALL_POSITIONS.iter().copied().filter(|p| self.contains(*p))
    }

    /// Members in row-major order, collected.
    pub fn positions(&self) -> Vec<Position> {
        self.iter().collect()
    }

    /// The only member, if there is exactly one.
    pub fn as_singleton(&self) -> Result<Position, WumpusError> {
        if self.size() != 1 {
            return Err(WumpusError::CardinalityViolation {
                word: self.0,
                size: self.size(),
            });
        }
        Position::from_index(self.0.trailing_zeros() as usize).ok_or(
            WumpusError::CardinalityViolation {
                word: self.0,
                size: self.size(),
            },
        )
    }

    /// Render as a grid, `off` for absent squares and `on` for members.
    pub fn render(&self, off: char, on: char) -> String {
        let mut s = String::with_capacity(GRID_SIZE * (2 * GRID_SIZE + 1));
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let present = self.contains(Position::at(row, col));
                s.push(if present { on } else { off });
                if col < GRID_SIZE - 1 {
                    s.push(' ');
                }
            }
            if row < GRID_SIZE - 1 {
                s.push('\n');
            }
        }
        s
    }
}

// Single-bit word for `position`, never outside the mask.
fn bit(position: Position) -> u32 {
    1u32.checked_shl(position.index() as u32).unwrap_or(0) & VALID_MASK
}

impl From<Position> for BitBoard {
    fn from(position: Position) -> Self {
        Self::from_position(position)
    }
}

impl From<u32> for BitBoard {
    fn from(word: u32) -> Self {
        Self::from_word(word)
    }
}

impl From<BitBoard> for u32 {
    fn from(board: BitBoard) -> Self {
        board.0
    }
}

impl FromIterator<Position> for BitBoard {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut board = Self::empty();
        for position in iter {
            board.insert(position);
        }
        board
    }
}

impl std::fmt::Display for BitBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render('.', '#'))
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, rhs: BitBoard) -> BitBoard {
        self.union(rhs)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: BitBoard) {
        self.insert_all(rhs);
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, rhs: BitBoard) -> BitBoard {
        self.intersect(rhs)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: BitBoard) {
        self.retain(rhs);
    }
}

impl Sub for BitBoard {
    type Output = BitBoard;

    fn sub(self, rhs: BitBoard) -> BitBoard {
        self.difference(rhs)
    }
}

impl SubAssign for BitBoard {
    fn sub_assign(&mut self, rhs: BitBoard) {
        self.remove_all(rhs);
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> BitBoard {
        self.complement()
    }
}
