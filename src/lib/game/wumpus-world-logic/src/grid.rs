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

//! Grid coordinates and movement directions.
//!
//! Rows run top to bottom and columns left to right, both `0..4`. A position is packed into a
//! bit index with a stride of 5 rather than 4 (see [`Position::index`]) so that a horizontal
//! shift of a bitboard spills into an unused column instead of wrapping onto the next row.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::WumpusError;

/// Width and height of the grid.
pub const GRID_SIZE: usize = 4;

/// Bit index distance between two vertically adjacent positions.
pub(crate) const STRIDE: usize = 5;

/// Position on the grid.
///
/// Only [`Position::new`] and the grid's own constants build positions, so a position is
/// always on the grid. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: usize,
    col: usize,
}

// Unchecked wire form of a position.
#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    col: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = WumpusError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col)
    }
}

/// The agent's starting square, top left.
pub const START: Position = Position::at(0, 0);

/// Every position on the grid in row-major order.
pub const ALL_POSITIONS: [Position; GRID_SIZE * GRID_SIZE] = [
    Position::at(0, 0),
    Position::at(0, 1),
    Position::at(0, 2),
    Position::at(0, 3),
    Position::at(1, 0),
    Position::at(1, 1),
    Position::at(1, 2),
    Position::at(1, 3),
    Position::at(2, 0),
    Position::at(2, 1),
    Position::at(2, 2),
    Position::at(2, 3),
    Position::at(3, 0),
    Position::at(3, 1),
    Position::at(3, 2),
    Position::at(3, 3),
];

impl Position {
    /// Create a position, checking that it lies on the grid.
    pub fn new(row: usize, col: usize) -> Result<Self, WumpusError> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(WumpusError::PositionOutOfBounds { row, col });
        }
        Ok(Self::at(row, col))
    }

    // only for in-bounds constants
    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row, counted from the top.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column, counted from the left.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Bit index of this position in a [`crate::BitBoard`], `5 * row + col`.
    pub fn index(&self) -> usize {
        self.row * STRIDE + self.col
    }

    /// Inverse of [`Position::index`]. Indices in the padding column or past the last row give
    /// `None`.
    pub fn from_index(index: usize) -> Option<Self> {
        let row = index / STRIDE;
        let col = index % STRIDE;
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self::at(row, col))
        } else {
            None
        }
    }

    /// The neighboring position in `direction`, or `None` when that would leave the grid.
    pub fn step(&self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up if self.row > 0 => Some(Self::at(self.row - 1, self.col)),
            Direction::Down if self.row + 1 < GRID_SIZE => Some(Self::at(self.row + 1, self.col)),
            Direction::Left if self.col > 0 => Some(Self::at(self.row, self.col - 1)),
            Direction::Right if self.col + 1 < GRID_SIZE => Some(Self::at(self.row, self.col + 1)),
            _ => None,
        }
    }

    /// Chebyshev distance from the center of the grid, doubled so it stays integral.
    ///
    /// The center sits at (1.5, 1.5), so the four inner squares give 1 and the twelve squares on
    /// the border give 3.
    pub fn ring(&self) -> usize {
        let doubled_center = GRID_SIZE - 1;
        let dr = (2 * self.row).abs_diff(doubled_center);
        let dc = (2 * self.col).abs_diff(doubled_center);
        dr.max(dc)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four orthogonal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,

    /// Towards row 3.
    Down,

    /// Towards column 0.
    Left,

    /// Towards column 3.
    Right,
}

impl Direction {
    /// All directions, in the order searches expand them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Uniformly random direction.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// The direction pointing the other way.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

// Accepts full names or first letters, case-insensitive.
impl FromStr for Direction {
    type Err = WumpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(WumpusError::InvalidDirection(s.to_string())),
        }
    }
}
