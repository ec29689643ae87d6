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

#![warn(missing_docs)]

//! Wumpus World game logic.
//!
//! This is a library for the 4x4 Wumpus World from Chapter 7 (Logical Agents). It holds the
//! grid, a bitboard for sets of squares, and the game engine itself. It is intended to be used
//! by an agent to simulate or play the game.

pub mod bitboard;
pub mod grid;
pub mod level;

pub use bitboard::BitBoard;
pub use grid::{Direction, Position, ALL_POSITIONS, GRID_SIZE, START};
pub use level::{EndType, Level, Shot, WumpusEngine};

/// Wumpus World error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WumpusError {
    /// A bitboard was asked for its single member but does not hold exactly one.
    #[error("expected exactly one position, bitboard {word:#021b} holds {size}")]
    CardinalityViolation {
        /// Raw word of the offending bitboard.
        word: u32,

        /// Number of positions it actually holds.
        size: u32,
    },

    /// Direction string did not name one of the four directions.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Position lies outside the 4x4 grid.
    #[error("position out of bounds: ({row}, {col})")]
    PositionOutOfBounds {
        /// Requested row.
        row: usize,

        /// Requested column.
        col: usize,
    },

    /// Level layout places something where it is not allowed.
    #[error("invalid level layout: {0}")]
    LevelOverlap(&'static str),
}
