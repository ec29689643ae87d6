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

//! Shortest paths over a set of passable squares.
//!
//! Breadth-first search, see Chapter 3 page 95 Figure 3.9. Successors are always expanded in
//! [`Direction::ALL`] order (up, down, left, right), so ties between equally short paths are
//! broken the same way on every call.

use wumpus_world_logic::{BitBoard, Direction, Position, GRID_SIZE};

// One past the highest bit index a position can have.
const INDEX_LIMIT: usize = 20;

// Parent links and depths filled in by one breadth-first search, indexed by bit index.
struct Search {
    came_from: [Option<(Position, Direction)>; INDEX_LIMIT],
    depth: [usize; INDEX_LIMIT],
}

impl Search {
    // Runs until `to` is reached. Returns `None` when it cannot be.
    fn run(from: Position, to: Position, passable: BitBoard) -> Option<Self> {
        let mut search = Self {
            came_from: [None; INDEX_LIMIT],
            depth: [0; INDEX_LIMIT],
        };
        if from == to {
            return Some(search);
        }

        let mut visited = !passable;
        visited.insert(from);

        // Every square is queued at most once.
        let mut queue = [from; GRID_SIZE * GRID_SIZE];
        let mut head = 0;
        let mut tail = 1;

        while head < tail {
            let current = queue[head];
            head += 1;
            for direction in Direction::ALL {
                let Some(next) = current.step(direction) else {
                    continue;
                };
                if visited.contains(next) {
                    continue;
                }
                search.came_from[next.index()] = Some((current, direction));
                search.depth[next.index()] = search.depth[current.index()] + 1;
                if next == to {
                    return Some(search);
                }
                visited.insert(next);
                queue[tail] = next;
                tail += 1;
            }
        }
        None
    }

    fn backtrack(&self, from: Position, to: Position) -> Option<Vec<Direction>> {
        let mut path = Vec::with_capacity(self.depth[to.index()]);
        let mut at = to;
        while at != from {
            let (parent, direction) = self.came_from[at.index()]?;
            path.push(direction);
            at = parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Shortest sequence of moves from `from` to `to` that only steps on `passable` squares.
///
/// `from` itself does not need to be passable. Returns an empty path when `from == to`, and
/// `None` when `to` cannot be reached.
pub fn directions(from: Position, to: Position, passable: BitBoard) -> Option<Vec<Direction>> {
    Search::run(from, to, passable)?.backtrack(from, to)
}

/// Length of the path [`directions`] would return, or `None` when unreachable. Does not
/// allocate.
pub fn distance(from: Position, to: Position, passable: BitBoard) -> Option<usize> {
    Search::run(from, to, passable).map(|search| search.depth[to.index()])
}

/// Follow `path` from `from`. Returns every square stepped on, or `None` if a step would leave
/// the grid.
pub fn walk(from: Position, path: &[Direction]) -> Option<Vec<Position>> {
    let mut at = from;
    let mut squares = Vec::with_capacity(path.len());
    for direction in path {
        at = at.step(*direction)?;
        squares.push(at);
    }
    Some(squares)
}
