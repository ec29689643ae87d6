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

//! Deduce which squares are safe from what the agent has sensed.
//!
//! See Chapter 7 page 210, "The Wumpus World", and the reasoning in Figure 7.3 and 7.4: a square
//! without breeze has no pit next to it, a square without stench has no Wumpus next to it, and
//! the single Wumpus must be next to every square that smells.
//!
//! Everything here is recomputed from scratch on every call. It is a handful of operations on
//! 20-bit words, so there is nothing worth caching between turns.

use serde::{Deserialize, Serialize};
use wumpus_world_logic::{BitBoard, Position, START};

use crate::observations::ObservationStore;

/// What can be proven about every square from an [`ObservationStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Squares that cannot hold the Wumpus.
    pub non_wumpus: BitBoard,

    /// Squares that cannot hold a pit.
    pub non_pit: BitBoard,

    /// Squares that must hold a pit: the only unexplained neighbor of some breeze.
    pub must_pit: BitBoard,

    /// Squares where the Wumpus may still be.
    pub possible_wumpus: BitBoard,
}

impl KnowledgeBase {
    /// Derive the knowledge base from the observations.
    ///
    /// Pit propagation runs a single pass over the breeze squares. A forced pit never joins
    /// `non_pit`, so it cannot make another square safe.
    pub fn from_observations(observations: &ObservationStore) -> Self {
        let loaded = observations.loaded();
        let breeze = observations.breeze();
        let stench = observations.stench();

        // The agent survived every loaded square, and it always starts somewhere safe.
        let mut visited = loaded;
        visited.insert(START);

        // A square without stench has no Wumpus next to it.
        let mut non_wumpus = visited | (loaded - stench).neighbors();
        let mut possible_wumpus = !non_wumpus;

        // There is one Wumpus, so it is next to every square that smells.
        for position in stench.iter() {
            possible_wumpus &= BitBoard::from_position(position).neighbors();
        }

        // A square without breeze has no pit next to it.
        let mut non_pit = visited | (loaded - breeze).neighbors();

        if possible_wumpus.size() == 1 {
            non_wumpus = !possible_wumpus;
            non_pit |= possible_wumpus;
        }

        let mut must_pit = BitBoard::empty();
        for position in breeze.iter() {
            let candidates = BitBoard::from_position(position).neighbors() - non_pit;
            if candidates.size() == 1 {
                must_pit |= candidates;
                possible_wumpus -= candidates;
                non_wumpus |= candidates;
            }
        }

        Self {
            non_wumpus,
            non_pit,
            must_pit,
            possible_wumpus,
        }
    }

    /// Squares proven to hold neither a pit nor the Wumpus.
    pub fn safe(&self) -> BitBoard {
        self.non_wumpus & self.non_pit
    }

    /// Safe squares the agent has not stood on yet.
    pub fn frontier(&self, observations: &ObservationStore) -> BitBoard {
        self.safe() - observations.loaded()
    }

    /// The Wumpus's square, once it is pinned down to one candidate.
    pub fn located_wumpus(&self) -> Option<Position> {
        self.possible_wumpus.as_singleton().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board(positions: &[(usize, usize)]) -> BitBoard {
        positions.iter().map(|&(r, c)| pos(r, c)).collect()
    }

    fn assert_invariants(kb: &KnowledgeBase) {
        assert_eq!(kb.non_wumpus & kb.possible_wumpus, BitBoard::empty());
        assert_eq!(kb.must_pit - kb.non_wumpus, BitBoard::empty());
        assert_eq!(kb.must_pit & kb.non_pit, BitBoard::empty());
        assert!(kb.safe().contains(START));
    }

    #[test]
    fn test_empty_store_knows_only_the_start() {
        let kb = KnowledgeBase::from_observations(&ObservationStore::new());
        assert_eq!(kb.safe(), BitBoard::from_position(START));
        assert_eq!(kb.must_pit, BitBoard::empty());
        assert_invariants(&kb);
    }

    #[test]
    fn test_quiet_start_makes_neighbors_safe() {
        let mut store = ObservationStore::new();
        store.record(START, false, false, false);
        let kb = KnowledgeBase::from_observations(&store);
        assert_eq!(kb.safe(), board(&[(0, 0), (0, 1), (1, 0)]));
        assert_eq!(kb.frontier(&store), board(&[(0, 1), (1, 0)]));
        assert_invariants(&kb);
    }

    #[test]
    fn test_smelly_breezy_start_knows_only_the_start() {
        let mut store = ObservationStore::new();
        store.record(START, true, true, false);
        let kb = KnowledgeBase::from_observations(&store);
        assert_eq!(kb.safe(), BitBoard::from_position(START));
        assert_eq!(kb.possible_wumpus, board(&[(0, 1), (1, 0)]));
        assert_eq!(kb.located_wumpus(), None);
        assert_invariants(&kb);
    }

    #[test]
    fn test_one_stench_localizes_wumpus() {
        let mut store = ObservationStore::new();
        store.record(pos(0, 0), false, false, false);
        store.record(pos(0, 1), false, true, false);
        store.record(pos(1, 0), false, false, false);
        let kb = KnowledgeBase::from_observations(&store);

        assert_eq!(kb.possible_wumpus, board(&[(0, 2)]));
        assert_eq!(kb.located_wumpus(), Some(pos(0, 2)));
        assert_eq!(kb.non_wumpus, !board(&[(0, 2)]));
        assert_eq!(
            kb.non_pit,
            board(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 0)])
        );
        assert_eq!(
            kb.safe(),
            board(&[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)])
        );
        assert!(!kb.safe().contains(pos(0, 2)));
        assert_invariants(&kb);
    }

    #[test]
    fn test_forced_pit_needs_a_single_candidate() {
        let mut store = ObservationStore::new();
        store.record(pos(0, 0), false, false, false);
        store.record(pos(0, 1), true, false, false);
        let kb = KnowledgeBase::from_observations(&store);
        assert_eq!(kb.non_pit, board(&[(0, 0), (0, 1), (1, 0)]));
        assert_eq!(kb.must_pit, BitBoard::empty());
        assert_invariants(&kb);

        // A quiet (1, 0) clears (1, 1), leaving (0, 2) as the only source of the breeze.
        store.record(pos(1, 0), false, false, false);
        let kb = KnowledgeBase::from_observations(&store);
        assert!(kb.non_pit.contains(pos(1, 1)));
        assert_eq!(kb.must_pit, board(&[(0, 2)]));
        assert!(kb.non_wumpus.contains(pos(0, 2)));
        assert!(!kb.possible_wumpus.contains(pos(0, 2)));
        assert!(!kb.safe().contains(pos(0, 2)));
        assert_invariants(&kb);
    }

    #[test]
    fn test_located_wumpus_square_is_not_a_pit() {
        // Quiet at (0, 0) and (1, 1) leaves (0, 2) as the only square next to the stench at
        // (0, 1). A square holds at most one hazard, so (0, 2) also joins non_pit.
        let mut store = ObservationStore::new();
        store.record(pos(0, 0), false, false, false);
        store.record(pos(0, 1), true, true, false);
        store.record(pos(1, 1), false, false, false);
        let kb = KnowledgeBase::from_observations(&store);

        assert_eq!(kb.located_wumpus(), Some(pos(0, 2)));
        assert!(kb.non_pit.contains(pos(0, 2)));
        assert!(!kb.safe().contains(pos(0, 2)));
        assert_eq!(kb.must_pit, BitBoard::empty());
        assert_invariants(&kb);
    }

    #[test]
    fn test_breeze_with_cleared_neighbors_forces_pit() {
        // Breeze at (1, 0) with (0, 0) and (1, 1) cleared leaves (2, 0) forced.
        let mut store = ObservationStore::new();
        store.record(pos(0, 0), false, false, false);
        store.record(pos(1, 0), true, false, false);
        store.record(pos(0, 1), false, false, false);
        store.record(pos(1, 1), false, false, false);
        let kb = KnowledgeBase::from_observations(&store);
        assert_eq!(kb.must_pit, board(&[(2, 0)]));
        assert!(kb.safe().contains(pos(2, 1)));
        assert!(kb.safe().contains(pos(1, 2)));
        assert_invariants(&kb);
    }
}
