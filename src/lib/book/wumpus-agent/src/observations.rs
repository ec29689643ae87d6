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

use serde::{Deserialize, Serialize};
use wumpus_world_logic::{BitBoard, Position};

use crate::wumpus_world::WumpusPercept;

/// Everything the agent has sensed so far in one game.
///
/// `loaded` holds every square the agent has stood on. The sensed boards only ever hold loaded
/// squares, and nothing is ever removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservationStore {
    loaded: BitBoard,
    breeze: BitBoard,
    stench: BitBoard,
    glitter: BitBoard,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record what was sensed while standing on `position`.
    pub fn record(&mut self, position: Position, breeze: bool, stench: bool, glitter: bool) {
        self.loaded.insert(position);
        if breeze {
            self.breeze.insert(position);
        }
        if stench {
            self.stench.insert(position);
        }
        if glitter {
            self.glitter.insert(position);
        }
    }

    pub fn record_percept(&mut self, percept: &WumpusPercept) {
        self.record(
            percept.position,
            percept.breeze,
            percept.stench,
            percept.glitter,
        );
    }

    pub fn loaded(&self) -> BitBoard {
        self.loaded
    }

    pub fn breeze(&self) -> BitBoard {
        self.breeze
    }

    pub fn stench(&self) -> BitBoard {
        self.stench
    }

    pub fn glitter(&self) -> BitBoard {
        self.glitter
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use wumpus_world_logic::{ALL_POSITIONS, START};

    use super::*;

    #[test]
    fn test_store_starts_empty() {
        let store = ObservationStore::new();
        assert!(store.loaded().is_empty());
        assert!(store.breeze().is_empty());
        assert!(store.stench().is_empty());
        assert!(store.glitter().is_empty());
    }

    #[test]
    fn test_record_sets_only_flagged_boards() {
        let mut store = ObservationStore::new();
        store.record(START, false, true, false);
        assert_eq!(store.loaded(), BitBoard::from_position(START));
        assert!(store.breeze().is_empty());
        assert_eq!(store.stench(), BitBoard::from_position(START));
        assert!(store.glitter().is_empty());
    }

    #[test]
    fn test_record_percept() {
        let mut store = ObservationStore::new();
        let position = Position::new(2, 3).unwrap();
        store.record_percept(&WumpusPercept {
            position,
            breeze: true,
            stench: false,
            glitter: true,
            gold_in_cave: true,
        });
        assert!(store.loaded().contains(position));
        assert!(store.breeze().contains(position));
        assert!(!store.stench().contains(position));
        assert!(store.glitter().contains(position));
    }

    fn observation() -> impl Strategy<Value = (usize, bool, bool, bool)> {
        (0..ALL_POSITIONS.len(), any::<bool>(), any::<bool>(), any::<bool>())
    }

    proptest! {
        #[test]
        fn test_sensed_boards_stay_inside_loaded(
            observations in prop::collection::vec(observation(), 0..40),
        ) {
            let mut store = ObservationStore::new();
            let mut previous = store.loaded();
            for (i, breeze, stench, glitter) in observations {
                store.record(ALL_POSITIONS[i], breeze, stench, glitter);
                let sensed = store.breeze() | store.stench() | store.glitter();
                prop_assert_eq!(sensed - store.loaded(), BitBoard::empty());
                prop_assert_eq!(previous - store.loaded(), BitBoard::empty());
                previous = store.loaded();
            }
        }
    }
}
