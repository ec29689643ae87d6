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
use wumpus_world_logic::{BitBoard, Direction, Position, WumpusEngine, START};

use crate::observations::ObservationStore;

/// Identifies a game state by what the agent knows, not by the score.
///
/// An unfired arrow is recorded as if it had been shot up from the start and missed, so every
/// state has exactly one encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId {
    pub loaded: BitBoard,
    pub breeze: BitBoard,
    pub stench: BitBoard,
    pub shot_origin: Position,
    pub shot_direction: Direction,
    pub arrow_hit: bool,
    pub gold_in_cave: bool,
}

impl StateId {
    pub fn new<_Engine: WumpusEngine>(observations: &ObservationStore, engine: &_Engine) -> Self {
        let (shot_origin, shot_direction, arrow_hit) = match engine.shot() {
            Some(shot) => (shot.origin, shot.direction, !engine.has_wumpus()),
            None => (START, Direction::Up, false),
        };
        Self {
            loaded: observations.loaded(),
            breeze: observations.breeze(),
            stench: observations.stench(),
            shot_origin,
            shot_direction,
            arrow_hit,
            gold_in_cave: engine.has_gold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use wumpus_world_logic::Level;

    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn classic() -> Level {
        let pits: BitBoard = [pos(0, 2), pos(1, 2), pos(3, 2)].into_iter().collect();
        Level::new(pits, pos(1, 0), pos(1, 1)).unwrap()
    }

    #[test]
    fn test_unfired_arrow_encoding() {
        let id = StateId::new(&ObservationStore::new(), &classic());
        assert_eq!(id.shot_origin, START);
        assert_eq!(id.shot_direction, Direction::Up);
        assert!(!id.arrow_hit);
        assert!(id.gold_in_cave);
    }

    #[test]
    fn test_score_is_not_part_of_the_id() {
        let mut store = ObservationStore::new();
        store.record(START, false, true, false);
        let mut level = classic();
        let before = StateId::new(&store, &level);
        // Walking back does not teach anything new, it only costs score.
        level.move_agent(Direction::Right);
        store.record(pos(0, 1), true, false, false);
        let out = StateId::new(&store, &level);
        level.move_agent(Direction::Left);
        assert_ne!(before, out);
        assert_eq!(out, StateId::new(&store, &level));
        assert_ne!(level.score(), 0);
    }

    #[test]
    fn test_shot_distinguishes_hit_from_miss() {
        let store = ObservationStore::new();
        let mut hit = classic();
        hit.shoot(Direction::Down);
        let mut miss = classic();
        miss.shoot(Direction::Right);

        let hit = StateId::new(&store, &hit);
        let miss = StateId::new(&store, &miss);
        assert!(hit.arrow_hit);
        assert!(!miss.arrow_hit);
        assert_eq!(miss.shot_direction, Direction::Right);

        let ids: HashSet<StateId> = [hit, miss, hit].into_iter().collect();
        assert_eq!(ids.len(), 2);
    }
}
