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

//! The Wumpus World game engine.
//!
//! A [`Level`] hides pits, one Wumpus and one gold on the grid. The agent starts at [`START`]
//! and must pick up the gold and bring it back without stepping into a pit or onto the live
//! Wumpus. Scoring:
//!
//! - every move that does not bump a wall costs 1,
//! - shooting the arrow costs 10,
//! - falling into a pit or being eaten costs 1000 and ends the game,
//! - returning to the start with the gold earns 1000 and ends the game.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoard;
use crate::grid::{Direction, Position, START};
use crate::WumpusError;

const MOVE_COST: i32 = 1;
const ARROW_COST: i32 = 10;
const DEATH_PENALTY: i32 = 1000;
const WIN_REWARD: i32 = 1000;

/// Probability that any square other than the start holds a pit in a generated level.
pub const PIT_PROBABILITY: f64 = 0.2;

// Pits plus the start square. More than this leaves too little room for the Wumpus and gold.
const MAX_OCCUPIED: u32 = 14;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndType {
    /// The agent fell into a pit.
    Pit,

    /// The agent walked onto the live Wumpus.
    Wumpus,

    /// The agent brought the gold back to the start.
    Win,
}

impl std::fmt::Display for EndType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndType::Pit => write!(f, "fell into a pit"),
            EndType::Wumpus => write!(f, "eaten by the Wumpus"),
            EndType::Win => write!(f, "brought the gold back"),
        }
    }
}

/// Where and which way the arrow was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shot {
    /// Square the agent stood on.
    pub origin: Position,

    /// Direction of flight.
    pub direction: Direction,
}

/// What an agent may do to and ask of a running game.
///
/// Queries are only meaningful between actions. Actions after the game has ended are no-ops.
pub trait WumpusEngine {
    /// Try to move the agent. Returns false when bumping a wall or after the game ended.
    fn move_agent(&mut self, direction: Direction) -> bool;

    /// Fire the arrow. Returns false if there is no arrow or the game ended.
    fn shoot(&mut self, direction: Direction) -> bool;

    /// Whether the Wumpus is still alive.
    fn has_wumpus(&self) -> bool;

    /// Whether the arrow is still unfired.
    fn has_arrow(&self) -> bool;

    /// Whether the gold is still lying in the cave, i.e. has not been picked up yet.
    fn has_gold(&self) -> bool;

    /// How the game ended, or `None` while it is running.
    fn end_type(&self) -> Option<EndType>;

    /// Whether the game is over.
    fn has_ended(&self) -> bool {
        self.end_type().is_some()
    }

    /// Whether the agent's square is next to a pit.
    fn detects_breeze(&self) -> bool;

    /// Whether the agent's square is next to the Wumpus.
    fn detects_stench(&self) -> bool;

    /// Whether the agent stands on the gold's square, picked up or not.
    fn detects_glitter(&self) -> bool;

    /// Where the agent is.
    fn agent_position(&self) -> Position;

    /// The arrow shot, once fired.
    fn shot(&self) -> Option<Shot>;

    /// Current score.
    fn score(&self) -> i32;
}

/// A single game of Wumpus World.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pits: BitBoard,
    breeze: BitBoard,
    stench: BitBoard,
    wumpus: Position,
    gold: Position,
    agent: Position,
    wumpus_alive: bool,
    gold_in_cave: bool,
    shot: Option<Shot>,
    end: Option<EndType>,
    score: i32,
}

impl Level {
    /// Create a level. Breeze is felt next to every pit and stench next to the Wumpus.
    ///
    /// The start square must be empty, and neither the Wumpus nor the gold may sit on a pit.
    pub fn new(pits: BitBoard, wumpus: Position, gold: Position) -> Result<Self, WumpusError> {
        if pits.contains(START) {
            return Err(WumpusError::LevelOverlap("pit on the start square"));
        }
        if wumpus == START {
            return Err(WumpusError::LevelOverlap("wumpus on the start square"));
        }
        if gold == START {
            return Err(WumpusError::LevelOverlap("gold on the start square"));
        }
        if pits.contains(wumpus) {
            return Err(WumpusError::LevelOverlap("wumpus on a pit"));
        }
        if pits.contains(gold) {
            return Err(WumpusError::LevelOverlap("gold on a pit"));
        }
        if gold == wumpus {
            return Err(WumpusError::LevelOverlap("gold on the wumpus"));
        }

        Ok(Self {
            pits,
            breeze: pits.neighbors(),
            stench: BitBoard::from_position(wumpus).neighbors(),
            wumpus,
            gold,
            agent: START,
            wumpus_alive: true,
            gold_in_cave: true,
            shot: None,
            end: None,
            score: 0,
        })
    }

    /// Generate a random level.
    ///
    /// Every square except the start holds a pit with probability [`PIT_PROBABILITY`]. Draws
    /// that leave too little room are thrown away. The Wumpus then goes on a random free square
    /// and the gold on a random square free of pits and the Wumpus.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut occupied = BitBoard::from_position(START);
            let pits = BitBoard::random(rng, PIT_PROBABILITY) - occupied;
            occupied |= pits;
            if occupied.size() > MAX_OCCUPIED {
                continue;
            }

            let Some(&wumpus) = occupied.complement().positions().choose(rng) else {
                continue;
            };
            occupied.insert(wumpus);
            let Some(&gold) = occupied.complement().positions().choose(rng) else {
                continue;
            };

            if let Ok(level) = Self::new(pits, wumpus, gold) {
                return level;
            }
        }
    }

    /// Squares holding a pit.
    pub fn pits(&self) -> BitBoard {
        self.pits
    }

    /// Where the Wumpus lives, dead or alive.
    pub fn wumpus(&self) -> Position {
        self.wumpus
    }

    /// Where the gold was placed.
    pub fn gold(&self) -> Position {
        self.gold
    }

    /// Squares that kill the agent right now: pits, plus the Wumpus while it lives.
    pub fn deadly(&self) -> BitBoard {
        let mut deadly = self.pits;
        if self.wumpus_alive {
            deadly.insert(self.wumpus);
        }
        deadly
    }

    fn end_with(&mut self, end: EndType, delta: i32) {
        self.score += delta;
        self.end = Some(end);
    }
}

impl WumpusEngine for Level {
    fn move_agent(&mut self, direction: Direction) -> bool {
        if self.end.is_some() {
            return false;
        }
        let Some(next) = self.agent.step(direction) else {
            return false;
        };

        self.agent = next;
        self.score -= MOVE_COST;
        if self.pits.contains(next) {
            self.end_with(EndType::Pit, -DEATH_PENALTY);
        } else if self.wumpus_alive && next == self.wumpus {
            self.end_with(EndType::Wumpus, -DEATH_PENALTY);
        } else {
            if self.gold_in_cave && next == self.gold {
                self.gold_in_cave = false;
            }
            if !self.gold_in_cave && next == START {
                self.end_with(EndType::Win, WIN_REWARD);
            }
        }
        true
    }

    fn shoot(&mut self, direction: Direction) -> bool {
        if self.end.is_some() || self.shot.is_some() {
            return false;
        }
        self.shot = Some(Shot {
            origin: self.agent,
            direction,
        });
        self.score -= ARROW_COST;

        let mut arrow = self.agent;
        while let Some(next) = arrow.step(direction) {
            if next == self.wumpus {
                self.wumpus_alive = false;
            }
            arrow = next;
        }
        true
    }

    fn has_wumpus(&self) -> bool {
        self.wumpus_alive
    }

    fn has_arrow(&self) -> bool {
        self.shot.is_none()
    }

    fn has_gold(&self) -> bool {
        self.gold_in_cave
    }

    fn end_type(&self) -> Option<EndType> {
        self.end
    }

    fn detects_breeze(&self) -> bool {
        self.breeze.contains(self.agent)
    }

    fn detects_stench(&self) -> bool {
        self.stench.contains(self.agent)
    }

    fn detects_glitter(&self) -> bool {
        self.agent == self.gold
    }

    fn agent_position(&self) -> Position {
        self.agent
    }

    fn shot(&self) -> Option<Shot> {
        self.shot
    }

    fn score(&self) -> i32 {
        self.score
    }
}

// Print every hidden layer, one grid each.
impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layers = [
            ("Agent", BitBoard::from_position(self.agent), 'A'),
            ("Wumpus", BitBoard::from_position(self.wumpus), 'W'),
            ("Stench", self.stench, 'S'),
            ("Gold", BitBoard::from_position(self.gold), 'G'),
            ("Pit", self.pits, 'P'),
            ("Breeze", self.breeze, 'B'),
        ];
        for (name, board, on) in layers {
            writeln!(f, "{}:", name)?;
            writeln!(f, "{}", board.render('.', on))?;
        }
        write!(f, "score: {}", self.score)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).expect("position in bounds")
    }

    // Classic layout: pits at (0,2), (1,2) and (3,2), Wumpus at (1,0), gold at (1,1).
    fn classic_level() -> Level {
        let pits: BitBoard = [pos(0, 2), pos(1, 2), pos(3, 2)].into_iter().collect();
        Level::new(pits, pos(1, 0), pos(1, 1)).expect("valid level")
    }

    #[test]
    fn test_new_level_starts_at_origin() {
        let level = classic_level();
        assert_eq!(level.agent_position(), START);
        assert_eq!(level.score(), 0);
        assert!(level.has_wumpus());
        assert!(level.has_arrow());
        assert!(level.has_gold());
        assert!(!level.has_ended());
        assert_eq!(level.end_type(), None);
        assert_eq!(level.shot(), None);
    }

    #[test]
    fn test_new_rejects_overlaps() {
        let pits = BitBoard::from_position(pos(2, 2));
        assert_eq!(
            Level::new(pits, pos(2, 2), pos(3, 3)),
            Err(WumpusError::LevelOverlap("wumpus on a pit"))
        );
        assert_eq!(
            Level::new(pits, pos(3, 3), pos(2, 2)),
            Err(WumpusError::LevelOverlap("gold on a pit"))
        );
        assert_eq!(
            Level::new(BitBoard::from_position(START), pos(3, 3), pos(2, 3)),
            Err(WumpusError::LevelOverlap("pit on the start square"))
        );
        assert_eq!(
            Level::new(pits, START, pos(2, 3)),
            Err(WumpusError::LevelOverlap("wumpus on the start square"))
        );
        assert_eq!(
            Level::new(pits, pos(3, 3), pos(3, 3)),
            Err(WumpusError::LevelOverlap("gold on the wumpus"))
        );
    }

    #[test]
    fn test_percepts_at_start() {
        let level = classic_level();
        assert!(!level.detects_breeze());
        assert!(level.detects_stench());
        assert!(!level.detects_glitter());
    }

    #[test]
    fn test_wall_bump_is_free() {
        let mut level = classic_level();
        assert!(!level.move_agent(Direction::Up));
        assert!(!level.move_agent(Direction::Left));
        assert_eq!(level.agent_position(), START);
        assert_eq!(level.score(), 0);
    }

    #[test]
    fn test_move_costs_one() {
        let mut level = classic_level();
        assert!(level.move_agent(Direction::Right));
        assert_eq!(level.agent_position(), pos(0, 1));
        assert_eq!(level.score(), -1);
        assert!(level.detects_breeze());
        assert!(!level.has_ended());
    }

    #[test]
    fn test_pit_ends_game() {
        let mut level = classic_level();
        level.move_agent(Direction::Right);
        level.move_agent(Direction::Right);
        assert_eq!(level.end_type(), Some(EndType::Pit));
        assert_eq!(level.score(), -1002);

        // Nothing happens once the game is over.
        assert!(!level.move_agent(Direction::Down));
        assert_eq!(level.agent_position(), pos(0, 2));
        assert_eq!(level.score(), -1002);
    }

    #[test]
    fn test_wumpus_ends_game() {
        let mut level = classic_level();
        level.move_agent(Direction::Down);
        assert_eq!(level.end_type(), Some(EndType::Wumpus));
        assert_eq!(level.score(), -1001);
    }

    #[test]
    fn test_pick_up_gold_and_return_wins() {
        let mut level = classic_level();
        level.move_agent(Direction::Right);
        level.move_agent(Direction::Down);
        assert_eq!(level.agent_position(), pos(1, 1));
        assert!(!level.has_gold());
        // The gold's square keeps glittering after the pick up.
        assert!(level.detects_glitter());
        assert!(!level.has_ended());

        level.move_agent(Direction::Up);
        level.move_agent(Direction::Left);
        assert_eq!(level.end_type(), Some(EndType::Win));
        assert_eq!(level.score(), 1000 - 4);
    }

    #[test]
    fn test_shoot_kills_wumpus_in_line() {
        let mut level = classic_level();
        assert!(level.shoot(Direction::Down));
        assert!(!level.has_wumpus());
        assert!(!level.has_arrow());
        assert_eq!(level.score(), -10);
        assert_eq!(
            level.shot(),
            Some(Shot {
                origin: START,
                direction: Direction::Down
            })
        );

        // The dead Wumpus is harmless.
        level.move_agent(Direction::Down);
        assert!(!level.has_ended());

        // Only one arrow.
        assert!(!level.shoot(Direction::Right));
        assert_eq!(level.score(), -11);
    }

    #[test]
    fn test_shoot_can_miss() {
        let mut level = classic_level();
        assert!(level.shoot(Direction::Right));
        assert!(level.has_wumpus());
        assert!(!level.has_arrow());
    }

    #[test]
    fn test_deadly_tracks_wumpus() {
        let mut level = classic_level();
        assert!(level.deadly().contains(pos(1, 0)));
        level.shoot(Direction::Down);
        assert!(!level.deadly().contains(pos(1, 0)));
        assert_eq!(level.deadly(), level.pits());
    }

    #[test]
    fn test_display_lists_layers() {
        let rendered = format!("{}", classic_level());
        for name in ["Agent:", "Wumpus:", "Stench:", "Gold:", "Pit:", "Breeze:", "score: 0"] {
            assert!(rendered.contains(name), "missing {}", name);
        }
    }

    proptest! {
        #[test]
        fn test_generated_levels_are_valid(seed in any::<u64>()) {
            let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
            let level = Level::generate(&mut rng);
            prop_assert!(!level.pits().contains(START));
            prop_assert_ne!(level.wumpus(), START);
            prop_assert_ne!(level.gold(), START);
            prop_assert!(!level.pits().contains(level.wumpus()));
            prop_assert!(!level.pits().contains(level.gold()));
            prop_assert_ne!(level.gold(), level.wumpus());
            prop_assert!(level.pits().size() < MAX_OCCUPIED);
        }

        #[test]
        fn test_generation_is_deterministic(seed in any::<u64>()) {
            let a = Level::generate(&mut rand_pcg::Pcg64::seed_from_u64(seed));
            let b = Level::generate(&mut rand_pcg::Pcg64::seed_from_u64(seed));
            prop_assert_eq!(a, b);
        }
    }
}
