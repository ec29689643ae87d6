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

//! Choose one move per turn from what the knowledge base can prove.
//!
//! While the gold is still in the cave the agent explores: it walks over safe squares towards the
//! best safe square it has not stood on yet. Once the gold is picked up it walks back to the start
//! over safe squares. When neither is possible it moves in a random direction.

use std::cmp::Reverse;

use rand::SeedableRng;
use tracing::{debug, warn};
use wumpus_world_logic::{BitBoard, Direction, Position, START};

use crate::knowledge::KnowledgeBase;
use crate::observations::ObservationStore;
use crate::planner;
use crate::wumpus_world::{WumpusAction, WumpusPercept};
use crate::{Agent, Rng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gold still in the cave, look for it.
    Explore,

    /// Gold picked up, head home.
    Return,
}

/// The knowledge base contradicts the position the agent is in. Each variant carries the safe
/// squares it was reasoning over.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("no safe path from {from} back to the start, safe squares:\n{safe}")]
    NoSafeReturn { from: Position, safe: BitBoard },

    #[error("asked to return home while already on the start square, safe squares:\n{safe}")]
    AlreadyHome { safe: BitBoard },

    #[error("empty path to frontier square {target}, safe squares:\n{safe}")]
    EmptyPathToFrontier { target: Position, safe: BitBoard },
}

pub struct Policy {
    observations: ObservationStore,
    rng: Rng,
    mode: Mode,
}

impl Policy {
    pub fn new(rng: Rng) -> Self {
        Self {
            observations: ObservationStore::new(),
            rng,
            mode: Mode::Explore,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(Rng::seed_from_u64(seed))
    }

    pub fn observations(&self) -> &ObservationStore {
        &self.observations
    }

    pub fn observe(&mut self, percept: &WumpusPercept) {
        self.observations.record_percept(percept);
    }

    pub fn knowledge(&self) -> KnowledgeBase {
        KnowledgeBase::from_observations(&self.observations)
    }

    /// Mode used by the most recent call to [`Policy::choose`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Pick the direction to move from `position`.
    ///
    /// Only reads the observations recorded so far, so the percept for `position` should be
    /// observed first.
    pub fn choose(
        &mut self,
        position: Position,
        gold_in_cave: bool,
    ) -> Result<Direction, PolicyError> {
        let knowledge = self.knowledge();
        let safe = knowledge.safe();
        if gold_in_cave {
            self.mode = Mode::Explore;
            self.explore(position, knowledge.frontier(&self.observations), safe)
        } else {
            self.mode = Mode::Return;
            Self::return_home(position, safe)
        }
    }

    fn explore(
        &mut self,
        position: Position,
        frontier: BitBoard,
        safe: BitBoard,
    ) -> Result<Direction, PolicyError> {
        let Some(&target) = rank_frontier(position, frontier, safe).first() else {
            return Ok(self.fallback(position, safe));
        };
        match planner::directions(position, target, safe) {
            None => Ok(self.fallback(position, safe)),
            Some(path) => {
                let &direction = path
                    .first()
                    .ok_or(PolicyError::EmptyPathToFrontier { target, safe })?;
                debug!(
                    mode = ?Mode::Explore,
                    %position,
                    %target,
                    %direction,
                    frontier = frontier.size(),
                    "policy decision"
                );
                Ok(direction)
            }
        }
    }

    fn return_home(position: Position, safe: BitBoard) -> Result<Direction, PolicyError> {
        let path = planner::directions(position, START, safe).ok_or(PolicyError::NoSafeReturn {
            from: position,
            safe,
        })?;
        let &direction = path.first().ok_or(PolicyError::AlreadyHome { safe })?;
        debug!(
            mode = ?Mode::Return,
            %position,
            %direction,
            steps = path.len(),
            "policy decision"
        );
        Ok(direction)
    }

    fn fallback(&mut self, position: Position, safe: BitBoard) -> Direction {
        let direction = Direction::random(&mut self.rng);
        warn!(
            %position,
            %direction,
            safe = safe.word(),
            "no reachable safe frontier, moving at random"
        );
        direction
    }
}

impl Agent for Policy {
    type Action = WumpusAction;
    type Percept = WumpusPercept;
    type Error = PolicyError;

    fn act(&mut self, percept: &Self::Percept) -> Result<Self::Action, Self::Error> {
        self.observe(percept);
        let direction = self.choose(percept.position, percept.gold_in_cave)?;
        Ok(WumpusAction::Move(direction))
    }
}

/// Order frontier squares from most to least preferred.
///
/// Closest to `current` over `safe` first, unreachable squares last. Ties prefer the border of
/// the grid over the four inner squares, then squares further from the start, where a square
/// the start cannot reach counts as furthest. Remaining ties keep row-major order.
pub fn rank_frontier(current: Position, frontier: BitBoard, safe: BitBoard) -> Vec<Position> {
    let mut ranked = frontier.positions();
    ranked.sort_by_key(|&candidate| {
        (
            planner::distance(current, candidate, safe).unwrap_or(usize::MAX),
            Reverse(candidate.ring()),
            Reverse(planner::distance(START, candidate, safe).unwrap_or(usize::MAX)),
        )
    });
    ranked
}
