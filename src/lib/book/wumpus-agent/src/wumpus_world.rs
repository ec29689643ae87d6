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
use wumpus_world_logic::{Direction, Position, WumpusEngine};

use crate::Environment;

/// What the agent senses on its current square at the start of a turn.
///
/// Glitter is sensed on the gold's square, also after the gold has been picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WumpusPercept {
    pub position: Position,
    pub breeze: bool,
    pub stench: bool,
    pub glitter: bool,
    pub gold_in_cave: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WumpusAction {
    Move(Direction),
    Shoot(Direction),
}

impl std::fmt::Display for WumpusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WumpusAction::Move(direction) => write!(f, "move {}", direction),
            WumpusAction::Shoot(direction) => write!(f, "shoot {}", direction),
        }
    }
}

/// Adapts any [`WumpusEngine`] to the PEAS [`Environment`] so a [`crate::Simulation`] can drive
/// it.
pub struct WumpusWorldEnvironment<_Engine: WumpusEngine> {
    engine: _Engine,
}

impl<_Engine: WumpusEngine> WumpusWorldEnvironment<_Engine> {
    pub fn new(engine: _Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &_Engine {
        &self.engine
    }

    pub fn into_engine(self) -> _Engine {
        self.engine
    }
}

impl<_Engine: WumpusEngine> Environment for WumpusWorldEnvironment<_Engine> {
    type Action = WumpusAction;
    type Percept = WumpusPercept;
    type Score = i32;

    fn percept(&self) -> Self::Percept {
        WumpusPercept {
            position: self.engine.agent_position(),
            breeze: self.engine.detects_breeze(),
            stench: self.engine.detects_stench(),
            glitter: self.engine.detects_glitter(),
            gold_in_cave: self.engine.has_gold(),
        }
    }

    fn execute_action(&mut self, action: &Self::Action) {
        // Bumping a wall or firing a spent arrow is a no-op in the engine.
        match *action {
            WumpusAction::Move(direction) => {
                self.engine.move_agent(direction);
            }
            WumpusAction::Shoot(direction) => {
                self.engine.shoot(direction);
            }
        }
    }

    fn score(&self) -> Self::Score {
        self.engine.score()
    }

    fn is_terminal(&self) -> bool {
        self.engine.has_ended()
    }
}
