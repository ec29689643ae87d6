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

//! Play whole games of Wumpus World with the knowledge-based policy and summarize how it did.

use rand::SeedableRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;
use wumpus_agent::fingerprint::StateId;
use wumpus_agent::policy::{Policy, PolicyError};
use wumpus_agent::wumpus_world::{WumpusAction, WumpusWorldEnvironment};
use wumpus_agent::{Environment, Rng, Simulation};
use wumpus_world_logic::{BitBoard, EndType, Level, Position, WumpusEngine};

/// Mixed into a game's seed to give the policy its own random stream, independent of the one
/// that generated the level.
pub const POLICY_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Games still running after this many turns are stopped and reported as
    /// [`Outcome::TurnLimit`].
    pub max_turns: usize,
    pub record_trace: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 200,
            record_trace: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Pit,
    Wumpus,
    TurnLimit,
}

impl From<Option<EndType>> for Outcome {
    fn from(end: Option<EndType>) -> Self {
        match end {
            Some(EndType::Win) => Outcome::Win,
            Some(EndType::Pit) => Outcome::Pit,
            Some(EndType::Wumpus) => Outcome::Wumpus,
            None => Outcome::TurnLimit,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Pit => write!(f, "fell into a pit"),
            Outcome::Wumpus => write!(f, "eaten by the Wumpus"),
            Outcome::TurnLimit => write!(f, "turn limit"),
        }
    }
}

/// One turn as the agent saw it: where it stood, what it did, and which squares it had proven
/// safe when it decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub position: Position,
    pub action: WumpusAction,
    pub safe: BitBoard,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTrace {
    pub seed: u64,
    pub level: Level,
    pub turns: Vec<TurnRecord>,
}

impl GameTrace {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub seed: u64,
    pub outcome: Outcome,
    pub score: i32,
    pub turns: usize,

    /// Number of distinct [`StateId`]s the agent acted from.
    pub distinct_states: usize,

    /// The level as it stood when the game ended.
    pub level: Level,
    pub trace: Option<GameTrace>,
}

/// Generate a level from `seed` and let the policy play it to the end.
pub fn play_game(seed: u64, config: &GameConfig) -> Result<GameReport, PolicyError> {
    let level = Level::generate(&mut Rng::seed_from_u64(seed));
    let initial_level = level.clone();
    let policy = Policy::new(Rng::seed_from_u64(seed ^ POLICY_STREAM));
    let mut simulation = Simulation::new(
        WumpusWorldEnvironment::new(level),
        policy,
        config.max_turns,
    );

    let mut seen: FxHashSet<StateId> = FxHashSet::default();
    let mut turns = Vec::new();
    while !simulation.is_finished() {
        let environment = simulation.environment();
        let percept = environment.percept();
        let mut observations = *simulation.agent().observations();
        observations.record_percept(&percept);
        seen.insert(StateId::new(&observations, environment.engine()));

        let Some(action) = simulation.step()? else {
            break;
        };
        if config.record_trace {
            turns.push(TurnRecord {
                turn: simulation.steps(),
                position: percept.position,
                action,
                safe: simulation.agent().knowledge().safe(),
                score: simulation.score(),
            });
        }
    }

    let level = simulation.environment().engine().clone();
    let outcome = Outcome::from(level.end_type());
    let score = level.score();
    info!(
        seed,
        %outcome,
        score,
        turns = simulation.steps(),
        distinct_states = seen.len(),
        "game finished"
    );

    Ok(GameReport {
        seed,
        outcome,
        score,
        turns: simulation.steps(),
        distinct_states: seen.len(),
        level,
        trace: config.record_trace.then(|| GameTrace {
            seed,
            level: initial_level,
            turns,
        }),
    })
}

/// Aggregate results over many games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub wins: usize,
    pub pits: usize,
    pub wumpus: usize,
    pub turn_limits: usize,
    pub total_score: i64,
    pub total_turns: usize,
}

impl Summary {
    pub fn add(&mut self, report: &GameReport) {
        self.games += 1;
        match report.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Pit => self.pits += 1,
            Outcome::Wumpus => self.wumpus += 1,
            Outcome::TurnLimit => self.turn_limits += 1,
        }
        self.total_score += i64::from(report.score);
        self.total_turns += report.turns;
    }

    /// Combine two partial summaries, e.g. from parallel batches.
    pub fn merge(mut self, other: Summary) -> Summary {
        self.games += other.games;
        self.wins += other.wins;
        self.pits += other.pits;
        self.wumpus += other.wumpus;
        self.turn_limits += other.turn_limits;
        self.total_score += other.total_score;
        self.total_turns += other.total_turns;
        self
    }

    pub fn mean_score(&self) -> f64 {
        self.mean(self.total_score as f64)
    }

    pub fn mean_turns(&self) -> f64 {
        self.mean(self.total_turns as f64)
    }

    pub fn win_rate(&self) -> f64 {
        self.mean(self.wins as f64)
    }

    fn mean(&self, total: f64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total / self.games as f64
        }
    }
}

impl<'a> FromIterator<&'a GameReport> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a GameReport>>(reports: I) -> Self {
        let mut summary = Summary::default();
        for report in reports {
            summary.add(report);
        }
        summary
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "games:       {}", self.games)?;
        writeln!(f, "wins:        {}", self.wins)?;
        writeln!(f, "pits:        {}", self.pits)?;
        writeln!(f, "wumpus:      {}", self.wumpus)?;
        writeln!(f, "turn limit:  {}", self.turn_limits)?;
        writeln!(f, "win rate:    {:.3}", self.win_rate())?;
        writeln!(f, "mean score:  {:.2}", self.mean_score())?;
        write!(f, "mean turns:  {:.2}", self.mean_turns())
    }
}
