/*
 * Copyright 2023 Asim Ihsan
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40
// -  Chapter 7: Logical Agents, section 7.2 The Wumpus World

use num_traits::Zero;

pub mod fingerprint;
pub mod knowledge;
pub mod observations;
pub mod planner;
pub mod policy;
pub mod wumpus_world;

pub type Rng = rand_pcg::Pcg64;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// A knowledge-based agent stores every Perception it has received and reasons over all of
/// them. When that reasoning finds the world in a state it should never be in, the Agent
/// returns an Error instead of guessing.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;
    type Error;

    fn act(&mut self, percept: &Self::Percept) -> Result<Self::Action, Self::Error>;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// Whether the episode is over. No further actions have any effect.
    fn is_terminal(&self) -> bool;
}

/// A Simulation runs a single Agent in an Environment one Performance, Environment, Action,
/// Sensing (PEAS) cycle at a time, until the Environment is terminal or the step limit is hit.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    max_steps: usize,
    steps: usize,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, max_steps: usize) -> Self {
        Self {
            environment,
            agent,
            max_steps,
            steps: 0,
            score: _Environment::Score::zero(),
        }
    }

    /// Run a single cycle. Returns the action taken, or `None` once the Environment is terminal
    /// or the step limit has been reached.
    pub fn step(&mut self) -> Result<Option<_Environment::Action>, _Agent::Error> {
        if self.is_finished() {
            return Ok(None);
        }
        let percept = self.environment.percept();
        let action = self.agent.act(&percept)?;
        self.environment.execute_action(&action);
        self.steps += 1;
        self.score = self.environment.score();
        Ok(Some(action))
    }

    /// Step until finished, then return the final score.
    pub fn run(&mut self) -> Result<_Environment::Score, _Agent::Error> {
        while self.step()?.is_some() {}
        Ok(self.score)
    }

    pub fn is_finished(&self) -> bool {
        self.environment.is_terminal() || self.steps >= self.max_steps
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn agent(&self) -> &_Agent {
        &self.agent
    }
}
