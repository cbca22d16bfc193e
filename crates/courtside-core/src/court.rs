//! The court: roster plus ball, the shared state of one match.
//!
//! The court is the explicit simulation context handed to every possession
//! stage. Stages borrow it for the duration of a call and keep no aliases
//! between ticks.
//!
//! # Determinism
//!
//! Agents live in a `BTreeMap` keyed by [`AgentId`]. Ids are assigned
//! monotonically, so iteration is always spawn order, and spawn order is the
//! tie-break for every "first" rule in the pipeline.
//!
//! # Example
//!
//! ```
//! use courtside_core::agent::{Agent, SlotId, Team};
//! use courtside_core::ball::Ball;
//! use courtside_core::court::Court;
//! use glam::Vec3;
//!
//! let mut court = Court::new(Ball::new(Vec3::new(0.0, 1.0, 0.0)));
//! let a = court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
//! let b = court.spawn(Agent::new(Team::Away, SlotId::new(1), Vec3::X));
//!
//! let ids: Vec<_> = court.agent_ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, SlotId, Team};
use crate::ball::Ball;
use crate::geometry::horizontal_distance;

/// Roster and ball for one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    /// Monotonically increasing id counter.
    next_id: u64,
    /// Roster in id order.
    agents: BTreeMap<AgentId, Agent>,
    ball: Ball,
    tick: u64,
}

impl Court {
    /// An empty court with `ball`.
    #[must_use]
    pub fn new(ball: Ball) -> Self {
        Self {
            next_id: 0,
            agents: BTreeMap::new(),
            ball,
            tick: 0,
        }
    }

    /// Adds an agent to the roster and returns its id.
    pub fn spawn(&mut self, mut agent: Agent) -> AgentId {
        let id = AgentId::new(self.next_id);
        self.next_id += 1;
        agent.assign_id(id);
        self.agents.insert(id, agent);
        id
    }

    /// Removes an agent. A removed holder drops the ball.
    pub fn despawn(&mut self, id: AgentId) -> Option<Agent> {
        if self.ball.holder() == Some(id) {
            self.ball.set_holder(None);
        }
        self.agents.remove(&id)
    }

    /// Looks up an agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Looks up an agent mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Agent ids in roster order.
    pub fn agent_ids_sorted(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    /// Agents in roster order.
    pub fn agents_sorted(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Mutable agents in roster order.
    pub fn agents_sorted_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.agents.values_mut()
    }

    /// Number of agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// True if nobody is on the roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Upper bound on agent indices, for sizing side tables.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_bound(&self) -> usize {
        self.next_id as usize
    }

    /// The ball.
    #[must_use]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// The ball, mutably.
    #[must_use]
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    /// Split borrow of the ball and one agent.
    #[must_use]
    pub fn ball_and_agent_mut(&mut self, id: AgentId) -> (&mut Ball, Option<&mut Agent>) {
        (&mut self.ball, self.agents.get_mut(&id))
    }

    /// The agent holding the ball.
    #[must_use]
    pub fn holder(&self) -> Option<&Agent> {
        self.ball.holder().and_then(|id| self.agents.get(&id))
    }

    /// First agent of `team` in `slot`, in roster order.
    #[must_use]
    pub fn find_by_slot(&self, team: Team, slot: SlotId) -> Option<&Agent> {
        self.agents
            .values()
            .find(|a| a.team() == team && a.slot() == slot)
    }

    /// True if any active opponent of `agent` stands within `radius` on the ground plane.
    #[must_use]
    pub fn opponent_within(&self, agent: &Agent, radius: f32) -> bool {
        self.agents.values().any(|other| {
            other.team() != agent.team()
                && !other.defeated
                && horizontal_distance(other.position(), agent.position()) <= radius
        })
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
