//! Loose-ball dwell tracking.
//!
//! Each agent owns a vertical cylinder standing on its feet: the radius is
//! the footprint radius toward the ball and the height is the agent's height
//! plus a margin. While a loose ball overlaps the cylinder the agent
//! accumulates dwell time; the arbiter uses it to award contested loose
//! balls only after the overlap has persisted, which keeps possession from
//! flickering between neighbours.

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId};
use crate::ball::Ball;
use crate::config::DwellConfig;
use crate::court::Court;
use crate::geometry::horizontal_distance;

/// How the ball's extent relates to an agent's cylinder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlap {
    /// No part of the ball is inside.
    Outside,
    /// Partly inside.
    Touching,
    /// Wholly inside, vertically and horizontally.
    Inside,
}

impl Overlap {
    /// True unless [`Overlap::Outside`].
    #[must_use]
    pub const fn overlaps(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Classifies the ball against `agent`'s dwell cylinder.
#[must_use]
pub fn classify(agent: &Agent, ball: &Ball, height_margin: f32) -> Overlap {
    let radius = agent.footprint_radius_toward(ball.position);
    let bottom = agent.position().y;
    let top = bottom + agent.body.height + height_margin;

    let ball_low = ball.position.y - ball.radius;
    let ball_high = ball.position.y + ball.radius;
    if ball_high < bottom || ball_low > top {
        return Overlap::Outside;
    }

    let dist = horizontal_distance(agent.position(), ball.position);
    if dist - ball.radius > radius {
        return Overlap::Outside;
    }

    let vertically_inside = ball_low >= bottom && ball_high <= top;
    let horizontally_inside = dist + ball.radius <= radius;
    if vertically_inside && horizontally_inside {
        Overlap::Inside
    } else {
        Overlap::Touching
    }
}

/// Accumulated overlap for one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DwellState {
    /// Seconds of continuous overlap.
    pub dwell_time: f32,
    /// The ball was wholly inside on the last update.
    pub completely_inside: bool,
}

/// Side table of [`DwellState`] indexed by [`AgentId::index`].
#[derive(Debug, Clone, Default)]
pub struct DwellTracker {
    states: Vec<DwellState>,
}

impl DwellTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `agent`; zero if never tracked.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> DwellState {
        self.states.get(agent.index()).copied().unwrap_or_default()
    }

    /// Overwrites the state for `agent`.
    pub fn set(&mut self, agent: AgentId, state: DwellState) {
        let index = agent.index();
        if index >= self.states.len() {
            self.states.resize(index + 1, DwellState::default());
        }
        self.states[index] = state;
    }

    /// Zeroes every state.
    pub fn clear(&mut self) {
        self.states.fill(DwellState::default());
    }

    /// Advances every agent's dwell by `dt`.
    ///
    /// A held ball clears the whole table.
    pub fn update(&mut self, court: &Court, dt: f32, config: &DwellConfig) {
        if court.ball().is_held() {
            self.clear();
            return;
        }
        if self.states.len() < court.index_bound() {
            self.states.resize(court.index_bound(), DwellState::default());
        }

        let ball = court.ball();
        for agent in court.agents_sorted() {
            let overlap = classify(agent, ball, config.cylinder_height_margin);
            let state = &mut self.states[agent.id().index()];
            if overlap.overlaps() {
                state.dwell_time += dt;
                state.completely_inside = overlap == Overlap::Inside;
            } else {
                *state = DwellState::default();
            }
        }
    }
}
