//! Candidate collection and scenario classification.
//!
//! Every tick the collector walks the roster, drops agents that cannot take
//! the ball right now, tags the rest with exactly one [`Scenario`] and
//! measures the distances the arbiter needs. The list is rebuilt from
//! scratch each tick.

use tracing::trace;

use crate::agent::{ActionKind, Agent, AgentId};
use crate::ball::Ball;
use crate::catch::scenario::{Scenario, ScenarioCatalog, ScenarioConfig};
use crate::court::Court;
use crate::geometry::{distance, horizontal_distance};

/// Eligibility shared by palm contact and candidate collection.
///
/// The ball must be catchable by the agent (unheld, no deflection cooldown,
/// no personal catch cooldown) and the agent must not be recovering from a
/// shot.
#[must_use]
pub fn passes_gate(ball: &Ball, agent: &Agent) -> bool {
    ball.can_be_caught_by(agent.id()) && !agent.action.is_in_shoot_recovery()
}

/// Resolves the single scenario under which `agent` may try for the ball.
///
/// Returns `None` when an unbounced bounce pass is headed to somebody else.
#[must_use]
pub fn classify_scenario(ball: &Ball, agent: &Agent) -> Option<Scenario> {
    if let Some(pass) = ball.pass_target() {
        let is_receiver = pass.is_receiver(agent.team(), agent.slot());
        if pass.awaiting_bounce() && !is_receiver {
            return None;
        }
        if is_receiver {
            return Some(if pass.is_throw_in {
                Scenario::ThrowIn
            } else {
                Scenario::PassTarget
            });
        }
    }
    if agent.tactical.is_jump_ball() {
        return Some(Scenario::JumpBall);
    }
    match agent.action.current() {
        Some(ActionKind::ReboundJump) => Some(Scenario::Rebound),
        Some(ActionKind::InterceptLunge) => Some(Scenario::Interception),
        _ => Some(Scenario::LooseBall),
    }
}

/// One eligible (agent, scenario) pair with its measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchCandidate {
    /// The contending agent.
    pub agent: AgentId,
    /// Resolved scenario.
    pub scenario: Scenario,
    /// Parameters of `scenario`.
    pub config: ScenarioConfig,
    /// Ground-plane distance from the agent's feet to the ball.
    pub distance_to_body: f32,
    /// 3D distance from the catching hand to the ball.
    pub distance_to_hand: f32,
    /// Magnitude of ball velocity relative to the agent.
    pub relative_speed: f32,
}

impl CatchCandidate {
    /// Measures `agent` against `ball` under `config`.
    #[must_use]
    pub fn measure(agent: &Agent, ball: &Ball, config: ScenarioConfig) -> Self {
        let distance_to_hand = match config.scenario {
            Scenario::PassTarget | Scenario::ThrowIn => {
                distance(agent.hands.holding_point, ball.position)
            }
            _ => agent.hands.nearest_to(ball.position).1,
        };
        Self {
            agent: agent.id(),
            scenario: config.scenario,
            config,
            distance_to_body: horizontal_distance(agent.position(), ball.position),
            distance_to_hand,
            relative_speed: (ball.velocity - agent.body.velocity).length(),
        }
    }

    /// Scenario priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.config.priority
    }
}

/// Builds this tick's candidate list in roster order.
#[must_use]
pub fn collect_candidates(court: &Court, catalog: &ScenarioCatalog) -> Vec<CatchCandidate> {
    let ball = court.ball();
    court
        .agents_sorted()
        .filter(|agent| passes_gate(ball, agent))
        .filter_map(|agent| {
            let Some(scenario) = classify_scenario(ball, agent) else {
                trace!(agent = %agent.id(), "excluded: bounce pass for another receiver");
                return None;
            };
            Some(CatchCandidate::measure(agent, ball, *catalog.get(scenario)))
        })
        .collect()
}

/// Orders candidates by descending priority.
///
/// The sort is stable, so equal priorities keep roster order.
pub fn sort_by_priority(candidates: &mut [CatchCandidate]) {
    candidates.sort_by(|a, b| b.priority().cmp(&a.priority()));
}
