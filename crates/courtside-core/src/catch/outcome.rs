//! Applying the arbitration verdict to the ball.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::agent::AgentId;
use crate::ball::Impulse;
use crate::catch::scenario::Scenario;
use crate::config::{ArbiterConfig, OutcomeConfig};
use crate::court::Court;
use crate::geometry::{direction_between, rotate_about_up};

/// A completed possession transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchEvent {
    /// New holder.
    pub agent: AgentId,
    /// Scenario credited with the catch.
    pub scenario: Scenario,
    /// Ball position at the moment of the catch.
    pub position: Vec3,
}

/// Gives the ball to `agent`.
///
/// Clears pass intent and flight, and switches the ball to kinematic.
pub fn execute_catch(court: &mut Court, agent: AgentId, scenario: Scenario) -> CatchEvent {
    let ball = court.ball_mut();
    ball.set_holder(Some(agent));
    debug!(%agent, %scenario, "ball caught");
    CatchEvent {
        agent,
        scenario,
        position: ball.position,
    }
}

/// Knocks the ball away from `agent`'s nearest hand.
///
/// The deflection leaves the hand→ball direction rotated by a random yaw of
/// at most `max_deflection_angle_deg`, tilted upward. Nothing happens for a
/// kinematic ball or when the hand sits on the ball center.
pub fn execute_fumble<R: Rng + ?Sized>(
    court: &mut Court,
    agent: AgentId,
    config: &OutcomeConfig,
    rng: &mut R,
) -> Option<Impulse> {
    let (ball, fumbler) = court.ball_and_agent_mut(agent);
    let fumbler = fumbler?;
    if !ball.is_physics_enabled() {
        return None;
    }

    let (hand, _) = fumbler.hands.nearest_to(ball.position);
    let (direction, _) = direction_between(hand, ball.position)?;

    let max_angle = config.max_deflection_angle_deg.to_radians();
    let angle = if max_angle > 0.0 {
        rng.gen_range(-max_angle..=max_angle)
    } else {
        0.0
    };
    let mut deflected = rotate_about_up(direction, angle);
    deflected.y = deflected.y.abs() + config.deflection_upward_bias;
    let deflected = deflected.try_normalize()?;

    let impulse = Impulse {
        vector: deflected * config.fumble_impulse,
        at: ball.position,
    };
    ball.apply_impulse(impulse.vector, impulse.at);
    ball.set_deflection_cooldown(config.deflection_cooldown);
    ball.set_catch_cooldown(agent, config.fumble_catch_cooldown);
    ball.record_touch(agent);

    debug!(
        %agent,
        angle_deg = angle.to_degrees(),
        impulse = ?impulse.vector,
        "ball fumbled"
    );
    Some(impulse)
}

/// Pulls the ball toward `agent`'s nearest hand.
///
/// The pull scales with how far the ball is inside `reach_range`: full
/// strength at the edge of reach, fading to nothing at the hand.
pub fn execute_attract(
    court: &mut Court,
    agent: AgentId,
    outcome: &OutcomeConfig,
    arbiter: &ArbiterConfig,
) -> Option<Impulse> {
    let (ball, attractor) = court.ball_and_agent_mut(agent);
    let attractor = attractor?;
    if !ball.is_physics_enabled() {
        return None;
    }

    let (hand, _) = attractor.hands.nearest_to(ball.position);
    let (direction, dist) = direction_between(ball.position, hand)?;
    let strength = outcome.pull_strength * (dist / arbiter.reach_range).clamp(0.0, 1.0);

    let impulse = Impulse {
        vector: direction * strength,
        at: ball.position,
    };
    ball.apply_impulse(impulse.vector, impulse.at);
    trace!(%agent, strength, "ball attracted");
    Some(impulse)
}
