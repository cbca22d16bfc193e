//! Builders for test courts.

use glam::Vec3;

use crate::agent::{Agent, AgentId, SlotId, TacticalState, Team};
use crate::ball::Ball;
use crate::court::Court;

/// Standard tick length.
pub const DT: f32 = 1.0 / 60.0;

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A court with a loose ball at `ball` and nobody on it.
pub fn empty_court(ball: Vec3) -> Court {
    Court::new(Ball::new(ball))
}

/// Spawns a default agent.
pub fn spawn(court: &mut Court, team: Team, slot: u8, position: Vec3) -> AgentId {
    court.spawn(Agent::new(team, SlotId::new(slot), position))
}

/// Places the ball exactly between `id`'s palms.
pub fn ball_between_palms(court: &mut Court, id: AgentId) {
    let hands = court.get(id).map(|a| a.hands).expect("agent on court");
    court.ball_mut().position = (hands.left + hands.right) * 0.5;
}

/// Places the ball `offset` away from `id`'s right palm.
pub fn ball_at_right_palm(court: &mut Court, id: AgentId, offset: Vec3) {
    let right = court.get(id).map(|a| a.hands.right).expect("agent on court");
    court.ball_mut().position = right + offset;
}

/// Agents currently in `state`.
pub fn agents_in_state(court: &Court, state: TacticalState) -> Vec<AgentId> {
    court
        .agents_sorted()
        .filter(|a| a.tactical == state)
        .map(Agent::id)
        .collect()
}

/// Five-on-five half court: home guards near the ball, away defenders a step behind.
pub fn five_on_five(ball: Vec3) -> (Court, Vec<AgentId>, Vec<AgentId>) {
    let mut court = empty_court(ball);
    let mut home = Vec::new();
    let mut away = Vec::new();
    for slot in 1..=5u8 {
        let x = f32::from(slot) * 2.0 - 6.0;
        home.push(spawn(&mut court, Team::Home, slot, Vec3::new(x, 0.0, 2.0)));
        away.push(spawn(&mut court, Team::Away, slot, Vec3::new(x, 0.0, 3.2)));
    }
    (court, home, away)
}

/// Ball mass used by [`integrate_ball`], in kg.
pub const BALL_MASS: f32 = 0.6;

/// Minimal stand-in for the external physics engine.
///
/// Applies queued impulses, gravity and a damped floor bounce to a loose
/// ball, and carries a held ball at its holder's holding point.
pub fn integrate_ball(court: &mut Court, dt: f32) {
    let carry = court.holder().map(|h| h.hands.holding_point);
    let ball = court.ball_mut();
    let impulses = ball.take_impulses();
    if let Some(point) = carry {
        ball.position = point;
        return;
    }
    if !ball.is_physics_enabled() {
        return;
    }
    for impulse in impulses {
        ball.velocity += impulse.vector / BALL_MASS;
    }
    ball.velocity.y -= 9.81 * dt;
    ball.position += ball.velocity * dt;
    if ball.position.y < ball.radius {
        ball.position.y = ball.radius;
        ball.velocity.y = -ball.velocity.y * 0.6;
        ball.register_bounce();
    }
}

/// A scramble: four agents around a ball dropped from above head height.
pub fn scramble() -> Court {
    let mut court = empty_court(Vec3::new(0.3, 2.6, 0.2));
    court.ball_mut().velocity = Vec3::new(-0.8, 0.0, 0.4);
    spawn(&mut court, Team::Home, 1, Vec3::new(-0.4, 0.0, 0.0));
    spawn(&mut court, Team::Away, 1, Vec3::new(0.5, 0.0, 0.1));
    spawn(&mut court, Team::Home, 2, Vec3::new(0.0, 0.0, -0.6));
    spawn(&mut court, Team::Away, 2, Vec3::new(0.1, 0.0, 0.7));
    court
}
