//! Catch arbitration.
//!
//! Candidates are evaluated in priority order and the first one that
//! produces anything other than a miss decides the tick. Planned receptions
//! (passes, throw-ins, interceptions) are judged on distance alone; every
//! other scenario goes through the height window, the loose-ball dwell gate
//! and the kinematic ladder.

use tracing::{debug, trace};

use crate::agent::{Agent, AgentId};
use crate::ball::Ball;
use crate::catch::candidate::CatchCandidate;
use crate::catch::dwell::{self, DwellTracker, Overlap};
use crate::catch::scenario::Scenario;
use crate::config::{ArbiterConfig, PossessionConfig};
use crate::court::Court;

/// Why a candidate did not get the ball.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The agent is no longer on the court.
    Missing,
    /// Too far for a planned reception.
    OutOfRange,
    /// Ball above or below the height window.
    Height,
    /// Ball does not overlap the agent's dwell cylinder.
    NoOverlap,
    /// Contested loose ball without enough dwell.
    Dwell,
    /// Ball beyond arm's reach.
    Reach,
    /// Kinematic ball not close enough to secure.
    NotSecured,
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Keep looking.
    Miss(MissReason),
    /// The agent takes possession.
    Catch,
    /// The ball glances off the agent.
    Fumble,
    /// The agent draws the ball toward its hands.
    Attract,
}

/// The candidate that decided the tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Deciding agent.
    pub agent: AgentId,
    /// Scenario under which it was evaluated.
    pub scenario: Scenario,
    /// What happens to the ball. Never a miss.
    pub verdict: Verdict,
}

/// Evaluates a single candidate.
#[must_use]
pub fn evaluate(
    candidate: &CatchCandidate,
    court: &Court,
    dwell: &DwellTracker,
    config: &PossessionConfig,
) -> Verdict {
    let Some(agent) = court.get(candidate.agent) else {
        return Verdict::Miss(MissReason::Missing);
    };
    let ball = court.ball();

    if candidate.config.skip_velocity_check {
        return evaluate_by_distance(candidate, agent, ball, &config.arbiter);
    }

    let a = &config.arbiter;
    let height = agent.body.height;
    let ball_height = ball.position.y - agent.position().y;
    if !candidate.config.skip_height_check
        && !(height * a.min_height_ratio..=height * a.max_height_ratio).contains(&ball_height)
    {
        return Verdict::Miss(MissReason::Height);
    }

    if candidate.scenario == Scenario::LooseBall {
        let overlap = dwell::classify(agent, ball, config.dwell.cylinder_height_margin);
        if overlap == Overlap::Outside {
            return Verdict::Miss(MissReason::NoOverlap);
        }
        if !court.opponent_within(agent, config.dwell.no_opponent_radius) {
            return Verdict::Catch;
        }
        let state = dwell.get(agent.id());
        let required = if state.completely_inside {
            config.dwell.required_dwell_inside
        } else {
            config.dwell.required_dwell_touching
        };
        if state.dwell_time < required {
            return Verdict::Miss(MissReason::Dwell);
        }
    }

    ladder(candidate, agent, ball, a)
}

fn evaluate_by_distance(
    candidate: &CatchCandidate,
    agent: &Agent,
    ball: &Ball,
    config: &ArbiterConfig,
) -> Verdict {
    let body_reach = agent.footprint_radius_toward(ball.position) + config.body_reach_bonus;
    let body_limit = body_reach.max(candidate.config.body_distance_threshold);
    if candidate.distance_to_body < body_limit
        || candidate.distance_to_hand < candidate.config.hand_distance_threshold
    {
        Verdict::Catch
    } else {
        Verdict::Miss(MissReason::OutOfRange)
    }
}

fn ladder(candidate: &CatchCandidate, agent: &Agent, ball: &Ball, config: &ArbiterConfig) -> Verdict {
    if candidate.distance_to_hand > config.reach_range {
        return Verdict::Miss(MissReason::Reach);
    }

    let body_radius = agent.footprint_radius_toward(ball.position);
    let near_body =
        candidate.distance_to_body < body_radius + ball.radius + config.near_body_offset;
    let in_hand = candidate.distance_to_hand < config.capture_distance;

    if !ball.is_physics_enabled() {
        return if near_body || in_hand {
            Verdict::Catch
        } else {
            Verdict::Miss(MissReason::NotSecured)
        };
    }

    let speed = candidate.relative_speed;
    if speed >= config.max_controllable_velocity {
        return Verdict::Fumble;
    }
    if in_hand {
        return Verdict::Catch;
    }
    if speed < config.slow_rolling_threshold && near_body {
        return Verdict::Catch;
    }
    let ball_height = ball.position.y - agent.position().y;
    if near_body && ball_height < config.feet_height_ratio * agent.body.height {
        return if speed < config.feet_fast_ball_threshold {
            Verdict::Catch
        } else {
            Verdict::Fumble
        };
    }
    Verdict::Attract
}

/// Walks `candidates` (already sorted by priority) until one decides the tick.
#[must_use]
pub fn arbitrate(
    candidates: &[CatchCandidate],
    court: &Court,
    dwell: &DwellTracker,
    config: &PossessionConfig,
) -> Option<Decision> {
    for candidate in candidates {
        match evaluate(candidate, court, dwell, config) {
            Verdict::Miss(reason) => {
                trace!(agent = %candidate.agent, scenario = %candidate.scenario, ?reason, "miss");
            }
            verdict => {
                debug!(
                    agent = %candidate.agent,
                    scenario = %candidate.scenario,
                    ?verdict,
                    speed = candidate.relative_speed,
                    hand = candidate.distance_to_hand,
                    "arbitration decided"
                );
                return Some(Decision {
                    agent: candidate.agent,
                    scenario: candidate.scenario,
                    verdict,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Footprint, SlotId, Team};
    use crate::ball::PassTarget;
    use crate::catch::candidate::{collect_candidates, sort_by_priority};
    use crate::catch::dwell::DwellState;
    use crate::catch::scenario::ScenarioCatalog;
    use glam::Vec3;

    fn candidate_for(court: &Court, id: AgentId, config: &PossessionConfig) -> CatchCandidate {
        collect_candidates(court, &config.scenarios)
            .into_iter()
            .find(|c| c.agent == id)
            .unwrap()
    }

    fn lone_agent(ball: Vec3) -> (Court, AgentId) {
        let mut court = Court::new(Ball::new(ball));
        let mut agent = Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO);
        agent.footprint = Footprint::circle(0.4);
        let id = court.spawn(agent);
        (court, id)
    }

    #[test]
    fn enclosed_loose_ball_without_opponent_is_caught() {
        let (court, id) = lone_agent(Vec3::new(0.1, 1.0, 0.0));
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(evaluate(&candidate, &court, &DwellTracker::new(), &config), Verdict::Catch);
    }

    #[test]
    fn loose_ball_outside_cylinder_misses() {
        let (court, id) = lone_agent(Vec3::new(0.9, 1.0, 0.0));
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(
            evaluate(&candidate, &court, &DwellTracker::new(), &config),
            Verdict::Miss(MissReason::NoOverlap)
        );
    }

    #[test]
    fn contested_loose_ball_needs_dwell() {
        let (mut court, id) = lone_agent(Vec3::new(0.1, 1.0, 0.0));
        court.spawn(Agent::new(Team::Away, SlotId::new(1), Vec3::new(1.5, 0.0, 0.0)));
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);

        let mut dwell = DwellTracker::new();
        dwell.set(id, DwellState { dwell_time: 0.05, completely_inside: true });
        assert_eq!(
            evaluate(&candidate, &court, &dwell, &config),
            Verdict::Miss(MissReason::Dwell)
        );

        dwell.set(id, DwellState { dwell_time: 0.1, completely_inside: true });
        assert_eq!(evaluate(&candidate, &court, &dwell, &config), Verdict::Catch);
    }

    #[test]
    fn uncontested_loose_ball_is_caught_even_when_fast() {
        let (mut court, id) = lone_agent(Vec3::new(0.1, 1.0, 0.0));
        court.ball_mut().velocity = Vec3::new(20.0, 0.0, 0.0);
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(evaluate(&candidate, &court, &DwellTracker::new(), &config), Verdict::Catch);
    }

    #[test]
    fn ball_above_height_window_misses() {
        let (court, id) = lone_agent(Vec3::new(0.1, 3.0, 0.0));
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(
            evaluate(&candidate, &court, &DwellTracker::new(), &config),
            Verdict::Miss(MissReason::Height)
        );
    }

    #[test]
    fn uncontrollable_speed_fumbles() {
        let (mut court, id) = lone_agent(Vec3::new(0.1, 1.0, 0.0));
        court.get_mut(id).unwrap().action =
            crate::agent::ActionState::started(crate::agent::ActionKind::ReboundJump);
        court.ball_mut().velocity = Vec3::new(20.0, 0.0, 0.0);
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(evaluate(&candidate, &court, &DwellTracker::new(), &config), Verdict::Fumble);
    }

    #[test]
    fn rebound_ladder_attracts_ball_in_reach() {
        let (mut court, id) = lone_agent(Vec3::new(0.0, 1.6, 0.9));
        court.get_mut(id).unwrap().action =
            crate::agent::ActionState::started(crate::agent::ActionKind::ReboundJump);
        court.ball_mut().velocity = Vec3::new(0.0, -5.0, 0.0);
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(candidate.scenario, Scenario::Rebound);
        assert_eq!(evaluate(&candidate, &court, &DwellTracker::new(), &config), Verdict::Attract);
    }

    #[test]
    fn kinematic_ball_needs_body_or_hand() {
        let (mut court, id) = lone_agent(Vec3::new(0.0, 1.6, 0.9));
        court.get_mut(id).unwrap().action =
            crate::agent::ActionState::started(crate::agent::ActionKind::ReboundJump);
        court.ball_mut().set_physics_enabled(false);
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(
            evaluate(&candidate, &court, &DwellTracker::new(), &config),
            Verdict::Miss(MissReason::NotSecured)
        );
    }

    #[test]
    fn pass_target_decided_by_distance() {
        let (mut court, id) = lone_agent(Vec3::new(0.0, 1.2, 0.6));
        court.ball_mut().release(
            Vec3::new(0.0, 0.0, -30.0),
            Some(PassTarget::direct(Team::Home, SlotId::new(1))),
        );
        let config = PossessionConfig::default();
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(candidate.scenario, Scenario::PassTarget);
        // far beyond controllable speed, yet caught
        assert_eq!(evaluate(&candidate, &court, &DwellTracker::new(), &config), Verdict::Catch);

        court.ball_mut().position = Vec3::new(0.0, 1.2, 3.0);
        let candidate = candidate_for(&court, id, &config);
        assert_eq!(
            evaluate(&candidate, &court, &DwellTracker::new(), &config),
            Verdict::Miss(MissReason::OutOfRange)
        );
    }

    #[test]
    fn higher_priority_candidate_decides_first() {
        let mut court = Court::new(Ball::new(Vec3::new(0.0, 1.2, 0.5)));
        let loose = court.spawn(Agent::new(Team::Away, SlotId::new(1), Vec3::ZERO));
        let receiver = court.spawn(Agent::new(Team::Home, SlotId::new(2), Vec3::new(0.0, 0.0, 1.0)));
        court
            .ball_mut()
            .release(Vec3::ZERO, Some(PassTarget::direct(Team::Home, SlotId::new(2))));

        let config = PossessionConfig::default();
        let mut candidates = collect_candidates(&court, &ScenarioCatalog::default());
        sort_by_priority(&mut candidates);
        let decision = arbitrate(&candidates, &court, &DwellTracker::new(), &config).unwrap();
        assert_eq!(decision.agent, receiver);
        assert_eq!(decision.scenario, Scenario::PassTarget);
        assert_ne!(decision.agent, loose);
    }

    fn rebounder_beside_loose_ball(speed: f32) -> (Court, AgentId, AgentId) {
        let mut court = Court::new(Ball::new(Vec3::new(0.1, 1.0, 0.0)));
        let mut rebounder = Agent::new(Team::Home, SlotId::new(4), Vec3::new(0.0, 0.0, -0.9));
        rebounder.action = crate::agent::ActionState::started(crate::agent::ActionKind::ReboundJump);
        let rebounder = court.spawn(rebounder);
        let loose = court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
        court.ball_mut().velocity = Vec3::new(0.0, 0.0, -speed);
        (court, rebounder, loose)
    }

    #[test]
    fn first_non_miss_ends_the_search() {
        let config = PossessionConfig::default();
        let dwell = DwellTracker::new();
        for (speed, expected) in [(20.0, Verdict::Fumble), (5.0, Verdict::Attract)] {
            let (court, rebounder, loose) = rebounder_beside_loose_ball(speed);
            let mut candidates = collect_candidates(&court, &config.scenarios);
            sort_by_priority(&mut candidates);
            let verdicts: Vec<_> = candidates
                .iter()
                .map(|c| (c.agent, c.scenario, evaluate(c, &court, &dwell, &config)))
                .collect();
            assert_eq!(
                verdicts,
                vec![
                    (rebounder, Scenario::Rebound, expected),
                    (loose, Scenario::LooseBall, Verdict::Catch),
                ]
            );

            let decision = arbitrate(&candidates, &court, &dwell, &config).unwrap();
            assert_eq!(decision.agent, rebounder);
            assert_eq!(decision.verdict, expected);
        }
    }

    #[test]
    fn no_candidates_no_decision() {
        let (court, _) = lone_agent(Vec3::new(10.0, 1.0, 10.0));
        let config = PossessionConfig::default();
        let mut candidates = collect_candidates(&court, &config.scenarios);
        sort_by_priority(&mut candidates);
        assert!(arbitrate(&candidates, &court, &DwellTracker::new(), &config).is_none());
    }
}
