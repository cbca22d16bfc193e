//! Palm-contact detection.
//!
//! A hand touching the ball is the strongest possession signal and is
//! checked before any scenario arbitration. One agent touching gets the
//! ball when it can absorb the impact; several agents touching at once is a
//! scramble and the ball is knocked loose instead of awarded.

use tracing::{debug, trace};

use crate::agent::{AgentId, TacticalState};
use crate::catch::candidate::{classify_scenario, passes_gate, CatchCandidate};
use crate::catch::scenario::{Scenario, ScenarioCatalog};
use crate::config::PalmConfig;
use crate::court::Court;

/// Result of the palm-contact check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PalmContact {
    /// Nobody is touching; defer to arbitration.
    Untouched,
    /// A single agent secured the ball.
    Catch {
        /// Catching agent.
        agent: AgentId,
        /// Scenario the catch is credited to.
        scenario: Scenario,
    },
    /// The touch knocked the ball loose.
    Fumble {
        /// Agent the deflection is computed from.
        agent: AgentId,
    },
}

impl PalmContact {
    /// True if the contact decided this tick's outcome.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        !matches!(self, Self::Untouched)
    }
}

#[derive(Debug, Clone, Copy)]
struct Touch {
    agent: AgentId,
    both_hands: bool,
}

/// Checks every eligible agent's palms against the ball.
#[must_use]
pub fn detect(court: &Court, catalog: &ScenarioCatalog, config: &PalmConfig) -> PalmContact {
    let ball = court.ball();
    let mut touches: Vec<Touch> = Vec::new();

    for agent in court.agents_sorted() {
        if agent.tactical == TacticalState::OnBallPlayer || !passes_gate(ball, agent) {
            continue;
        }
        let left = agent.hands.left.distance(ball.position) <= config.contact_distance;
        let right = agent.hands.right.distance(ball.position) <= config.contact_distance;
        if left || right {
            touches.push(Touch {
                agent: agent.id(),
                both_hands: left && right,
            });
        }
    }

    let [touch] = touches.as_slice() else {
        return match touches.first() {
            None => PalmContact::Untouched,
            Some(first) => {
                debug!(
                    touching = touches.len(),
                    agent = %first.agent,
                    "simultaneous palm contact, deflecting"
                );
                PalmContact::Fumble { agent: first.agent }
            }
        };
    };

    let Some(agent) = court.get(touch.agent) else {
        return PalmContact::Untouched;
    };
    let scenario = classify_scenario(ball, agent).unwrap_or(Scenario::LooseBall);

    if touch.both_hands {
        debug!(agent = %touch.agent, %scenario, "two-hand palm catch");
        return PalmContact::Catch {
            agent: touch.agent,
            scenario,
        };
    }

    let measured = CatchCandidate::measure(agent, ball, *catalog.get(scenario));
    let threshold = config.absorption_threshold(agent.power(), agent.technique());
    if measured.relative_speed <= threshold {
        debug!(
            agent = %touch.agent,
            %scenario,
            speed = measured.relative_speed,
            threshold,
            "one-hand palm catch absorbed"
        );
        PalmContact::Catch {
            agent: touch.agent,
            scenario,
        }
    } else {
        trace!(
            agent = %touch.agent,
            speed = measured.relative_speed,
            threshold,
            "one-hand palm contact too fast to absorb"
        );
        PalmContact::Fumble { agent: touch.agent }
    }
}
