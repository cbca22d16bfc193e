//! Tactical role assignment.
//!
//! Roles follow the ball holder:
//!
//! - holder: `OnBallPlayer`
//! - its non-defeated teammates: `OffBallPlayer`
//! - the opponent in the holder's slot (or the nearest one): `OnBallDefender`
//! - every other opponent: `OffBallDefender`
//!
//! Without a holder, a pass in flight only demotes the passer, and a truly
//! loose ball puts everyone in `BallLost`. Jump-ball states are left alone
//! until somebody secures the tip.

use tracing::debug;

use crate::agent::{Agent, AgentId, TacticalState};
use crate::court::Court;
use crate::geometry::horizontal_distance;

use super::{ResolveContext, Resolver};

/// Derives each agent's [`TacticalState`] from the ball holder.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver;

impl RoleResolver {
    /// Creates a role resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn set(agent: &mut Agent, state: TacticalState) -> usize {
        if agent.tactical == state {
            return 0;
        }
        debug!(agent = %agent.id(), from = %agent.tactical, to = %state, "role changed");
        agent.tactical = state;
        1
    }

    /// Opponent guarding the holder: same slot first, else the nearest.
    fn on_ball_defender(court: &Court, holder: &Agent) -> Option<AgentId> {
        let opponents = || {
            court
                .agents_sorted()
                .filter(|a| a.team() != holder.team() && !a.defeated)
        };
        if let Some(matched) = opponents().find(|a| a.slot() == holder.slot()) {
            return Some(matched.id());
        }
        opponents()
            .map(|a| (a.id(), horizontal_distance(a.position(), holder.position())))
            .min_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(id, _)| id)
    }

    fn assign_with_holder(court: &mut Court, holder: AgentId) -> usize {
        let Some(holder_agent) = court.get(holder) else {
            return 0;
        };
        let team = holder_agent.team();
        let defender = Self::on_ball_defender(court, holder_agent);

        let mut changed = 0;
        for agent in court.agents_sorted_mut() {
            let state = if agent.id() == holder {
                TacticalState::OnBallPlayer
            } else if agent.team() == team {
                // defeated teammates keep their state, but never a stale possession
                if agent.defeated && agent.tactical != TacticalState::OnBallPlayer {
                    continue;
                }
                TacticalState::OffBallPlayer
            } else if Some(agent.id()) == defender {
                TacticalState::OnBallDefender
            } else {
                TacticalState::OffBallDefender
            };
            changed += Self::set(agent, state);
        }
        changed
    }
}

impl Resolver for RoleResolver {
    fn name(&self) -> &'static str {
        "roles"
    }

    fn resolve(&self, court: &mut Court, _ctx: &ResolveContext) -> usize {
        let holder = court.ball().holder();
        let jump_ball = court.agents_sorted().any(|a| a.tactical.is_jump_ball());

        let mut changed = 0;
        if jump_ball {
            if holder.is_none() {
                return 0;
            }
            for agent in court.agents_sorted_mut() {
                if agent.tactical.is_jump_ball() {
                    changed += Self::set(agent, TacticalState::BallLost);
                }
            }
        }

        if let Some(holder) = holder {
            return changed + Self::assign_with_holder(court, holder);
        }

        let ball = court.ball();
        if ball.is_in_flight() && ball.pass_target().is_some() {
            let Some(passer) = ball.last_holder() else {
                return changed;
            };
            if let Some(agent) = court.get_mut(passer) {
                changed += Self::set(agent, TacticalState::OffBallPlayer);
            }
            return changed;
        }

        for agent in court.agents_sorted_mut() {
            changed += Self::set(agent, TacticalState::BallLost);
        }
        changed
    }
}
