//! Body contact between agents.
//!
//! Every unordered pair is checked once, in roster order. Overlapping
//! bodies are pushed apart along the ground plane, and the split of the push
//! is a power contest: the stronger agent yields less ground. An agent whose
//! body center sits clearly higher (jumping, posting up) gets a bonus.
//!
//! Ball carriers use their directional footprint so that a dribbler leaning
//! into a defender occupies more room in front than behind. Everyone else is
//! a plain circle.

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::agent::{Agent, TacticalState};
use crate::config::ContactConfig;
use crate::court::Court;
use crate::geometry::horizontal;

use super::{ResolveContext, Resolver};

/// Separates overlapping agents.
#[derive(Debug, Clone, Default)]
pub struct ContactResolver {
    config: ContactConfig,
}

impl ContactResolver {
    /// Creates a contact resolver with the given tuning.
    #[must_use]
    pub fn new(config: ContactConfig) -> Self {
        Self { config }
    }

    /// The tuning in use.
    #[must_use]
    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    fn radius(&self, agent: &Agent, other: &Agent) -> f32 {
        if agent.tactical == TacticalState::OnBallPlayer {
            agent.footprint_radius_toward(other.position())
        } else {
            self.config.body_collision_radius
        }
    }

    fn skip_pair(a: &Agent, b: &Agent) -> bool {
        if a.tactical.is_jump_ball() || b.tactical.is_jump_ball() {
            return true;
        }
        a.is_teammate_of(b)
            && (a.tactical == TacticalState::OnBallPlayer
                || b.tactical == TacticalState::OnBallPlayer)
    }

    /// Contest powers for the pair, including the height bonus.
    fn contest(&self, a: &Agent, b: &Agent) -> (f32, f32) {
        let diff = a.body.center_height() - b.body.center_height();
        let mut power_a = a.power();
        let mut power_b = b.power();
        if diff > 0.0 {
            power_a += self.config.height_bonus(diff);
        } else {
            power_b += self.config.height_bonus(-diff);
        }
        (power_a, power_b)
    }

    /// Displacements for `a` and `b` if they overlap.
    fn separation(&self, a: &Agent, b: &Agent) -> Option<(Vec3, Vec3)> {
        if Self::skip_pair(a, b) {
            return None;
        }
        let ra = self.radius(a, b);
        let rb = self.radius(b, a);
        let delta = horizontal(a.position() - b.position());
        let dist = delta.length();
        let reach = ra + rb + self.config.separation_margin;
        if dist >= reach {
            return None;
        }

        let push = delta.try_normalize().unwrap_or(Vec2::X);
        let overlap = reach - dist;
        let (power_a, power_b) = self.contest(a, b);
        let total = power_a + power_b;
        let (share_a, share_b) = if total > 0.0 {
            (power_b / total, power_a / total)
        } else {
            (0.5, 0.5)
        };

        let dir = Vec3::new(push.x, 0.0, push.y);
        Some((dir * overlap * share_a, -dir * overlap * share_b))
    }
}

impl Resolver for ContactResolver {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn resolve(&self, court: &mut Court, _ctx: &ResolveContext) -> usize {
        let ids: Vec<_> = court.agent_ids_sorted().collect();
        let mut resolved = 0;

        for (i, &id_a) in ids.iter().enumerate() {
            for &id_b in &ids[i + 1..] {
                let (Some(a), Some(b)) = (court.get(id_a), court.get(id_b)) else {
                    continue;
                };
                let Some((move_a, move_b)) = self.separation(a, b) else {
                    continue;
                };
                trace!(a = %id_a, b = %id_b, ?move_a, ?move_b, "contact resolved");
                if let Some(a) = court.get_mut(id_a) {
                    a.translate(move_a);
                }
                if let Some(b) = court.get_mut(id_b) {
                    b.translate(move_b);
                }
                resolved += 1;
            }
        }
        resolved
    }
}
