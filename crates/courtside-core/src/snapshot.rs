//! In-memory snapshots of possession state.
//!
//! A snapshot captures what the engine adds on top of the court's own
//! geometry: tactical states, dwell accumulation, cooldowns, the holder, and
//! the position of the deflection RNG stream. Restoring it onto a court with
//! the same roster and geometry reproduces the same subsequent decisions.
//!
//! # Example
//!
//! ```
//! use courtside_core::agent::{Agent, SlotId, Team};
//! use courtside_core::ball::Ball;
//! use courtside_core::court::Court;
//! use courtside_core::engine::PossessionEngine;
//! use courtside_core::snapshot::PossessionSnapshot;
//! use glam::Vec3;
//!
//! let mut court = Court::new(Ball::new(Vec3::new(5.0, 1.0, 5.0)));
//! court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
//! let engine = PossessionEngine::new(9);
//!
//! let json = engine.snapshot(&court).to_json().unwrap();
//! let restored = PossessionSnapshot::from_json(&json).unwrap();
//!
//! let mut replay = PossessionEngine::new(9);
//! replay.restore(&mut court, &restored).unwrap();
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, TacticalState};
use crate::catch::DwellState;
use crate::court::Court;
use crate::engine::PossessionEngine;
use crate::error::SnapshotError;

/// Per-agent possession state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Roster id.
    pub id: AgentId,
    /// Tactical role.
    pub tactical_state: TacticalState,
    /// Accumulated loose-ball overlap.
    pub dwell_time: f32,
    /// Ball wholly inside on the last dwell update.
    pub completely_inside: bool,
    /// Remaining personal catch cooldown.
    pub catch_cooldown: f32,
}

/// Ball possession state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    /// Current holder.
    pub holder: Option<AgentId>,
    /// Remaining global deflection cooldown.
    pub deflection_cooldown: f32,
}

/// Possession state of a whole court at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionSnapshot {
    /// Tick the snapshot was taken before.
    pub tick: u64,
    /// Ball state.
    pub ball: BallSnapshot,
    /// Agents in roster order.
    pub agents: Vec<AgentSnapshot>,
    /// Engine seed.
    pub seed: u64,
    /// Words consumed from the deflection RNG stream.
    pub rng_word_pos: u128,
}

impl PossessionSnapshot {
    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Serialization`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PossessionEngine {
    /// Captures the possession state of `court` and this engine.
    #[must_use]
    pub fn snapshot(&self, court: &Court) -> PossessionSnapshot {
        let ball = court.ball();
        let agents = court
            .agents_sorted()
            .map(|agent| {
                let dwell = self.dwell.get(agent.id());
                AgentSnapshot {
                    id: agent.id(),
                    tactical_state: agent.tactical,
                    dwell_time: dwell.dwell_time,
                    completely_inside: dwell.completely_inside,
                    catch_cooldown: ball.catch_cooldown(agent.id()),
                }
            })
            .collect();

        PossessionSnapshot {
            tick: court.current_tick(),
            ball: BallSnapshot {
                holder: ball.holder(),
                deflection_cooldown: ball.deflection_cooldown(),
            },
            agents,
            seed: self.seed(),
            rng_word_pos: self.rng.get_word_pos(),
        }
    }

    /// Writes `snapshot` back onto `court` and this engine.
    ///
    /// The court must hold exactly the snapshot's roster. Nothing is written
    /// unless the whole snapshot matches.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::RosterMismatch`] when the roster sizes differ
    /// and [`SnapshotError::UnknownAgent`] when an id (agent or holder) is not
    /// on the court.
    pub fn restore(
        &mut self,
        court: &mut Court,
        snapshot: &PossessionSnapshot,
    ) -> Result<(), SnapshotError> {
        if snapshot.agents.len() != court.agent_count() {
            return Err(SnapshotError::RosterMismatch {
                expected: court.agent_count(),
                found: snapshot.agents.len(),
            });
        }
        if let Some(unknown) = snapshot
            .agents
            .iter()
            .map(|a| a.id)
            .chain(snapshot.ball.holder)
            .find(|id| court.get(*id).is_none())
        {
            return Err(SnapshotError::UnknownAgent(unknown));
        }

        self.dwell.clear();
        for saved in &snapshot.agents {
            if let Some(agent) = court.get_mut(saved.id) {
                agent.tactical = saved.tactical_state;
            }
            self.dwell.set(
                saved.id,
                DwellState {
                    dwell_time: saved.dwell_time,
                    completely_inside: saved.completely_inside,
                },
            );
            court.ball_mut().set_catch_cooldown(saved.id, saved.catch_cooldown);
        }

        let ball = court.ball_mut();
        ball.restore_holder(snapshot.ball.holder);
        ball.restore_deflection_cooldown(snapshot.ball.deflection_cooldown);

        self.rng = ChaCha8Rng::seed_from_u64(snapshot.seed);
        self.rng.set_word_pos(snapshot.rng_word_pos);
        self.seed = snapshot.seed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, SlotId, Team};
    use crate::ball::Ball;
    use glam::Vec3;

    fn court() -> Court {
        let mut court = Court::new(Ball::new(Vec3::new(0.3, 1.0, 0.0)));
        court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
        court.spawn(Agent::new(Team::Away, SlotId::new(1), Vec3::new(1.0, 0.0, 0.0)));
        court
    }

    #[test]
    fn snapshot_lists_agents_in_roster_order() {
        let court = court();
        let snap = PossessionEngine::new(1).snapshot(&court);
        let ids: Vec<_> = snap.agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, court.agent_ids_sorted().collect::<Vec<_>>());
        assert_eq!(snap.seed, 1);
    }

    #[test]
    fn restore_writes_states_and_cooldowns() {
        let mut court = court();
        let mut engine = PossessionEngine::new(1);
        let mut snap = engine.snapshot(&court);
        let id = snap.agents[1].id;
        snap.agents[1].tactical_state = TacticalState::OnBallDefender;
        snap.agents[1].dwell_time = 0.25;
        snap.agents[1].catch_cooldown = 0.4;
        snap.ball.deflection_cooldown = 0.1;

        engine.restore(&mut court, &snap).unwrap();
        assert_eq!(court.get(id).unwrap().tactical, TacticalState::OnBallDefender);
        assert!((engine.dwell().get(id).dwell_time - 0.25).abs() < 1e-6);
        assert!((court.ball().catch_cooldown(id) - 0.4).abs() < 1e-6);
        assert!((court.ball().deflection_cooldown() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn restore_rejects_roster_mismatch() {
        let mut court = court();
        let mut engine = PossessionEngine::new(1);
        let mut snap = engine.snapshot(&court);
        snap.agents.pop();
        assert!(matches!(
            engine.restore(&mut court, &snap),
            Err(SnapshotError::RosterMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn restore_rejects_unknown_holder() {
        let mut court = court();
        let mut engine = PossessionEngine::new(1);
        let mut snap = engine.snapshot(&court);
        snap.ball.holder = Some(AgentId::new(99));
        assert!(matches!(
            engine.restore(&mut court, &snap),
            Err(SnapshotError::UnknownAgent(id)) if id == AgentId::new(99)
        ));
        assert!(!court.ball().is_held());
    }

    #[test]
    fn json_roundtrip() {
        let court = court();
        let snap = PossessionEngine::new(5).snapshot(&court);
        let json = snap.to_json().unwrap();
        assert_eq!(PossessionSnapshot::from_json(&json).unwrap(), snap);
        assert!(PossessionSnapshot::from_json("[]").is_err());
    }
}
