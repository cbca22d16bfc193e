//! Agents (players) that contend for the ball.
//!
//! - [`AgentId`]: roster identifier, also the tie-break order
//! - [`Team`] and [`SlotId`]: stable keys for team membership and court position
//! - [`TacticalState`]: role derived each tick from the ball holder
//! - [`Agent`]: the complete per-player container
//!
//! # Example
//!
//! ```
//! use courtside_core::agent::{Agent, SlotId, TacticalState, Team};
//! use glam::Vec3;
//!
//! let agent = Agent::new(Team::Home, SlotId::new(1), Vec3::new(2.0, 0.0, 3.0));
//! assert_eq!(agent.team(), Team::Home);
//! assert_eq!(agent.tactical, TacticalState::BallLost);
//! ```

pub mod components;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    ActionKind, ActionPhase, ActionState, AgentStats, BodyState, Footprint, Hands, DEFAULT_STAT,
};

/// Roster identifier for an agent.
///
/// Ids are assigned monotonically by [`Court::spawn`](crate::court::Court::spawn),
/// so ascending id order is spawn order. Every tie-break in the possession
/// pipeline ("first toucher", "first qualifying candidate") uses this order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Dense index for side tables.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team membership.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Home side.
    Home,
    /// Away side.
    Away,
}

impl Team {
    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Away => write!(f, "Away"),
        }
    }
}

/// Positional slot (point guard = 1, shooting guard = 2, ...).
///
/// Slots are stable for the whole match and shared across teams, which is
/// how an on-ball defender is matched to the ball holder and how a pass
/// target is identified without holding a reference to the receiver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(u8);

impl SlotId {
    /// Creates a slot id.
    #[must_use]
    pub const fn new(slot: u8) -> Self {
        Self(slot)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tactical role of an agent relative to the ball.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticalState {
    /// Nobody controls the ball.
    #[default]
    BallLost,
    /// This agent holds the ball.
    OnBallPlayer,
    /// A teammate holds the ball.
    OffBallPlayer,
    /// Guarding the ball holder.
    OnBallDefender,
    /// Defending away from the ball.
    OffBallDefender,
    /// Contesting the jump ball.
    JumpBallJumper,
    /// Lined up around the jump ball.
    JumpBallOther,
}

impl TacticalState {
    /// True for both jump-ball states.
    #[must_use]
    pub const fn is_jump_ball(self) -> bool {
        matches!(self, Self::JumpBallJumper | Self::JumpBallOther)
    }
}

impl fmt::Display for TacticalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BallLost => "BallLost",
            Self::OnBallPlayer => "OnBallPlayer",
            Self::OffBallPlayer => "OffBallPlayer",
            Self::OnBallDefender => "OnBallDefender",
            Self::OffBallDefender => "OffBallDefender",
            Self::JumpBallJumper => "JumpBallJumper",
            Self::JumpBallOther => "JumpBallOther",
        };
        f.write_str(name)
    }
}

/// A player on the court.
///
/// Identity fields (`id`, `team`, `slot`) are fixed at spawn; everything else
/// is public data owned by the surrounding simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    team: Team,
    slot: SlotId,
    /// Kinematic state.
    pub body: BodyState,
    /// Hand and carry points.
    pub hands: Hands,
    /// Horizontal footprint.
    pub footprint: Footprint,
    /// Current action from the AI layer.
    pub action: ActionState,
    /// Ratings, if the roster provides them.
    pub stats: Option<AgentStats>,
    /// Role derived by role assignment.
    pub tactical: TacticalState,
    /// Knocked out of play. Defeated teammates keep their state during role assignment.
    pub defeated: bool,
}

impl Agent {
    /// Creates an agent standing at `position` with the default body and hand rig.
    ///
    /// The id is a placeholder until the agent is spawned on a court.
    #[must_use]
    pub fn new(team: Team, slot: SlotId, position: Vec3) -> Self {
        let body = BodyState {
            position,
            ..BodyState::default()
        };
        Self {
            id: AgentId::new(u64::MAX),
            team,
            slot,
            body,
            hands: Hands::rig_for(&body),
            footprint: Footprint::default(),
            action: ActionState::default(),
            stats: None,
            tactical: TacticalState::default(),
            defeated: false,
        }
    }

    /// Sets the facing and re-rigs the hands.
    #[must_use]
    pub fn facing(mut self, yaw: f32) -> Self {
        self.body.yaw = yaw;
        self.hands = Hands::rig_for(&self.body);
        self
    }

    /// Sets the standing height and re-rigs the hands.
    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        self.body.height = height;
        self.hands = Hands::rig_for(&self.body);
        self
    }

    /// Sets the ratings.
    #[must_use]
    pub fn with_stats(mut self, power: f32, technique: f32) -> Self {
        self.stats = Some(AgentStats { power, technique });
        self
    }

    /// Sets the initial tactical state.
    #[must_use]
    pub fn with_state(mut self, state: TacticalState) -> Self {
        self.tactical = state;
        self
    }

    pub(crate) fn assign_id(&mut self, id: AgentId) {
        self.id = id;
    }

    /// Roster id.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Team membership.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Positional slot.
    #[must_use]
    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    /// Ground-contact position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Power rating, falling back to [`DEFAULT_STAT`].
    #[must_use]
    pub fn power(&self) -> f32 {
        self.stats.map_or(DEFAULT_STAT, |s| s.power)
    }

    /// Technique rating, falling back to [`DEFAULT_STAT`].
    #[must_use]
    pub fn technique(&self) -> f32 {
        self.stats.map_or(DEFAULT_STAT, |s| s.technique)
    }

    /// True if both agents play for the same team.
    #[must_use]
    pub fn is_teammate_of(&self, other: &Agent) -> bool {
        self.team == other.team
    }

    /// Footprint radius toward a world-space point.
    #[must_use]
    pub fn footprint_radius_toward(&self, target: Vec3) -> f32 {
        self.footprint
            .radius_toward(self.body.position, self.body.forward(), target)
    }

    /// Moves the body and everything attached to it.
    pub fn translate(&mut self, delta: Vec3) {
        self.body.position += delta;
        self.hands.translate(delta);
    }

    /// Teleports the agent, carrying the hand rig along.
    pub fn place_at(&mut self, position: Vec3) {
        self.translate(position - self.body.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_ordering_and_index() {
        let mut ids = vec![AgentId::new(3), AgentId::new(1), AgentId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![AgentId::new(1), AgentId::new(2), AgentId::new(3)]);
        assert_eq!(AgentId::new(7).index(), 7);
    }

    #[test]
    fn team_opponent_is_involution() {
        assert_eq!(Team::Home.opponent(), Team::Away);
        assert_eq!(Team::Home.opponent().opponent(), Team::Home);
    }

    #[test]
    fn jump_ball_states() {
        assert!(TacticalState::JumpBallJumper.is_jump_ball());
        assert!(TacticalState::JumpBallOther.is_jump_ball());
        assert!(!TacticalState::OnBallPlayer.is_jump_ball());
    }

    #[test]
    fn missing_stats_fall_back_to_default() {
        let agent = Agent::new(Team::Away, SlotId::new(2), Vec3::ZERO);
        assert_eq!(agent.power(), DEFAULT_STAT);
        assert_eq!(agent.technique(), DEFAULT_STAT);
        let rated = agent.with_stats(80.0, 30.0);
        assert_eq!(rated.power(), 80.0);
        assert_eq!(rated.technique(), 30.0);
    }

    #[test]
    fn translate_moves_hands_with_body() {
        let mut agent = Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO);
        let before = agent.hands;
        agent.translate(Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(agent.position(), Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(agent.hands.left, before.left + Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(agent.hands.holding_point, before.holding_point + Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn serialization_roundtrip() {
        let agent = Agent::new(Team::Home, SlotId::new(4), Vec3::new(1.0, 0.0, 1.0))
            .with_stats(70.0, 60.0)
            .with_state(TacticalState::OffBallPlayer);
        let json = serde_json::to_string(&agent).unwrap();
        let restored: Agent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, agent);
    }
}
