//! Component structs that make up an [`Agent`](super::Agent).
//!
//! Components are plain data written by the movement, animation and AI
//! layers. The possession core reads them every tick and only writes the
//! body position (contact resolution) and the action state (self-heal).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{horizontal, yaw_forward};

/// Value used for any stat the agent does not carry.
pub const DEFAULT_STAT: f32 = 50.0;

// =============================================================================
// Body
// =============================================================================

/// Kinematic body state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Ground-contact position (feet), world space.
    pub position: Vec3,
    /// Linear velocity in m/s.
    pub velocity: Vec3,
    /// Facing angle about the up axis, radians. Yaw 0 faces +z.
    pub yaw: f32,
    /// Standing height in meters.
    pub height: f32,
    /// Vertical offset applied by the current animation (jumps, crouches).
    pub motion_offset_y: f32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            height: 1.9,
            motion_offset_y: 0.0,
        }
    }
}

impl BodyState {
    /// Height of the body center above the world origin, including animation offset.
    #[must_use]
    pub fn center_height(&self) -> f32 {
        self.position.y + self.motion_offset_y + self.height * 0.5
    }

    /// Ground-plane facing vector.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        yaw_forward(self.yaw)
    }
}

// =============================================================================
// Footprint
// =============================================================================

/// Direction-dependent horizontal footprint.
///
/// The radius blends from `side` toward `front` or `back` with the squared
/// cosine between the facing and the queried direction, so the outline is a
/// smooth egg shape that is widest ahead of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Radius straight ahead.
    pub front: f32,
    /// Radius to either side.
    pub side: f32,
    /// Radius straight behind.
    pub back: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            front: 0.45,
            side: 0.35,
            back: 0.3,
        }
    }
}

impl Footprint {
    /// Uniform circular footprint.
    #[must_use]
    pub const fn circle(radius: f32) -> Self {
        Self {
            front: radius,
            side: radius,
            back: radius,
        }
    }

    /// Radius of the footprint in the ground-plane `direction`, for an agent facing `forward`.
    ///
    /// A zero-length direction yields the largest radius.
    #[must_use]
    pub fn radius_in_direction(&self, forward: Vec2, direction: Vec2) -> f32 {
        let Some(direction) = direction.try_normalize() else {
            return self.front.max(self.side).max(self.back);
        };
        let cos = forward.normalize_or_zero().dot(direction);
        let weight = cos * cos;
        let toward = if cos >= 0.0 { self.front } else { self.back };
        self.side + (toward - self.side) * weight
    }

    /// Radius toward a world-space point, from an agent at `origin` facing `forward`.
    #[must_use]
    pub fn radius_toward(&self, origin: Vec3, forward: Vec2, target: Vec3) -> f32 {
        self.radius_in_direction(forward, horizontal(target - origin))
    }
}

// =============================================================================
// Hands
// =============================================================================

/// World-space hand and carry points, written by the animation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hands {
    /// Left palm center.
    pub left: Vec3,
    /// Right palm center.
    pub right: Vec3,
    /// Point where a held ball sits; also the catch point for planned receptions.
    pub holding_point: Vec3,
}

impl Hands {
    /// Default rig for a body: palms in front of the chest, shoulder-width apart.
    #[must_use]
    pub fn rig_for(body: &BodyState) -> Self {
        let forward = body.forward();
        let forward3 = Vec3::new(forward.x, 0.0, forward.y);
        let right3 = Vec3::new(forward.y, 0.0, -forward.x);
        let chest = body.position + Vec3::Y * (body.height * 0.6 + body.motion_offset_y);
        let front = chest + forward3 * 0.3;
        Self {
            left: front - right3 * 0.2,
            right: front + right3 * 0.2,
            holding_point: front,
        }
    }

    /// The hand closest to `point`, with its distance. Ties go to the right hand.
    #[must_use]
    pub fn nearest_to(&self, point: Vec3) -> (Vec3, f32) {
        let right = self.right.distance(point);
        let left = self.left.distance(point);
        if left < right {
            (self.left, left)
        } else {
            (self.right, right)
        }
    }

    /// Shifts every point by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.left += delta;
        self.right += delta;
        self.holding_point += delta;
    }
}

// =============================================================================
// Stats
// =============================================================================

/// Physical rating used by absorption and contact contests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Strength in body contests, nominally 0..=100.
    pub power: f32,
    /// Ball-handling skill, nominally 0..=100.
    pub technique: f32,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            power: DEFAULT_STAT,
            technique: DEFAULT_STAT,
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Action currently driven by the AI layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Shooting at the basket.
    Shoot,
    /// Passing to a teammate.
    Pass,
    /// Dribbling.
    Dribble,
    /// Jumping for a rebound.
    ReboundJump,
    /// Lunging to cut a passing lane.
    InterceptLunge,
    /// Tipping at a jump ball.
    JumpBallTip,
    /// Contesting a shot.
    Block,
}

/// Timing phase of the current action.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionPhase {
    /// No action in progress.
    #[default]
    Idle,
    /// Wind-up frames.
    Startup,
    /// Frames where the action has effect.
    Active,
    /// Cool-down frames after the action.
    Recovery,
}

/// Current action and phase of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    current: Option<ActionKind>,
    phase: ActionPhase,
}

impl ActionState {
    /// Starts `kind` in its startup phase.
    #[must_use]
    pub const fn started(kind: ActionKind) -> Self {
        Self {
            current: Some(kind),
            phase: ActionPhase::Startup,
        }
    }

    /// Builds an arbitrary state. Used by the AI layer when it restores
    /// animation-driven phases, and by tests.
    #[must_use]
    pub const fn from_parts(current: Option<ActionKind>, phase: ActionPhase) -> Self {
        Self { current, phase }
    }

    /// The current action, if any.
    #[must_use]
    pub const fn current(&self) -> Option<ActionKind> {
        self.current
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> ActionPhase {
        self.phase
    }

    /// Moves the current action to `phase`.
    pub fn set_phase(&mut self, phase: ActionPhase) {
        self.phase = phase;
    }

    /// True while recovering from a shot.
    #[must_use]
    pub fn is_in_shoot_recovery(&self) -> bool {
        self.current == Some(ActionKind::Shoot) && self.phase == ActionPhase::Recovery
    }

    /// True when a phase is running without any action behind it.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        self.current.is_none() && self.phase != ActionPhase::Idle
    }

    /// Clears the action and returns to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
