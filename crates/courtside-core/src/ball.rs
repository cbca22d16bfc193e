//! The shared ball.
//!
//! The ball carries possession (at most one holder), pass intent, the
//! cooldowns that keep possession stable across frames, and a queue of
//! impulse requests. The possession core never integrates the ball itself:
//! it queues [`Impulse`]s that the external physics engine drains with
//! [`Ball::take_impulses`] after the tick.
//!
//! # Example
//!
//! ```
//! use courtside_core::agent::AgentId;
//! use courtside_core::ball::Ball;
//! use glam::Vec3;
//!
//! let mut ball = Ball::new(Vec3::new(0.0, 1.0, 0.0));
//! assert!(ball.is_physics_enabled());
//!
//! ball.set_holder(Some(AgentId::new(3)));
//! assert!(ball.is_held());
//! assert!(!ball.is_physics_enabled());
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, SlotId, Team};

/// Regulation ball radius in meters.
pub const DEFAULT_BALL_RADIUS: f32 = 0.12;

/// An impulse request for the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impulse {
    /// Impulse vector in N·s.
    pub vector: Vec3,
    /// World-space application point.
    pub at: Vec3,
}

/// Intended receiver of the ball currently in flight.
///
/// The receiver is keyed by team and slot rather than by roster id so the
/// intent survives roster rebuilds and snapshot restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassTarget {
    /// Receiver's team.
    pub team: Team,
    /// Receiver's slot.
    pub slot: SlotId,
    /// The pass is meant to bounce once before the catch.
    pub is_bounce_pass: bool,
    /// The bounce pass has touched the floor.
    pub has_bounced: bool,
    /// The pass is an inbound from out of bounds.
    pub is_throw_in: bool,
}

impl PassTarget {
    /// A direct chest pass to `team`/`slot`.
    #[must_use]
    pub const fn direct(team: Team, slot: SlotId) -> Self {
        Self {
            team,
            slot,
            is_bounce_pass: false,
            has_bounced: false,
            is_throw_in: false,
        }
    }

    /// A bounce pass to `team`/`slot`.
    #[must_use]
    pub const fn bounce(team: Team, slot: SlotId) -> Self {
        Self {
            is_bounce_pass: true,
            ..Self::direct(team, slot)
        }
    }

    /// An inbound pass to `team`/`slot`.
    #[must_use]
    pub const fn throw_in(team: Team, slot: SlotId) -> Self {
        Self {
            is_throw_in: true,
            ..Self::direct(team, slot)
        }
    }

    /// True if `team`/`slot` identifies the receiver.
    #[must_use]
    pub fn is_receiver(&self, team: Team, slot: SlotId) -> bool {
        self.team == team && self.slot == slot
    }

    /// True while a bounce pass has not yet reached the floor.
    #[must_use]
    pub const fn awaiting_bounce(&self) -> bool {
        self.is_bounce_pass && !self.has_bounced
    }
}

/// The match ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position.
    pub position: Vec3,
    /// Linear velocity in m/s.
    pub velocity: Vec3,
    /// Radius in meters.
    pub radius: f32,
    holder: Option<AgentId>,
    last_holder: Option<AgentId>,
    last_toucher: Option<AgentId>,
    physics_enabled: bool,
    in_flight: bool,
    pass: Option<PassTarget>,
    deflection_cooldown: f32,
    catch_cooldowns: BTreeMap<AgentId, f32>,
    #[serde(skip)]
    impulses: Vec<Impulse>,
}

impl Ball {
    /// A loose, dynamic ball at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius: DEFAULT_BALL_RADIUS,
            holder: None,
            last_holder: None,
            last_toucher: None,
            physics_enabled: true,
            in_flight: false,
            pass: None,
            deflection_cooldown: 0.0,
            catch_cooldowns: BTreeMap::new(),
            impulses: Vec::new(),
        }
    }

    // ========================================================================
    // Possession
    // ========================================================================

    /// True if an agent holds the ball.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.holder.is_some()
    }

    /// Current holder.
    #[must_use]
    pub const fn holder(&self) -> Option<AgentId> {
        self.holder
    }

    /// Most recent holder, kept after release (the passer while a pass is in flight).
    #[must_use]
    pub const fn last_holder(&self) -> Option<AgentId> {
        self.last_holder
    }

    /// Most recent agent to hold or deflect the ball.
    #[must_use]
    pub const fn last_toucher(&self) -> Option<AgentId> {
        self.last_toucher
    }

    /// Sets or clears the holder.
    ///
    /// Taking possession freezes the ball (kinematic, zero velocity) and
    /// resolves any pass in flight. Clearing the holder hands the ball back
    /// to physics.
    pub fn set_holder(&mut self, holder: Option<AgentId>) {
        match holder {
            Some(id) => {
                self.holder = Some(id);
                self.last_holder = Some(id);
                self.last_toucher = Some(id);
                self.physics_enabled = false;
                self.in_flight = false;
                self.pass = None;
                self.velocity = Vec3::ZERO;
            }
            None => {
                self.holder = None;
                self.physics_enabled = true;
            }
        }
    }

    /// Releases the ball with `velocity`, optionally toward a designated receiver.
    pub fn release(&mut self, velocity: Vec3, pass: Option<PassTarget>) {
        self.set_holder(None);
        self.velocity = velocity;
        self.in_flight = true;
        self.pass = pass;
    }

    /// Records a floor contact. Completes the bounce of a bounce pass.
    pub fn register_bounce(&mut self) {
        if let Some(pass) = self.pass.as_mut() {
            pass.has_bounced = true;
        }
    }

    /// Ends the flight phase: the ball is now rolling or bouncing freely.
    pub fn settle(&mut self) {
        self.in_flight = false;
        self.pass = None;
    }

    /// Restores the holder field alone, without touching flight state.
    pub(crate) fn restore_holder(&mut self, holder: Option<AgentId>) {
        self.holder = holder;
        self.physics_enabled = holder.is_none();
    }

    /// Overwrites the deflection cooldown, shrinking it if needed.
    pub(crate) fn restore_deflection_cooldown(&mut self, seconds: f32) {
        self.deflection_cooldown = seconds.max(0.0);
    }

    pub(crate) fn record_touch(&mut self, agent: AgentId) {
        self.last_toucher = Some(agent);
    }

    // ========================================================================
    // Flight
    // ========================================================================

    /// True while the ball is airborne after a pass or shot.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Designated receiver of the current pass.
    #[must_use]
    pub const fn pass_target(&self) -> Option<&PassTarget> {
        self.pass.as_ref()
    }

    /// True if the current pass is a bounce pass.
    #[must_use]
    pub fn is_bounce_pass(&self) -> bool {
        self.pass.is_some_and(|p| p.is_bounce_pass)
    }

    /// True if the current bounce pass already touched the floor.
    #[must_use]
    pub fn has_bounced(&self) -> bool {
        self.pass.is_some_and(|p| p.has_bounced)
    }

    /// Dynamic (simulated) vs. kinematic (carried) ball.
    #[must_use]
    pub const fn is_physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    /// Switches between dynamic and kinematic without changing possession.
    pub fn set_physics_enabled(&mut self, enabled: bool) {
        self.physics_enabled = enabled;
    }

    // ========================================================================
    // Cooldowns
    // ========================================================================

    /// True if `agent` may take possession right now.
    ///
    /// Fails while the ball is held, during a deflection cooldown, or while
    /// the agent's own catch cooldown runs.
    #[must_use]
    pub fn can_be_caught_by(&self, agent: AgentId) -> bool {
        !self.is_held() && self.deflection_cooldown <= 0.0 && self.catch_cooldown(agent) <= 0.0
    }

    /// Blocks every catch for `seconds`.
    pub fn set_deflection_cooldown(&mut self, seconds: f32) {
        self.deflection_cooldown = seconds.max(self.deflection_cooldown);
    }

    /// Remaining deflection cooldown.
    #[must_use]
    pub const fn deflection_cooldown(&self) -> f32 {
        self.deflection_cooldown
    }

    /// Blocks catches by `agent` for `seconds`.
    pub fn set_catch_cooldown(&mut self, agent: AgentId, seconds: f32) {
        if seconds > 0.0 {
            self.catch_cooldowns.insert(agent, seconds);
        } else {
            self.catch_cooldowns.remove(&agent);
        }
    }

    /// Remaining catch cooldown for `agent`.
    #[must_use]
    pub fn catch_cooldown(&self, agent: AgentId) -> f32 {
        self.catch_cooldowns.get(&agent).copied().unwrap_or(0.0)
    }

    /// Advances every cooldown by `dt`, dropping expired ones.
    pub fn tick_cooldowns(&mut self, dt: f32) {
        self.deflection_cooldown = (self.deflection_cooldown - dt).max(0.0);
        self.catch_cooldowns.retain(|_, remaining| {
            *remaining -= dt;
            *remaining > 0.0
        });
    }

    // ========================================================================
    // Impulses
    // ========================================================================

    /// Queues an impulse for the physics engine.
    pub fn apply_impulse(&mut self, vector: Vec3, at: Vec3) {
        self.impulses.push(Impulse { vector, at });
    }

    /// Impulses queued since the last drain.
    #[must_use]
    pub fn pending_impulses(&self) -> &[Impulse] {
        &self.impulses
    }

    /// Drains the impulse queue.
    pub fn take_impulses(&mut self) -> Vec<Impulse> {
        std::mem::take(&mut self.impulses)
    }
}
