//! # Courtside Core
//!
//! Per-tick ball possession arbitration for Courtside.
//!
//! Once per simulation tick this crate decides which of many moving agents
//! may take the single shared ball, whether the attempt is a clean catch, a
//! deflection or a soft pull toward the hands, and how the result flows into
//! every agent's tactical role. It consumes geometry from the court and
//! produces possession changes plus impulse requests for an external physics
//! engine; it never integrates rigid bodies itself.
//!
//! ## Architecture
//!
//! - **Court**: roster and ball, the explicit simulation context
//! - **Catch pipeline**: dwell, palm contact, candidates, arbiter, outcome
//! - **Resolvers**: role assignment and body contact after the outcome
//! - **Engine**: runs the stages in order, owns the RNG and the dwell table
//!
//! ## Usage
//!
//! ```
//! use courtside_core::agent::{Agent, SlotId, Team};
//! use courtside_core::ball::Ball;
//! use courtside_core::court::Court;
//! use courtside_core::engine::PossessionEngine;
//! use glam::Vec3;
//!
//! let mut court = Court::new(Ball::new(Vec3::new(6.0, 1.0, 0.0)));
//! court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
//! court.spawn(Agent::new(Team::Away, SlotId::new(1), Vec3::new(1.0, 0.0, 0.0)));
//!
//! let mut engine = PossessionEngine::new(42);
//! for _ in 0..10 {
//!     engine.update(&mut court, 1.0 / 60.0);
//!     for impulse in court.ball_mut().take_impulses() {
//!         // hand to the physics engine
//!         let _ = impulse;
//!     }
//! }
//! assert_eq!(court.current_tick(), 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agent;
pub mod ball;
pub mod catch;
pub mod config;
pub mod court;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod resolver;
pub mod snapshot;

pub use agent::{Agent, AgentId, SlotId, TacticalState, Team};
pub use ball::{Ball, Impulse, PassTarget};
pub use catch::{CatchEvent, Scenario};
pub use config::PossessionConfig;
pub use court::Court;
pub use engine::{PossessionEngine, PossessionListener, Resolution, TickReport};
pub use error::{ConfigError, SnapshotError};
pub use snapshot::PossessionSnapshot;

#[cfg(test)]
mod tests;
