//! Post-arbitration resolvers.
//!
//! Once the tick's possession outcome is applied, resolvers bring the rest
//! of the court in line with it. They run in registration order on the same
//! `&mut Court`, so each one sees the writes of the ones before it.
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same court
//! - Resolvers MUST iterate the roster in id order
//! - Resolvers never change the ball holder
//!
//! # Available Resolvers
//!
//! - [`RoleResolver`]: derives every agent's tactical state from the holder
//! - [`ContactResolver`]: pushes overlapping agents apart by a power contest

mod contact;
mod roles;

pub use contact::ContactResolver;
pub use roles::RoleResolver;

use crate::court::Court;

/// Per-tick data handed to every resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveContext {
    /// Tick being resolved.
    pub tick: u64,
    /// Tick duration in seconds.
    pub dt: f32,
}

/// A stage that runs after the possession outcome.
///
/// # Example
///
/// ```
/// use courtside_core::court::Court;
/// use courtside_core::resolver::{ResolveContext, Resolver};
///
/// struct CountAgents;
///
/// impl Resolver for CountAgents {
///     fn name(&self) -> &'static str {
///         "count"
///     }
///
///     fn resolve(&self, court: &mut Court, _ctx: &ResolveContext) -> usize {
///         court.agent_count()
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name for reports and logs.
    fn name(&self) -> &'static str;

    /// Applies the stage and returns how many agents it changed.
    fn resolve(&self, court: &mut Court, ctx: &ResolveContext) -> usize;
}
