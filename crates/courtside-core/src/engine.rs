//! The per-tick possession engine.
//!
//! [`PossessionEngine::update`] runs the whole pipeline once:
//!
//! 1. decay cooldowns
//! 2. self-heal inconsistent action states
//! 3. update loose-ball dwell
//! 4. palm contact (short-circuits 5 and 6 when it decides)
//! 5. collect, classify and sort candidates
//! 6. arbitrate and apply the outcome
//! 7. run resolvers (roles, then contact, then anything appended)
//! 8. advance the tick
//!
//! # Determinism
//!
//! The engine is single-threaded and takes `&mut Court` for the whole tick.
//! Every "first" rule uses roster order, and the only randomness (the
//! deflection angle) comes from a `ChaCha8Rng` seeded at construction, so the
//! same seed and the same inputs give the same ticks.
//!
//! # Example
//!
//! ```
//! use courtside_core::agent::{Agent, SlotId, Team};
//! use courtside_core::ball::Ball;
//! use courtside_core::court::Court;
//! use courtside_core::engine::{PossessionEngine, Resolution};
//! use glam::Vec3;
//!
//! let mut court = Court::new(Ball::new(Vec3::new(0.1, 0.8, 0.0)));
//! let guard = court.spawn(Agent::new(Team::Home, SlotId::new(1), Vec3::ZERO));
//!
//! let mut engine = PossessionEngine::new(42);
//! let report = engine.update(&mut court, 1.0 / 60.0);
//!
//! assert!(matches!(report.resolution, Resolution::Caught { agent, .. } if agent == guard));
//! assert_eq!(court.ball().holder(), Some(guard));
//! ```

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::agent::AgentId;
use crate::ball::Impulse;
use crate::catch::{
    arbitrate, collect_candidates, execute_attract, execute_catch, execute_fumble, palm,
    sort_by_priority, CatchEvent, DwellTracker, PalmContact, Scenario, Verdict,
};
use crate::config::PossessionConfig;
use crate::court::Court;
use crate::error::ConfigError;
use crate::resolver::{ContactResolver, ResolveContext, Resolver, RoleResolver};

// =============================================================================
// Reports
// =============================================================================

/// The single possession outcome of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Nothing happened to the ball.
    Idle,
    /// An agent took possession.
    Caught {
        /// New holder.
        agent: AgentId,
        /// Scenario credited.
        scenario: Scenario,
        /// Decided by palm contact rather than arbitration.
        via_palm: bool,
    },
    /// The ball was knocked loose.
    Fumbled {
        /// Agent the deflection came off.
        agent: AgentId,
        /// Queued deflection, if the ball was dynamic.
        impulse: Option<Impulse>,
    },
    /// The ball was pulled toward an agent's hands.
    Attracted {
        /// Pulling agent.
        agent: AgentId,
        /// Queued pull, if the ball was dynamic.
        impulse: Option<Impulse>,
    },
}

/// Everything one call to [`PossessionEngine::update`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick that was resolved.
    pub tick: u64,
    /// Possession outcome.
    pub resolution: Resolution,
    /// Catch event, when `resolution` is a catch.
    pub catch: Option<CatchEvent>,
    /// Agent pairs separated by the contact resolver.
    pub contacts_resolved: usize,
    /// Changes reported by each resolver, in run order.
    pub resolver_changes: Vec<(&'static str, usize)>,
}

// =============================================================================
// Listeners
// =============================================================================

/// Observer of possession events.
///
/// Both callbacks default to no-ops so listeners implement only what they
/// need.
pub trait PossessionListener: Send {
    /// An agent caught the ball.
    fn on_catch(&mut self, _event: &CatchEvent) {}

    /// The ball was deflected off `agent`.
    fn on_fumble(&mut self, _agent: AgentId) {}
}

// =============================================================================
// Engine
// =============================================================================

/// Resolves possession once per tick.
pub struct PossessionEngine {
    config: PossessionConfig,
    pub(crate) dwell: DwellTracker,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: u64,
    resolvers: Vec<Box<dyn Resolver>>,
    listeners: Vec<Box<dyn PossessionListener>>,
}

impl fmt::Debug for PossessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PossessionEngine")
            .field("config", &self.config)
            .field("dwell", &self.dwell)
            .field("seed", &self.seed)
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("listeners", &format!("[{} listeners]", self.listeners.len()))
            .finish_non_exhaustive()
    }
}

impl PossessionEngine {
    /// An engine with default tuning.
    ///
    /// # Example
    ///
    /// ```
    /// use courtside_core::engine::PossessionEngine;
    ///
    /// let engine = PossessionEngine::new(7);
    /// assert_eq!(engine.seed(), 7);
    /// assert_eq!(engine.resolver_names(), vec!["roles", "contact"]);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::build(PossessionConfig::default(), seed)
    }

    /// An engine with custom tuning.
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates.
    pub fn with_config(config: PossessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: PossessionConfig, seed: u64) -> Self {
        let contact = ContactResolver::new(config.contact.clone());
        Self {
            config,
            dwell: DwellTracker::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            resolvers: vec![Box::new(RoleResolver::new()), Box::new(contact)],
            listeners: Vec::new(),
        }
    }

    /// Appends a resolver after the built-in ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, listener: Box<dyn PossessionListener>) {
        self.listeners.push(listener);
    }

    /// Names of the registered resolvers, in run order.
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &PossessionConfig {
        &self.config
    }

    /// Seed the deflection RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Dwell side table.
    #[must_use]
    pub fn dwell(&self) -> &DwellTracker {
        &self.dwell
    }

    /// Runs one tick.
    pub fn update(&mut self, court: &mut Court, dt: f32) -> TickReport {
        let tick = court.current_tick();

        court.ball_mut().tick_cooldowns(dt);
        Self::heal_actions(court);
        self.dwell.update(court, dt, &self.config.dwell);

        let (resolution, catch) = self.resolve_possession(court);
        if catch.is_some() {
            self.dwell.clear();
        }
        self.notify(&resolution, catch.as_ref());

        let ctx = ResolveContext { tick, dt };
        let mut resolver_changes = Vec::with_capacity(self.resolvers.len());
        let mut contacts_resolved = 0;
        for resolver in &self.resolvers {
            let changed = resolver.resolve(court, &ctx);
            if resolver.name() == "contact" {
                contacts_resolved += changed;
            }
            resolver_changes.push((resolver.name(), changed));
        }

        court.advance_tick();
        TickReport {
            tick,
            resolution,
            catch,
            contacts_resolved,
            resolver_changes,
        }
    }

    fn heal_actions(court: &mut Court) {
        for agent in court.agents_sorted_mut() {
            if agent.action.is_inconsistent() {
                warn!(
                    agent = %agent.id(),
                    phase = ?agent.action.phase(),
                    "action phase without an action, resetting"
                );
                agent.action.reset();
            }
        }
    }

    fn resolve_possession(&mut self, court: &mut Court) -> (Resolution, Option<CatchEvent>) {
        match palm::detect(court, &self.config.scenarios, &self.config.palm) {
            PalmContact::Catch { agent, scenario } => {
                let event = execute_catch(court, agent, scenario);
                let resolution = Resolution::Caught {
                    agent,
                    scenario,
                    via_palm: true,
                };
                return (resolution, Some(event));
            }
            PalmContact::Fumble { agent } => {
                let impulse = execute_fumble(court, agent, &self.config.outcome, &mut self.rng);
                return (Resolution::Fumbled { agent, impulse }, None);
            }
            PalmContact::Untouched => {}
        }

        let mut candidates = collect_candidates(court, &self.config.scenarios);
        sort_by_priority(&mut candidates);
        let Some(decision) = arbitrate(&candidates, court, &self.dwell, &self.config) else {
            return (Resolution::Idle, None);
        };

        let agent = decision.agent;
        match decision.verdict {
            Verdict::Catch => {
                let event = execute_catch(court, agent, decision.scenario);
                let resolution = Resolution::Caught {
                    agent,
                    scenario: decision.scenario,
                    via_palm: false,
                };
                (resolution, Some(event))
            }
            Verdict::Fumble => {
                let impulse = execute_fumble(court, agent, &self.config.outcome, &mut self.rng);
                (Resolution::Fumbled { agent, impulse }, None)
            }
            Verdict::Attract => {
                let impulse =
                    execute_attract(court, agent, &self.config.outcome, &self.config.arbiter);
                (Resolution::Attracted { agent, impulse }, None)
            }
            Verdict::Miss(_) => (Resolution::Idle, None),
        }
    }

    fn notify(&mut self, resolution: &Resolution, catch: Option<&CatchEvent>) {
        if let Some(event) = catch {
            for listener in &mut self.listeners {
                listener.on_catch(event);
            }
        }
        if let Resolution::Fumbled {
            agent,
            impulse: Some(_),
        } = *resolution
        {
            debug!(%agent, listeners = self.listeners.len(), "notifying fumble");
            for listener in &mut self.listeners {
                listener.on_fumble(agent);
            }
        }
    }
}
