//! Catch scenarios and their static parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an agent is eligible to catch the ball this tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Designated receiver of a pass.
    PassTarget,
    /// Designated receiver of an inbound pass.
    ThrowIn,
    /// Agent in a jump-ball state.
    JumpBall,
    /// Agent lunging into a passing lane.
    Interception,
    /// Agent jumping for a rebound.
    Rebound,
    /// Anyone else near a free ball.
    LooseBall,
}

impl Scenario {
    /// Number of scenarios.
    pub const COUNT: usize = 6;

    /// Every scenario, in catalog order.
    #[must_use]
    pub const fn all() -> [Scenario; Self::COUNT] {
        [
            Self::PassTarget,
            Self::ThrowIn,
            Self::JumpBall,
            Self::Interception,
            Self::Rebound,
            Self::LooseBall,
        ]
    }

    /// Position in the catalog.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PassTarget => 0,
            Self::ThrowIn => 1,
            Self::JumpBall => 2,
            Self::Interception => 3,
            Self::Rebound => 4,
            Self::LooseBall => 5,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PassTarget => "PassTarget",
            Self::ThrowIn => "ThrowIn",
            Self::JumpBall => "JumpBall",
            Self::Interception => "Interception",
            Self::Rebound => "Rebound",
            Self::LooseBall => "LooseBall",
        };
        f.write_str(name)
    }
}

/// Arbitration parameters for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Which scenario this entry configures.
    pub scenario: Scenario,
    /// Higher is evaluated first.
    pub priority: i32,
    /// Skip the ball-height window. Distance-only scenarios never apply it.
    pub skip_height_check: bool,
    /// Decide by distance alone, without the velocity ladder.
    pub skip_velocity_check: bool,
    /// Body distance that always qualifies (distance-only scenarios).
    pub body_distance_threshold: f32,
    /// Hand distance that always qualifies (distance-only scenarios).
    pub hand_distance_threshold: f32,
}

impl ScenarioConfig {
    /// Built-in parameters for `scenario`.
    #[must_use]
    pub const fn default_for(scenario: Scenario) -> Self {
        let (priority, skip_height_check, skip_velocity_check, body, hand) = match scenario {
            Scenario::PassTarget => (100, true, true, 1.0, 0.8),
            Scenario::ThrowIn => (90, true, true, 1.0, 0.8),
            Scenario::JumpBall => (80, true, false, 0.0, 0.0),
            Scenario::Interception => (70, true, true, 0.6, 0.5),
            Scenario::Rebound => (60, true, false, 0.0, 0.0),
            Scenario::LooseBall => (10, false, false, 0.0, 0.0),
        };
        Self {
            scenario,
            priority,
            skip_height_check,
            skip_velocity_check,
            body_distance_threshold: body,
            hand_distance_threshold: hand,
        }
    }
}

/// Parameters for every scenario, indexed by [`Scenario::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    entries: [ScenarioConfig; Scenario::COUNT],
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            entries: Scenario::all().map(ScenarioConfig::default_for),
        }
    }
}

impl ScenarioCatalog {
    /// Parameters for `scenario`.
    #[must_use]
    pub fn get(&self, scenario: Scenario) -> &ScenarioConfig {
        &self.entries[scenario.index()]
    }

    /// Replaces the parameters for `config.scenario`.
    pub fn set(&mut self, config: ScenarioConfig) {
        self.entries[config.scenario.index()] = config;
    }

    /// All entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioConfig> {
        self.entries.iter()
    }

    /// True if every entry sits at the index of its own scenario.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.scenario.index() == i)
    }
}
