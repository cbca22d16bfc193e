//! Tunable constants for the possession pipeline.
//!
//! Every threshold lives here so a match can be re-tuned from data without
//! touching code. All distances are meters, speeds m/s, durations seconds.
//! Missing JSON fields take their defaults.
//!
//! # Example
//!
//! ```
//! use courtside_core::config::PossessionConfig;
//!
//! let config = PossessionConfig::from_json(r#"{ "arbiter": { "reach_range": 1.2 } }"#).unwrap();
//! assert!((config.arbiter.reach_range - 1.2).abs() < 1e-6);
//! assert!((config.palm.contact_distance - 0.22).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catch::ScenarioCatalog;
use crate::error::ConfigError;

/// Palm-contact detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalmConfig {
    /// Hand-to-ball-center distance that counts as a touch.
    pub contact_distance: f32,
    /// Relative speed a one-hand touch always absorbs.
    pub absorb_base_speed: f32,
    /// Extra absorbable speed per point of power + technique.
    pub absorb_speed_per_stat: f32,
}

impl Default for PalmConfig {
    fn default() -> Self {
        Self {
            contact_distance: 0.22,
            absorb_base_speed: 4.0,
            absorb_speed_per_stat: 0.05,
        }
    }
}

impl PalmConfig {
    /// Highest relative speed a one-hand touch can absorb for the given ratings.
    #[must_use]
    pub fn absorption_threshold(&self, power: f32, technique: f32) -> f32 {
        self.absorb_base_speed + (power + technique) * self.absorb_speed_per_stat
    }
}

/// Foot-cylinder dwell tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellConfig {
    /// Extra cylinder height above the agent's head.
    pub cylinder_height_margin: f32,
    /// Dwell needed when the ball is wholly inside the cylinder.
    pub required_dwell_inside: f32,
    /// Dwell needed when the ball only touches the cylinder.
    pub required_dwell_touching: f32,
    /// With no opponent this close, an overlapping ball is caught at once.
    pub no_opponent_radius: f32,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            cylinder_height_margin: 0.2,
            required_dwell_inside: 0.1,
            required_dwell_touching: 0.3,
            no_opponent_radius: 2.0,
        }
    }
}

/// Catch arbitration ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Lowest ball height, as a fraction of agent height.
    pub min_height_ratio: f32,
    /// Highest ball height, as a fraction of agent height.
    pub max_height_ratio: f32,
    /// Farthest hand distance that can interact with the ball.
    pub reach_range: f32,
    /// Slack added to body + ball radius for the near-body test.
    pub near_body_offset: f32,
    /// Hand distance that always secures the ball.
    pub capture_distance: f32,
    /// Relative speed at or above which the ball cannot be controlled.
    pub max_controllable_velocity: f32,
    /// Relative speed under which a ball near the body is gathered.
    pub slow_rolling_threshold: f32,
    /// Ball height, as a fraction of agent height, that counts as at the feet.
    pub feet_height_ratio: f32,
    /// Relative speed under which a ball at the feet is trapped.
    pub feet_fast_ball_threshold: f32,
    /// Reach added to the footprint for distance-only scenarios.
    pub body_reach_bonus: f32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            min_height_ratio: 0.0,
            max_height_ratio: 1.4,
            reach_range: 1.0,
            near_body_offset: 0.1,
            capture_distance: 0.35,
            max_controllable_velocity: 15.0,
            slow_rolling_threshold: 3.0,
            feet_height_ratio: 0.3,
            feet_fast_ball_threshold: 6.0,
            body_reach_bonus: 0.3,
        }
    }
}

/// Fumble and attract responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Deflection impulse magnitude.
    pub fumble_impulse: f32,
    /// Largest random yaw applied to a deflection, degrees.
    pub max_deflection_angle_deg: f32,
    /// Added to the absolute vertical component of a deflection.
    pub deflection_upward_bias: f32,
    /// Time nobody can catch after a deflection.
    pub deflection_cooldown: f32,
    /// Time the fumbling agent cannot catch.
    pub fumble_catch_cooldown: f32,
    /// Attract impulse at full reach.
    pub pull_strength: f32,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            fumble_impulse: 2.0,
            max_deflection_angle_deg: 30.0,
            deflection_upward_bias: 0.3,
            deflection_cooldown: 0.2,
            fumble_catch_cooldown: 0.5,
            pull_strength: 0.8,
        }
    }
}

/// Body contact between agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Collision radius of agents not holding the ball.
    pub body_collision_radius: f32,
    /// Gap kept between resolved bodies.
    pub separation_margin: f32,
    /// Body-center height difference that earns a bonus.
    pub height_bonus_min_diff: f32,
    /// Bonus power per meter of height advantage.
    pub height_bonus_per_meter: f32,
    /// Largest height bonus.
    pub height_bonus_cap: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            body_collision_radius: 0.35,
            separation_margin: 0.05,
            height_bonus_min_diff: 0.05,
            height_bonus_per_meter: 100.0,
            height_bonus_cap: 20.0,
        }
    }
}

impl ContactConfig {
    /// Power bonus for a body center `diff` meters above the opponent's.
    #[must_use]
    pub fn height_bonus(&self, diff: f32) -> f32 {
        if diff >= self.height_bonus_min_diff {
            (diff * self.height_bonus_per_meter).min(self.height_bonus_cap)
        } else {
            0.0
        }
    }
}

/// Complete possession configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionConfig {
    /// Palm-contact detection.
    pub palm: PalmConfig,
    /// Dwell tracking.
    pub dwell: DwellConfig,
    /// Arbitration ladder.
    pub arbiter: ArbiterConfig,
    /// Fumble/attract responses.
    pub outcome: OutcomeConfig,
    /// Agent contact.
    pub contact: ContactConfig,
    /// Scenario priorities and thresholds.
    pub scenarios: ScenarioCatalog,
}

/// Widest deflection cone that still has a direction, degrees.
const MAX_DEFLECTION_ANGLE_DEG: f32 = 180.0;

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

impl PossessionConfig {
    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the other
    /// variants for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.palm;
        positive("palm.contact_distance", p.contact_distance)?;
        non_negative("palm.absorb_base_speed", p.absorb_base_speed)?;
        non_negative("palm.absorb_speed_per_stat", p.absorb_speed_per_stat)?;

        let d = &self.dwell;
        non_negative("dwell.cylinder_height_margin", d.cylinder_height_margin)?;
        non_negative("dwell.required_dwell_inside", d.required_dwell_inside)?;
        non_negative("dwell.required_dwell_touching", d.required_dwell_touching)?;
        non_negative("dwell.no_opponent_radius", d.no_opponent_radius)?;
        if d.required_dwell_inside > d.required_dwell_touching {
            warn!(
                inside = d.required_dwell_inside,
                touching = d.required_dwell_touching,
                "fully enclosed balls need longer dwell than touching ones"
            );
        }

        let a = &self.arbiter;
        non_negative("arbiter.min_height_ratio", a.min_height_ratio)?;
        non_negative("arbiter.max_height_ratio", a.max_height_ratio)?;
        if a.min_height_ratio > a.max_height_ratio {
            return Err(ConfigError::InvertedRange {
                field: "arbiter.height_ratio",
                min: a.min_height_ratio,
                max: a.max_height_ratio,
            });
        }
        positive("arbiter.reach_range", a.reach_range)?;
        non_negative("arbiter.near_body_offset", a.near_body_offset)?;
        positive("arbiter.capture_distance", a.capture_distance)?;
        positive("arbiter.max_controllable_velocity", a.max_controllable_velocity)?;
        non_negative("arbiter.slow_rolling_threshold", a.slow_rolling_threshold)?;
        non_negative("arbiter.feet_height_ratio", a.feet_height_ratio)?;
        non_negative("arbiter.feet_fast_ball_threshold", a.feet_fast_ball_threshold)?;
        non_negative("arbiter.body_reach_bonus", a.body_reach_bonus)?;

        let o = &self.outcome;
        non_negative("outcome.fumble_impulse", o.fumble_impulse)?;
        non_negative("outcome.max_deflection_angle_deg", o.max_deflection_angle_deg)?;
        if o.max_deflection_angle_deg > MAX_DEFLECTION_ANGLE_DEG {
            return Err(ConfigError::TooLarge {
                field: "outcome.max_deflection_angle_deg",
                value: o.max_deflection_angle_deg,
                max: MAX_DEFLECTION_ANGLE_DEG,
            });
        }
        non_negative("outcome.deflection_upward_bias", o.deflection_upward_bias)?;
        non_negative("outcome.deflection_cooldown", o.deflection_cooldown)?;
        non_negative("outcome.fumble_catch_cooldown", o.fumble_catch_cooldown)?;
        non_negative("outcome.pull_strength", o.pull_strength)?;

        let c = &self.contact;
        positive("contact.body_collision_radius", c.body_collision_radius)?;
        non_negative("contact.separation_margin", c.separation_margin)?;
        non_negative("contact.height_bonus_min_diff", c.height_bonus_min_diff)?;
        non_negative("contact.height_bonus_per_meter", c.height_bonus_per_meter)?;
        non_negative("contact.height_bonus_cap", c.height_bonus_cap)?;

        for (index, entry) in self.scenarios.iter().enumerate() {
            if entry.scenario.index() != index {
                return Err(ConfigError::CatalogOrder {
                    index,
                    found: entry.scenario,
                });
            }
            non_negative("scenarios.body_distance_threshold", entry.body_distance_threshold)?;
            non_negative("scenarios.hand_distance_threshold", entry.hand_distance_threshold)?;
        }
        Ok(())
    }
}
