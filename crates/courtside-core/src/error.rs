//! Error types for the fallible entry points.
//!
//! The per-tick path never fails; only configuration loading and snapshot
//! restore can reject their input.

use thiserror::Error;

use crate::agent::AgentId;

/// Rejected possession configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive and finite is not.
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Its value.
        value: f32,
    },

    /// A value that must be finite and not negative is not.
    #[error("{field} must be finite and not negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Its value.
        value: f32,
    },

    /// A value exceeds its hard upper limit.
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        /// Offending field.
        field: &'static str,
        /// Its value.
        value: f32,
        /// Largest accepted value.
        max: f32,
    },

    /// A lower bound exceeds its upper bound.
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        /// Offending field pair.
        field: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Scenario entries are not stored under their own scenario.
    #[error("scenario catalog entry {index} configures {found}")]
    CatalogOrder {
        /// Slot in the catalog.
        index: usize,
        /// Scenario found in that slot.
        found: crate::catch::Scenario,
    },

    /// The JSON document could not be parsed.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejected possession snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot names an agent that is not on the court.
    #[error("snapshot references unknown agent {0}")]
    UnknownAgent(AgentId),

    /// The snapshot and the court disagree on roster size.
    #[error("roster mismatch: snapshot has {found} agents, court has {expected}")]
    RosterMismatch {
        /// Agents on the court.
        expected: usize,
        /// Agents in the snapshot.
        found: usize,
    },

    /// The JSON document could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::NonPositive {
            field: "arbiter.reach_range",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "arbiter.reach_range must be positive and finite, got -1");

        let err = SnapshotError::UnknownAgent(AgentId::new(9));
        assert_eq!(err.to_string(), "snapshot references unknown agent 9");
    }

    #[test]
    fn parse_errors_convert() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
