//! The catch pipeline: who gets the ball this tick, and how.
//!
//! Stages run in this order every tick:
//!
//! 1. [`dwell`]: accumulate loose-ball overlap per agent
//! 2. [`palm`]: immediate hand contact, short-circuits everything below
//! 3. [`candidate`]: gate, classify and measure every agent
//! 4. [`arbiter`]: walk candidates by priority until one decides
//! 5. [`outcome`]: apply the catch, fumble or attract
//!
//! [`scenario`] holds the static per-scenario parameters the stages share.

pub mod arbiter;
pub mod candidate;
pub mod dwell;
pub mod outcome;
pub mod palm;
pub mod scenario;

pub use arbiter::{arbitrate, evaluate, Decision, MissReason, Verdict};
pub use candidate::{
    classify_scenario, collect_candidates, passes_gate, sort_by_priority, CatchCandidate,
};
pub use dwell::{DwellState, DwellTracker, Overlap};
pub use outcome::{execute_attract, execute_catch, execute_fumble, CatchEvent};
pub use palm::PalmContact;
pub use scenario::{Scenario, ScenarioCatalog, ScenarioConfig};
