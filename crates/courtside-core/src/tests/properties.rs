//! Invariants checked over generated courts.

use glam::Vec3;
use proptest::prelude::*;

use crate::agent::{Agent, SlotId, TacticalState, Team};
use crate::court::Court;
use crate::engine::{PossessionEngine, Resolution};

use super::helpers::{agents_in_state, empty_court, integrate_ball, DT};

const TICKS: usize = 90;

fn court_strategy() -> impl Strategy<Value = Court> {
    let agents = prop::collection::vec((-1.5f32..1.5, -1.5f32..1.5, 0.0f32..6.3), 2..8);
    let ball = (-1.0f32..1.0, 0.2f32..2.5, -1.0f32..1.0);
    let velocity = (-8.0f32..8.0, -4.0f32..6.0, -8.0f32..8.0);
    (agents, ball, velocity).prop_map(|(agents, (bx, by, bz), (vx, vy, vz))| {
        let mut court = empty_court(Vec3::new(bx, by, bz));
        court.ball_mut().velocity = Vec3::new(vx, vy, vz);
        for (i, (x, z, yaw)) in agents.into_iter().enumerate() {
            let team = if i % 2 == 0 { Team::Home } else { Team::Away };
            #[allow(clippy::cast_possible_truncation)]
            let slot = SlotId::new((i / 2 + 1) as u8);
            court.spawn(Agent::new(team, slot, Vec3::new(x, 0.0, z)).facing(yaw));
        }
        court
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A catch event is reported exactly when the resolution is a catch, and
    /// at most one outcome queues an impulse per tick.
    #[test]
    fn prop_catch_event_matches_resolution(court in court_strategy(), seed in any::<u64>()) {
        let mut court = court;
        let mut engine = PossessionEngine::new(seed);
        for _ in 0..TICKS {
            let report = engine.update(&mut court, DT);
            let caught = matches!(report.resolution, Resolution::Caught { .. });
            prop_assert_eq!(caught, report.catch.is_some());
            let queued = matches!(
                report.resolution,
                Resolution::Fumbled { impulse: Some(_), .. } | Resolution::Attracted { impulse: Some(_), .. }
            );
            prop_assert_eq!(court.ball().pending_impulses().len(), usize::from(queued));
            if let Some(event) = report.catch {
                prop_assert_eq!(court.ball().holder(), Some(event.agent));
            }
            integrate_ball(&mut court, DT);
        }
    }

    /// The only `OnBallPlayer` is the holder; a loose ball has none.
    #[test]
    fn prop_single_on_ball_player(court in court_strategy(), seed in any::<u64>()) {
        let mut court = court;
        let mut engine = PossessionEngine::new(seed);
        for _ in 0..TICKS {
            engine.update(&mut court, DT);
            let on_ball = agents_in_state(&court, TacticalState::OnBallPlayer);
            match court.ball().holder() {
                Some(holder) => prop_assert_eq!(on_ball, vec![holder]),
                None => prop_assert!(on_ball.is_empty()),
            }
            integrate_ball(&mut court, DT);
        }
    }

    /// Catches clear all dwell; a held ball never accumulates any.
    #[test]
    fn prop_no_dwell_while_held(court in court_strategy(), seed in any::<u64>()) {
        let mut court = court;
        let mut engine = PossessionEngine::new(seed);
        for _ in 0..TICKS {
            engine.update(&mut court, DT);
            if court.ball().is_held() {
                for id in court.agent_ids_sorted() {
                    prop_assert_eq!(engine.dwell().get(id).dwell_time, 0.0);
                }
            }
            integrate_ball(&mut court, DT);
        }
    }

    /// Deflections have the configured strength and never point downward.
    #[test]
    fn prop_deflections_point_up(court in court_strategy(), seed in any::<u64>()) {
        let mut court = court;
        let mut engine = PossessionEngine::new(seed);
        let strength = engine.config().outcome.fumble_impulse;
        for _ in 0..TICKS {
            let report = engine.update(&mut court, DT);
            if let Resolution::Fumbled { impulse: Some(impulse), agent } = report.resolution {
                prop_assert!(impulse.vector.y > 0.0);
                prop_assert!((impulse.vector.length() - strength).abs() < 1e-3);
                prop_assert!(court.ball().catch_cooldown(agent) > 0.0);
                prop_assert!(!court.ball().is_held());
            }
            integrate_ball(&mut court, DT);
        }
    }
}
