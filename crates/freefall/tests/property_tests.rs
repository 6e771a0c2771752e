//! Property-based tests for the simulation stepper.

use freefall::sim::{Phase, ShadowPolicy, Simulation};
use freefall::viewport::Canvas;
use kinematics::{Gravity, Scale};
use proptest::prelude::*;

fn canvas_strategy() -> impl Strategy<Value = Canvas> {
    (100.0f64..2000.0, 100.0f64..2000.0).prop_map(|(w, h)| Canvas::fit(w, h, 1500.0))
}

fn policy_strategy() -> impl Strategy<Value = ShadowPolicy> {
    prop_oneof![Just(ShadowPolicy::OnePerFrame), Just(ShadowPolicy::CatchUp)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ball_never_rises_and_never_passes_ground(
        canvas in canvas_strategy(),
        g in 0.5f64..50.0,
        steps in prop::collection::vec(0.0f64..0.2, 1..400),
        policy in policy_strategy(),
    ) {
        let mut sim = Simulation::new(canvas, Scale::default(), policy);
        sim.start(Gravity::new(g).unwrap(), 0.0);
        let mut last_y = sim.ball().position.y;
        for dt in steps {
            sim.step(dt);
            let y = sim.ball().position.y;
            prop_assert!(y >= last_y - 1e-9);
            prop_assert!(sim.ball().bottom() <= sim.ground() + 1e-9);
            last_y = y;
        }
    }

    #[test]
    fn stopped_ball_rests_exactly_on_ground(
        canvas in canvas_strategy(),
        g in 0.5f64..50.0,
        policy in policy_strategy(),
    ) {
        let mut sim = Simulation::new(canvas, Scale::default(), policy);
        sim.start(Gravity::new(g).unwrap(), 0.0);
        sim.step(1_000.0);
        prop_assert_eq!(sim.phase(), Phase::Stopped);
        prop_assert!((sim.ball().bottom() - sim.ground()).abs() < 1e-9);
        let y = sim.ball().position.y;
        sim.step(1.0);
        prop_assert!((sim.ball().position.y - y).abs() < f64::EPSILON);
    }

    #[test]
    fn shadows_are_consecutive_seconds(
        canvas in canvas_strategy(),
        g in 0.2f64..20.0,
        frame_ms in 5.0f64..100.0,
        policy in policy_strategy(),
    ) {
        let mut sim = Simulation::new(canvas, Scale::default(), policy);
        sim.start(Gravity::new(g).unwrap(), 0.0);
        let mut now = 0.0;
        while sim.frame(now).keeps_running() {
            now += frame_ms;
        }
        for (i, shadow) in sim.shadows().iter().enumerate() {
            prop_assert_eq!(usize::try_from(shadow.second).unwrap(), i);
        }
        // Sub-second frames never skip a whole second.
        let whole = sim.ball().time.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = whole as usize + 1;
        prop_assert_eq!(sim.shadows().len(), expected);
    }

    #[test]
    fn shadow_distances_follow_closed_form(
        canvas in canvas_strategy(),
        g in 0.2f64..20.0,
    ) {
        let scale = Scale::default();
        let mut sim = Simulation::new(canvas, scale, ShadowPolicy::CatchUp);
        sim.start(Gravity::new(g).unwrap(), 0.0);
        sim.step(1_000.0);
        for shadow in sim.shadows() {
            let t = f64::from(shadow.second);
            let expected = 0.5 * g * t * t * scale.pixels_per_meter();
            prop_assert!((shadow.distance - expected).abs() < 1e-6 * expected.max(1.0));
        }
    }

    #[test]
    fn invalid_gravity_input_changes_nothing(
        input in prop_oneof![
            (-100.0f64..=0.0).prop_map(|v| v.to_string()),
            "[a-z ]{1,8}".prop_map(String::from),
        ],
    ) {
        let canvas = Canvas::fit(1000.0, 600.0, 1500.0);
        let mut sim = Simulation::new(canvas, Scale::default(), ShadowPolicy::default());
        let before = sim.clone();
        prop_assert!(sim.start_from_input(&input, 0.0).is_err());
        prop_assert_eq!(sim, before);
    }
}
