#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]

use kinematics::{FreeFall, Gravity, Point, Scale, displacement};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// =============================================================================
// Closed form
// =============================================================================

proptest! {
    #[test]
    fn displacement_matches_formula(
        t in 0.0f64..1000.0,
        g in 0.001f64..1000.0,
        ppm in 0.5f64..64.0,
    ) {
        let d = displacement(t, Gravity::new(g).unwrap(), Scale::new(ppm));
        let expected = 0.5 * g * t * t * ppm;
        prop_assert!(close(d, expected), "d={}, expected={}", d, expected);
    }

    #[test]
    fn displacement_is_deterministic(t in 0.0f64..100.0, g in 0.1f64..100.0) {
        let g = Gravity::new(g).unwrap();
        let a = displacement(t, g, Scale::default());
        let b = displacement(t, g, Scale::default());
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }
}

// =============================================================================
// Monotonicity
// =============================================================================

proptest! {
    #[test]
    fn position_non_decreasing_in_time(
        t1 in 0.0f64..100.0,
        dt in 0.0f64..10.0,
        g in 0.1f64..100.0,
    ) {
        let fall = FreeFall::new(
            Point::new(10.0, 20.0),
            Gravity::new(g).unwrap(),
            Scale::default(),
        );
        let y1 = fall.position_at(t1).y;
        let y2 = fall.position_at(t1 + dt).y;
        prop_assert!(y2 >= y1, "y({})={} > y({})={}", t1, y1, t1 + dt, y2);
    }

    #[test]
    fn stronger_gravity_falls_further(
        t in 0.01f64..50.0,
        g in 0.1f64..100.0,
        extra in 0.1f64..100.0,
    ) {
        let weak = displacement(t, Gravity::new(g).unwrap(), Scale::default());
        let strong = displacement(t, Gravity::new(g + extra).unwrap(), Scale::default());
        prop_assert!(strong > weak);
    }
}

// =============================================================================
// Validation
// =============================================================================

proptest! {
    #[test]
    fn non_positive_gravity_rejected(g in -1e6f64..=0.0) {
        prop_assert!(Gravity::new(g).is_err());
    }

    #[test]
    fn time_to_fall_inverts_displacement(t in 0.0f64..100.0, g in 0.1f64..100.0) {
        let fall = FreeFall::new(Point::origin(), Gravity::new(g).unwrap(), Scale::default());
        let back = fall.time_to_fall(fall.displacement_at(t));
        prop_assert!((back - t).abs() < 1e-6, "t={}, back={}", t, back);
    }
}
