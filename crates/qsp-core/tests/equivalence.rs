//! Property-based tests: circuit, numeric and symbolic products agree.

use proptest::prelude::*;
use qsp_core::{
    PhaseSequence, build_circuit, build_polynomial, build_template, build_unitary,
    expected_probability, SIGNAL_SYMBOL,
};

fn arb_phases() -> impl Strategy<Value = PhaseSequence> {
    prop::collection::vec(-std::f64::consts::PI..std::f64::consts::PI, 1..=12)
        .prop_map(|v| PhaseSequence::new(v).unwrap())
}

proptest! {
    #[test]
    fn circuit_unitary_matches_product(phases in arb_phases(), x in -1.0_f64..=1.0) {
        let u = build_unitary(&phases, x);
        let c = build_circuit(&phases, x).unwrap().unitary().unwrap();
        prop_assert!(c.max_deviation(&u) < 1e-9, "deviation {}", c.max_deviation(&u));
    }

    #[test]
    fn polynomial_matches_product(phases in arb_phases(), x in -1.0_f64..=1.0) {
        let symbolic = build_polynomial(&phases).evaluate(x);
        prop_assert!(symbolic.max_deviation(&build_unitary(&phases, x)) < 1e-9);
    }

    #[test]
    fn polynomial_degrees_bounded(phases in arb_phases()) {
        let m = build_polynomial(&phases);
        let d = phases.degree();
        for entry in &m.entries {
            prop_assert!(entry.p.degree().is_none_or(|k| k <= d));
            prop_assert!(entry.q.degree().is_none_or(|k| k < d));
        }
    }

    #[test]
    fn product_is_unitary_in_domain(phases in arb_phases(), x in -1.0_f64..=1.0) {
        prop_assert!(build_unitary(&phases, x).is_unitary());
        let p = expected_probability(&phases, x);
        prop_assert!((-1e-12..=1.0 + 1e-12).contains(&p));
    }

    #[test]
    fn bound_template_matches_circuit(phases in arb_phases(), x in -1.0_f64..=1.0) {
        let bound = build_template(&phases).unwrap().bind(SIGNAL_SYMBOL, x);
        let direct = build_circuit(&phases, x).unwrap();
        let deviation = bound.unitary().unwrap().max_deviation(&direct.unitary().unwrap());
        prop_assert!(deviation < 1e-12);
    }
}
