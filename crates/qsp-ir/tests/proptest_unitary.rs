//! Property-based tests for single-qubit circuit unitaries.
//!
//! Random rotation sequences must stay unitary, and binding a symbolic
//! template must give the same matrix as building with constants.

use qsp_ir::{Circuit, ParameterExpression, QubitId, Unitary2x2};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum RotationOp {
    Rx(f64),
    Ry(f64),
    Rz(f64),
    H,
    S,
}

impl RotationOp {
    fn apply(&self, circuit: &mut Circuit) {
        let q = QubitId(0);
        let _ = match *self {
            RotationOp::Rx(t) => circuit.rx(t, q),
            RotationOp::Ry(t) => circuit.ry(t, q),
            RotationOp::Rz(t) => circuit.rz(t, q),
            RotationOp::H => circuit.h(q),
            RotationOp::S => circuit.s(q),
        };
    }
}

fn arb_rotation() -> impl Strategy<Value = RotationOp> {
    let angle = -10.0_f64..10.0;
    prop_oneof![
        angle.clone().prop_map(RotationOp::Rx),
        angle.clone().prop_map(RotationOp::Ry),
        angle.prop_map(RotationOp::Rz),
        Just(RotationOp::H),
        Just(RotationOp::S),
    ]
}

proptest! {
    #[test]
    fn circuit_unitary_is_unitary(ops in prop::collection::vec(arb_rotation(), 0..=20)) {
        let mut circuit = Circuit::with_size("random", 1, 0);
        for op in &ops {
            op.apply(&mut circuit);
        }
        let u = circuit.unitary().unwrap();
        prop_assert!(u.is_unitary());
        prop_assert!((u.dagger() * u).max_deviation(&Unitary2x2::identity()) < 1e-9);
    }

    #[test]
    fn bound_template_matches_constant_build(x in -1.0_f64..=1.0, phi in -3.0_f64..3.0) {
        let angle = ParameterExpression::constant(-2.0) * ParameterExpression::symbol("x").acos();
        let mut template = Circuit::with_size("template", 1, 0);
        template.rz(-2.0 * phi, QubitId(0)).unwrap().rx(angle, QubitId(0)).unwrap();

        let mut direct = Circuit::with_size("direct", 1, 0);
        direct.rz(-2.0 * phi, QubitId(0)).unwrap().rx(-2.0 * x.acos(), QubitId(0)).unwrap();

        let bound = template.bind("x", x);
        prop_assert!(bound.parameters().is_empty());
        let deviation = bound.unitary().unwrap().max_deviation(&direct.unitary().unwrap());
        prop_assert!(deviation < 1e-12);
    }
}
