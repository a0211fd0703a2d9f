//! Circuit representation for the QSP workbench.
//!
//! A phase sequence becomes a one-qubit [`Circuit`] of `rz`/`rx` gates.
//! Signal-dependent angles are [`ParameterExpression`]s, so a single
//! template can be bound to any signal value, and [`Unitary2x2`] gives
//! the closed-form matrix a bound circuit is checked against.
//!
//! ```rust
//! use qsp_ir::{Circuit, ParameterExpression, QubitId};
//!
//! let mut circuit = Circuit::with_size("signal", 1, 1);
//! let angle = ParameterExpression::constant(-2.0) * ParameterExpression::symbol("x").acos();
//! circuit.rx(angle, QubitId(0)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert!(circuit.is_parameterized());
//! let bound = circuit.bind("x", 0.5);
//! assert!(bound.unitary().unwrap().is_unitary());
//! ```
//!
//! Gates: `id x y z h s sdg t tdg sx` and the angle gates `rx ry rz p u`
//! on one qubit; `cx cz swap` on two.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{BinaryOp, ParameterExpression, UnaryOp};
pub use qubit::{ClbitId, QubitId};
pub use unitary::{UNITARY_TOLERANCE, Unitary2x2};
