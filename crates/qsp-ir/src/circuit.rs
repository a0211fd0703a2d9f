//! Circuits as ordered instruction lists.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};
use crate::unitary::Unitary2x2;

/// A quantum circuit.
///
/// Instructions are kept in application order. Operands are checked
/// against the circuit width on append, so a built circuit never refers
/// to a missing wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

macro_rules! fixed_gates {
    ($($method:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($method), "` on `qubit`.")]
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.push_gate(StandardGate::$variant, [qubit])
            }
        )*
    };
}

macro_rules! rotation_gates {
    ($($method:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($method), "(angle)` on `qubit`.")]
            pub fn $method(
                &mut self,
                angle: impl Into<ParameterExpression>,
                qubit: QubitId,
            ) -> IrResult<&mut Self> {
                self.push_gate(StandardGate::$variant(angle.into()), [qubit])
            }
        )*
    };
}

impl Circuit {
    /// An empty circuit with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0, 0)
    }

    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    /// Append `instruction` once its operands are known to be valid.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate = instruction.as_gate();
        let gate_name = || gate.map(|g| g.name().to_string());

        if let Some(g) = gate {
            let arity = instruction.qubits.len() as u32;
            if arity != g.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: g.name().to_string(),
                    expected: g.num_qubits(),
                    got: arity,
                });
            }
        }

        let mut used = BTreeSet::new();
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound { qubit, gate_name: gate_name() });
            }
            if !used.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name: gate_name() });
            }
        }
        match instruction.clbits.iter().find(|c| c.0 >= self.num_clbits) {
            Some(&clbit) => Err(IrError::ClbitNotFound { clbit }),
            None => Ok(()),
        }
    }

    fn push_gate<const N: usize>(
        &mut self,
        gate: StandardGate,
        qubits: [QubitId; N],
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    fixed_gates! {
        i => I,
        x => X,
        y => Y,
        z => Z,
        h => H,
        s => S,
        sdg => Sdg,
        t => T,
        tdg => Tdg,
        sx => SX,
    }

    rotation_gates! {
        rx => Rx,
        ry => Ry,
        rz => Rz,
        p => P,
    }

    /// Append the general single-qubit `u(theta, phi, lambda)`.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        let gate = StandardGate::U(theta.into(), phi.into(), lambda.into());
        self.push_gate(gate, [qubit])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CX, [control, target])
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CZ, [control, target])
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Swap, [a, b])
    }

    /// Append any gate on explicit operands.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit `k` into clbit `k` for every qubit, growing the
    /// classical register when it is narrower than the quantum one.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let width = self.num_qubits;
        self.num_clbits = self.num_clbits.max(width);
        let all = Instruction::measure_many((0..width).map(QubitId), (0..width).map(ClbitId))?;
        self.apply(all)
    }

    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let width = self.num_qubits;
        self.barrier((0..width).map(QubitId))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.instructions.iter().filter_map(Instruction::as_gate)
    }

    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Length of a reported bit-string: the classical register once
    /// anything is measured, otherwise one bit per qubit.
    pub fn outcome_width(&self) -> usize {
        if self.has_measurements() {
            self.num_clbits()
        } else {
            self.num_qubits()
        }
    }

    /// Number of layers once every instruction is pushed as early as its
    /// qubits allow. Barriers align their qubits but occupy no layer.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.num_qubits()];
        for inst in &self.instructions {
            let ready = inst
                .qubits
                .iter()
                .map(|q| frontier[q.index()])
                .max()
                .unwrap_or(0);
            let done = ready + usize::from(!inst.is_barrier());
            for q in &inst.qubits {
                frontier[q.index()] = done;
            }
        }
        frontier.into_iter().max().unwrap_or(0)
    }

    /// How many times each gate name occurs.
    pub fn gate_counts(&self) -> FxHashMap<String, usize> {
        self.gates().fold(FxHashMap::default(), |mut acc, gate| {
            *acc.entry(gate.name().to_string()).or_default() += 1;
            acc
        })
    }

    /// Free symbol names, sorted.
    pub fn parameters(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.gates()
            .flat_map(|g| g.kind.parameters())
            .for_each(|expr| expr.collect_symbols(&mut names));
        names
    }

    pub fn is_parameterized(&self) -> bool {
        self.gates().any(|g| g.kind.is_parameterized())
    }

    /// Copy of this circuit with `name` bound to `value` everywhere.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions.iter().map(|i| i.bind(name, value)).collect(),
        }
    }

    /// Matrix of a one-qubit circuit.
    ///
    /// The first gate applied is the rightmost factor. Measurements and
    /// barriers contribute nothing.
    pub fn unitary(&self) -> IrResult<Unitary2x2> {
        if self.num_qubits != 1 {
            return Err(IrError::NotSingleQubit(self.num_qubits()));
        }
        self.gates()
            .try_fold(Unitary2x2::identity(), |acc, gate| Ok(gate.kind.matrix()? * acc))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn signal_template() -> Circuit {
        let angle = ParameterExpression::constant(-2.0) * ParameterExpression::symbol("x").acos();
        let mut qsp = Circuit::with_size("qsp_d1_template", 1, 0);
        qsp.rz(-0.2, QubitId(0))
            .and_then(|c| c.rx(angle, QubitId(0)))
            .and_then(|c| c.rz(-0.6, QubitId(0)))
            .unwrap();
        qsp
    }

    #[test]
    fn test_empty() {
        let empty = Circuit::new("empty");
        assert_eq!(empty.name(), "empty");
        assert_eq!((empty.num_qubits(), empty.num_clbits()), (0, 0));
        assert_eq!(empty.depth(), 0);
        assert!(!empty.has_measurements());
    }

    #[test]
    fn test_chained_builders() {
        let mut pair = Circuit::with_size("pair", 2, 2);
        pair.h(QubitId(0))
            .and_then(|c| c.cx(QubitId(0), QubitId(1)))
            .and_then(|c| c.measure(QubitId(0), ClbitId(0)))
            .and_then(|c| c.measure(QubitId(1), ClbitId(1)))
            .unwrap();

        // h, cx, then both measurements side by side
        assert_eq!(pair.depth(), 3);
        assert!(pair.has_measurements());
        assert_eq!(pair.gate_counts().get("cx"), Some(&1));
        assert_eq!(pair.gate_counts().get("measure"), None);
    }

    #[test]
    fn test_operand_checks() {
        let mut one = Circuit::with_size("one", 1, 0);
        assert!(matches!(
            one.x(QubitId(1)),
            Err(IrError::QubitNotFound { qubit: QubitId(1), .. })
        ));
        assert!(matches!(
            one.measure(QubitId(0), ClbitId(0)),
            Err(IrError::ClbitNotFound { .. })
        ));
        assert!(one.instructions().is_empty());

        let mut two = Circuit::with_size("two", 2, 0);
        assert!(matches!(
            two.swap(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            two.gate(StandardGate::CZ, [QubitId(0)]),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_measure_all_widens_register() {
        let mut three = Circuit::with_size("three", 3, 1);
        three.measure_all().unwrap();
        assert_eq!(three.num_clbits(), 3);
        assert_eq!(three.instructions()[0].clbits.len(), 3);
    }

    #[test]
    fn test_outcome_width() {
        let mut partial = Circuit::with_size("partial", 3, 1);
        assert_eq!(partial.outcome_width(), 3);
        partial.measure(QubitId(2), ClbitId(0)).unwrap();
        assert_eq!(partial.outcome_width(), 1);
    }

    #[test]
    fn test_barrier_is_free() {
        let mut two = Circuit::with_size("two", 2, 0);
        two.h(QubitId(0)).unwrap();
        two.barrier_all().unwrap();
        two.x(QubitId(1)).unwrap();
        // x waits for the barrier, which waits for h
        assert_eq!(two.depth(), 2);
    }

    #[test]
    fn test_template_binding() {
        let template = signal_template();
        assert!(template.is_parameterized());
        assert_eq!(template.parameters().into_iter().collect::<Vec<_>>(), vec!["x"]);
        assert!(matches!(template.unitary(), Err(IrError::UnboundParameter(_))));

        let bound = template.bind("x", 0.5);
        assert!(!bound.is_parameterized());
        assert!(bound.parameters().is_empty());
        assert!(bound.unitary().unwrap().is_unitary());
        assert_eq!(bound.depth(), 3);
    }

    #[test]
    fn test_unitary_composes_in_application_order() {
        let mut hz = Circuit::with_size("hz", 1, 1);
        hz.h(QubitId(0)).and_then(|c| c.z(QubitId(0))).unwrap();
        hz.measure_all().unwrap();

        let expected = Unitary2x2::z() * Unitary2x2::h();
        assert!(hz.unitary().unwrap().max_deviation(&expected) < 1e-12);
    }

    #[test]
    fn test_unitary_of_rx_pi() {
        let mut flip = Circuit::with_size("flip", 1, 0);
        flip.rx(PI, QubitId(0)).unwrap();
        let u = flip.unitary().unwrap();
        assert!((u.get(1, 0).im + 1.0).abs() < 1e-12);
        assert!(u.get(0, 0).norm() < 1e-12);
    }

    #[test]
    fn test_unitary_needs_one_qubit() {
        let wide = Circuit::with_size("wide", 2, 0);
        assert!(matches!(wide.unitary(), Err(IrError::NotSingleQubit(2))));
    }

    #[test]
    fn test_json_keeps_symbols() {
        let mut template = signal_template();
        template.measure_all().unwrap();
        let json = template.to_json().unwrap();
        assert!(json.contains("\"Symbol\": \"x\""));
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}
