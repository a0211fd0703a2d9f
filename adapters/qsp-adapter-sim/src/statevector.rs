//! Dense statevector evolution and shot sampling.

use num_complex::Complex64;
use rand::Rng;

use qsp_ir::{Circuit, Instruction, IrResult, StandardGate, Unitary2x2};

/// `2^n` amplitudes where bit `k` of the basis index is qubit `k`.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zero basis state on `num_qubits` qubits. Callers keep
    /// `num_qubits` below `usize::BITS`.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::ZERO; 1 << num_qubits];
        amplitudes[0] = Complex64::ONE;
        Self { amplitudes }
    }

    /// Apply one instruction. Only gates change the state; measurements
    /// are terminal and read out through [`Readout`].
    pub fn apply(&mut self, instruction: &Instruction) -> IrResult<()> {
        let Some(gate) = instruction.as_gate() else {
            return Ok(());
        };
        let bit = |k: usize| 1usize << instruction.qubits[k].index();
        match &gate.kind {
            StandardGate::CX => self.swap_pairs(bit(0), bit(1), bit(1)),
            StandardGate::Swap => self.swap_pairs(bit(0), bit(1), bit(0) | bit(1)),
            StandardGate::CZ => self.negate(bit(0) | bit(1)),
            single => self.apply_matrix(instruction.qubits[0].index(), &single.matrix()?),
        }
        Ok(())
    }

    /// Act with `m` on the pair `(i, i | bit)` for every `i` without `bit`.
    fn apply_matrix(&mut self, qubit: usize, m: &Unitary2x2) {
        let bit = 1 << qubit;
        let [a, b, c, d] = m.data;
        for lo in (0..self.amplitudes.len()).filter(|i| (i & bit) == 0) {
            let hi = lo | bit;
            let (x0, x1) = (self.amplitudes[lo], self.amplitudes[hi]);
            self.amplitudes[lo] = a * x0 + b * x1;
            self.amplitudes[hi] = c * x0 + d * x1;
        }
    }

    /// Swap amplitude `i` with `i ^ flip` for each `i` that has every bit
    /// of `set` and no bit of `clear`.
    fn swap_pairs(&mut self, set: usize, clear: usize, flip: usize) {
        for i in 0..self.amplitudes.len() {
            if (i & set) == set && (i & clear) == 0 {
                self.amplitudes.swap(i, i ^ flip);
            }
        }
    }

    /// Flip the sign of every amplitude that has all of `mask`.
    fn negate(&mut self, mask: usize) {
        self.amplitudes
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| (i & mask) == mask)
            .for_each(|(_, amp)| *amp = -*amp);
    }

    /// Born-rule probability per basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// A sampler over the current outcome distribution.
    pub fn sampler(&self) -> Sampler {
        let cumulative: Vec<f64> = self
            .probabilities()
            .into_iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        Sampler {
            total: cumulative.last().copied().unwrap_or(0.0),
            cumulative,
        }
    }
}

/// Inverse-CDF sampling over basis indices.
pub struct Sampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl Sampler {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let u = rng.r#gen::<f64>() * self.total;
        let index = self.cumulative.partition_point(|&c| c <= u);
        index.min(self.cumulative.len().saturating_sub(1))
    }
}

/// Turns a sampled basis index into the reported bit-string.
///
/// Position `c` reads the qubit last measured into clbit `c`, and
/// clbits no measurement writes read `0`. Without measurements every
/// qubit is reported, qubit 0 first.
pub struct Readout {
    sources: Vec<Option<usize>>,
}

impl Readout {
    pub fn new(circuit: &Circuit) -> Self {
        if !circuit.has_measurements() {
            return Self::all_qubits(circuit.num_qubits());
        }
        let mut sources = vec![None; circuit.num_clbits()];
        for inst in circuit.instructions().iter().filter(|i| i.is_measure()) {
            for (qubit, clbit) in inst.qubits.iter().zip(&inst.clbits) {
                if let Some(slot) = sources.get_mut(clbit.index()) {
                    *slot = Some(qubit.index());
                }
            }
        }
        Self { sources }
    }

    pub fn all_qubits(num_qubits: usize) -> Self {
        Self {
            sources: (0..num_qubits).map(Some).collect(),
        }
    }

    pub fn bitstring(&self, outcome: usize) -> String {
        self.sources
            .iter()
            .map(|source| match source {
                Some(qubit) if (outcome >> qubit) & 1 == 1 => '1',
                _ => '0',
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_ir::QubitId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn gate(g: StandardGate, qubits: &[u32]) -> Instruction {
        Instruction::gate(g, qubits.iter().copied().map(QubitId))
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::ONE));
        assert!(approx_eq(sv.amplitudes[1], Complex64::ZERO));
        assert!(approx_eq(sv.amplitudes[2], Complex64::ZERO));
        assert!(approx_eq(sv.amplitudes[3], Complex64::ZERO));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply(&gate(StandardGate::H, &[0])).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(StandardGate::H, &[0])).unwrap();
        sv.apply(&gate(StandardGate::CX, &[0, 1])).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::ZERO));
        assert!(approx_eq(sv.amplitudes[2], Complex64::ZERO));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_swap_and_cz() {
        let mut sv = Statevector::new(2);
        sv.apply(&gate(StandardGate::X, &[0])).unwrap();
        sv.apply(&gate(StandardGate::Swap, &[0, 1])).unwrap();
        assert!(approx_eq(sv.amplitudes[2], Complex64::ONE));

        sv.apply(&gate(StandardGate::X, &[0])).unwrap();
        sv.apply(&gate(StandardGate::CZ, &[0, 1])).unwrap();
        assert!(approx_eq(sv.amplitudes[3], -Complex64::ONE));
    }

    #[test]
    fn test_unbound_parameter_is_error() {
        let mut sv = Statevector::new(1);
        let rx = gate(
            StandardGate::Rx(qsp_ir::ParameterExpression::symbol("x")),
            &[0],
        );
        assert!(sv.apply(&rx).is_err());
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = Statevector::new(1);
        sv.apply(&gate(StandardGate::X, &[0])).unwrap();
        let sampler = sv.sampler();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            assert_eq!(sampler.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_bitstring_qubit_zero_leftmost() {
        let readout = Readout::all_qubits(3);
        // Basis index 1 means qubit 0 is set.
        assert_eq!(readout.bitstring(1), "100");
        assert_eq!(readout.bitstring(6), "011");
    }

    #[test]
    fn test_readout_follows_measurements() {
        let mut circuit = Circuit::with_size("crossed", 3, 2);
        circuit
            .measure(QubitId(0), qsp_ir::ClbitId(1))
            .and_then(|c| c.measure(QubitId(2), qsp_ir::ClbitId(0)))
            .unwrap();
        let readout = Readout::new(&circuit);
        // qubit 1 is never measured
        assert_eq!(readout.bitstring(0b010), "00");
        assert_eq!(readout.bitstring(0b001), "01");
        assert_eq!(readout.bitstring(0b100), "10");
    }

    #[test]
    fn test_readout_unwritten_clbit_is_zero() {
        let mut circuit = Circuit::with_size("sparse", 1, 3);
        circuit.measure(QubitId(0), qsp_ir::ClbitId(2)).unwrap();
        assert_eq!(Readout::new(&circuit).bitstring(1), "001");
    }
}
