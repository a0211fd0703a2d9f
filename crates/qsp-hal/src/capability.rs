//! What a backend can run.

use serde::{Deserialize, Serialize};

/// Limits a circuit must respect before it is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    pub num_qubits: u32,
    pub gate_set: GateSet,
    /// Upper bound on shots per job.
    pub max_shots: u32,
    /// True for simulators and emulators.
    pub is_simulator: bool,
}

impl Capabilities {
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Quantinuum H-series trapped-ion hardware.
    pub fn quantinuum(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::quantinuum(),
            max_shots: 10_000,
            is_simulator: false,
        }
    }

    /// IonQ trapped-ion hardware.
    pub fn ionq(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::ionq(),
            max_shots: 100_000,
            is_simulator: false,
        }
    }

    #[must_use]
    pub fn as_emulator(self) -> Self {
        Self {
            is_simulator: true,
            ..self
        }
    }
}

/// Accepted gate names, lowercase as in OpenQASM 3.
///
/// `native` lists the gates that run without decomposition. An empty
/// list means every supported gate is native.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    pub single_qubit: Vec<String>,
    pub two_qubit: Vec<String>,
    #[serde(default)]
    pub native: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

impl GateSet {
    /// Everything `qsp-ir` can express.
    pub fn universal() -> Self {
        Self {
            single_qubit: owned(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "rx", "ry", "rz", "p", "u",
            ]),
            two_qubit: owned(&["cx", "cz", "swap"]),
            native: Vec::new(),
        }
    }

    /// Quantinuum's published QASM gate list. Only `rz` is native; the
    /// rest compile server side.
    pub fn quantinuum() -> Self {
        Self {
            single_qubit: owned(&[
                "rz", "rx", "ry", "h", "x", "y", "z", "s", "t", "sdg", "tdg", "sx",
            ]),
            two_qubit: owned(&["cx", "cz", "swap"]),
            native: owned(&["rz"]),
        }
    }

    /// IonQ native rotations plus the `xx` entangler.
    pub fn ionq() -> Self {
        let native = owned(&["rx", "ry", "rz", "xx"]);
        Self {
            single_qubit: native[..3].to_vec(),
            two_qubit: native[3..].to_vec(),
            native,
        }
    }

    /// `universal`, `quantinuum` or `ionq`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "universal" => Some(Self::universal()),
            "quantinuum" => Some(Self::quantinuum()),
            "ionq" => Some(Self::ionq()),
            _ => None,
        }
    }

    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .any(|g| g == gate)
    }

    pub fn is_native(&self, gate: &str) -> bool {
        if self.native.is_empty() {
            self.contains(gate)
        } else {
            self.native.iter().any(|g| g == gate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_accepts_everything() {
        let caps = Capabilities::simulator(10);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 10);
        for gate in ["h", "u", "swap", "rx"] {
            assert!(caps.gate_set.contains(gate));
            assert!(caps.gate_set.is_native(gate));
        }
    }

    #[test]
    fn test_quantinuum() {
        let caps = Capabilities::quantinuum("H1-1", 20);
        assert!(!caps.is_simulator);
        assert!(caps.gate_set.contains("rx") && caps.gate_set.contains("rz"));
        assert!(!caps.gate_set.contains("u"));
        assert!(caps.gate_set.is_native("rz"));
        assert!(!caps.gate_set.is_native("rx"));
        assert!(caps.as_emulator().is_simulator);
    }

    #[test]
    fn test_ionq() {
        let gates = Capabilities::ionq("aria", 25).gate_set;
        assert!(gates.contains("rx") && gates.contains("xx"));
        assert!(!gates.contains("h") && !gates.contains("cx"));
        assert!(gates.is_native("xx"));
    }

    #[test]
    fn test_preset_lookup() {
        assert!(GateSet::preset("quantinuum").is_some());
        assert!(GateSet::preset("IBM").is_none());
    }
}
