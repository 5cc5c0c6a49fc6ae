//! Target instruction set emitted by the compiler.
//!
//! The set is deliberately small: resets and measurements in a Pauli basis,
//! Hadamard, CNOT, error channels, annotations and moment separators. The exact
//! textual grammar of a downstream simulator is not modelled here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::QubitIndex;

/// Single-qubit Pauli basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Eigenbasis of Pauli X.
    X,
    /// Eigenbasis of Pauli Y.
    Y,
    /// Eigenbasis of Pauli Z.
    Z,
}

impl Basis {
    /// Returns the `(x, z)` symplectic bits of the basis Pauli.
    pub const fn bits(self) -> (bool, bool) {
        match self {
            Basis::X => (true, false),
            Basis::Y => (true, true),
            Basis::Z => (false, true),
        }
    }

    /// Basis of a Pauli that anticommutes with this one; used for flip errors.
    pub const fn flip(self) -> Basis {
        match self {
            Basis::X => Basis::Z,
            Basis::Y | Basis::Z => Basis::X,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Basis::X => "X",
            Basis::Y => "Y",
            Basis::Z => "Z",
        };
        f.write_str(label)
    }
}

/// Recognised error channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseChannel {
    /// Single-qubit depolarising channel after single-qubit operations.
    Depolarize1,
    /// Two-qubit depolarising channel after two-qubit operations.
    Depolarize2,
    /// Classical flip of a measurement result.
    MeasurementFlip,
    /// Preparation of the orthogonal state after a reset.
    ResetFlip,
    /// Depolarising channel on qubits left idle during a moment.
    Idle,
}

impl NoiseChannel {
    /// Every channel, in canonical order.
    pub const ALL: [NoiseChannel; 5] = [
        NoiseChannel::Depolarize1,
        NoiseChannel::Depolarize2,
        NoiseChannel::MeasurementFlip,
        NoiseChannel::ResetFlip,
        NoiseChannel::Idle,
    ];

    /// Stable kebab-case label.
    pub const fn label(self) -> &'static str {
        match self {
            NoiseChannel::Depolarize1 => "depolarize-1",
            NoiseChannel::Depolarize2 => "depolarize-2",
            NoiseChannel::MeasurementFlip => "measurement-flip",
            NoiseChannel::ResetFlip => "reset-flip",
            NoiseChannel::Idle => "idle",
        }
    }
}

/// Error channel applied to a group of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseOp {
    /// Channel kind.
    pub channel: NoiseChannel,
    /// Probability parameter of the channel.
    pub rate: f64,
    /// Qubits the channel acts on.
    pub qubits: Vec<QubitIndex>,
    /// For flip channels, the basis of the neighbouring reset or measurement.
    pub basis: Option<Basis>,
}

/// Space-time coordinates attached to a detector annotation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SpacetimeCoords {
    /// Doubled-grid column.
    pub x: i64,
    /// Doubled-grid row.
    pub y: i64,
    /// Round ordinal.
    pub t: i64,
}

impl fmt::Display for SpacetimeCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.t)
    }
}

/// One entry of the compiled instruction stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Instruction {
    /// Prepares the +1 eigenstate of `basis`.
    Reset {
        /// Target qubit.
        qubit: QubitIndex,
        /// Preparation basis.
        basis: Basis,
    },
    /// Hadamard gate.
    Hadamard {
        /// Target qubit.
        qubit: QubitIndex,
    },
    /// Controlled-NOT gate.
    Cnot {
        /// Control qubit.
        control: QubitIndex,
        /// Target qubit.
        target: QubitIndex,
    },
    /// Destructive measurement in `basis`, appending one record.
    Measure {
        /// Target qubit.
        qubit: QubitIndex,
        /// Measurement basis.
        basis: Basis,
    },
    /// Error channel inserted by a noise model.
    Noise(NoiseOp),
    /// Parity check over earlier measurement records (relative look-backs).
    Detector {
        /// Negative offsets into the measurement record.
        records: Vec<i64>,
        /// Space-time coordinates of the check.
        coordinates: SpacetimeCoords,
    },
    /// Contribution of earlier measurement records to a logical observable.
    Observable {
        /// Observable index.
        index: u32,
        /// Negative offsets into the measurement record.
        records: Vec<i64>,
    },
    /// Moment separator.
    Tick,
}

impl Instruction {
    /// Qubits touched by the instruction, in operand order.
    pub fn qubits(&self) -> Vec<QubitIndex> {
        match self {
            Instruction::Reset { qubit, .. }
            | Instruction::Hadamard { qubit }
            | Instruction::Measure { qubit, .. } => vec![*qubit],
            Instruction::Cnot { control, target } => vec![*control, *target],
            Instruction::Noise(op) => op.qubits.clone(),
            Instruction::Detector { .. } | Instruction::Observable { .. } | Instruction::Tick => {
                Vec::new()
            }
        }
    }

    /// True for resets, gates and measurements.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            Instruction::Reset { .. }
                | Instruction::Hadamard { .. }
                | Instruction::Cnot { .. }
                | Instruction::Measure { .. }
        )
    }

    /// True for measurements.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Instruction::Measure { .. })
    }

    /// Stable short mnemonic, used in logs and diagnostics.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Reset { basis: Basis::X, .. } => "RX",
            Instruction::Reset { basis: Basis::Y, .. } => "RY",
            Instruction::Reset { basis: Basis::Z, .. } => "R",
            Instruction::Hadamard { .. } => "H",
            Instruction::Cnot { .. } => "CX",
            Instruction::Measure { basis: Basis::X, .. } => "MX",
            Instruction::Measure { basis: Basis::Y, .. } => "MY",
            Instruction::Measure { basis: Basis::Z, .. } => "M",
            Instruction::Noise(op) => op.channel.label(),
            Instruction::Detector { .. } => "DETECTOR",
            Instruction::Observable { .. } => "OBSERVABLE_INCLUDE",
            Instruction::Tick => "TICK",
        }
    }
}
