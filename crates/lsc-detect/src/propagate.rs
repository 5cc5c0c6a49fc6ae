//! Backward propagation of measurement products through a compiled circuit.

use std::collections::BTreeSet;

use lsc_compile::CompiledCircuit;
use lsc_core::{Instruction, MeasurementIndex};
use lsc_noise::pauli_errors;

use crate::pauli::PauliString;

/// Check points of a circuit, numbered densely.
///
/// Events are the measurements (commutation with the measured Pauli), then
/// the resets (commutation with the prepared Pauli), then one event per qubit
/// for the `|0…0⟩` initial state.
#[derive(Debug, Clone)]
pub(crate) struct CircuitLayout {
    qubits: usize,
    measurement_instruction: Vec<usize>,
    measurement_at: Vec<Option<MeasurementIndex>>,
    reset_at: Vec<Option<usize>>,
    resets: usize,
}

impl CircuitLayout {
    pub(crate) fn new(circuit: &CompiledCircuit) -> Self {
        let instructions = circuit.instructions();
        let mut measurement_at = vec![None; instructions.len()];
        let mut reset_at = vec![None; instructions.len()];
        let mut measurement_instruction = Vec::new();
        let mut resets = 0;
        for (idx, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::Measure { .. } => {
                    measurement_at[idx] = Some(MeasurementIndex::from_index(
                        measurement_instruction.len(),
                    ));
                    measurement_instruction.push(idx);
                }
                Instruction::Reset { .. } => {
                    reset_at[idx] = Some(resets);
                    resets += 1;
                }
                _ => {}
            }
        }
        Self {
            qubits: circuit.qubit_count(),
            measurement_instruction,
            measurement_at,
            reset_at,
            resets,
        }
    }

    pub(crate) fn measurement_count(&self) -> usize {
        self.measurement_instruction.len()
    }

    pub(crate) fn event_count(&self) -> usize {
        self.measurement_count() + self.resets + self.qubits
    }

    fn reset_event(&self, ordinal: usize) -> usize {
        self.measurement_count() + ordinal
    }

    fn start_event(&self, qubit: usize) -> usize {
        self.measurement_count() + self.resets + qubit
    }
}

/// Outcome of propagating a measurement product back to the circuit start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    /// Check points where the product fails to commute, increasing.
    pub events: Vec<usize>,
    /// Parity of the product when `events` is empty.
    pub parity: bool,
    /// Noise instructions with an error that anticommutes with the product.
    pub syndrome_support: Vec<usize>,
}

impl Propagation {
    /// True when the product has a fixed value in the noiseless circuit.
    pub fn is_deterministic(&self) -> bool {
        self.events.is_empty()
    }
}

/// Propagates the product of the measurements in `set` back through `circuit`.
///
/// Noise instructions do not alter the operator; they only contribute to the
/// syndrome support.
pub fn propagate(circuit: &CompiledCircuit, set: &BTreeSet<MeasurementIndex>) -> Propagation {
    back_propagate(circuit, &CircuitLayout::new(circuit), set, true)
}

pub(crate) fn back_propagate(
    circuit: &CompiledCircuit,
    layout: &CircuitLayout,
    set: &BTreeSet<MeasurementIndex>,
    track_support: bool,
) -> Propagation {
    let empty = Propagation {
        events: Vec::new(),
        parity: false,
        syndrome_support: Vec::new(),
    };
    let (Some(first), Some(last)) = (set.first(), set.last()) else {
        return empty;
    };
    let (Some(&lowest), Some(&highest)) = (
        layout.measurement_instruction.get(first.index()),
        layout.measurement_instruction.get(last.index()),
    ) else {
        return empty;
    };

    let instructions = circuit.instructions();
    let mut pauli = PauliString::identity(layout.qubits);
    let mut events = BTreeSet::new();
    let mut support = Vec::new();
    let mut reached_start = true;
    for idx in (0..=highest).rev() {
        match &instructions[idx] {
            Instruction::Measure { qubit, basis } => {
                let Some(measurement) = layout.measurement_at[idx] else {
                    continue;
                };
                if !pauli.commutes_with(*qubit, *basis) {
                    events.insert(measurement.index());
                }
                if set.contains(&measurement) {
                    pauli.multiply(*qubit, *basis);
                }
            }
            Instruction::Reset { qubit, basis } => {
                if !pauli.commutes_with(*qubit, *basis) {
                    if let Some(ordinal) = layout.reset_at[idx] {
                        events.insert(layout.reset_event(ordinal));
                    }
                }
                pauli.take(*qubit);
            }
            Instruction::Hadamard { qubit } => pauli.hadamard(*qubit),
            Instruction::Cnot { control, target } => pauli.cnot(*control, *target),
            Instruction::Noise(op) if track_support => {
                let flagged = pauli_errors(op).iter().any(|error| {
                    error
                        .terms
                        .iter()
                        .filter(|(qubit, basis)| !pauli.commutes_with(*qubit, *basis))
                        .count()
                        % 2
                        == 1
                });
                if flagged {
                    support.push(idx);
                }
            }
            _ => {}
        }
        if idx <= lowest && pauli.is_identity() {
            reached_start = idx == 0;
            break;
        }
    }
    if reached_start {
        for qubit in pauli.x_support() {
            events.insert(layout.start_event(qubit.index()));
        }
    }
    support.reverse();
    Propagation {
        events: events.into_iter().collect(),
        parity: pauli.is_negative().unwrap_or(false),
        syndrome_support: support,
    }
}
