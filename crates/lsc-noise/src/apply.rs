use std::collections::BTreeSet;

use lsc_compile::{CircuitBuilder, CompiledCircuit, InstructionRecord};
use lsc_core::{Basis, Instruction, LscError, NoiseChannel, NoiseOp, QubitIndex};
use lsc_template::Role;
use tracing::info;

use crate::model::NoiseModel;

impl NoiseModel {
    /// Rewrites one instruction into itself plus the channels attached to it.
    ///
    /// Depolarisation and flips precede a measurement; every other channel
    /// follows its operation. Zero rates emit nothing.
    pub fn apply(&self, instruction: &Instruction) -> Vec<Instruction> {
        match instruction {
            Instruction::Reset { qubit, basis } => {
                self.after(instruction, NoiseChannel::ResetFlip, vec![*qubit], Some(*basis))
            }
            Instruction::Hadamard { qubit } if self.gate_depolarization => {
                self.after(instruction, NoiseChannel::Depolarize1, vec![*qubit], None)
            }
            Instruction::Cnot { control, target } => self.after(
                instruction,
                NoiseChannel::Depolarize2,
                vec![*control, *target],
                None,
            ),
            Instruction::Measure { qubit, basis } => {
                let mut out: Vec<Instruction> = [
                    self.noise(NoiseChannel::Depolarize1, vec![*qubit], None),
                    self.noise(NoiseChannel::MeasurementFlip, vec![*qubit], Some(*basis)),
                ]
                .into_iter()
                .flatten()
                .collect();
                out.push(instruction.clone());
                out
            }
            _ => vec![instruction.clone()],
        }
    }

    fn after(
        &self,
        instruction: &Instruction,
        channel: NoiseChannel,
        qubits: Vec<QubitIndex>,
        basis: Option<Basis>,
    ) -> Vec<Instruction> {
        std::iter::once(instruction.clone())
            .chain(self.noise(channel, qubits, basis))
            .collect()
    }

    fn noise(
        &self,
        channel: NoiseChannel,
        qubits: Vec<QubitIndex>,
        basis: Option<Basis>,
    ) -> Option<Instruction> {
        let rate = self.rate(channel);
        (rate > 0.0 && !qubits.is_empty()).then(|| {
            Instruction::Noise(NoiseOp {
                channel,
                rate,
                qubits,
                basis,
            })
        })
    }
}

/// Applies `model` to every operation of `circuit` and adds idle noise.
///
/// Operational instructions, their order and the measurement record are
/// unchanged. Each inserted channel carries the provenance of its source
/// operation with role [`Role::Noise`]; idle channels take the first operation
/// of their moment as source.
#[tracing::instrument(skip(model, circuit), fields(k = circuit.k(), instructions = circuit.instruction_count()))]
pub fn apply_circuit(model: &NoiseModel, circuit: &CompiledCircuit) -> Result<CompiledCircuit, LscError> {
    model.validate()?;
    let provenance = circuit.provenance();
    let mut builder = CircuitBuilder::new(
        circuit.k(),
        circuit.graph_hash(),
        circuit.qubits().clone(),
        provenance.origins().to_vec(),
    );

    let all_qubits: Vec<QubitIndex> = (0..circuit.qubit_count())
        .map(QubitIndex::from_index)
        .collect();
    let starts = circuit.moment_starts();
    let mut inserted = 0usize;
    for (moment_idx, moment) in circuit.moments().enumerate() {
        let start = starts[moment_idx];
        let mut rewritten: Vec<(Instruction, InstructionRecord)> = Vec::new();
        let mut touched: BTreeSet<QubitIndex> = BTreeSet::new();
        for (offset, instruction) in moment.iter().enumerate() {
            let Some(record) = provenance.instructions().get(start + offset) else {
                continue;
            };
            if instruction.is_operational() {
                touched.extend(instruction.qubits());
            }
            for produced in model.apply(instruction) {
                let record = if matches!(produced, Instruction::Noise(_)) && produced != *instruction {
                    inserted += 1;
                    noise_record(record)
                } else {
                    record.clone()
                };
                rewritten.push((produced, record));
            }
        }

        let idle: Vec<QubitIndex> = all_qubits
            .iter()
            .copied()
            .filter(|qubit| !touched.contains(qubit))
            .collect();
        if let (Some(noise), Some(source)) = (
            model.noise(NoiseChannel::Idle, idle, None),
            provenance.instructions().get(start),
        ) {
            inserted += 1;
            rewritten.push((noise, noise_record(source)));
        }
        builder.push_moment(rewritten)?;
    }

    let noisy = builder.finish();
    info!(inserted, "noise applied");
    Ok(noisy)
}

fn noise_record(source: &InstructionRecord) -> InstructionRecord {
    InstructionRecord {
        role: Role::Noise,
        ..source.clone()
    }
}
