use std::collections::BTreeSet;

use lsc_core::{
    ErrorInfo, Instruction, LscError, MeasurementIndex, QubitIndex, SchemaVersion, SpacetimeCoords,
};
use serde::{Deserialize, Serialize};

use crate::provenance::{InstructionRecord, MeasurementRecord, Origin, ProvenanceMap, QubitRecord};
use crate::qubit_map::QubitMap;

/// Compiled circuit of a spacetime graph at one size parameter.
///
/// Instructions are stored without moment separators; `moment_starts` holds
/// the index of the first instruction of every moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    pub(crate) k: u32,
    pub(crate) graph_hash: String,
    pub(crate) schema_version: SchemaVersion,
    pub(crate) qubits: QubitMap,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) moment_starts: Vec<usize>,
    pub(crate) provenance: ProvenanceMap,
}

impl CompiledCircuit {
    /// Size parameter the circuit was compiled at.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// Canonical hash of the source graph.
    pub fn graph_hash(&self) -> &str {
        &self.graph_hash
    }

    /// Schema version of the payload.
    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    /// Global qubit indexing.
    pub fn qubits(&self) -> &QubitMap {
        &self.qubits
    }

    /// Instructions in execution order, without separators.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Provenance of every instruction, measurement and qubit.
    pub fn provenance(&self) -> &ProvenanceMap {
        &self.provenance
    }

    /// Index of the first instruction of every moment.
    pub fn moment_starts(&self) -> &[usize] {
        &self.moment_starts
    }

    /// Instructions grouped by moment.
    pub fn moments(&self) -> impl Iterator<Item = &[Instruction]> + '_ {
        self.moment_starts.iter().enumerate().map(move |(idx, start)| {
            let end = self
                .moment_starts
                .get(idx + 1)
                .copied()
                .unwrap_or(self.instructions.len());
            &self.instructions[*start..end]
        })
    }

    /// Instruction stream with a `Tick` between consecutive moments.
    pub fn to_instructions(&self) -> Vec<Instruction> {
        let mut out = Vec::with_capacity(self.instructions.len() + self.moment_starts.len());
        for (idx, moment) in self.moments().enumerate() {
            if idx > 0 {
                out.push(Instruction::Tick);
            }
            out.extend(moment.iter().cloned());
        }
        out
    }

    /// Number of qubits.
    pub fn qubit_count(&self) -> usize {
        self.qubits.len()
    }

    /// Number of instructions, separators excluded.
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Number of operational instructions.
    pub fn operation_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|instruction| instruction.is_operational())
            .count()
    }

    /// Number of measurement records.
    pub fn measurement_count(&self) -> usize {
        self.provenance.measurement_count()
    }

    /// Number of moments.
    pub fn moment_count(&self) -> usize {
        self.moment_starts.len()
    }

    /// Index of the instruction that produced measurement `index`.
    pub fn measurement_instruction(&self, index: MeasurementIndex) -> Option<usize> {
        self.provenance
            .measurement(index)
            .map(|record| record.instruction)
    }
}

/// Incremental assembly of a [`CompiledCircuit`], one moment at a time.
///
/// Every pushed instruction comes with its provenance record. Operational
/// instructions of a moment must act on pairwise distinct qubits.
#[derive(Debug)]
pub struct CircuitBuilder {
    k: u32,
    graph_hash: String,
    schema_version: SchemaVersion,
    qubits: QubitMap,
    instructions: Vec<Instruction>,
    moment_starts: Vec<usize>,
    provenance: ProvenanceMap,
}

impl CircuitBuilder {
    /// Starts an empty circuit over `qubits` with the given origin arena.
    pub fn new(k: u32, graph_hash: impl Into<String>, qubits: QubitMap, origins: Vec<Origin>) -> Self {
        let qubit_records = qubits
            .positions()
            .iter()
            .map(|position| QubitRecord {
                position: *position,
                origins: BTreeSet::new(),
            })
            .collect();
        Self {
            k,
            graph_hash: graph_hash.into(),
            schema_version: SchemaVersion::default(),
            qubits,
            instructions: Vec::new(),
            moment_starts: Vec::new(),
            provenance: ProvenanceMap {
                origins,
                instructions: Vec::new(),
                measurements: Vec::new(),
                qubits: qubit_records,
            },
        }
    }

    /// Number of measurements emitted so far.
    pub fn measurement_count(&self) -> usize {
        self.provenance.measurements.len()
    }

    /// Appends one moment. Empty moments are ignored.
    pub fn push_moment(
        &mut self,
        moment: Vec<(Instruction, InstructionRecord)>,
    ) -> Result<(), LscError> {
        if moment.is_empty() {
            return Ok(());
        }
        self.check_moment(&moment)?;
        for (_, record) in &moment {
            if record.origin >= self.provenance.origins.len() {
                return Err(LscError::Stitch(
                    ErrorInfo::new("unknown-origin", "instruction refers to a missing origin")
                        .with_context("origin", record.origin.to_string()),
                ));
            }
        }

        self.moment_starts.push(self.instructions.len());
        for (instruction, record) in moment {
            let index = self.instructions.len();
            if instruction.is_operational() {
                for qubit in instruction.qubits() {
                    if let Some(entry) = self.provenance.qubits.get_mut(qubit.index()) {
                        entry.origins.insert(record.origin);
                    }
                }
            }
            if let Instruction::Measure { qubit, .. } = &instruction {
                let position = self.qubits.position_of(*qubit).ok_or_else(|| {
                    LscError::Stitch(
                        ErrorInfo::new("unmapped-qubit", "measured qubit has no grid site")
                            .with_context("qubit", qubit.to_string()),
                    )
                })?;
                self.provenance.measurements.push(MeasurementRecord {
                    instruction: index,
                    origin: record.origin,
                    qubit: *qubit,
                    role: record.role,
                    coords: SpacetimeCoords {
                        x: position.x,
                        y: position.y,
                        t: i64::from(record.ordinal),
                    },
                });
            }
            self.instructions.push(instruction);
            self.provenance.instructions.push(record);
        }
        Ok(())
    }

    fn check_moment(&self, moment: &[(Instruction, InstructionRecord)]) -> Result<(), LscError> {
        let mut used: BTreeSet<QubitIndex> = BTreeSet::new();
        for (instruction, _) in moment.iter().filter(|(ins, _)| ins.is_operational()) {
            for qubit in instruction.qubits() {
                if qubit.index() >= self.qubits.len() {
                    return Err(LscError::Stitch(
                        ErrorInfo::new("unmapped-qubit", "instruction targets an unknown qubit")
                            .with_context("qubit", qubit.to_string()),
                    ));
                }
                if !used.insert(qubit) {
                    let mut info = ErrorInfo::new(
                        "multiple-operations-on-same-qubit",
                        "a qubit is used by two operations in one moment",
                    )
                    .with_context("qubit", qubit.to_string())
                    .with_context("moment", self.moment_starts.len().to_string());
                    if let Some(position) = self.qubits.position_of(qubit) {
                        info = info.with_context("position", position.to_string());
                    }
                    return Err(LscError::Stitch(info));
                }
            }
        }
        Ok(())
    }

    /// Freezes the circuit.
    pub fn finish(self) -> CompiledCircuit {
        CompiledCircuit {
            k: self.k,
            graph_hash: self.graph_hash,
            schema_version: self.schema_version,
            qubits: self.qubits,
            instructions: self.instructions,
            moment_starts: self.moment_starts,
            provenance: self.provenance,
        }
    }
}
