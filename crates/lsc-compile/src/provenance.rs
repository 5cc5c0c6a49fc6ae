//! Parallel arenas mapping compiled operations back to cubes and pipes.
//!
//! Records refer to each other by integer index only, so the map serializes
//! independently of the graph it was compiled from.

use std::collections::BTreeSet;
use std::fmt;

use lsc_core::{
    CubeId, CubeKind, MeasurementIndex, PipeId, PipeKind, Position, QubitIndex, SpacetimeCoords,
};
use lsc_template::{LocalPos, Role};
use serde::{Deserialize, Serialize};

/// Graph element an operation was instantiated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OriginKind {
    /// A cube.
    Cube {
        /// Cube identifier.
        id: CubeId,
        /// Cube kind.
        kind: CubeKind,
    },
    /// A pipe.
    Pipe {
        /// Pipe identifier.
        id: PipeId,
        /// Pipe kind.
        kind: PipeKind,
    },
}

/// Entry of the origin arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Cube or pipe.
    pub kind: OriginKind,
    /// Lattice positions: the cube, or both pipe endpoints.
    pub positions: Vec<Position>,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OriginKind::Cube { id, kind } => write!(f, "cube {id} ({kind})")?,
            OriginKind::Pipe { id, kind } => write!(f, "pipe {id} ({kind})")?,
        }
        for position in &self.positions {
            write!(f, " {position}")?;
        }
        Ok(())
    }
}

/// Entry of the instruction arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    /// Index into the origin arena.
    pub origin: usize,
    /// Role of the template slot.
    pub role: Role,
    /// Time layer of the origin.
    pub layer: i32,
    /// Round inside the template.
    pub round: u32,
    /// Ordinal of the emitted round across the whole circuit.
    pub ordinal: u32,
    /// Operand sites in the template frame.
    pub local: Vec<LocalPos>,
}

/// Entry of the measurement arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Index into the instruction arena.
    pub instruction: usize,
    /// Index into the origin arena.
    pub origin: usize,
    /// Measured qubit.
    pub qubit: QubitIndex,
    /// Role of the measurement.
    pub role: Role,
    /// Doubled-grid site and round ordinal.
    pub coords: SpacetimeCoords,
}

/// Entry of the qubit arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRecord {
    /// Doubled-grid site.
    pub position: LocalPos,
    /// Origins that operate on the qubit.
    pub origins: BTreeSet<usize>,
}

/// Provenance of every instruction, measurement and qubit of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProvenanceMap {
    pub(crate) origins: Vec<Origin>,
    pub(crate) instructions: Vec<InstructionRecord>,
    pub(crate) measurements: Vec<MeasurementRecord>,
    pub(crate) qubits: Vec<QubitRecord>,
}

impl ProvenanceMap {
    /// Origin arena.
    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    /// Instruction arena, parallel to the instruction list of the circuit.
    pub fn instructions(&self) -> &[InstructionRecord] {
        &self.instructions
    }

    /// Measurement arena, in record order.
    pub fn measurements(&self) -> &[MeasurementRecord] {
        &self.measurements
    }

    /// Qubit arena, indexed by qubit.
    pub fn qubits(&self) -> &[QubitRecord] {
        &self.qubits
    }

    /// Origin of the instruction at `index`.
    pub fn origin_of_instruction(&self, index: usize) -> Option<&Origin> {
        let record = self.instructions.get(index)?;
        self.origins.get(record.origin)
    }

    /// Origin of measurement `index`.
    pub fn origin_of_measurement(&self, index: MeasurementIndex) -> Option<&Origin> {
        let record = self.measurements.get(index.index())?;
        self.origins.get(record.origin)
    }

    /// Measurement record of `index`.
    pub fn measurement(&self, index: MeasurementIndex) -> Option<&MeasurementRecord> {
        self.measurements.get(index.index())
    }

    /// Measurements produced by the origin at `origin`, increasing.
    pub fn measurements_of_origin(&self, origin: usize) -> Vec<MeasurementIndex> {
        self.measurements
            .iter()
            .enumerate()
            .filter(|(_, record)| record.origin == origin)
            .map(|(idx, _)| MeasurementIndex::from_index(idx))
            .collect()
    }

    /// Index of the origin of cube `id`.
    pub fn cube_origin(&self, id: CubeId) -> Option<usize> {
        self.origins.iter().position(
            |origin| matches!(origin.kind, OriginKind::Cube { id: cube, .. } if cube == id),
        )
    }

    /// Index of the origin of pipe `id`.
    pub fn pipe_origin(&self, id: PipeId) -> Option<usize> {
        self.origins.iter().position(
            |origin| matches!(origin.kind, OriginKind::Pipe { id: pipe, .. } if pipe == id),
        )
    }

    /// Cubes present in the origin arena.
    pub fn recovered_cubes(&self) -> BTreeSet<CubeId> {
        self.origins
            .iter()
            .filter_map(|origin| match origin.kind {
                OriginKind::Cube { id, .. } => Some(id),
                OriginKind::Pipe { .. } => None,
            })
            .collect()
    }

    /// Pipes present in the origin arena.
    pub fn recovered_pipes(&self) -> BTreeSet<PipeId> {
        self.origins
            .iter()
            .filter_map(|origin| match origin.kind {
                OriginKind::Pipe { id, .. } => Some(id),
                OriginKind::Cube { .. } => None,
            })
            .collect()
    }

    /// Number of qubits.
    pub fn qubit_count(&self) -> usize {
        self.qubits.len()
    }

    /// Number of instruction records.
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Number of measurement records.
    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }
}
