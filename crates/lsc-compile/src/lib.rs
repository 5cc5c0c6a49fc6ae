#![deny(missing_docs)]

//! Stitching of size-scaled templates into one circuit with full provenance.
//!
//! [`compile`] validates a spacetime graph, places one template per cube and
//! spatial pipe on a shared doubled grid, checks that neighbouring templates
//! agree on their shared boundaries and emits a moment-ordered instruction
//! stream. Every instruction, measurement and qubit can be traced back to the
//! cube or pipe that produced it through the [`ProvenanceMap`].

mod circuit;
mod provenance;
mod qubit_map;
mod records;
mod serialization;
mod stitch;

pub use circuit::{CircuitBuilder, CompiledCircuit};
pub use provenance::{
    InstructionRecord, MeasurementRecord, Origin, OriginKind, ProvenanceMap, QubitRecord,
};
pub use qubit_map::QubitMap;
pub use records::MeasurementRecords;
pub use serialization::{circuit_from_bytes, circuit_from_json, circuit_to_bytes, circuit_to_json};
pub use stitch::{compile, compile_many};
