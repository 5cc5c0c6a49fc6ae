use lsc_core::{ErrorInfo, LscError, SchemaVersion};
use sha2::{Digest, Sha256};

use crate::circuit::CompiledCircuit;

impl CompiledCircuit {
    /// SHA-256 hex digest of the canonical bincode encoding.
    pub fn canonical_hash(&self) -> Result<String, LscError> {
        let bytes = circuit_to_bytes(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}

/// Serializes the circuit with `bincode`.
pub fn circuit_to_bytes(circuit: &CompiledCircuit) -> Result<Vec<u8>, LscError> {
    bincode::serialize(circuit)
        .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a circuit from its `bincode` encoding.
pub fn circuit_from_bytes(bytes: &[u8]) -> Result<CompiledCircuit, LscError> {
    let circuit: CompiledCircuit = bincode::deserialize(bytes)
        .map_err(|err| LscError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    check_loaded(circuit)
}

/// Serializes the circuit to pretty-printed JSON.
pub fn circuit_to_json(circuit: &CompiledCircuit) -> Result<String, LscError> {
    serde_json::to_string_pretty(circuit)
        .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a circuit from JSON.
pub fn circuit_from_json(json: &str) -> Result<CompiledCircuit, LscError> {
    let circuit: CompiledCircuit = serde_json::from_str(json)
        .map_err(|err| LscError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    check_loaded(circuit)
}

fn check_loaded(circuit: CompiledCircuit) -> Result<CompiledCircuit, LscError> {
    let current = SchemaVersion::default();
    if !current.reads(&circuit.schema_version) {
        let version = circuit.schema_version;
        return Err(LscError::Serde(
            ErrorInfo::new("schema-mismatch", "payload schema version is not readable")
                .with_context(
                    "payload",
                    format!("{}.{}.{}", version.major, version.minor, version.patch),
                ),
        ));
    }
    let provenance = &circuit.provenance;
    let consistent = provenance.instructions.len() == circuit.instructions.len()
        && provenance.qubits.len() == circuit.qubits.len()
        && circuit.moment_starts.windows(2).all(|pair| pair[0] < pair[1])
        && circuit
            .moment_starts
            .last()
            .map_or(true, |last| *last < circuit.instructions.len())
        && provenance.instructions.iter().all(|record| record.origin < provenance.origins.len());
    if !consistent {
        return Err(LscError::Serde(ErrorInfo::new(
            "inconsistent-circuit",
            "circuit arenas disagree in length or ordering",
        )));
    }
    Ok(circuit)
}
