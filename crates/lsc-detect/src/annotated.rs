use lsc_compile::{CompiledCircuit, MeasurementRecords};
use lsc_core::{ErrorInfo, Instruction, LscError, MeasurementIndex, SpacetimeCoords};
use lsc_flow::CorrelationSurface;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Set of measurements whose parity is fixed in the noiseless circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detector {
    /// Members, increasing; the last one anchors the detector.
    pub measurements: Vec<MeasurementIndex>,
    /// Coordinates of the anchor.
    pub coordinates: SpacetimeCoords,
    /// Parity of the members without errors.
    pub expected_parity: bool,
    /// Noise instructions that can flip the detector, increasing.
    pub syndrome_support: Vec<usize>,
}

/// Measurement set reporting the value of one correlation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    /// Annotation index.
    pub index: u32,
    /// Members, increasing.
    pub measurements: Vec<MeasurementIndex>,
    /// Surface the observable reports.
    pub surface: CorrelationSurface,
}

/// Compiled circuit together with its detector and observable annotations.
///
/// The operational instructions of the circuit are never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedCircuit {
    circuit: CompiledCircuit,
    detectors: Vec<Detector>,
    observables: Vec<Observable>,
}

impl AnnotatedCircuit {
    pub(crate) fn new(
        circuit: CompiledCircuit,
        detectors: Vec<Detector>,
        observables: Vec<Observable>,
    ) -> Self {
        Self {
            circuit,
            detectors,
            observables,
        }
    }

    /// Underlying (noisy) circuit.
    pub fn circuit(&self) -> &CompiledCircuit {
        &self.circuit
    }

    /// Detectors, ordered by anchor.
    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// Observables, ordered by annotation index.
    pub fn observables(&self) -> &[Observable] {
        &self.observables
    }

    /// Operational stream followed by the detector and observable
    /// annotations, with records as negative look-backs.
    pub fn to_instructions(&self) -> Vec<Instruction> {
        let records = MeasurementRecords::new(&self.circuit);
        let mut out = self.circuit.to_instructions();
        out.reserve(self.detectors.len() + self.observables.len());
        for detector in &self.detectors {
            out.push(Instruction::Detector {
                records: records.relative(detector.measurements.iter().copied()),
                coordinates: detector.coordinates,
            });
        }
        for observable in &self.observables {
            out.push(Instruction::Observable {
                index: observable.index,
                records: records.relative(observable.measurements.iter().copied()),
            });
        }
        out
    }

    /// SHA-256 hex digest of the canonical bincode encoding.
    pub fn canonical_hash(&self) -> Result<String, LscError> {
        let bytes = bincode::serialize(self)
            .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Serializes the annotated circuit to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LscError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
    }
}
