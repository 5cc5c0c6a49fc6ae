use std::collections::BTreeMap;

use lsc_compile::compile_many;
use lsc_core::{ContextExt, ErrorInfo, LscError, SchemaVersion};
use lsc_detect::{synthesize, AnnotatedCircuit};
use lsc_flow::{find_correlation_surfaces, solve_surfaces, CorrelationSurface, SurfaceBasis};
use lsc_graph::{canonical_hash, SpacetimeGraph};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::PipelineConfig;

/// Summary of the compilation at one size parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    /// Size parameter.
    pub k: u32,
    /// Hash of the noisy circuit.
    pub circuit_hash: String,
    /// Hash of the circuit with its annotations.
    pub annotated_hash: String,
    /// Number of qubits.
    pub qubits: usize,
    /// Number of instructions, separators excluded.
    pub instructions: usize,
    /// Number of measurements.
    pub measurements: usize,
    /// Number of detectors.
    pub detectors: usize,
    /// Number of observables.
    pub observables: usize,
}

/// Deterministic record of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Schema of the report payload.
    pub schema_version: SchemaVersion,
    /// Canonical hash of the input graph.
    pub graph_hash: String,
    /// Configuration the run used.
    pub config: PipelineConfig,
    /// Correlation surface basis of the graph.
    pub surfaces: Vec<CorrelationSurface>,
    /// Why the graph carries no observable, when its basis is empty.
    pub no_observable: Option<ErrorInfo>,
    /// One entry per size parameter, by increasing `k`.
    pub sizes: Vec<SizeReport>,
}

impl PipelineReport {
    /// SHA-256 hex digest of the canonical bincode encoding.
    pub fn canonical_hash(&self) -> Result<String, LscError> {
        let bytes = bincode::serialize(self)
            .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LscError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Surface basis of the graph.
    pub basis: SurfaceBasis,
    /// Annotated circuit per size parameter.
    pub circuits: BTreeMap<u32, AnnotatedCircuit>,
    /// Summary with hashes.
    pub report: PipelineReport,
}

/// Validates `graph`, solves its flows, compiles it at every configured size
/// and annotates each circuit with detectors and observables.
///
/// Structural errors are reported before any compilation starts. A graph
/// without observables is still compiled and annotated with detectors; the
/// gap is recorded in the report and only fails the run when the selection
/// names surfaces.
#[tracing::instrument(skip(graph, config), fields(cubes = graph.cube_count(), sizes = config.sizes.len()))]
pub fn run(graph: &SpacetimeGraph, config: &PipelineConfig) -> Result<PipelineOutput, LscError> {
    config.validate()?;
    graph.validate()?;
    let (basis, no_observable) = match find_correlation_surfaces(graph) {
        Ok(basis) => (basis, None),
        Err(err) if err.code() == "no-observable-found" && !config.observables.names_surfaces() => {
            warn!(code = err.code(), "graph has no observable; annotating detectors only");
            (solve_surfaces(graph)?, Some(err.info().clone()))
        }
        Err(err) => return Err(err),
    };
    let compiled = compile_many(graph, &config.sizes)?;
    let options = config.synthesis_options();

    let mut circuits = BTreeMap::new();
    let mut sizes = Vec::with_capacity(compiled.len());
    for (k, circuit) in compiled {
        let annotated = synthesize(&circuit, &config.noise, &basis, &options)
            .map_err(|err| err.with_context("k", k))?;
        let noisy = annotated.circuit();
        sizes.push(SizeReport {
            k,
            circuit_hash: noisy.canonical_hash()?,
            annotated_hash: annotated.canonical_hash()?,
            qubits: noisy.qubit_count(),
            instructions: noisy.instruction_count(),
            measurements: noisy.measurement_count(),
            detectors: annotated.detectors().len(),
            observables: annotated.observables().len(),
        });
        circuits.insert(k, annotated);
    }

    let report = PipelineReport {
        schema_version: SchemaVersion::default(),
        graph_hash: canonical_hash(graph),
        config: config.clone(),
        surfaces: basis.surfaces().to_vec(),
        no_observable,
        sizes,
    };
    info!(sizes = report.sizes.len(), surfaces = report.surfaces.len(), "pipeline finished");
    Ok(PipelineOutput {
        basis,
        circuits,
        report,
    })
}
