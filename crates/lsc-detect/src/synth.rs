use lsc_compile::CompiledCircuit;
use lsc_core::{ContextExt, ErrorInfo, Instruction, LscError};
use lsc_flow::SurfaceBasis;
use lsc_noise::{apply_circuit, NoiseModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::annotated::{AnnotatedCircuit, Detector};
use crate::coverage::check_coverage;
use crate::observables::{build_observables, ObservableSelection};
use crate::radius::{Radii, RadiusPolicy};
use crate::search::{minimize, validate, windowed_search};
use crate::sensitivity::Sensitivity;

/// Tunables of the detector and observable synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Neighbourhood radius of the detector search.
    pub radius: RadiusPolicy,
    /// Surfaces to annotate as observables.
    pub observables: ObservableSelection,
}

/// Annotates `circuit` with a complete, minimal detector set and one
/// observable per selected surface.
///
/// A circuit without noise instructions is first rewritten with `model`,
/// unless the model is noiseless. The operational instructions are kept
/// verbatim.
#[tracing::instrument(
    skip(circuit, model, basis, options),
    fields(k = circuit.k(), measurements = circuit.measurement_count())
)]
pub fn synthesize(
    circuit: &CompiledCircuit,
    model: &NoiseModel,
    basis: &SurfaceBasis,
    options: &SynthesisOptions,
) -> Result<AnnotatedCircuit, LscError> {
    options.radius.validate()?;
    model.validate()?;
    if basis.graph_hash() != circuit.graph_hash() {
        return Err(LscError::Config(
            ErrorInfo::new(
                "graph-mismatch",
                "surface basis and circuit come from different graphs",
            )
            .with_context("basis", basis.graph_hash())
            .with_context("circuit", circuit.graph_hash()),
        ));
    }

    let has_noise = circuit
        .instructions()
        .iter()
        .any(|instruction| matches!(instruction, Instruction::Noise(_)));
    let noisy = if has_noise || model.is_noiseless() {
        circuit.clone()
    } else {
        apply_circuit(model, circuit)?
    };
    let surfaces = options.observables.select(basis)?;
    let sensitivity = Sensitivity::compute(&noisy);
    debug!(
        measurements = sensitivity.len(),
        surfaces = surfaces.len(),
        "sensitivity computed"
    );

    let mut attempts = options.radius.attempts().into_iter().peekable();
    while let Some(radii) = attempts.next() {
        match attempt(&noisy, &sensitivity, &radii) {
            Err(LscError::IncompleteDetectorCoverage(info)) if attempts.peek().is_some() => {
                debug!(
                    radius = radii.max(),
                    uncovered = ?info.context.get("uncovered"),
                    "retrying with a larger radius"
                );
            }
            Err(err) => return Err(err.with_context("radius", radii.max())),
            Ok(detectors) => {
                let observables = build_observables(&noisy, &surfaces, &detectors)?;
                info!(
                    radius = radii.max(),
                    detectors = detectors.len(),
                    observables = observables.len(),
                    "synthesis finished"
                );
                return Ok(AnnotatedCircuit::new(noisy, detectors, observables));
            }
        }
    }
    Err(LscError::Config(ErrorInfo::new(
        "invalid-radius",
        "radius policy yields no attempt",
    )))
}

fn attempt(
    circuit: &CompiledCircuit,
    sensitivity: &Sensitivity,
    radii: &Radii,
) -> Result<Vec<Detector>, LscError> {
    check_coverage(circuit, sensitivity, radii)?;
    let candidates = windowed_search(circuit, sensitivity, radii);
    let detectors = validate(circuit, sensitivity, candidates)?;
    Ok(minimize(detectors))
}
