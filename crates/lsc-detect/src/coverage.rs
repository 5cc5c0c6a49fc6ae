//! Coverage of coverable measurements by local detectors.

use std::collections::BTreeSet;

use lsc_compile::CompiledCircuit;
use lsc_core::{ErrorInfo, Insertion, LscError, MeasurementIndex, XorBasis};
use tracing::debug;

use crate::radius::{neighbourhood, Radii};
use crate::sensitivity::Sensitivity;

/// Measurements that belong to some deterministic set of the whole circuit.
pub(crate) fn coverable(sensitivity: &Sensitivity) -> BTreeSet<usize> {
    let mut basis = XorBasis::new();
    let mut out = BTreeSet::new();
    for idx in 0..sensitivity.len() {
        if let Insertion::Dependent { combination } = basis.insert(sensitivity.vector(idx).clone())
        {
            out.insert(idx);
            out.extend(combination);
        }
    }
    out
}

/// Checks that every coverable measurement is spanned by its neighbourhood.
pub(crate) fn check_coverage(
    circuit: &CompiledCircuit,
    sensitivity: &Sensitivity,
    radii: &Radii,
) -> Result<(), LscError> {
    let coords = sensitivity.coords();
    let coverable = coverable(sensitivity);
    let uncovered: Vec<usize> = coverable
        .iter()
        .copied()
        .filter(|m| {
            let vector = sensitivity.vector(*m);
            if vector.is_zero() {
                return false;
            }
            let radius = radii.of(circuit.provenance(), MeasurementIndex::from_index(*m));
            let mut basis = XorBasis::new();
            for j in neighbourhood(coords, *m, radius, false) {
                basis.insert(sensitivity.vector(j).clone());
            }
            basis.express(vector).is_none()
        })
        .collect();
    debug!(
        coverable = coverable.len(),
        uncovered = uncovered.len(),
        "coverage check finished"
    );
    if uncovered.is_empty() {
        return Ok(());
    }

    let span = |axis: fn(&lsc_core::SpacetimeCoords) -> i64| {
        let values = uncovered.iter().map(|m| axis(&coords[*m]));
        let lo = values.clone().min().unwrap_or_default();
        let hi = values.max().unwrap_or_default();
        format!("{lo}..={hi}")
    };
    let origins: BTreeSet<String> = uncovered
        .iter()
        .filter_map(|m| {
            circuit
                .provenance()
                .origin_of_measurement(MeasurementIndex::from_index(*m))
        })
        .map(ToString::to_string)
        .collect();
    let origins: Vec<String> = origins.into_iter().collect();
    Err(LscError::IncompleteDetectorCoverage(
        ErrorInfo::new(
            "incomplete-detector-coverage",
            "some coverable measurements have no detector inside the search radius",
        )
        .with_context("x", span(|c| c.x))
        .with_context("y", span(|c| c.y))
        .with_context("t", span(|c| c.t))
        .with_context("origins", origins.join("; "))
        .with_context("uncovered", uncovered.len().to_string())
        .with_context("radius", radii.max().to_string())
        .with_hint("retry with a larger search radius or an adaptive radius policy"),
    ))
}
