//! Windowed detector search, exact validation and minimality.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use lsc_compile::CompiledCircuit;
use lsc_core::{ErrorInfo, LscError, MeasurementIndex, XorBasis};
use tracing::debug;

use crate::annotated::Detector;
use crate::propagate::back_propagate;
use crate::radius::{distance, neighbourhood, Radii};
use crate::sensitivity::Sensitivity;

/// Candidate detectors, one per anchor whose vector lies in the span of its
/// earlier neighbourhood. Sets are sorted and the anchor is the last member.
pub(crate) fn windowed_search(
    circuit: &CompiledCircuit,
    sensitivity: &Sensitivity,
    radii: &Radii,
) -> Vec<Vec<MeasurementIndex>> {
    let coords = sensitivity.coords();
    let mut candidates = Vec::new();
    for anchor in 0..sensitivity.len() {
        let radius = radii.of(circuit.provenance(), MeasurementIndex::from_index(anchor));
        let vector = sensitivity.vector(anchor);
        if vector.is_zero() {
            candidates.push(vec![MeasurementIndex::from_index(anchor)]);
            continue;
        }
        let mut window = neighbourhood(coords, anchor, radius, true);
        window.sort_by_key(|j| (distance(&coords[anchor], &coords[*j]), Reverse(*j)));
        let mut basis = XorBasis::new();
        for j in &window {
            basis.insert(sensitivity.vector(*j).clone());
        }
        if let Some(combination) = basis.express(vector) {
            let mut set: Vec<MeasurementIndex> = combination
                .into_iter()
                .map(|tag| MeasurementIndex::from_index(window[tag]))
                .collect();
            set.push(MeasurementIndex::from_index(anchor));
            set.sort();
            candidates.push(set);
        }
    }
    debug!(candidates = candidates.len(), "windowed search finished");
    candidates
}

/// Re-checks every candidate by exact propagation and records its parity
/// and syndrome support.
pub(crate) fn validate(
    circuit: &CompiledCircuit,
    sensitivity: &Sensitivity,
    candidates: Vec<Vec<MeasurementIndex>>,
) -> Result<Vec<Detector>, LscError> {
    let coords = sensitivity.coords();
    candidates
        .into_iter()
        .map(|measurements| {
            let set: BTreeSet<MeasurementIndex> = measurements.iter().copied().collect();
            let propagation = back_propagate(circuit, sensitivity.layout(), &set, true);
            let anchor = set.last().map(|m| coords[m.index()]).unwrap_or_default();
            if !propagation.is_deterministic() {
                return Err(LscError::Algebraic(
                    ErrorInfo::new(
                        "detector-not-deterministic",
                        "candidate detector does not commute with the circuit",
                    )
                    .with_context("measurements", format_set(&measurements))
                    .with_context("anchor", anchor.to_string())
                    .with_context("violations", propagation.events.len().to_string()),
                ));
            }
            Ok(Detector {
                measurements,
                coordinates: anchor,
                expected_parity: propagation.parity,
                syndrome_support: propagation.syndrome_support,
            })
        })
        .collect()
}

/// Drops every detector that strictly contains another with the same
/// syndrome support, and exact duplicates after the first.
pub(crate) fn minimize(detectors: Vec<Detector>) -> Vec<Detector> {
    let mut groups: BTreeMap<&[usize], Vec<usize>> = BTreeMap::new();
    for (idx, detector) in detectors.iter().enumerate() {
        groups
            .entry(detector.syndrome_support.as_slice())
            .or_default()
            .push(idx);
    }

    let mut dropped = BTreeSet::new();
    for members in groups.values() {
        let sets: Vec<BTreeSet<MeasurementIndex>> = members
            .iter()
            .map(|idx| detectors[*idx].measurements.iter().copied().collect())
            .collect();
        for (a, set_a) in sets.iter().enumerate() {
            for (b, set_b) in sets.iter().enumerate() {
                if a == b || dropped.contains(&members[b]) {
                    continue;
                }
                let strict = set_b.len() < set_a.len() && set_b.is_subset(set_a);
                let duplicate = b < a && set_b == set_a;
                if strict || duplicate {
                    dropped.insert(members[a]);
                    break;
                }
            }
        }
    }

    debug!(removed = dropped.len(), "minimality pass finished");
    detectors
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !dropped.contains(idx))
        .map(|(_, detector)| detector)
        .collect()
}

pub(crate) fn format_set(set: &[MeasurementIndex]) -> String {
    let items: Vec<String> = set.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use lsc_core::SpacetimeCoords;

    use super::*;

    fn detector(measurements: &[u32], support: &[usize]) -> Detector {
        Detector {
            measurements: measurements
                .iter()
                .map(|m| MeasurementIndex::from_raw(*m))
                .collect(),
            coordinates: SpacetimeCoords::default(),
            expected_parity: false,
            syndrome_support: support.to_vec(),
        }
    }

    #[test]
    fn strict_supersets_with_equal_support_are_dropped() {
        let kept = minimize(vec![
            detector(&[0, 1, 2], &[4]),
            detector(&[1, 2], &[4]),
            detector(&[0, 1, 2, 3], &[5]),
            detector(&[1, 2], &[4]),
        ]);
        assert_eq!(kept, vec![detector(&[1, 2], &[4]), detector(&[0, 1, 2, 3], &[5])]);
    }
}
