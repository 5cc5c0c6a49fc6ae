//! Measurement sets reporting the value of chosen correlation surfaces.

use std::collections::BTreeSet;

use lsc_compile::{CompiledCircuit, OriginKind, ProvenanceMap};
use lsc_core::{ErrorInfo, LscError, MeasurementIndex, PipeKind};
use lsc_flow::{CorrelationSurface, SurfaceBasis};
use lsc_template::Role;
use serde::{Deserialize, Serialize};

use crate::annotated::{Detector, Observable};

/// Which correlation surfaces become observable annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ObservableSelection {
    /// Every surface of the basis, in basis order.
    #[default]
    All,
    /// The basis surfaces at the given positions.
    Indices {
        /// Positions in the basis.
        indices: Vec<usize>,
    },
    /// Caller-supplied surfaces, checked against the flow constraints.
    Custom {
        /// Surfaces to annotate.
        surfaces: Vec<CorrelationSurface>,
    },
}

impl ObservableSelection {
    /// True when the selection asks for specific surfaces.
    pub fn names_surfaces(&self) -> bool {
        match self {
            ObservableSelection::All => false,
            ObservableSelection::Indices { indices } => !indices.is_empty(),
            ObservableSelection::Custom { surfaces } => !surfaces.is_empty(),
        }
    }

    /// Resolves the selection against `basis`.
    pub fn select(&self, basis: &SurfaceBasis) -> Result<Vec<CorrelationSurface>, LscError> {
        match self {
            ObservableSelection::All => Ok(basis.surfaces().to_vec()),
            ObservableSelection::Indices { indices } => indices
                .iter()
                .map(|index| {
                    basis.get(*index).cloned().ok_or_else(|| {
                        LscError::Config(
                            ErrorInfo::new(
                                "observable-index-out-of-range",
                                "selected surface is not in the basis",
                            )
                            .with_context("index", index.to_string())
                            .with_context("rank", basis.rank().to_string()),
                        )
                    })
                })
                .collect(),
            ObservableSelection::Custom { surfaces } => {
                for surface in surfaces {
                    basis.verify(surface)?;
                }
                Ok(surfaces.clone())
            }
        }
    }
}

/// Builds one observable per surface: seed set, then greedy reduction by
/// zero-parity detectors.
pub(crate) fn build_observables(
    circuit: &CompiledCircuit,
    surfaces: &[CorrelationSurface],
    detectors: &[Detector],
) -> Result<Vec<Observable>, LscError> {
    let reducers: Vec<BTreeSet<MeasurementIndex>> = detectors
        .iter()
        .filter(|detector| !detector.expected_parity)
        .map(|detector| detector.measurements.iter().copied().collect())
        .collect();

    surfaces
        .iter()
        .enumerate()
        .map(|(index, surface)| {
            let mut set = seed(circuit.provenance(), surface);
            loop {
                let mut shrunk = false;
                for reducer in &reducers {
                    let next: BTreeSet<MeasurementIndex> =
                        set.symmetric_difference(reducer).copied().collect();
                    if next.len() < set.len() {
                        set = next;
                        shrunk = true;
                    }
                }
                if !shrunk {
                    break;
                }
            }
            if set.is_empty() {
                let pipes: Vec<String> = surface.pipes().iter().map(ToString::to_string).collect();
                return Err(LscError::Algebraic(
                    ErrorInfo::new(
                        "unmeasurable-observable",
                        "surface reduces to an empty measurement set",
                    )
                    .with_context("observable", index.to_string())
                    .with_context("pipes", pipes.join(", ")),
                ));
            }
            Ok(Observable {
                index: index as u32,
                measurements: set.into_iter().collect(),
                surface: surface.clone(),
            })
        })
        .collect()
}

/// Readouts of data column zero of every touched cube, plus the first
/// stabilizer round of every touched seam that starts fresh. Only
/// measurements in the surface's Pauli type contribute.
fn seed(provenance: &ProvenanceMap, surface: &CorrelationSurface) -> BTreeSet<MeasurementIndex> {
    let pauli = surface.basis();
    let mut set = BTreeSet::new();
    let mut toggle = |index: MeasurementIndex| {
        if !set.remove(&index) {
            set.insert(index);
        }
    };

    for cube in surface.cubes() {
        let Some(origin) = provenance.cube_origin(cube) else {
            continue;
        };
        for index in provenance.measurements_of_origin(origin) {
            let Some(record) = provenance.instructions().get(instruction_of(provenance, index))
            else {
                continue;
            };
            let on_column = record.local.first().is_some_and(|pos| pos.x == 0);
            if on_column && record.role == (Role::DataReadout { basis: pauli }) {
                toggle(index);
            }
        }
    }

    for pipe in surface.pipes() {
        let Some(origin) = provenance.pipe_origin(pipe) else {
            continue;
        };
        if !is_spatial(provenance, origin) {
            continue;
        }
        let fresh = provenance
            .instructions()
            .iter()
            .any(|record| record.origin == origin && record.role == Role::DataInit);
        if !fresh {
            continue;
        }
        for index in provenance.measurements_of_origin(origin) {
            let Some(record) = provenance.instructions().get(instruction_of(provenance, index))
            else {
                continue;
            };
            let first_round = record.round == 1;
            if first_round && matches!(record.role, Role::Stabilizer { basis, .. } if basis == pauli)
            {
                toggle(index);
            }
        }
    }
    set
}

fn instruction_of(provenance: &ProvenanceMap, index: MeasurementIndex) -> usize {
    provenance
        .measurement(index)
        .map_or(usize::MAX, |record| record.instruction)
}

fn is_spatial(provenance: &ProvenanceMap, origin: usize) -> bool {
    provenance.origins().get(origin).is_some_and(|pipe| {
        matches!(pipe.kind, OriginKind::Pipe { kind: PipeKind::Spatial(_), .. })
    })
}
