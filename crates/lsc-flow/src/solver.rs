use std::collections::BTreeMap;

use lsc_core::{Basis, BitMatrix, BitVec, ErrorInfo, LscError, XorBasis};
use lsc_graph::SpacetimeGraph;
use tracing::debug;

use crate::surface::{CorrelationSurface, SurfaceWire};
use crate::zx::{Wire, ZxGraph};

/// Builds the GF(2) constraint system for surfaces of Pauli type `basis`, one
/// column per wire.
///
/// Spiders whose colour matches `basis` force all incident wires equal. The
/// others force an even number of incident wires. Ports add nothing, so their
/// wires are free.
pub fn constraint_matrix(zx: &ZxGraph, basis: Basis) -> BitMatrix {
    let mut matrix = BitMatrix::new(zx.wires().len());
    for spider in zx.spiders() {
        let incident = zx.incident_wires(spider.cube);
        if spider.color.basis() == basis {
            for pair in incident.windows(2) {
                matrix.push_sparse_row([pair[0], pair[1]]);
            }
        } else if !incident.is_empty() {
            matrix.push_sparse_row(incident);
        }
    }
    matrix
}

/// Pauli types a surface can carry.
const SURFACE_TYPES: [Basis; 2] = [Basis::Z, Basis::X];

/// Canonical basis of correlation surfaces of one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceBasis {
    surfaces: Vec<CorrelationSurface>,
    wires: Vec<Wire>,
    constraints: BTreeMap<Basis, BitMatrix>,
    graph_hash: String,
}

impl SurfaceBasis {
    /// Surfaces in canonical order.
    pub fn surfaces(&self) -> &[CorrelationSurface] {
        &self.surfaces
    }

    /// Surface at `index`.
    pub fn get(&self, index: usize) -> Option<&CorrelationSurface> {
        self.surfaces.get(index)
    }

    /// Number of independent surfaces.
    pub fn rank(&self) -> usize {
        self.surfaces.len()
    }

    /// Identity of the solved graph, the cache key of the basis.
    pub fn graph_hash(&self) -> &str {
        &self.graph_hash
    }

    /// Number of independent surfaces of Pauli type `basis`.
    pub fn rank_of(&self, basis: Basis) -> usize {
        self.surfaces
            .iter()
            .filter(|surface| surface.basis() == basis)
            .count()
    }

    /// Checks that a caller-supplied surface satisfies every spider constraint
    /// of its Pauli type.
    pub fn verify(&self, surface: &CorrelationSurface) -> Result<(), LscError> {
        let constraints = self.constraints.get(&surface.basis()).ok_or_else(|| {
            LscError::Algebraic(
                ErrorInfo::new("surface-not-in-kernel", "surfaces carry X or Z only")
                    .with_context("basis", format!("{:?}", surface.basis())),
            )
        })?;
        let mut vector = BitVec::zeros(self.wires.len());
        for wire in surface.wires() {
            let index = self
                .wires
                .iter()
                .position(|candidate| candidate.pipe == wire.pipe)
                .ok_or_else(|| {
                    LscError::Algebraic(
                        ErrorInfo::new("surface-not-in-kernel", "surface names an unknown wire")
                            .with_context("pipe", wire.pipe.to_string()),
                    )
                })?;
            vector.flip(index);
        }
        if surface.is_trivial() {
            return Err(LscError::Algebraic(ErrorInfo::new(
                "surface-not-in-kernel",
                "surface has no wires",
            )));
        }
        if !constraints.annihilates(&vector) {
            return Err(LscError::Algebraic(
                ErrorInfo::new(
                    "surface-not-in-kernel",
                    "surface violates a spider constraint",
                )
                .with_context("wires", surface.wires().len().to_string())
                .with_context("basis", format!("{:?}", surface.basis())),
            ));
        }
        Ok(())
    }

    /// Expresses `surface` over the basis surfaces of its Pauli type,
    /// returning their positions in the basis.
    pub fn decompose(&self, surface: &CorrelationSurface) -> Option<Vec<usize>> {
        let mut basis = XorBasis::new();
        let mut positions = Vec::new();
        for (position, candidate) in self.surfaces.iter().enumerate() {
            if candidate.basis() == surface.basis() {
                basis.insert(self.vector_of(candidate)?);
                positions.push(position);
            }
        }
        let combination = basis.express(&self.vector_of(surface)?)?;
        Some(combination.into_iter().map(|tag| positions[tag]).collect())
    }

    fn vector_of(&self, surface: &CorrelationSurface) -> Option<BitVec> {
        let mut vector = BitVec::zeros(self.wires.len());
        for wire in surface.wires() {
            let index = self.wires.iter().position(|w| w.pipe == wire.pipe)?;
            vector.flip(index);
        }
        Some(vector)
    }
}

/// Finds a canonical basis of the correlation surfaces of a validated graph.
///
/// A graph without any surface is an [`LscError::Algebraic`] with code
/// `no-observable-found`; callers that can proceed without observables use
/// [`solve_surfaces`] instead.
pub fn find_correlation_surfaces(graph: &SpacetimeGraph) -> Result<SurfaceBasis, LscError> {
    let basis = solve_surfaces(graph)?;
    if basis.surfaces.is_empty() {
        return Err(LscError::Algebraic(
            ErrorInfo::new("no-observable-found", "flow systems have trivial null spaces")
                .with_context("graph", basis.graph_hash.clone())
                .with_context("wires", basis.wires.len().to_string())
                .with_hint("open a port or remove the cap that pins the observable"),
        ));
    }
    Ok(basis)
}

/// Solves the flow systems of a validated graph; the basis may be empty.
///
/// Z-type and X-type surfaces are solved separately. Each null space is
/// brought to reduced row-echelon form over the canonical wire order; the
/// union is sorted by endpoint coordinates, then by Pauli type.
#[tracing::instrument(skip(graph), fields(cubes = graph.cube_count(), pipes = graph.pipe_count()))]
pub fn solve_surfaces(graph: &SpacetimeGraph) -> Result<SurfaceBasis, LscError> {
    graph.validate()?;
    let zx = ZxGraph::project(graph);

    let mut surfaces: Vec<CorrelationSurface> = Vec::new();
    let mut constraints = BTreeMap::new();
    for basis in SURFACE_TYPES {
        let matrix = constraint_matrix(&zx, basis);
        let mut kernel = BitMatrix::new(zx.wires().len());
        for vector in matrix.nullspace() {
            kernel.push_row(vector);
        }
        kernel.rref();
        let before = surfaces.len();
        surfaces.extend(kernel.into_rows().into_iter().map(|row| {
            CorrelationSurface::from_wires(
                basis,
                row.ones().map(|idx| SurfaceWire::from(&zx.wires()[idx])),
            )
        }));
        debug!(
            basis = ?basis,
            rank = surfaces.len() - before,
            constraints = matrix.rows().len(),
            "flow system solved"
        );
        constraints.insert(basis, matrix);
    }
    surfaces.sort_by_key(CorrelationSurface::canonical_key);

    Ok(SurfaceBasis {
        surfaces,
        wires: zx.wires().to_vec(),
        constraints,
        graph_hash: zx.graph_hash().to_string(),
    })
}
