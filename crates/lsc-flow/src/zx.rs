//! One-way projection of a spacetime graph into a ZX diagram.

use std::collections::BTreeMap;

use lsc_core::{Basis, CubeId, CubeKind, PipeId, Position};
use lsc_graph::{canonical_hash, SpacetimeGraph};
use serde::{Deserialize, Serialize};

/// Colour of a spider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpiderColor {
    /// Z spider.
    Z,
    /// X spider.
    X,
}

impl SpiderColor {
    /// Pauli type copied onto every leg; the other type needs even parity.
    pub const fn basis(self) -> Basis {
        match self {
            SpiderColor::Z => Basis::Z,
            SpiderColor::X => Basis::X,
        }
    }
}

/// Phase of a spider, restricted to Pauli phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Phase 0.
    Zero,
    /// Phase π.
    Pi,
}

/// Spider projected from a cube that owns qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spider {
    /// Source cube.
    pub cube: CubeId,
    /// Position of the source cube.
    pub position: Position,
    /// Colour.
    pub color: SpiderColor,
    /// Phase.
    pub phase: Phase,
    /// Number of incident wires.
    pub arity: usize,
}

/// Open boundary projected from a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryVertex {
    /// Source port.
    pub cube: CubeId,
    /// Position of the port.
    pub position: Position,
}

/// Wire projected from a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// Source pipe.
    pub pipe: PipeId,
    /// Endpoint cubes, lower position first.
    pub cubes: [CubeId; 2],
    /// Endpoint positions, lower first.
    pub endpoints: [Position; 2],
}

/// ZX view of a spacetime graph. A fresh value, never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZxGraph {
    spiders: Vec<Spider>,
    boundaries: Vec<BoundaryVertex>,
    wires: Vec<Wire>,
    graph_hash: String,
}

impl ZxGraph {
    /// Projects `graph`. Wires are sorted by endpoint positions.
    pub fn project(graph: &SpacetimeGraph) -> ZxGraph {
        let mut wires: Vec<Wire> = graph
            .pipes()
            .filter_map(|pipe| {
                let lower = graph.cube(pipe.lower()).ok()?;
                let upper = graph.cube(pipe.upper()).ok()?;
                Some(Wire {
                    pipe: pipe.id,
                    cubes: [lower.id, upper.id],
                    endpoints: [lower.position, upper.position],
                })
            })
            .collect();
        wires.sort_by_key(|wire| wire.endpoints);

        let mut arity: BTreeMap<CubeId, usize> = BTreeMap::new();
        for wire in &wires {
            for cube in wire.cubes {
                *arity.entry(cube).or_default() += 1;
            }
        }

        let mut cubes: Vec<_> = graph.cubes().copied().collect();
        cubes.sort_by_key(|cube| cube.position);
        let mut spiders = Vec::new();
        let mut boundaries = Vec::new();
        for cube in cubes {
            let (color, phase) = match cube.kind {
                CubeKind::Z | CubeKind::Boundary => (SpiderColor::Z, Phase::Zero),
                CubeKind::X => (SpiderColor::X, Phase::Zero),
                CubeKind::Y => (SpiderColor::X, Phase::Pi),
                CubeKind::Port => {
                    boundaries.push(BoundaryVertex {
                        cube: cube.id,
                        position: cube.position,
                    });
                    continue;
                }
            };
            spiders.push(Spider {
                cube: cube.id,
                position: cube.position,
                color,
                phase,
                arity: arity.get(&cube.id).copied().unwrap_or_default(),
            });
        }

        Self {
            spiders,
            boundaries,
            wires,
            graph_hash: canonical_hash(graph),
        }
    }

    /// Spiders in position order.
    pub fn spiders(&self) -> &[Spider] {
        &self.spiders
    }

    /// Open boundaries in position order.
    pub fn boundaries(&self) -> &[BoundaryVertex] {
        &self.boundaries
    }

    /// Wires in canonical order; a wire's index is its variable in the flow system.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Indices of the wires incident to `cube`, increasing.
    pub fn incident_wires(&self, cube: CubeId) -> Vec<usize> {
        self.wires
            .iter()
            .enumerate()
            .filter(|(_, wire)| wire.cubes.contains(&cube))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Canonical hash of the projected graph.
    pub fn graph_hash(&self) -> &str {
        &self.graph_hash
    }
}
