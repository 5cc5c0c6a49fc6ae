use std::collections::BTreeSet;

use lsc_core::{Basis, CubeId, ErrorInfo, LscError, PipeId, Position};
use serde::{Deserialize, Serialize};

use crate::zx::Wire;

/// One independent logical observable: a set of wires closed under every
/// spider constraint for its Pauli type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationSurface {
    basis: Basis,
    wires: Vec<SurfaceWire>,
}

/// Wire of a surface with its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceWire {
    /// Endpoint positions, lower first.
    pub endpoints: [Position; 2],
    /// Endpoint cubes, lower first.
    pub cubes: [CubeId; 2],
    /// Source pipe.
    pub pipe: PipeId,
}

impl From<&Wire> for SurfaceWire {
    fn from(wire: &Wire) -> Self {
        Self {
            endpoints: wire.endpoints,
            cubes: wire.cubes,
            pipe: wire.pipe,
        }
    }
}

impl CorrelationSurface {
    /// Builds a surface of Pauli type `basis` from its wires; duplicates cancel.
    pub fn from_wires(basis: Basis, wires: impl IntoIterator<Item = SurfaceWire>) -> Self {
        let mut set: BTreeSet<SurfaceWire> = BTreeSet::new();
        for wire in wires {
            if !set.remove(&wire) {
                set.insert(wire);
            }
        }
        Self {
            basis,
            wires: set.into_iter().collect(),
        }
    }

    /// Symmetric difference with a surface of the same Pauli type.
    pub fn combine(&self, other: &CorrelationSurface) -> Result<CorrelationSurface, LscError> {
        if self.basis != other.basis {
            return Err(LscError::Algebraic(
                ErrorInfo::new("mixed-surface-types", "surfaces of different Pauli types do not combine")
                    .with_context("left", format!("{:?}", self.basis))
                    .with_context("right", format!("{:?}", other.basis)),
            ));
        }
        Ok(Self::from_wires(
            self.basis,
            self.wires.iter().chain(other.wires.iter()).copied(),
        ))
    }

    /// Pauli type carried along the wires.
    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// True when the surface has no wire.
    pub fn is_trivial(&self) -> bool {
        self.wires.is_empty()
    }

    /// Wires sorted by endpoint positions.
    pub fn wires(&self) -> &[SurfaceWire] {
        &self.wires
    }

    /// Pipes of the surface, increasing.
    pub fn pipes(&self) -> BTreeSet<PipeId> {
        self.wires.iter().map(|wire| wire.pipe).collect()
    }

    /// Cubes touched by some wire, increasing.
    pub fn cubes(&self) -> BTreeSet<CubeId> {
        self.wires.iter().flat_map(|wire| wire.cubes).collect()
    }

    /// Endpoint coordinate list used for canonical ordering.
    pub fn endpoint_key(&self) -> Vec<[Position; 2]> {
        self.wires.iter().map(|wire| wire.endpoints).collect()
    }

    /// Canonical order of a basis: endpoint coordinates, then Pauli type.
    pub fn canonical_key(&self) -> (Vec<[Position; 2]>, Basis) {
        (self.endpoint_key(), self.basis)
    }
}
