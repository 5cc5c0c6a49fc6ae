use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{
    errors::{ErrorInfo, LscError},
    Axis, ContextExt, CubeId, CubeKind, Face, PipeId, PipeKind, Position,
};

use crate::compat::compatible;
use crate::config::GraphConfig;

/// A placed cube. Immutable once added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    /// Arena identifier.
    pub id: CubeId,
    /// Lattice position.
    pub position: Position,
    /// Kind fixed at placement.
    pub kind: CubeKind,
}

/// A pipe between two lattice-adjacent cubes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipe {
    /// Arena identifier.
    pub id: PipeId,
    /// Endpoints, lower position first.
    pub endpoints: [CubeId; 2],
    /// Kind derived from the axis joining the endpoints.
    pub kind: PipeKind,
}

impl Pipe {
    /// Endpoint with the lower position.
    pub fn lower(&self) -> CubeId {
        self.endpoints[0]
    }

    /// Endpoint with the higher position.
    pub fn upper(&self) -> CubeId {
        self.endpoints[1]
    }

    /// Returns the endpoint opposite to `cube`, if `cube` is an endpoint.
    pub fn other(&self, cube: CubeId) -> Option<CubeId> {
        match self.endpoints {
            [a, b] if a == cube => Some(b),
            [a, b] if b == cube => Some(a),
            _ => None,
        }
    }
}

/// Deterministic spacetime graph of cubes and pipes.
#[derive(Debug, Clone)]
pub struct SpacetimeGraph {
    config: GraphConfig,
    cubes: Vec<Cube>,
    pipes: Vec<Pipe>,
    positions: BTreeMap<Position, CubeId>,
    incidence: Vec<BTreeSet<PipeId>>,
    pairs: BTreeMap<(CubeId, CubeId), PipeId>,
}

impl SpacetimeGraph {
    /// Creates an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Creates an empty graph with the provided configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            cubes: Vec::new(),
            pipes: Vec::new(),
            positions: BTreeMap::new(),
            incidence: Vec::new(),
            pairs: BTreeMap::new(),
        }
    }

    /// Returns the configuration used by this graph.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Places a cube. Fails when the position is already occupied.
    pub fn add_cube(&mut self, position: Position, kind: CubeKind) -> Result<CubeId, LscError> {
        if let Some(existing) = self.positions.get(&position) {
            return Err(LscError::Conflict(
                ErrorInfo::new("position-occupied", "a cube already occupies this position")
                    .with_context("position", position.to_string())
                    .with_context("existing", existing.to_string())
                    .with_context("kind", kind.label()),
            ));
        }
        let id = CubeId::from_index(self.cubes.len());
        self.cubes.push(Cube { id, position, kind });
        self.incidence.push(BTreeSet::new());
        self.positions.insert(position, id);
        Ok(id)
    }

    /// Joins two lattice-adjacent cubes with a pipe.
    pub fn add_pipe(&mut self, a: CubeId, b: CubeId) -> Result<PipeId, LscError> {
        if a == b {
            return Err(adjacency_error("self-loop", "a pipe cannot join a cube to itself")
                .with_context("cube", a));
        }
        let first = *self.cube(a)?;
        let second = *self.cube(b)?;
        let (lower, upper) = if first.position <= second.position {
            (first, second)
        } else {
            (second, first)
        };
        let face = lower.position.face_towards(&upper.position).ok_or_else(|| {
            adjacency_error("not-adjacent", "pipe endpoints are not lattice neighbours")
                .with_context("lower", lower.position)
                .with_context("upper", upper.position)
        })?;
        self.ensure_unique(lower.id, upper.id)?;
        let kind = PipeKind::along(face.axis());
        ensure_compatible(&lower, &upper, kind)?;
        if let PipeKind::Spatial(axis) = kind {
            self.ensure_single_axis(&lower, axis)?;
            self.ensure_single_axis(&upper, axis)?;
        }

        let id = PipeId::from_index(self.pipes.len());
        self.pipes.push(Pipe {
            id,
            endpoints: [lower.id, upper.id],
            kind,
        });
        self.incidence[lower.id.index()].insert(id);
        self.incidence[upper.id.index()].insert(id);
        self.pairs.insert((lower.id, upper.id), id);
        Ok(id)
    }

    /// Returns the cube with the provided identifier.
    pub fn cube(&self, id: CubeId) -> Result<&Cube, LscError> {
        self.cubes.get(id.index()).ok_or_else(|| {
            adjacency_error("unknown-cube", "cube does not exist").with_context("cube", id)
        })
    }

    /// Returns the pipe with the provided identifier.
    pub fn pipe(&self, id: PipeId) -> Result<&Pipe, LscError> {
        self.pipes.get(id.index()).ok_or_else(|| {
            adjacency_error("unknown-pipe", "pipe does not exist").with_context("pipe", id)
        })
    }

    /// Iterates over cubes in identifier order.
    pub fn cubes(&self) -> impl ExactSizeIterator<Item = &Cube> + '_ {
        self.cubes.iter()
    }

    /// Iterates over pipes in identifier order.
    pub fn pipes(&self) -> impl ExactSizeIterator<Item = &Pipe> + '_ {
        self.pipes.iter()
    }

    /// Number of placed cubes.
    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Number of placed pipes.
    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    /// Returns true when no cube has been placed.
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Cube occupying `position`, if any.
    pub fn cube_at(&self, position: Position) -> Option<CubeId> {
        self.positions.get(&position).copied()
    }

    /// Pipe joining `a` and `b` in either order, if any.
    pub fn pipe_between(&self, a: CubeId, b: CubeId) -> Option<PipeId> {
        self.pairs
            .get(&(a, b))
            .or_else(|| self.pairs.get(&(b, a)))
            .copied()
    }

    /// Pipes incident to `id`, in identifier order.
    pub fn pipes_of(&self, id: CubeId) -> Result<Vec<PipeId>, LscError> {
        self.cube(id)?;
        Ok(self.incidence[id.index()].iter().copied().collect())
    }

    /// Cubes joined to `id` by a pipe, in identifier order.
    pub fn neighbors(&self, id: CubeId) -> Result<Vec<CubeId>, LscError> {
        let mut neighbors = BTreeSet::new();
        for pipe in self.pipes_of(id)? {
            if let Some(other) = self.pipes[pipe.index()].other(id) {
                neighbors.insert(other);
            }
        }
        Ok(neighbors.into_iter().collect())
    }

    /// Number of pipes incident to `id`.
    pub fn degree(&self, id: CubeId) -> Result<usize, LscError> {
        self.cube(id)?;
        Ok(self.incidence[id.index()].len())
    }

    /// Pipe leaving `id` through `face`, if any.
    pub fn face_pipe(&self, id: CubeId, face: Face) -> Result<Option<PipeId>, LscError> {
        let cube = self.cube(id)?;
        Ok(self
            .cube_at(cube.position.neighbor(face))
            .and_then(|other| self.pipe_between(id, other)))
    }

    /// Face of `cube` through which `pipe` leaves.
    pub fn pipe_face(&self, pipe: PipeId, cube: CubeId) -> Result<Face, LscError> {
        let record = self.pipe(pipe)?;
        let other = record.other(cube).ok_or_else(|| {
            adjacency_error("not-an-endpoint", "cube is not an endpoint of the pipe")
                .with_context("pipe", pipe)
                .with_context("cube", cube)
        })?;
        let from = self.cube(cube)?.position;
        let to = self.cube(other)?.position;
        from.face_towards(&to).ok_or_else(|| {
            adjacency_error("not-adjacent", "pipe endpoints are not lattice neighbours")
                .with_context("pipe", pipe)
        })
    }

    fn ensure_unique(&self, lower: CubeId, upper: CubeId) -> Result<(), LscError> {
        if let Some(existing) = self.pairs.get(&(lower, upper)) {
            return Err(adjacency_error("duplicate-pipe", "a pipe already joins these cubes")
                .with_context("pipe", existing)
                .with_context("lower", lower)
                .with_context("upper", upper));
        }
        Ok(())
    }

    /// A cube carries spatial pipes along at most one axis.
    fn ensure_single_axis(&self, cube: &Cube, axis: Axis) -> Result<(), LscError> {
        let crossing = self.incidence[cube.id.index()].iter().find(|pipe| {
            matches!(self.pipes[pipe.index()].kind, PipeKind::Spatial(other) if other != axis)
        });
        if let Some(existing) = crossing {
            return Err(LscError::Adjacency(
                ErrorInfo::new(
                    "mixed-spatial-axes",
                    "cube would carry spatial pipes along both x and y",
                )
                .with_context("cube", cube.id.to_string())
                .with_context("position", cube.position.to_string())
                .with_context("existing", existing.to_string())
                .with_hint("route the junction through an extra layer"),
            ));
        }
        Ok(())
    }
}

impl Default for SpacetimeGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_compatible(lower: &Cube, upper: &Cube, kind: PipeKind) -> Result<(), LscError> {
    if compatible(lower.kind, upper.kind, kind) {
        return Ok(());
    }
    Err(
        adjacency_error("incompatible-kinds", "cube kinds cannot be joined by this pipe")
            .with_context("lower", format!("{}@{}", lower.kind, lower.position))
            .with_context("upper", format!("{}@{}", upper.kind, upper.position))
            .with_context("pipe-kind", kind),
    )
}

pub(crate) fn adjacency_error(code: &str, message: &str) -> LscError {
    LscError::Adjacency(ErrorInfo::new(code, message))
}
