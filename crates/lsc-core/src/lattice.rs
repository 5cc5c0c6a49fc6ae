//! Lattice vocabulary shared by the graph, template and compiler crates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::Basis;

/// Integer lattice position of a cube; `z` is the time axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    /// Spatial column.
    pub x: i32,
    /// Spatial row.
    pub y: i32,
    /// Time layer.
    pub z: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighbouring position across `face`.
    pub const fn neighbor(&self, face: Face) -> Position {
        let (dx, dy, dz) = face.offset();
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns the face of `self` that touches `other`, when the two are adjacent.
    pub fn face_towards(&self, other: &Position) -> Option<Face> {
        Face::ALL
            .into_iter()
            .find(|face| self.neighbor(*face) == *other)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Spatial columns.
    X,
    /// Spatial rows.
    Y,
    /// Time.
    Z,
}

impl Axis {
    /// True for `X` and `Y`.
    pub const fn is_spatial(self) -> bool {
        !matches!(self, Axis::Z)
    }
}

/// One of the six faces of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Face towards decreasing `x`.
    XMinus,
    /// Face towards increasing `x`.
    XPlus,
    /// Face towards decreasing `y`.
    YMinus,
    /// Face towards increasing `y`.
    YPlus,
    /// Face towards the previous layer.
    ZMinus,
    /// Face towards the next layer.
    ZPlus,
}

impl Face {
    /// Every face, in canonical order.
    pub const ALL: [Face; 6] = [
        Face::XMinus,
        Face::XPlus,
        Face::YMinus,
        Face::YPlus,
        Face::ZMinus,
        Face::ZPlus,
    ];

    /// The four spatial faces.
    pub const SPATIAL: [Face; 4] = [Face::XMinus, Face::XPlus, Face::YMinus, Face::YPlus];

    /// Axis normal to the face.
    pub const fn axis(self) -> Axis {
        match self {
            Face::XMinus | Face::XPlus => Axis::X,
            Face::YMinus | Face::YPlus => Axis::Y,
            Face::ZMinus | Face::ZPlus => Axis::Z,
        }
    }

    /// True for faces pointing towards increasing coordinates.
    pub const fn is_plus(self) -> bool {
        matches!(self, Face::XPlus | Face::YPlus | Face::ZPlus)
    }

    /// Face on the other side of the cube.
    pub const fn opposite(self) -> Face {
        match self {
            Face::XMinus => Face::XPlus,
            Face::XPlus => Face::XMinus,
            Face::YMinus => Face::YPlus,
            Face::YPlus => Face::YMinus,
            Face::ZMinus => Face::ZPlus,
            Face::ZPlus => Face::ZMinus,
        }
    }

    /// Unit lattice offset across the face.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::XMinus => (-1, 0, 0),
            Face::XPlus => (1, 0, 0),
            Face::YMinus => (0, -1, 0),
            Face::YPlus => (0, 1, 0),
            Face::ZMinus => (0, 0, -1),
            Face::ZPlus => (0, 0, 1),
        }
    }
}

/// Kind of a cube, fixed at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CubeKind {
    /// Patch prepared and read out in the Z basis.
    Z,
    /// Patch prepared and read out in the X basis, with rotated boundaries.
    X,
    /// Y-basis preparation or readout cap.
    Y,
    /// Patch whose faces towards ports stay open.
    Boundary,
    /// Open boundary of the computation; owns no qubits.
    Port,
}

impl CubeKind {
    /// Every kind, in canonical order.
    pub const ALL: [CubeKind; 5] = [
        CubeKind::Z,
        CubeKind::X,
        CubeKind::Y,
        CubeKind::Boundary,
        CubeKind::Port,
    ];

    /// Basis used for preparation and readout at closed time faces.
    pub const fn basis(self) -> Option<Basis> {
        match self {
            CubeKind::Z | CubeKind::Boundary => Some(Basis::Z),
            CubeKind::X => Some(Basis::X),
            CubeKind::Y => Some(Basis::Y),
            CubeKind::Port => None,
        }
    }

    /// Checkerboard orientation of the patch, when the kind owns qubits.
    pub const fn orientation(self) -> Option<Orientation> {
        match self {
            CubeKind::Z | CubeKind::Y | CubeKind::Boundary => Some(Orientation::ZAligned),
            CubeKind::X => Some(Orientation::XAligned),
            CubeKind::Port => None,
        }
    }

    /// Stable kebab-case label.
    pub const fn label(self) -> &'static str {
        match self {
            CubeKind::Z => "z",
            CubeKind::X => "x",
            CubeKind::Y => "y",
            CubeKind::Boundary => "boundary",
            CubeKind::Port => "port",
        }
    }
}

impl fmt::Display for CubeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Orientation of the stabilizer checkerboard of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Z plaquettes on even `(i + j)`; x-faces carry X-type boundaries.
    ZAligned,
    /// Z plaquettes on odd `(i + j)`; x-faces carry Z-type boundaries.
    XAligned,
}

impl Orientation {
    /// Stabilizer type of plaquette `(i, j)` in global plaquette coordinates.
    pub const fn plaquette_basis(self, i: i64, j: i64) -> Basis {
        let even = (i + j).rem_euclid(2) == 0;
        match (self, even) {
            (Orientation::ZAligned, true) | (Orientation::XAligned, false) => Basis::Z,
            _ => Basis::X,
        }
    }

    /// Stabilizer type of the boundary on faces normal to `axis`.
    pub const fn boundary_basis(self, axis: Axis) -> Basis {
        match (self, axis) {
            (Orientation::ZAligned, Axis::X) | (Orientation::XAligned, Axis::Y) => Basis::X,
            _ => Basis::Z,
        }
    }
}

/// Kind of a pipe, derived from the axis joining its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipeKind {
    /// Merge/split along a spatial axis; carries a seam of qubits.
    Spatial(Axis),
    /// Idle continuation through time; carries no operations of its own.
    Temporal,
}

impl PipeKind {
    /// Kind of a pipe along `axis`.
    pub const fn along(axis: Axis) -> PipeKind {
        match axis {
            Axis::X | Axis::Y => PipeKind::Spatial(axis),
            Axis::Z => PipeKind::Temporal,
        }
    }

    /// Axis of the pipe.
    pub const fn axis(self) -> Axis {
        match self {
            PipeKind::Spatial(axis) => axis,
            PipeKind::Temporal => Axis::Z,
        }
    }

    /// True when the pipe instantiates a template of its own.
    pub const fn is_operation_bearing(self) -> bool {
        matches!(self, PipeKind::Spatial(_))
    }
}

impl fmt::Display for PipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeKind::Spatial(Axis::X) => f.write_str("spatial-x"),
            PipeKind::Spatial(Axis::Y) => f.write_str("spatial-y"),
            PipeKind::Spatial(Axis::Z) | PipeKind::Temporal => f.write_str("temporal"),
        }
    }
}
