//! Size-scaled patch geometry on the doubled grid.
//!
//! Data qubits sit at even `(2u, 2v)`, ancillas at odd `(2i + 1, 2j + 1)`.
//! Plaquette `(i, j)` covers data `(i, j)`, `(i + 1, j)`, `(i, j + 1)` and
//! `(i + 1, j + 1)` in data units.

use std::fmt;

use lsc_core::{Basis, ErrorInfo, LinearFunction, LscError, Orientation};
use serde::{Deserialize, Serialize};

/// Data qubits per patch side, `2k + 1`.
pub const DISTANCE: LinearFunction = LinearFunction::new(2, 1);
/// Stabilizer rounds per layer, `2k`.
pub const ROUNDS: LinearFunction = LinearFunction::new(2, 0);

/// Position on the doubled grid, relative to a template frame.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct LocalPos {
    /// Doubled-grid column.
    pub x: i64,
    /// Doubled-grid row.
    pub y: i64,
}

impl LocalPos {
    /// Creates a new position.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Data qubit `(u, v)` in data units.
    pub const fn data(u: i64, v: i64) -> Self {
        Self::new(2 * u, 2 * v)
    }

    /// Ancilla of plaquette `(i, j)`.
    pub const fn ancilla(i: i64, j: i64) -> Self {
        Self::new(2 * i + 1, 2 * j + 1)
    }

    /// Position shifted by `(dx, dy)`.
    pub const fn offset(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True for data sites.
    pub const fn is_data(&self) -> bool {
        self.x.rem_euclid(2) == 0 && self.y.rem_euclid(2) == 0
    }
}

impl fmt::Display for LocalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Geometry of a patch at size `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchGeometry {
    /// Size parameter.
    pub k: u32,
    /// Data qubits per side.
    pub distance: i64,
    /// Stabilizer rounds per layer.
    pub rounds: u32,
}

impl PatchGeometry {
    /// Geometry at size `k`; `k = 0` is rejected.
    pub fn new(k: u32) -> Result<Self, LscError> {
        if k == 0 {
            return Err(LscError::Template(
                ErrorInfo::new("invalid-size", "size parameter must be positive")
                    .with_context("k", "0"),
            ));
        }
        Ok(Self {
            k,
            distance: i64::from(DISTANCE.integer_eval(k)?),
            rounds: ROUNDS.integer_eval(k)?,
        })
    }

    /// Number of rounds in every template: init, stabilizer rounds, readout.
    pub fn template_rounds(&self) -> usize {
        self.rounds as usize + 2
    }

    /// Distance in data units between the origins of adjacent cubes.
    pub fn pitch(&self) -> i64 {
        self.distance + 1
    }

    /// Doubled-grid offset of the frame of the cube at lattice `(x, y)`.
    pub fn cube_offset(&self, x: i32, y: i32) -> (i64, i64) {
        (
            2 * self.pitch() * i64::from(x),
            2 * self.pitch() * i64::from(y),
        )
    }

    /// Last data index along a side.
    pub fn last(&self) -> i64 {
        self.distance - 1
    }
}

/// One stabilizer plaquette together with the data qubits it checks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Plaquette {
    /// Plaquette column in data units.
    pub i: i64,
    /// Plaquette row in data units.
    pub j: i64,
    /// Stabilizer type.
    pub basis: Basis,
}

impl Plaquette {
    /// Plaquette `(i, j)` typed by the checkerboard of `orientation`.
    pub fn typed(i: i64, j: i64, orientation: Orientation) -> Self {
        Self {
            i,
            j,
            basis: orientation.plaquette_basis(i, j),
        }
    }

    /// Ancilla site.
    pub fn ancilla(&self) -> LocalPos {
        LocalPos::ancilla(self.i, self.j)
    }

    /// Data qubit at doubled-grid offset `(dx, dy)` from the ancilla.
    pub fn corner(&self, dx: i64, dy: i64) -> LocalPos {
        self.ancilla().offset(dx, dy)
    }
}
