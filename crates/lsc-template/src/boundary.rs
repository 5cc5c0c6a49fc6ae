use lsc_core::{Basis, Face};
use serde::{Deserialize, Serialize};

/// State of one cube face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FaceState {
    /// No pipe leaves the face.
    #[default]
    Closed,
    /// A pipe joins the face to another patch.
    Joined,
    /// A pipe joins the face to a port.
    Open,
}

/// Face states of a cube, indexed by [`Face`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BoundaryConfig {
    faces: [FaceState; 6],
}

impl BoundaryConfig {
    /// Every face closed.
    pub fn closed() -> Self {
        Self::default()
    }

    /// State of `face`.
    pub fn get(&self, face: Face) -> FaceState {
        self.faces[face_slot(face)]
    }

    /// Sets the state of `face`.
    pub fn set(&mut self, face: Face, state: FaceState) {
        self.faces[face_slot(face)] = state;
    }

    /// Builder form of [`BoundaryConfig::set`].
    pub fn with(mut self, face: Face, state: FaceState) -> Self {
        self.set(face, state);
        self
    }

    /// True when `face` is closed.
    pub fn is_closed(&self, face: Face) -> bool {
        self.get(face) == FaceState::Closed
    }
}

fn face_slot(face: Face) -> usize {
    Face::ALL
        .iter()
        .position(|candidate| *candidate == face)
        .unwrap_or_default()
}

/// Per-instance parameters of a spatial pipe template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipeConfig {
    /// Basis of the seam preparation and readout; the boundary basis of the joined faces.
    pub basis: Basis,
    /// Prepare the seam; set when no pipe of the same axis exists one layer below.
    pub reset_seam: bool,
    /// Read out the seam; set when no pipe of the same axis exists one layer above.
    pub readout_seam: bool,
}

impl PipeConfig {
    /// Seam prepared and read out in `basis` within a single layer.
    pub fn isolated(basis: Basis) -> Self {
        Self {
            basis,
            reset_seam: true,
            readout_seam: true,
        }
    }
}
