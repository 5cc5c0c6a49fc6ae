use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{Basis, Face};
use serde::{Deserialize, Serialize};

use crate::geometry::LocalPos;
use crate::schedule::Schedule;

/// Physical operation carried by a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotOp {
    /// Reset into the +1 eigenstate of the basis.
    Reset(Basis),
    /// Hadamard.
    Hadamard,
    /// CNOT; targets are `[control, target]`.
    Cnot,
    /// Measurement in the basis.
    Measure(Basis),
}

impl SlotOp {
    /// Sort rank used when merging slots into a moment.
    pub const fn order(&self) -> u8 {
        match self {
            SlotOp::Reset(_) => 0,
            SlotOp::Hadamard => 1,
            SlotOp::Cnot => 2,
            SlotOp::Measure(_) => 3,
        }
    }
}

/// Why a slot exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Data preparation at a closed time face or a fresh seam.
    DataInit,
    /// Ancilla reset at the start of a round.
    AncillaReset,
    /// Hadamard around the entangling layers of an X ancilla.
    BasisChange,
    /// Entangling gate between an ancilla and a data qubit.
    Entangle,
    /// Ancilla measurement of one stabilizer.
    Stabilizer {
        /// Stabilizer type.
        basis: Basis,
        /// Ancilla site of the plaquette.
        plaquette: LocalPos,
    },
    /// Destructive data measurement at a closed time face or a closing seam.
    DataReadout {
        /// Measurement basis.
        basis: Basis,
    },
    /// Error channel attached to an operational slot.
    Noise,
}

/// One operation of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Step inside the round.
    pub step: u32,
    /// Operation.
    pub op: SlotOp,
    /// Operand sites.
    pub targets: Vec<LocalPos>,
    /// Role of the operation.
    pub role: Role,
}

/// Ordered slots sharing a round index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Round {
    /// Slots sorted by `(step, op order, first target)`.
    pub slots: Vec<Slot>,
}

impl Round {
    /// Distinct steps used by the round.
    pub fn schedule(&self) -> Schedule {
        let steps: BTreeSet<u32> = self.slots.iter().map(|slot| slot.step).collect();
        Schedule::new(steps.into_iter().collect()).unwrap_or_default()
    }

    /// True when the round carries no slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn sort(&mut self) {
        self.slots.sort_by(|a, b| {
            (a.step, a.op.order(), a.targets.first()).cmp(&(b.step, b.op.order(), b.targets.first()))
        });
    }
}

/// Data sites of a template on one face, with the boundary basis of that face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Data sites in the template frame.
    pub positions: BTreeSet<LocalPos>,
    /// Stabilizer type of the boundary on this face.
    pub basis: Basis,
}

impl Interface {
    /// Interface translated by a doubled-grid offset.
    pub fn translated(&self, dx: i64, dy: i64) -> Interface {
        Interface {
            positions: self.positions.iter().map(|pos| pos.offset(dx, dy)).collect(),
            basis: self.basis,
        }
    }
}

/// Size-scaled circuit fragment of one cube or pipe.
///
/// Every template at size `k` has `2k + 2` rounds: an init round, the
/// stabilizer rounds and a readout round. Rounds may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Template {
    /// Rounds in execution order.
    pub rounds: Vec<Round>,
    /// Interfaces on joined faces.
    pub interfaces: BTreeMap<Face, Interface>,
}

impl Template {
    /// Empty template with `rounds` empty rounds.
    pub fn empty(rounds: usize) -> Self {
        Self {
            rounds: vec![Round::default(); rounds],
            interfaces: BTreeMap::new(),
        }
    }

    /// Interface on `face`, when the face is joined.
    pub fn interface(&self, face: Face) -> Option<&Interface> {
        self.interfaces.get(&face)
    }

    /// Every site used by some slot.
    pub fn qubits(&self) -> BTreeSet<LocalPos> {
        self.slots()
            .flat_map(|slot| slot.targets.iter().copied())
            .collect()
    }

    /// Iterates over every slot in round order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.rounds.iter().flat_map(|round| round.slots.iter())
    }

    /// Total number of slots.
    pub fn slot_count(&self) -> usize {
        self.rounds.iter().map(|round| round.slots.len()).sum()
    }

    /// Number of measurement slots.
    pub fn measurement_count(&self) -> usize {
        self.slots()
            .filter(|slot| matches!(slot.op, SlotOp::Measure(_)))
            .count()
    }

    /// True when no round carries a slot.
    pub fn is_empty(&self) -> bool {
        self.rounds.iter().all(Round::is_empty)
    }
}
