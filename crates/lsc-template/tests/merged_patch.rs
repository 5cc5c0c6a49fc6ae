use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{Axis, Basis, CubeKind, Face, PipeKind};
use lsc_template::{
    cube_template, pipe_template, BoundaryConfig, FaceState, LocalPos, PatchGeometry, PipeConfig,
    Role, Slot, SlotOp,
};
use proptest::prelude::*;

/// Slots of the first stabilizer round of two patches merged along `axis`.
fn merged_round(kind: CubeKind, axis: Axis, k: u32) -> Vec<Slot> {
    let geometry = PatchGeometry::new(k).unwrap();
    let (lower_face, upper_face, (dx, dy)) = match axis {
        Axis::X => (Face::XPlus, Face::XMinus, geometry.cube_offset(1, 0)),
        _ => (Face::YPlus, Face::YMinus, geometry.cube_offset(0, 1)),
    };
    let orientation = kind.orientation().unwrap();
    let basis = kind.basis().unwrap();
    let lower = cube_template(kind, &BoundaryConfig::closed().with(lower_face, FaceState::Joined), k)
        .unwrap();
    let upper = cube_template(kind, &BoundaryConfig::closed().with(upper_face, FaceState::Joined), k)
        .unwrap();
    let pipe = pipe_template(
        PipeKind::Spatial(axis),
        orientation,
        &PipeConfig::isolated(basis),
        k,
    )
    .unwrap();

    let mut slots = lower.rounds[1].slots.clone();
    slots.extend(pipe.rounds[1].slots.iter().cloned());
    slots.extend(upper.rounds[1].slots.iter().map(|slot| Slot {
        targets: slot.targets.iter().map(|pos| pos.offset(dx, dy)).collect(),
        role: match slot.role {
            Role::Stabilizer { basis, plaquette } => Role::Stabilizer {
                basis,
                plaquette: plaquette.offset(dx, dy),
            },
            other => other,
        },
        ..slot.clone()
    }));
    slots
}

fn supports(slots: &[Slot]) -> BTreeMap<LocalPos, (Basis, BTreeSet<LocalPos>)> {
    let mut bases = BTreeMap::new();
    for slot in slots {
        if let Role::Stabilizer { basis, plaquette } = slot.role {
            bases.insert(plaquette, basis);
        }
    }
    let mut supports: BTreeMap<LocalPos, (Basis, BTreeSet<LocalPos>)> = bases
        .iter()
        .map(|(anc, basis)| (*anc, (*basis, BTreeSet::new())))
        .collect();
    for slot in slots.iter().filter(|slot| slot.op == SlotOp::Cnot) {
        let (ancilla, data) = if slot.targets[0].is_data() {
            (slot.targets[1], slot.targets[0])
        } else {
            (slot.targets[0], slot.targets[1])
        };
        if let Some((_, support)) = supports.get_mut(&ancilla) {
            support.insert(data);
        }
    }
    supports
}

proptest! {
    #[test]
    fn merged_stabilizers_commute(k in 1u32..4, along_y in any::<bool>(), x_kind in any::<bool>()) {
        let axis = if along_y { Axis::Y } else { Axis::X };
        let kind = if x_kind { CubeKind::X } else { CubeKind::Z };
        let slots = merged_round(kind, axis, k);
        let supports = supports(&slots);
        let d = 2 * k as usize + 1;
        prop_assert_eq!(supports.len(), d * (2 * d + 1) - 1);
        for (a, (basis_a, support_a)) in &supports {
            prop_assert!(support_a.len() == 2 || support_a.len() == 4, "{a} has weight {}", support_a.len());
            for (basis_b, support_b) in supports.values() {
                if basis_a != basis_b {
                    prop_assert_eq!(support_a.intersection(support_b).count() % 2, 0);
                }
            }
        }
    }

    #[test]
    fn no_site_is_used_twice_in_a_step(k in 1u32..4, along_y in any::<bool>()) {
        let axis = if along_y { Axis::Y } else { Axis::X };
        let slots = merged_round(CubeKind::Z, axis, k);
        let mut used: BTreeSet<(u32, LocalPos)> = BTreeSet::new();
        for slot in &slots {
            for target in &slot.targets {
                prop_assert!(used.insert((slot.step, *target)), "step {} reuses {}", slot.step, target);
            }
        }
    }
}
