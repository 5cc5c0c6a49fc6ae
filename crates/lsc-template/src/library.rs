//! Closed dispatch from cube and pipe kinds to template generators.

use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{
    Axis, Basis, CubeKind, ErrorInfo, Face, LscError, Orientation, PipeKind,
};

use crate::boundary::{BoundaryConfig, FaceState, PipeConfig};
use crate::geometry::{LocalPos, PatchGeometry, Plaquette};
use crate::schedule::{cnot_order, STEP_CNOT, STEP_ENTER, STEP_EXIT, STEP_MEASURE, STEP_RESET};
use crate::template::{Interface, Role, Round, Slot, SlotOp, Template};

/// Template of a cube of `kind` with the given face states at size `k`.
pub fn cube_template(
    kind: CubeKind,
    boundary: &BoundaryConfig,
    k: u32,
) -> Result<Template, LscError> {
    let geometry = PatchGeometry::new(k)?;
    match kind {
        CubeKind::Z => patch_template(&geometry, Basis::Z, Orientation::ZAligned, boundary),
        CubeKind::X => patch_template(&geometry, Basis::X, Orientation::XAligned, boundary),
        CubeKind::Boundary => {
            patch_template(&geometry, Basis::Z, Orientation::ZAligned, boundary)
        }
        CubeKind::Y => {
            if let Some(face) = Face::SPATIAL
                .into_iter()
                .find(|face| !boundary.is_closed(*face))
            {
                return Err(LscError::Template(
                    ErrorInfo::new("y-cube-spatial-face", "y cubes only join through time")
                        .with_context("face", format!("{face:?}")),
                ));
            }
            patch_template(&geometry, Basis::Y, Orientation::ZAligned, boundary)
        }
        CubeKind::Port => Ok(Template::empty(geometry.template_rounds())),
    }
}

/// Template of a pipe of `kind`, expressed in the frame of its lower cube.
///
/// Temporal pipes carry no operations and yield an empty template.
pub fn pipe_template(
    kind: PipeKind,
    orientation: Orientation,
    config: &PipeConfig,
    k: u32,
) -> Result<Template, LscError> {
    let geometry = PatchGeometry::new(k)?;
    match kind {
        PipeKind::Temporal => Ok(Template::empty(geometry.template_rounds())),
        PipeKind::Spatial(Axis::X) => Ok(seam_template(&geometry, orientation, config, false)),
        PipeKind::Spatial(Axis::Y) => Ok(seam_template(&geometry, orientation, config, true)),
        PipeKind::Spatial(Axis::Z) => Err(LscError::Template(ErrorInfo::new(
            "invalid-pipe-axis",
            "spatial pipes run along x or y",
        ))),
    }
}

fn patch_template(
    geometry: &PatchGeometry,
    basis: Basis,
    orientation: Orientation,
    boundary: &BoundaryConfig,
) -> Result<Template, LscError> {
    let last = geometry.last();
    let data: BTreeSet<LocalPos> = (0..=last)
        .flat_map(|u| (0..=last).map(move |v| LocalPos::data(u, v)))
        .collect();

    let mut plaquettes: Vec<Plaquette> = (0..last)
        .flat_map(|i| (0..last).map(move |j| Plaquette::typed(i, j, orientation)))
        .collect();
    for face in Face::SPATIAL {
        if boundary.is_closed(face) {
            plaquettes.extend(face_plaquettes(face, last, orientation));
        }
    }

    let mut template = Template::empty(geometry.template_rounds());
    if boundary.is_closed(Face::ZMinus) {
        template.rounds[0] = data_round(&data, SlotOp::Reset(basis), STEP_RESET, Role::DataInit);
    }
    let stabilizers = stabilizer_round(&plaquettes, &data);
    for round in 1..=geometry.rounds as usize {
        template.rounds[round] = stabilizers.clone();
    }
    if boundary.is_closed(Face::ZPlus) {
        let readout = data_round(
            &data,
            SlotOp::Measure(basis),
            STEP_MEASURE,
            Role::DataReadout { basis },
        );
        template.rounds[geometry.rounds as usize + 1] = readout;
    }

    for face in Face::SPATIAL {
        if boundary.get(face) == FaceState::Joined {
            let positions = data
                .iter()
                .copied()
                .filter(|pos| on_face(*pos, face, last))
                .collect();
            template.interfaces.insert(
                face,
                Interface {
                    positions,
                    basis: orientation.boundary_basis(face.axis()),
                },
            );
        }
    }
    Ok(template)
}

/// Weight-two plaquettes of a closed face that match the face's boundary type.
fn face_plaquettes(face: Face, last: i64, orientation: Orientation) -> Vec<Plaquette> {
    let wanted = orientation.boundary_basis(face.axis());
    (0..last)
        .map(|along| match face {
            Face::XMinus => Plaquette::typed(-1, along, orientation),
            Face::XPlus => Plaquette::typed(last, along, orientation),
            Face::YMinus => Plaquette::typed(along, -1, orientation),
            _ => Plaquette::typed(along, last, orientation),
        })
        .filter(|plaquette| plaquette.basis == wanted)
        .collect()
}

fn on_face(pos: LocalPos, face: Face, last: i64) -> bool {
    match face {
        Face::XMinus => pos.x == 0,
        Face::XPlus => pos.x == 2 * last,
        Face::YMinus => pos.y == 0,
        Face::YPlus => pos.y == 2 * last,
        Face::ZMinus | Face::ZPlus => false,
    }
}

/// Seam template of a spatial pipe; `transposed` selects the y axis.
fn seam_template(
    geometry: &PatchGeometry,
    orientation: Orientation,
    config: &PipeConfig,
    transposed: bool,
) -> Template {
    let last = geometry.last();
    let seam = geometry.distance;
    let place = |a: i64, b: i64| if transposed { (b, a) } else { (a, b) };

    let seam_data: BTreeSet<LocalPos> = (0..=last)
        .map(|along| {
            let (u, v) = place(seam, along);
            LocalPos::data(u, v)
        })
        .collect();
    let reach: BTreeSet<LocalPos> = (seam - 1..=seam + 1)
        .flat_map(|across| {
            (0..=last).map(move |along| {
                let (u, v) = place(across, along);
                LocalPos::data(u, v)
            })
        })
        .collect();

    let side_axis = if transposed { Axis::X } else { Axis::Y };
    let side_basis = orientation.boundary_basis(side_axis);
    let mut plaquettes = Vec::new();
    for across in [seam - 1, seam] {
        for along in -1..=last {
            let (i, j) = place(across, along);
            let plaquette = Plaquette::typed(i, j, orientation);
            let on_side = along == -1 || along == last;
            if !on_side || plaquette.basis == side_basis {
                plaquettes.push(plaquette);
            }
        }
    }

    let mut template = Template::empty(geometry.template_rounds());
    if config.reset_seam {
        template.rounds[0] = data_round(
            &seam_data,
            SlotOp::Reset(config.basis),
            STEP_RESET,
            Role::DataInit,
        );
    }
    let stabilizers = stabilizer_round(&plaquettes, &reach);
    for round in 1..=geometry.rounds as usize {
        template.rounds[round] = stabilizers.clone();
    }
    if config.readout_seam {
        template.rounds[geometry.rounds as usize + 1] = data_round(
            &seam_data,
            SlotOp::Measure(config.basis),
            STEP_MEASURE,
            Role::DataReadout {
                basis: config.basis,
            },
        );
    }

    let (lower_face, upper_face) = if transposed {
        (Face::YMinus, Face::YPlus)
    } else {
        (Face::XMinus, Face::XPlus)
    };
    let mut sides: BTreeMap<Face, BTreeSet<LocalPos>> = BTreeMap::new();
    for slot in stabilizers.slots.iter().filter(|slot| slot.op == SlotOp::Cnot) {
        for target in slot.targets.iter().filter(|pos| pos.is_data()) {
            let across = (if transposed { target.y } else { target.x }) / 2;
            if across < seam {
                sides.entry(lower_face).or_default().insert(*target);
            } else if across > seam {
                sides.entry(upper_face).or_default().insert(*target);
            }
        }
    }
    let face_basis = orientation.boundary_basis(if transposed { Axis::Y } else { Axis::X });
    template.interfaces = sides
        .into_iter()
        .map(|(face, positions)| {
            (
                face,
                Interface {
                    positions,
                    basis: face_basis,
                },
            )
        })
        .collect();
    template
}

fn data_round(data: &BTreeSet<LocalPos>, op: SlotOp, step: u32, role: Role) -> Round {
    Round {
        slots: data
            .iter()
            .map(|pos| Slot {
                step,
                op,
                targets: vec![*pos],
                role,
            })
            .collect(),
    }
}

/// One round of stabilizer measurements; corners outside `data` are skipped.
fn stabilizer_round(plaquettes: &[Plaquette], data: &BTreeSet<LocalPos>) -> Round {
    let mut round = Round::default();
    for plaquette in plaquettes {
        let ancilla = plaquette.ancilla();
        let changes_basis = plaquette.basis == Basis::X;
        round.slots.push(Slot {
            step: STEP_RESET,
            op: SlotOp::Reset(Basis::Z),
            targets: vec![ancilla],
            role: Role::AncillaReset,
        });
        if changes_basis {
            for step in [STEP_ENTER, STEP_EXIT] {
                round.slots.push(Slot {
                    step,
                    op: SlotOp::Hadamard,
                    targets: vec![ancilla],
                    role: Role::BasisChange,
                });
            }
        }
        for (step, (dx, dy)) in STEP_CNOT.into_iter().zip(cnot_order(plaquette.basis)) {
            let corner = plaquette.corner(dx, dy);
            if !data.contains(&corner) {
                continue;
            }
            let targets = if changes_basis {
                vec![ancilla, corner]
            } else {
                vec![corner, ancilla]
            };
            round.slots.push(Slot {
                step,
                op: SlotOp::Cnot,
                targets,
                role: Role::Entangle,
            });
        }
        round.slots.push(Slot {
            step: STEP_MEASURE,
            op: SlotOp::Measure(Basis::Z),
            targets: vec![ancilla],
            role: Role::Stabilizer {
                basis: plaquette.basis,
                plaquette: ancilla,
            },
        });
    }
    round.sort();
    round
}
