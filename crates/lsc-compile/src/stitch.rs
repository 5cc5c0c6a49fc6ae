//! Template instantiation, stitch checks and timeline emission.

use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{
    ContextExt, CubeId, CubeKind, ErrorInfo, Face, Instruction, LscError, PipeId, Position,
    QubitIndex,
};
use lsc_graph::{canonical_hash, Cube, Pipe, SpacetimeGraph};
use lsc_template::{
    cube_template, pipe_template, BoundaryConfig, FaceState, LocalPos, PatchGeometry, PipeConfig,
    Slot, SlotOp, Template,
};
use tracing::{debug, info};

use crate::circuit::{CircuitBuilder, CompiledCircuit};
use crate::provenance::{InstructionRecord, Origin, OriginKind};
use crate::qubit_map::QubitMap;

/// A template placed on the global doubled grid.
#[derive(Debug)]
struct Placement {
    origin: usize,
    layer: i32,
    template: Template,
    offset: (i64, i64),
    owned: BTreeSet<LocalPos>,
}

impl Placement {
    fn new(origin: usize, layer: i32, template: Template, offset: (i64, i64)) -> Self {
        let owned = template
            .qubits()
            .into_iter()
            .map(|pos| pos.offset(offset.0, offset.1))
            .collect();
        Self {
            origin,
            layer,
            template,
            offset,
            owned,
        }
    }

    fn global(&self, pos: LocalPos) -> LocalPos {
        pos.offset(self.offset.0, self.offset.1)
    }
}

/// Compiles `graph` at size `k`.
///
/// The graph must pass structural validation; its report is returned
/// unchanged otherwise.
#[tracing::instrument(skip(graph), fields(cubes = graph.cube_count(), pipes = graph.pipe_count()))]
pub fn compile(graph: &SpacetimeGraph, k: u32) -> Result<CompiledCircuit, LscError> {
    graph.validate()?;
    let geometry = PatchGeometry::new(k)?;
    let graph_hash = canonical_hash(graph);

    let mut cubes: Vec<&Cube> = graph.cubes().collect();
    cubes.sort_by_key(|cube| cube.position);
    let mut pipes: Vec<(&Pipe, Position, Position)> = graph
        .pipes()
        .map(|pipe| {
            Ok((
                pipe,
                graph.cube(pipe.lower())?.position,
                graph.cube(pipe.upper())?.position,
            ))
        })
        .collect::<Result<_, LscError>>()?;
    pipes.sort_by_key(|(_, lower, upper)| (*lower, *upper));

    let mut origins = Vec::with_capacity(cubes.len() + pipes.len());
    let mut placements = Vec::new();
    let mut cube_placements: BTreeMap<CubeId, usize> = BTreeMap::new();
    for cube in &cubes {
        let origin = origins.len();
        origins.push(Origin {
            kind: OriginKind::Cube {
                id: cube.id,
                kind: cube.kind,
            },
            positions: vec![cube.position],
        });
        let boundary = boundary_config(graph, cube)?;
        let template = cube_template(cube.kind, &boundary, k)
            .map_err(|err| err.with_context("cube", cube.id).with_context("position", cube.position))?;
        let offset = geometry.cube_offset(cube.position.x, cube.position.y);
        cube_placements.insert(cube.id, placements.len());
        placements.push(Placement::new(origin, cube.position.z, template, offset));
    }

    for (pipe, lower_pos, upper_pos) in &pipes {
        let origin = origins.len();
        origins.push(Origin {
            kind: OriginKind::Pipe {
                id: pipe.id,
                kind: pipe.kind,
            },
            positions: vec![*lower_pos, *upper_pos],
        });
        if let Some(placement) =
            place_pipe(graph, &geometry, pipe, origin, &placements, &cube_placements)?
        {
            placements.push(placement);
        }
    }

    check_overlaps(&placements, &origins)?;
    let qubits = QubitMap::new(
        placements
            .iter()
            .flat_map(|placement| placement.owned.iter().copied())
            .collect::<BTreeSet<_>>(),
    )?;
    debug!(
        templates = placements.len(),
        qubits = qubits.len(),
        "templates instantiated"
    );

    let expected: usize = placements
        .iter()
        .map(|placement| placement.template.slot_count())
        .sum();
    let circuit = emit_timeline(&geometry, &placements, qubits, origins, graph_hash)?;
    if circuit.instruction_count() != expected {
        return Err(LscError::Stitch(
            ErrorInfo::new(
                "slot-count-mismatch",
                "emitted instructions do not match template slots",
            )
            .with_context("expected", expected.to_string())
            .with_context("emitted", circuit.instruction_count().to_string()),
        ));
    }

    info!(
        k,
        qubits = circuit.qubit_count(),
        instructions = circuit.instruction_count(),
        measurements = circuit.measurement_count(),
        moments = circuit.moment_count(),
        "compiled circuit"
    );
    Ok(circuit)
}

/// Compiles `graph` at every size in `ks`.
pub fn compile_many(
    graph: &SpacetimeGraph,
    ks: &[u32],
) -> Result<BTreeMap<u32, CompiledCircuit>, LscError> {
    if ks.is_empty() {
        return Err(LscError::Config(ErrorInfo::new(
            "empty-size-list",
            "at least one size parameter is required",
        )));
    }
    let mut circuits = BTreeMap::new();
    for k in ks.iter().copied().collect::<BTreeSet<_>>() {
        circuits.insert(k, compile(graph, k)?);
    }
    Ok(circuits)
}

fn boundary_config(graph: &SpacetimeGraph, cube: &Cube) -> Result<BoundaryConfig, LscError> {
    let mut config = BoundaryConfig::closed();
    for face in Face::ALL {
        let Some(pipe) = graph.face_pipe(cube.id, face)? else {
            continue;
        };
        let other = graph
            .pipe(pipe)?
            .other(cube.id)
            .map(|id| graph.cube(id))
            .transpose()?;
        let state = match other {
            Some(other) if other.kind == CubeKind::Port => FaceState::Open,
            _ => FaceState::Joined,
        };
        config.set(face, state);
    }
    Ok(config)
}

fn place_pipe(
    graph: &SpacetimeGraph,
    geometry: &PatchGeometry,
    pipe: &Pipe,
    origin: usize,
    placements: &[Placement],
    cube_placements: &BTreeMap<CubeId, usize>,
) -> Result<Option<Placement>, LscError> {
    if !pipe.kind.is_operation_bearing() {
        return Ok(None);
    }
    let lower = graph.cube(pipe.lower())?;
    let upper = graph.cube(pipe.upper())?;
    let Some(orientation) = lower.kind.orientation() else {
        return Ok(None);
    };
    if upper.kind == CubeKind::Port {
        return Ok(None);
    }

    let config = PipeConfig {
        basis: orientation.boundary_basis(pipe.kind.axis()),
        reset_seam: !seam_continues(graph, lower, upper, -1),
        readout_seam: !seam_continues(graph, lower, upper, 1),
    };
    let template = pipe_template(pipe.kind, orientation, &config, geometry.k)
        .map_err(|err| err.with_context("pipe", pipe.id))?;
    let offset = geometry.cube_offset(lower.position.x, lower.position.y);

    for cube in [lower, upper] {
        let cube_face = graph.pipe_face(pipe.id, cube.id)?;
        let index = cube_placements.get(&cube.id).copied().ok_or_else(|| {
            stitch_gap(pipe.id, "cube of the pipe has no template").with_context("cube", cube.id)
        })?;
        let neighbour = &placements[index];
        check_interface(pipe, cube, cube_face, &template, offset, neighbour)?;
    }

    let mut placement = Placement::new(origin, lower.position.z, template, offset);
    let shared: BTreeSet<LocalPos> = placement
        .template
        .interfaces
        .values()
        .flat_map(|interface| interface.positions.iter().copied())
        .map(|pos| placement.global(pos))
        .collect();
    placement.owned.retain(|pos| !shared.contains(pos));
    Ok(Some(placement))
}

/// True when the cubes one layer away along time are joined by the same pipe.
fn seam_continues(graph: &SpacetimeGraph, lower: &Cube, upper: &Cube, dz: i32) -> bool {
    let shifted = |position: Position| Position::new(position.x, position.y, position.z + dz);
    let (Some(a), Some(b)) = (
        graph.cube_at(shifted(lower.position)),
        graph.cube_at(shifted(upper.position)),
    ) else {
        return false;
    };
    graph.pipe_between(a, b).is_some()
        && graph.pipe_between(lower.id, a).is_some()
        && graph.pipe_between(upper.id, b).is_some()
}

fn check_interface(
    pipe: &Pipe,
    cube: &Cube,
    cube_face: Face,
    template: &Template,
    offset: (i64, i64),
    neighbour: &Placement,
) -> Result<(), LscError> {
    let side = cube_face.opposite();
    let pipe_side = template.interface(side).ok_or_else(|| {
        stitch_gap(pipe.id, "pipe template has no interface towards the cube")
            .with_context("cube", cube.id)
            .with_context("face", format!("{side:?}"))
    })?;
    let cube_side = neighbour.template.interface(cube_face).ok_or_else(|| {
        stitch_gap(pipe.id, "cube template has no interface towards the pipe")
            .with_context("cube", cube.id)
            .with_context("face", format!("{cube_face:?}"))
    })?;
    let cube_side = cube_side.translated(
        neighbour.offset.0 - offset.0,
        neighbour.offset.1 - offset.1,
    );

    if cube_side.basis != pipe_side.basis {
        return Err(LscError::TemplateMismatch(
            ErrorInfo::new(
                "boundary-basis-mismatch",
                "pipe and cube disagree on the boundary basis",
            )
            .with_context("pipe", pipe.id.to_string())
            .with_context("cube", cube.id.to_string())
            .with_context("cube-kind", cube.kind.label())
            .with_context("pipe-basis", pipe_side.basis.to_string())
            .with_context("cube-basis", cube_side.basis.to_string())
            .with_hint("join cubes of the same basis or insert a basis change"),
        ));
    }
    if cube_side.positions != pipe_side.positions {
        let missing = pipe_side
            .positions
            .symmetric_difference(&cube_side.positions)
            .count();
        return Err(stitch_gap(pipe.id, "pipe and cube interfaces do not line up")
            .with_context("cube", cube.id)
            .with_context("mismatched-sites", missing));
    }
    Ok(())
}

fn stitch_gap(pipe: PipeId, message: &str) -> LscError {
    LscError::Stitch(ErrorInfo::new("interface-gap", message).with_context("pipe", pipe.to_string()))
}

fn check_overlaps(placements: &[Placement], origins: &[Origin]) -> Result<(), LscError> {
    let mut claimed: BTreeMap<(i32, LocalPos), usize> = BTreeMap::new();
    for placement in placements {
        for pos in &placement.owned {
            if let Some(first) = claimed.insert((placement.layer, *pos), placement.origin) {
                let describe = |origin: usize| {
                    origins
                        .get(origin)
                        .map(ToString::to_string)
                        .unwrap_or_default()
                };
                return Err(LscError::Stitch(
                    ErrorInfo::new("qubit-overlap", "two templates claim the same qubit")
                        .with_context("position", pos.to_string())
                        .with_context("layer", placement.layer.to_string())
                        .with_context("first", describe(first))
                        .with_context("second", describe(placement.origin)),
                ));
            }
        }
    }
    Ok(())
}

struct Pending {
    order: u8,
    first: QubitIndex,
    instruction: Instruction,
    record: InstructionRecord,
}

fn emit_timeline(
    geometry: &PatchGeometry,
    placements: &[Placement],
    qubits: QubitMap,
    origins: Vec<Origin>,
    graph_hash: String,
) -> Result<CompiledCircuit, LscError> {
    let mut layers: BTreeMap<i32, Vec<&Placement>> = BTreeMap::new();
    for placement in placements {
        layers.entry(placement.layer).or_default().push(placement);
    }

    let mut builder = CircuitBuilder::new(geometry.k, graph_hash, qubits.clone(), origins);
    let mut ordinal = 0u32;
    for (layer, members) in &layers {
        for round in 0..geometry.template_rounds() {
            let mut steps: BTreeMap<u32, Vec<Pending>> = BTreeMap::new();
            for placement in members {
                let Some(slots) = placement.template.rounds.get(round) else {
                    continue;
                };
                for slot in &slots.slots {
                    let pending = pending_op(slot, placement, &qubits, *layer, round as u32, ordinal)?;
                    steps.entry(slot.step).or_default().push(pending);
                }
            }
            if steps.is_empty() {
                continue;
            }
            for (step, mut ops) in steps {
                ops.sort_by_key(|op| (op.order, op.first));
                let moment = ops.into_iter().map(|op| (op.instruction, op.record)).collect();
                builder.push_moment(moment).map_err(|err| {
                    err.with_context("layer", layer)
                        .with_context("round", round)
                        .with_context("step", step)
                })?;
            }
            ordinal += 1;
        }
    }
    Ok(builder.finish())
}

fn pending_op(
    slot: &Slot,
    placement: &Placement,
    qubits: &QubitMap,
    layer: i32,
    round: u32,
    ordinal: u32,
) -> Result<Pending, LscError> {
    let targets = slot
        .targets
        .iter()
        .map(|pos| {
            let global = placement.global(*pos);
            qubits.index_of(global).ok_or_else(|| {
                LscError::Stitch(
                    ErrorInfo::new("unmapped-qubit", "slot target has no global index")
                        .with_context("position", global.to_string()),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let instruction = match (slot.op, targets.as_slice()) {
        (SlotOp::Reset(basis), [qubit]) => Instruction::Reset {
            qubit: *qubit,
            basis,
        },
        (SlotOp::Hadamard, [qubit]) => Instruction::Hadamard { qubit: *qubit },
        (SlotOp::Cnot, [control, target]) => Instruction::Cnot {
            control: *control,
            target: *target,
        },
        (SlotOp::Measure(basis), [qubit]) => Instruction::Measure {
            qubit: *qubit,
            basis,
        },
        _ => {
            return Err(LscError::Stitch(
                ErrorInfo::new("malformed-slot", "slot operand count does not match its operation")
                    .with_context("op", format!("{:?}", slot.op))
                    .with_context("operands", targets.len().to_string()),
            ))
        }
    };
    let first = targets[0];
    Ok(Pending {
        order: slot.op.order(),
        first,
        instruction,
        record: InstructionRecord {
            origin: placement.origin,
            role: slot.role,
            layer,
            round,
            ordinal,
            local: slot.targets.clone(),
        },
    })
}
