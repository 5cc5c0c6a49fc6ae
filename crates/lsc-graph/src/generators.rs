//! Builders for the small graphs used throughout tests, benches and demos.

use lsc_core::{
    errors::{ErrorInfo, LscError},
    Axis, CubeId, CubeKind, Position,
};

use crate::graph::SpacetimeGraph;

/// Single patch idling through `layers` time steps.
pub fn gen_memory(kind: CubeKind, layers: u32) -> Result<SpacetimeGraph, LscError> {
    ensure_length("layers", layers, 2)?;
    let mut graph = SpacetimeGraph::new();
    let mut previous: Option<CubeId> = None;
    for z in 0..layers as i32 {
        let cube = graph.add_cube(Position::new(0, 0, z), kind)?;
        if let Some(previous) = previous {
            graph.add_pipe(previous, cube)?;
        }
        previous = Some(cube);
    }
    Ok(graph)
}

/// Row of `length` Z patches merged along `axis` within one layer.
pub fn gen_spatial_chain(length: u32, axis: Axis) -> Result<SpacetimeGraph, LscError> {
    ensure_length("length", length, 2)?;
    if !axis.is_spatial() {
        return Err(LscError::Config(
            ErrorInfo::new("temporal-axis", "spatial chains need a spatial axis")
                .with_context("axis", format!("{axis:?}")),
        ));
    }
    let mut graph = SpacetimeGraph::new();
    let mut previous: Option<CubeId> = None;
    for step in 0..length as i32 {
        let position = match axis {
            Axis::X => Position::new(step, 0, 0),
            _ => Position::new(0, step, 0),
        };
        let cube = graph.add_cube(position, CubeKind::Z)?;
        if let Some(previous) = previous {
            graph.add_pipe(previous, cube)?;
        }
        previous = Some(cube);
    }
    Ok(graph)
}

/// Minimal closed loop: two Z patches merged along x in two consecutive layers.
pub fn gen_unit_loop() -> Result<SpacetimeGraph, LscError> {
    let mut graph = SpacetimeGraph::new();
    let a = graph.add_cube(Position::new(0, 0, 0), CubeKind::Z)?;
    let b = graph.add_cube(Position::new(1, 0, 0), CubeKind::Z)?;
    let c = graph.add_cube(Position::new(0, 0, 1), CubeKind::Z)?;
    let d = graph.add_cube(Position::new(1, 0, 1), CubeKind::Z)?;
    graph.add_pipe(a, b)?;
    graph.add_pipe(c, d)?;
    graph.add_pipe(a, c)?;
    graph.add_pipe(b, d)?;
    Ok(graph)
}

/// Two Z patches idling for three layers and merged along x in the middle one.
pub fn gen_merge_split() -> Result<SpacetimeGraph, LscError> {
    let mut graph = SpacetimeGraph::new();
    let mut columns = [Vec::new(), Vec::new()];
    for (x, column) in columns.iter_mut().enumerate() {
        for z in 0..3 {
            column.push(graph.add_cube(Position::new(x as i32, 0, z), CubeKind::Z)?);
        }
        for pair in column.windows(2) {
            graph.add_pipe(pair[0], pair[1])?;
        }
    }
    graph.add_pipe(columns[0][1], columns[1][1])?;
    Ok(graph)
}

/// Patch whose history starts at an open port, then idles and is read out.
pub fn gen_port_memory() -> Result<SpacetimeGraph, LscError> {
    let mut graph = SpacetimeGraph::new();
    let port = graph.add_cube(Position::new(0, 0, 0), CubeKind::Port)?;
    let boundary = graph.add_cube(Position::new(0, 0, 1), CubeKind::Boundary)?;
    let patch = graph.add_cube(Position::new(0, 0, 2), CubeKind::Z)?;
    graph.add_pipe(port, boundary)?;
    graph.add_pipe(boundary, patch)?;
    Ok(graph)
}

fn ensure_length(name: &str, value: u32, min: u32) -> Result<(), LscError> {
    if value < min {
        return Err(LscError::Config(
            ErrorInfo::new("invalid-length", "generator length is too small")
                .with_context(name, value.to_string())
                .with_context("min", min.to_string()),
        ));
    }
    Ok(())
}
