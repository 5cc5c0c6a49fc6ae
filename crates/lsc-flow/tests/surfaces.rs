use lsc_core::errors::LscError;
use lsc_core::{Basis, CubeKind, Position};
use lsc_flow::{
    find_correlation_surfaces, solve_surfaces, CorrelationSurface, SpiderColor, ZxGraph,
};
use lsc_graph::{gen_memory, gen_merge_split, gen_port_memory, gen_unit_loop, SpacetimeGraph};

#[test]
fn unit_loop_has_one_surface_of_each_type() {
    let graph = gen_unit_loop().unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    assert_eq!(basis.rank(), 2);
    assert_eq!(basis.rank_of(Basis::Z), 1);
    assert_eq!(basis.rank_of(Basis::X), 1);
    let types: Vec<Basis> = basis.surfaces().iter().map(CorrelationSurface::basis).collect();
    assert_eq!(types, vec![Basis::X, Basis::Z]);
    for surface in basis.surfaces() {
        assert!(!surface.is_trivial());
        assert_eq!(surface.wires().len(), 4);
        assert_eq!(surface.cubes().len(), 4);
        basis.verify(surface).unwrap();
    }
}

#[test]
fn projection_maps_kinds_to_spiders() {
    let graph = gen_port_memory().unwrap();
    let zx = ZxGraph::project(&graph);
    assert_eq!(zx.spiders().len(), 2);
    assert_eq!(zx.boundaries().len(), 1);
    assert!(zx.spiders().iter().all(|s| s.color == SpiderColor::Z));
    assert_eq!(zx.wires().len(), 2);
    assert!(zx.wires()[0].endpoints[0] < zx.wires()[1].endpoints[0]);
}

#[test]
fn port_wires_are_free() {
    let graph = gen_port_memory().unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    assert_eq!(basis.rank(), 1);
    assert_eq!(basis.surfaces()[0].wires().len(), 2);
}

#[test]
fn memory_and_merge_have_one_surface() {
    for graph in [gen_memory(CubeKind::Z, 3).unwrap(), gen_merge_split().unwrap()] {
        let basis = find_correlation_surfaces(&graph).unwrap();
        assert_eq!(basis.rank(), 1);
        assert_eq!(basis.surfaces()[0].basis(), Basis::Z);
    }
}

#[test]
fn x_memory_carries_an_x_surface() {
    let graph = gen_memory(CubeKind::X, 3).unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    assert_eq!(basis.rank(), 1);
    let surface = &basis.surfaces()[0];
    assert_eq!(surface.basis(), Basis::X);
    assert_eq!(surface.wires().len(), 2);
    basis.verify(surface).unwrap();

    let as_z = CorrelationSurface::from_wires(Basis::Z, surface.wires().iter().copied());
    assert_eq!(basis.verify(&as_z).unwrap_err().code(), "surface-not-in-kernel");
}

#[test]
fn y_caps_let_x_surfaces_through() {
    let mut graph = SpacetimeGraph::new();
    let bottom = graph.add_cube(Position::new(0, 0, 0), CubeKind::Y).unwrap();
    let patch = graph.add_cube(Position::new(0, 0, 1), CubeKind::X).unwrap();
    let top = graph.add_cube(Position::new(0, 0, 2), CubeKind::Y).unwrap();
    graph.add_pipe(bottom, patch).unwrap();
    graph.add_pipe(patch, top).unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    assert_eq!(basis.rank_of(Basis::Z), 0);
    assert_eq!(basis.rank_of(Basis::X), 1);
}

#[test]
fn pinned_flow_reports_no_observable() {
    let mut graph = SpacetimeGraph::new();
    let z = graph.add_cube(Position::new(0, 0, 0), CubeKind::Z).unwrap();
    let x = graph.add_cube(Position::new(1, 0, 0), CubeKind::X).unwrap();
    graph.add_pipe(z, x).unwrap();
    match find_correlation_surfaces(&graph).unwrap_err() {
        LscError::Algebraic(info) => {
            assert_eq!(info.code, "no-observable-found");
            assert!(info.hint.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let empty = solve_surfaces(&graph).unwrap();
    assert_eq!(empty.rank(), 0);
    assert_eq!(empty.graph_hash(), lsc_graph::canonical_hash(&graph));
}

#[test]
fn invalid_graphs_fail_structurally() {
    let mut graph = SpacetimeGraph::new();
    graph.add_cube(Position::new(0, 0, 0), CubeKind::Z).unwrap();
    assert!(matches!(
        find_correlation_surfaces(&graph).unwrap_err(),
        LscError::Structural(_)
    ));
}

#[test]
fn basis_is_stable_across_calls_and_insertion_order() {
    let graph = gen_merge_split().unwrap();
    let first = find_correlation_surfaces(&graph).unwrap();
    let second = find_correlation_surfaces(&graph).unwrap();
    assert_eq!(first, second);

    let mut reversed = SpacetimeGraph::new();
    let mut cubes: Vec<_> = graph.cubes().copied().collect();
    cubes.reverse();
    for cube in &cubes {
        reversed.add_cube(cube.position, cube.kind).unwrap();
    }
    let mut pipes: Vec<_> = graph.pipes().copied().collect();
    pipes.reverse();
    for pipe in pipes {
        let a = reversed
            .cube_at(graph.cube(pipe.lower()).unwrap().position)
            .unwrap();
        let b = reversed
            .cube_at(graph.cube(pipe.upper()).unwrap().position)
            .unwrap();
        reversed.add_pipe(a, b).unwrap();
    }
    let third = find_correlation_surfaces(&reversed).unwrap();
    let keys = |basis: &lsc_flow::SurfaceBasis| {
        basis
            .surfaces()
            .iter()
            .map(CorrelationSurface::endpoint_key)
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&third));
    assert_eq!(first.graph_hash(), third.graph_hash());
}

#[test]
fn custom_surfaces_are_checked_against_the_kernel() {
    let graph = gen_unit_loop().unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    let surface = &basis.surfaces()[0];

    let partial = CorrelationSurface::from_wires(surface.basis(), surface.wires()[..2].iter().copied());
    match basis.verify(&partial).unwrap_err() {
        LscError::Algebraic(info) => assert_eq!(info.code, "surface-not-in-kernel"),
        other => panic!("unexpected error: {other:?}"),
    }
    let cancelled = surface.combine(surface).unwrap();
    assert!(cancelled.is_trivial());
    assert!(basis.verify(&cancelled).is_err());
    assert_eq!(basis.decompose(surface), Some(vec![0]));
    assert_eq!(basis.decompose(&basis.surfaces()[1]), Some(vec![1]));

    let err = surface.combine(&basis.surfaces()[1]).unwrap_err();
    assert_eq!(err.code(), "mixed-surface-types");
}
