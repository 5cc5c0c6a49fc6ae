use lsc_core::errors::LscError;
use lsc_core::{CubeKind, Position, StructuralReport};
use lsc_graph::{
    gen_memory, gen_merge_split, gen_port_memory, gen_unit_loop, DegreeBounds, GraphConfig,
    SpacetimeGraph,
};

fn report(err: LscError) -> StructuralReport {
    match err {
        LscError::Structural(report) => report,
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn isolated_z_cube_is_a_degree_violation() {
    let mut graph = SpacetimeGraph::new();
    graph.add_cube(Position::new(0, 0, 0), CubeKind::Z).unwrap();
    let report = report(graph.validate().unwrap_err());
    assert!(report.contains_code("degree-violation"));
    assert!(report.contains_code("isolated-cube"));
    assert_eq!(report.summary.code, "structural");
    assert_eq!(report.summary.context.get("violations"), Some(&"2".to_string()));
}

#[test]
fn empty_graph_is_rejected() {
    let report = report(SpacetimeGraph::new().validate().unwrap_err());
    assert_eq!(report.violations.len(), 1);
    assert!(report.contains_code("empty-graph"));
}

#[test]
fn every_violation_is_collected() {
    let mut graph = SpacetimeGraph::new();
    graph.add_cube(Position::new(5, 5, 5), CubeKind::X).unwrap();
    let boundary = graph
        .add_cube(Position::new(0, 0, 0), CubeKind::Boundary)
        .unwrap();
    let above = graph.add_cube(Position::new(0, 0, 1), CubeKind::Z).unwrap();
    graph.add_pipe(boundary, above).unwrap();

    let report = report(graph.validate().unwrap_err());
    let codes: Vec<_> = report.violations.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["missing-boundary-port", "degree-violation", "isolated-cube"]
    );
    let missing = report.with_code("missing-boundary-port").next().unwrap();
    assert_eq!(missing.context.get("position"), Some(&"(0, 0, 0)".to_string()));
}

#[test]
fn y_caps_need_exactly_one_temporal_pipe() {
    let mut graph = SpacetimeGraph::new();
    let below = graph.add_cube(Position::new(0, 0, 0), CubeKind::Y).unwrap();
    let patch = graph.add_cube(Position::new(0, 0, 1), CubeKind::X).unwrap();
    let above = graph.add_cube(Position::new(0, 0, 2), CubeKind::Y).unwrap();
    graph.add_pipe(below, patch).unwrap();
    graph.add_pipe(patch, above).unwrap();
    graph.validate().unwrap();

    let mut graph = SpacetimeGraph::new();
    let y = graph.add_cube(Position::new(0, 0, 1), CubeKind::Y).unwrap();
    let a = graph.add_cube(Position::new(0, 0, 0), CubeKind::Z).unwrap();
    let b = graph.add_cube(Position::new(0, 0, 2), CubeKind::Z).unwrap();
    graph.add_pipe(a, y).unwrap();
    graph.add_pipe(y, b).unwrap();
    let report = report(graph.validate().unwrap_err());
    let flagged: Vec<_> = report
        .with_code("degree-violation")
        .map(|v| v.context.get("kind").cloned().unwrap_or_default())
        .collect();
    assert_eq!(flagged, vec!["y".to_string()]);
}

#[test]
fn generated_graphs_validate() {
    gen_memory(CubeKind::Z, 3).unwrap().validate().unwrap();
    gen_memory(CubeKind::X, 2).unwrap().validate().unwrap();
    gen_unit_loop().unwrap().validate().unwrap();
    gen_merge_split().unwrap().validate().unwrap();
    gen_port_memory().unwrap().validate().unwrap();
}

#[test]
fn degree_bounds_are_configurable() {
    let mut config = GraphConfig::default();
    config
        .degree_bounds
        .insert(CubeKind::Z, DegreeBounds::new(2, 4));
    let mut graph = SpacetimeGraph::with_config(config);
    let a = graph.add_cube(Position::new(0, 0, 0), CubeKind::Z).unwrap();
    let b = graph.add_cube(Position::new(0, 0, 1), CubeKind::Z).unwrap();
    graph.add_pipe(a, b).unwrap();
    let report = report(graph.validate().unwrap_err());
    assert_eq!(report.with_code("degree-violation").count(), 2);
    assert!(!report.contains_code("isolated-cube"));
}
