use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lsc_core::{CubeKind, Position};
use lsc_flow::find_correlation_surfaces;
use lsc_graph::SpacetimeGraph;

fn columns(width: i32, layers: i32) -> SpacetimeGraph {
    let mut graph = SpacetimeGraph::new();
    for x in 0..width {
        for z in 0..layers {
            let cube = graph.add_cube(Position::new(x, 0, z), CubeKind::Z).unwrap();
            if z > 0 {
                let below = graph.cube_at(Position::new(x, 0, z - 1)).unwrap();
                graph.add_pipe(below, cube).unwrap();
            }
        }
    }
    graph
}

fn solve_bench(c: &mut Criterion) {
    let graph = columns(32, 16);
    c.bench_function("surfaces_32_columns", |b| {
        b.iter(|| black_box(find_correlation_surfaces(&graph).unwrap()));
    });
}

criterion_group!(benches, solve_bench);
criterion_main!(benches);
