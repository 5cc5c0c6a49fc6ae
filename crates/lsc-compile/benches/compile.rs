use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lsc_compile::compile;
use lsc_graph::{gen_merge_split, gen_unit_loop};

fn compile_bench(c: &mut Criterion) {
    let merge = gen_merge_split().unwrap();
    c.bench_function("compile_merge_split_k2", |b| {
        b.iter(|| black_box(compile(&merge, 2).unwrap()));
    });
    let unit = gen_unit_loop().unwrap();
    c.bench_function("compile_unit_loop_k3", |b| {
        b.iter(|| black_box(compile(&unit, 3).unwrap()));
    });
}

criterion_group!(benches, compile_bench);
criterion_main!(benches);
