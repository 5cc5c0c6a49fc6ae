use std::collections::BTreeSet;

use lsc_compile::{compile, CompiledCircuit};
use lsc_core::{Basis, CubeKind, Instruction, LscError};
use lsc_detect::{
    propagate, synthesize, AnnotatedCircuit, ObservableSelection, RadiusPolicy, Sensitivity,
    SynthesisOptions,
};
use lsc_flow::{find_correlation_surfaces, CorrelationSurface, SurfaceBasis};
use lsc_graph::{gen_memory, gen_merge_split, gen_unit_loop, SpacetimeGraph};
use lsc_noise::NoiseModel;
use lsc_template::Role;

fn prepared(graph: &SpacetimeGraph) -> (CompiledCircuit, SurfaceBasis) {
    let circuit = compile(graph, 1).unwrap();
    let basis = find_correlation_surfaces(graph).unwrap();
    (circuit, basis)
}

fn options(radius: RadiusPolicy) -> SynthesisOptions {
    SynthesisOptions {
        radius,
        observables: ObservableSelection::All,
    }
}

fn assert_deterministic(annotated: &AnnotatedCircuit) {
    let sensitivity = Sensitivity::compute(annotated.circuit());
    for detector in annotated.detectors() {
        assert!(sensitivity.is_deterministic(detector.measurements.iter().copied()));
        let set: BTreeSet<_> = detector.measurements.iter().copied().collect();
        let propagation = propagate(annotated.circuit(), &set);
        assert!(propagation.is_deterministic());
        assert_eq!(propagation.parity, detector.expected_parity);
        assert_eq!(propagation.syndrome_support, detector.syndrome_support);
    }
}

#[test]
fn radius_one_leaves_memory_readouts_uncovered() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let err = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Uniform { radius: 1 }),
    )
    .unwrap_err();
    match err {
        LscError::IncompleteDetectorCoverage(info) => {
            for key in ["x", "y", "t", "origins", "uncovered", "radius"] {
                assert!(info.context.contains_key(key), "missing {key}");
            }
            assert!(info.context["origins"].contains("cube"));
            assert_eq!(info.context["radius"], "1");
            assert!(info.hint.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn radius_two_covers_a_memory_patch() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Uniform { radius: 2 }),
    )
    .unwrap();

    assert!(!annotated.detectors().is_empty());
    assert!(annotated
        .detectors()
        .iter()
        .all(|detector| !detector.expected_parity));
    assert_deterministic(&annotated);
}

#[test]
fn adaptive_policy_recovers_from_a_small_start() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let model = NoiseModel::noiseless();
    let adaptive = synthesize(
        &circuit,
        &model,
        &basis,
        &options(RadiusPolicy::Adaptive { start: 1, max: 3 }),
    )
    .unwrap();
    let uniform = synthesize(
        &circuit,
        &model,
        &basis,
        &options(RadiusPolicy::Uniform { radius: 2 }),
    )
    .unwrap();
    assert_eq!(adaptive, uniform);

    let err = synthesize(
        &circuit,
        &model,
        &basis,
        &options(RadiusPolicy::Adaptive { start: 1, max: 1 }),
    )
    .unwrap_err();
    assert!(matches!(err, LscError::IncompleteDetectorCoverage(_)));
}

#[test]
fn zero_radius_is_a_config_error() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let err = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Uniform { radius: 0 }),
    )
    .unwrap_err();
    assert!(matches!(err, LscError::Config(_)));
}

#[test]
fn unit_loop_has_zero_parity_detectors() {
    let (circuit, basis) = prepared(&gen_unit_loop().unwrap());
    assert_eq!(basis.rank(), 2);
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &SynthesisOptions {
            radius: RadiusPolicy::Adaptive { start: 2, max: 4 },
            observables: ObservableSelection::Indices {
                indices: Vec::new(),
            },
        },
    )
    .unwrap();
    assert!(annotated
        .detectors()
        .iter()
        .any(|detector| !detector.expected_parity));
    assert!(annotated.observables().is_empty());
    assert_deterministic(&annotated);
}

#[test]
fn memory_observable_reads_the_logical_column() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 3).unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Uniform { radius: 2 }),
    )
    .unwrap();
    assert_eq!(annotated.observables().len(), 1);
    let observable = &annotated.observables()[0];
    assert_eq!(observable.index, 0);
    assert!(!observable.measurements.is_empty());

    let set: BTreeSet<_> = observable.measurements.iter().copied().collect();
    let propagation = propagate(annotated.circuit(), &set);
    assert!(propagation.is_deterministic());
    assert!(!propagation.parity);
}

#[test]
fn x_memory_observable_reads_x_data() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::X, 3).unwrap());
    assert_eq!(basis.surfaces()[0].basis(), Basis::X);
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Adaptive { start: 2, max: 4 }),
    )
    .unwrap();
    assert_deterministic(&annotated);
    assert_eq!(annotated.observables().len(), 1);
    let observable = &annotated.observables()[0];
    assert_eq!(observable.surface.basis(), Basis::X);
    assert!(!observable.measurements.is_empty());

    for index in &observable.measurements {
        let record = annotated.circuit().provenance().measurement(*index).unwrap();
        assert_eq!(record.role, Role::DataReadout { basis: Basis::X });
    }

    let set: BTreeSet<_> = observable.measurements.iter().copied().collect();
    let propagation = propagate(annotated.circuit(), &set);
    assert!(propagation.is_deterministic());
    assert!(!propagation.parity);
}

#[test]
fn noisy_merge_gives_supported_detectors_and_an_observable() {
    let (circuit, basis) = prepared(&gen_merge_split().unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::uniform(0.001).unwrap(),
        &basis,
        &options(RadiusPolicy::Adaptive { start: 2, max: 4 }),
    )
    .unwrap();

    assert!(annotated
        .circuit()
        .instructions()
        .iter()
        .any(|instruction| matches!(instruction, Instruction::Noise(_))));
    assert!(annotated
        .detectors()
        .iter()
        .all(|detector| !detector.syndrome_support.is_empty()));
    assert_eq!(annotated.observables().len(), basis.rank());
    assert_deterministic(&annotated);
}

#[test]
fn observables_track_the_same_surfaces_across_sizes() {
    let graph = gen_merge_split().unwrap();
    let basis = find_correlation_surfaces(&graph).unwrap();
    let opts = options(RadiusPolicy::Adaptive { start: 2, max: 4 });
    let surfaces_at = |k: u32| -> Vec<CorrelationSurface> {
        let circuit = compile(&graph, k).unwrap();
        synthesize(&circuit, &NoiseModel::noiseless(), &basis, &opts)
            .unwrap()
            .observables()
            .iter()
            .map(|observable| observable.surface.clone())
            .collect()
    };
    let small = surfaces_at(1);
    let large = surfaces_at(2);
    assert_eq!(small.len(), basis.rank());
    assert_eq!(small, large);
    assert_eq!(small, basis.surfaces());
}

#[test]
fn no_detector_strictly_contains_an_equivalent_one() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 3).unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::uniform(0.01).unwrap(),
        &basis,
        &SynthesisOptions {
            radius: RadiusPolicy::Uniform { radius: 2 },
            observables: ObservableSelection::Indices {
                indices: Vec::new(),
            },
        },
    )
    .unwrap();
    let detectors = annotated.detectors();
    for (a, outer) in detectors.iter().enumerate() {
        let outer_set: BTreeSet<_> = outer.measurements.iter().collect();
        for (b, inner) in detectors.iter().enumerate() {
            if a == b || inner.syndrome_support != outer.syndrome_support {
                continue;
            }
            let inner_set: BTreeSet<_> = inner.measurements.iter().collect();
            assert!(
                !(inner_set.len() < outer_set.len() && inner_set.is_subset(&outer_set)),
                "detector {a} contains detector {b}"
            );
        }
    }
}

#[test]
fn synthesis_is_deterministic() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let model = NoiseModel::uniform(0.001).unwrap();
    let opts = options(RadiusPolicy::Uniform { radius: 2 });
    let first = synthesize(&circuit, &model, &basis, &opts).unwrap();
    let second = synthesize(&circuit, &model, &basis, &opts).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.canonical_hash().unwrap(),
        second.canonical_hash().unwrap()
    );
}

#[test]
fn annotations_follow_the_untouched_operations() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Uniform { radius: 2 }),
    )
    .unwrap();
    let stream = annotated.to_instructions();
    let operations = circuit.to_instructions();
    assert_eq!(&stream[..operations.len()], operations.as_slice());

    let tail = &stream[operations.len()..];
    let detectors = tail
        .iter()
        .filter(|instruction| matches!(instruction, Instruction::Detector { .. }))
        .count();
    assert_eq!(detectors, annotated.detectors().len());
    for instruction in tail {
        match instruction {
            Instruction::Detector { records, .. } | Instruction::Observable { records, .. } => {
                assert!(!records.is_empty());
                let total = circuit.measurement_count() as i64;
                assert!(records.iter().all(|offset| *offset < 0 && *offset >= -total));
            }
            other => panic!("unexpected annotation {other:?}"),
        }
    }
}

#[test]
fn selection_errors_are_reported() {
    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let out_of_range = SynthesisOptions {
        radius: RadiusPolicy::Uniform { radius: 2 },
        observables: ObservableSelection::Indices { indices: vec![5] },
    };
    let err = synthesize(&circuit, &NoiseModel::noiseless(), &basis, &out_of_range).unwrap_err();
    assert_eq!(err.code(), "observable-index-out-of-range");

    let other = find_correlation_surfaces(&gen_merge_split().unwrap()).unwrap();
    let foreign = SynthesisOptions {
        radius: RadiusPolicy::Uniform { radius: 2 },
        observables: ObservableSelection::Custom {
            surfaces: other.surfaces().to_vec(),
        },
    };
    let err = synthesize(&circuit, &NoiseModel::noiseless(), &basis, &foreign).unwrap_err();
    assert!(matches!(err, LscError::Algebraic(_)));

    let err = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &other,
        &options(RadiusPolicy::Uniform { radius: 2 }),
    )
    .unwrap_err();
    assert_eq!(err.code(), "graph-mismatch");
}

#[test]
fn synthesis_runs_under_a_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("lsc_detect=debug"))
        .try_init();

    let (circuit, basis) = prepared(&gen_memory(CubeKind::Z, 2).unwrap());
    let annotated = synthesize(
        &circuit,
        &NoiseModel::noiseless(),
        &basis,
        &options(RadiusPolicy::Adaptive { start: 1, max: 2 }),
    )
    .unwrap();
    assert!(!annotated.detectors().is_empty());
}
