use lsc_compile::{compile, MeasurementRecords, OriginKind};
use lsc_core::{CubeKind, MeasurementIndex};
use lsc_graph::{gen_merge_split, gen_port_memory, gen_unit_loop};
use lsc_template::Role;

#[test]
fn every_cube_and_pipe_is_recovered() {
    let graph = gen_unit_loop().unwrap();
    let circuit = compile(&graph, 1).unwrap();
    let provenance = circuit.provenance();
    assert_eq!(
        provenance.recovered_cubes(),
        graph.cubes().map(|cube| cube.id).collect()
    );
    assert_eq!(
        provenance.recovered_pipes(),
        graph.pipes().map(|pipe| pipe.id).collect()
    );
}

#[test]
fn nothing_is_orphaned() {
    let graph = gen_merge_split().unwrap();
    let circuit = compile(&graph, 1).unwrap();
    let provenance = circuit.provenance();
    assert_eq!(provenance.instruction_count(), circuit.instruction_count());
    assert_eq!(provenance.qubit_count(), circuit.qubit_count());
    assert!(provenance.qubits().iter().all(|qubit| !qubit.origins.is_empty()));
    for idx in 0..circuit.instruction_count() {
        assert!(provenance.origin_of_instruction(idx).is_some());
    }

    let per_origin: usize = (0..provenance.origins().len())
        .map(|origin| provenance.measurements_of_origin(origin).len())
        .sum();
    assert_eq!(per_origin, circuit.measurement_count());
}

#[test]
fn merged_pipe_owns_stabilizer_measurements() {
    let graph = gen_merge_split().unwrap();
    let circuit = compile(&graph, 1).unwrap();
    let provenance = circuit.provenance();
    let pipe = graph
        .pipes()
        .find(|pipe| pipe.kind.is_operation_bearing())
        .unwrap();
    let origin = provenance.pipe_origin(pipe.id).unwrap();
    let measurements = provenance.measurements_of_origin(origin);
    assert!(!measurements.is_empty());
    for index in measurements {
        let record = provenance.measurement(index).unwrap();
        assert!(matches!(
            record.role,
            Role::Stabilizer { .. } | Role::DataReadout { .. }
        ));
        assert!(matches!(
            provenance.origin_of_measurement(index).unwrap().kind,
            OriginKind::Pipe { id, .. } if id == pipe.id
        ));
    }
}

#[test]
fn ports_are_recovered_without_operations() {
    let graph = gen_port_memory().unwrap();
    let circuit = compile(&graph, 1).unwrap();
    let provenance = circuit.provenance();
    let port = graph
        .cubes()
        .find(|cube| cube.kind == CubeKind::Port)
        .unwrap();
    let origin = provenance.cube_origin(port.id).unwrap();
    assert!(provenance.measurements_of_origin(origin).is_empty());
    assert!(provenance
        .instructions()
        .iter()
        .all(|record| record.origin != origin));
}

#[test]
fn relative_records_look_back_from_the_end() {
    let graph = gen_unit_loop().unwrap();
    let circuit = compile(&graph, 1).unwrap();
    let records = MeasurementRecords::new(&circuit);
    let total = records.total();
    assert_eq!(total, circuit.measurement_count());

    let last = MeasurementIndex::from_index(total - 1);
    let first = MeasurementIndex::from_index(0);
    assert_eq!(records.lookback(last), Some(-1));
    assert_eq!(records.lookback(first), Some(-(total as i64)));
    assert_eq!(records.absolute(-1), Some(last));
    assert_eq!(records.absolute(0), None);

    let relative = records.relative([last, first, last, first, first]);
    assert_eq!(relative, vec![-(total as i64)]);

    let qubit = circuit.provenance().measurement(last).unwrap().qubit;
    let history = records.of_qubit(qubit);
    assert_eq!(history.last(), Some(&last));
    if history.len() > 1 {
        assert_eq!(records.previous(qubit, last), Some(history[history.len() - 2]));
    }
}
