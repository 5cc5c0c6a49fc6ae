use std::collections::{BTreeMap, BTreeSet};

use lsc_core::{MeasurementIndex, QubitIndex};

use crate::circuit::CompiledCircuit;

/// Measurement record of a circuit, indexed per qubit.
///
/// Relative offsets follow the `rec[-n]` convention: the last measurement of
/// the circuit is `-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecords {
    total: usize,
    by_qubit: BTreeMap<QubitIndex, Vec<MeasurementIndex>>,
}

impl MeasurementRecords {
    /// Indexes the measurements of `circuit`.
    pub fn new(circuit: &CompiledCircuit) -> Self {
        let mut by_qubit: BTreeMap<QubitIndex, Vec<MeasurementIndex>> = BTreeMap::new();
        let measurements = circuit.provenance().measurements();
        for (idx, record) in measurements.iter().enumerate() {
            by_qubit
                .entry(record.qubit)
                .or_default()
                .push(MeasurementIndex::from_index(idx));
        }
        Self {
            total: measurements.len(),
            by_qubit,
        }
    }

    /// Number of records.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Measurements of `qubit`, increasing.
    pub fn of_qubit(&self, qubit: QubitIndex) -> &[MeasurementIndex] {
        self.by_qubit.get(&qubit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last measurement of `qubit` strictly before `before`.
    pub fn previous(&self, qubit: QubitIndex, before: MeasurementIndex) -> Option<MeasurementIndex> {
        let records = self.of_qubit(qubit);
        let cut = records.partition_point(|index| *index < before);
        cut.checked_sub(1).map(|idx| records[idx])
    }

    /// Negative look-back of `index`, or `None` when out of range.
    pub fn lookback(&self, index: MeasurementIndex) -> Option<i64> {
        if index.index() >= self.total {
            return None;
        }
        Some(index.index() as i64 - self.total as i64)
    }

    /// Absolute index of the look-back `offset`.
    pub fn absolute(&self, offset: i64) -> Option<MeasurementIndex> {
        if offset >= 0 {
            return None;
        }
        let index = self.total as i64 + offset;
        (index >= 0).then(|| MeasurementIndex::from_index(index as usize))
    }

    /// Sorted, unique, negative look-backs of `set`; repeated entries cancel.
    pub fn relative(&self, set: impl IntoIterator<Item = MeasurementIndex>) -> Vec<i64> {
        let mut odd: BTreeSet<MeasurementIndex> = BTreeSet::new();
        for index in set {
            if !odd.insert(index) {
                odd.remove(&index);
            }
        }
        odd.into_iter()
            .filter_map(|index| self.lookback(index))
            .collect()
    }
}
