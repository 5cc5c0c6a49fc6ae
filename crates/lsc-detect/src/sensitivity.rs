use std::collections::BTreeSet;

use lsc_compile::CompiledCircuit;
use lsc_core::{BitVec, MeasurementIndex, SpacetimeCoords};

use crate::propagate::{back_propagate, CircuitLayout};

/// Linear violation vector of every measurement of a circuit.
///
/// A set of measurements is deterministic exactly when the XOR of the
/// vectors of its members is zero.
#[derive(Debug, Clone)]
pub struct Sensitivity {
    layout: CircuitLayout,
    vectors: Vec<BitVec>,
    coords: Vec<SpacetimeCoords>,
}

impl Sensitivity {
    /// Propagates every single measurement of `circuit` back to the start.
    pub fn compute(circuit: &CompiledCircuit) -> Self {
        let layout = CircuitLayout::new(circuit);
        let events = layout.event_count();
        let vectors = (0..layout.measurement_count())
            .map(|idx| {
                let single = BTreeSet::from([MeasurementIndex::from_index(idx)]);
                let propagation = back_propagate(circuit, &layout, &single, false);
                BitVec::from_indices(events, propagation.events)
            })
            .collect();
        let coords = circuit
            .provenance()
            .measurements()
            .iter()
            .map(|record| record.coords)
            .collect();
        Self {
            layout,
            vectors,
            coords,
        }
    }

    /// Number of measurements.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when the circuit measures nothing.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Violation vector of `measurement`.
    pub fn vector(&self, measurement: usize) -> &BitVec {
        &self.vectors[measurement]
    }

    /// Spacetime coordinates of every measurement.
    pub fn coords(&self) -> &[SpacetimeCoords] {
        &self.coords
    }

    /// XOR of the vectors of `set`.
    pub fn violation(&self, set: impl IntoIterator<Item = MeasurementIndex>) -> BitVec {
        let mut acc = BitVec::zeros(self.layout.event_count());
        for index in set {
            if let Some(vector) = self.vectors.get(index.index()) {
                acc.xor_assign(vector);
            }
        }
        acc
    }

    /// True when the product of `set` is fixed in the noiseless circuit.
    pub fn is_deterministic(&self, set: impl IntoIterator<Item = MeasurementIndex>) -> bool {
        self.violation(set).is_zero()
    }

    pub(crate) fn layout(&self) -> &CircuitLayout {
        &self.layout
    }
}
