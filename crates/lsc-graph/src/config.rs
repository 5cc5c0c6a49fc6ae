use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use lsc_core::{CubeKind, SchemaVersion};

/// Inclusive degree bounds enforced per cube kind by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeBounds {
    /// Minimum number of incident pipes.
    pub min: usize,
    /// Maximum number of incident pipes.
    pub max: usize,
}

impl DegreeBounds {
    /// Creates a new bound pair.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Bounds requiring exactly `degree` pipes.
    pub const fn exactly(degree: usize) -> Self {
        Self::new(degree, degree)
    }

    /// Returns true when `degree` lies within the bounds.
    pub fn admits(&self, degree: usize) -> bool {
        self.range().contains(&degree)
    }

    fn range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// Configuration options that control the behaviour of [`SpacetimeGraph`](crate::SpacetimeGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Degree bounds per cube kind; kinds without an entry are unbounded.
    pub degree_bounds: BTreeMap<CubeKind, DegreeBounds>,
    /// Schema version stored alongside serialized payloads.
    pub schema_version: SchemaVersion,
}

impl GraphConfig {
    /// Returns the bounds for `kind`, if any.
    pub fn bounds_for(&self, kind: CubeKind) -> Option<DegreeBounds> {
        self.degree_bounds.get(&kind).copied()
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        let degree_bounds = BTreeMap::from([
            (CubeKind::Z, DegreeBounds::new(1, 4)),
            (CubeKind::X, DegreeBounds::new(1, 4)),
            (CubeKind::Boundary, DegreeBounds::new(1, 4)),
            (CubeKind::Y, DegreeBounds::exactly(1)),
            (CubeKind::Port, DegreeBounds::exactly(1)),
        ]);
        Self {
            degree_bounds,
            schema_version: SchemaVersion::default(),
        }
    }
}
