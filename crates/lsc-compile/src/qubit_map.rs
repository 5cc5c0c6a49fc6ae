use std::collections::BTreeMap;

use lsc_core::{ErrorInfo, LscError, QubitIndex};
use lsc_template::LocalPos;
use serde::{Deserialize, Serialize};

/// Dense indexing of doubled-grid sites, sorted by `(y, x)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LocalPos>", into = "Vec<LocalPos>")]
pub struct QubitMap {
    positions: Vec<LocalPos>,
    index: BTreeMap<LocalPos, QubitIndex>,
}

impl QubitMap {
    /// Indexes `positions`. Duplicate sites are rejected.
    pub fn new(positions: impl IntoIterator<Item = LocalPos>) -> Result<Self, LscError> {
        let mut positions: Vec<LocalPos> = positions.into_iter().collect();
        positions.sort_by_key(|pos| (pos.y, pos.x));
        let mut index = BTreeMap::new();
        for (idx, pos) in positions.iter().enumerate() {
            if index.insert(*pos, QubitIndex::from_index(idx)).is_some() {
                return Err(LscError::Stitch(
                    ErrorInfo::new("duplicate-qubit-position", "site indexed twice")
                        .with_context("position", pos.to_string()),
                ));
            }
        }
        Ok(Self { positions, index })
    }

    /// Index of the qubit at `pos`.
    pub fn index_of(&self, pos: LocalPos) -> Option<QubitIndex> {
        self.index.get(&pos).copied()
    }

    /// Site of qubit `qubit`.
    pub fn position_of(&self, qubit: QubitIndex) -> Option<LocalPos> {
        self.positions.get(qubit.index()).copied()
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no site is indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sites in index order.
    pub fn positions(&self) -> &[LocalPos] {
        &self.positions
    }
}

impl TryFrom<Vec<LocalPos>> for QubitMap {
    type Error = LscError;

    fn try_from(positions: Vec<LocalPos>) -> Result<Self, Self::Error> {
        QubitMap::new(positions)
    }
}

impl From<QubitMap> for Vec<LocalPos> {
    fn from(map: QubitMap) -> Self {
        map.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_rows_first() {
        let map = QubitMap::new([
            LocalPos::new(2, 0),
            LocalPos::new(0, 2),
            LocalPos::new(0, 0),
        ])
        .unwrap();
        assert_eq!(map.index_of(LocalPos::new(0, 0)), Some(QubitIndex::from_raw(0)));
        assert_eq!(map.index_of(LocalPos::new(2, 0)), Some(QubitIndex::from_raw(1)));
        assert_eq!(map.position_of(QubitIndex::from_raw(2)), Some(LocalPos::new(0, 2)));
    }

    #[test]
    fn rejects_duplicates() {
        let err = QubitMap::new([LocalPos::new(1, 1), LocalPos::new(1, 1)]).unwrap_err();
        assert_eq!(err.code(), "duplicate-qubit-position");
    }
}
