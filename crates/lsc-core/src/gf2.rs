//! Dense linear algebra over GF(2).
//!
//! Rows are packed into `u64` words. Every routine here is a plain value
//! computation scoped to one call, so solvers can be built and dropped freely.

use serde::{Deserialize, Serialize};

const WORD: usize = 64;

/// Growable packed bit vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVec {
    len: usize,
    words: Vec<u64>,
}

impl BitVec {
    /// Creates an all-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(WORD)],
        }
    }

    /// Creates a vector with ones at the given indices. Repeated indices cancel.
    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut vector = Self::zeros(len);
        for index in indices {
            vector.flip(index);
        }
        vector
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the vector has no addressable bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extends the vector with zeros so that `index` is addressable.
    pub fn grow_to(&mut self, len: usize) {
        if len > self.len {
            self.len = len;
            self.words.resize(len.div_ceil(WORD), 0);
        }
    }

    /// Reads a bit; out-of-range bits read as zero.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        (self.words[index / WORD] >> (index % WORD)) & 1 == 1
    }

    /// Writes a bit, growing the vector when needed.
    pub fn set(&mut self, index: usize, value: bool) {
        self.grow_to(index + 1);
        let mask = 1u64 << (index % WORD);
        if value {
            self.words[index / WORD] |= mask;
        } else {
            self.words[index / WORD] &= !mask;
        }
    }

    /// Toggles a bit, growing the vector when needed.
    pub fn flip(&mut self, index: usize) {
        self.grow_to(index + 1);
        self.words[index / WORD] ^= 1u64 << (index % WORD);
    }

    /// In-place addition. Vectors of different lengths are zero-extended.
    pub fn xor_assign(&mut self, other: &BitVec) {
        self.grow_to(other.len);
        for (lhs, rhs) in self.words.iter_mut().zip(&other.words) {
            *lhs ^= *rhs;
        }
    }

    /// Returns true when every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Index of the lowest set bit.
    pub fn first_one(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(idx, word)| idx * WORD + word.trailing_zeros() as usize)
    }

    /// Iterates over the indices of set bits in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(idx, word)| {
            let mut remaining = *word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(idx * WORD + bit)
            })
        })
    }

    /// Parity of the bitwise product with another vector.
    pub fn dot(&self, other: &BitVec) -> bool {
        let parity: u32 = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(lhs, rhs)| (lhs & rhs).count_ones())
            .sum();
        parity % 2 == 1
    }
}

/// Row-major matrix over GF(2) with a fixed column count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitMatrix {
    cols: usize,
    rows: Vec<BitVec>,
}

impl BitMatrix {
    /// Creates an empty matrix with the given number of columns.
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// Appends a row given by the indices of its set bits.
    pub fn push_sparse_row(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.rows.push(BitVec::from_indices(self.cols, indices));
    }

    /// Appends a dense row, resized to the column count.
    pub fn push_row(&mut self, mut row: BitVec) {
        row.grow_to(self.cols);
        self.rows.push(row);
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrowed rows.
    pub fn rows(&self) -> &[BitVec] {
        &self.rows
    }

    /// Consumes the matrix and returns its rows.
    pub fn into_rows(self) -> Vec<BitVec> {
        self.rows
    }

    /// Brings the matrix to reduced row-echelon form, dropping zero rows.
    ///
    /// Returns the pivot column of each remaining row. The result is unique
    /// for a given row space, which is what makes basis outputs canonical.
    pub fn rref(&mut self) -> Vec<usize> {
        let mut pivots = Vec::new();
        let mut next = 0;
        for col in 0..self.cols {
            let Some(found) = (next..self.rows.len()).find(|&r| self.rows[r].get(col)) else {
                continue;
            };
            self.rows.swap(next, found);
            let pivot_row = self.rows[next].clone();
            for (r, row) in self.rows.iter_mut().enumerate() {
                if r != next && row.get(col) {
                    row.xor_assign(&pivot_row);
                }
            }
            pivots.push(col);
            next += 1;
            if next == self.rows.len() {
                break;
            }
        }
        self.rows.truncate(next);
        pivots
    }

    /// Rank of the row space.
    pub fn rank(&self) -> usize {
        let mut scratch = self.clone();
        scratch.rref().len()
    }

    /// Basis of the null space `{v : M v = 0}`, one vector per free column.
    ///
    /// Vectors are returned in increasing order of their free column.
    pub fn nullspace(&self) -> Vec<BitVec> {
        let mut reduced = self.clone();
        let pivots = reduced.rref();
        let mut is_pivot = vec![false; self.cols];
        for &pivot in &pivots {
            is_pivot[pivot] = true;
        }
        let mut basis = Vec::new();
        for free in (0..self.cols).filter(|col| !is_pivot[*col]) {
            let mut vector = BitVec::zeros(self.cols);
            vector.set(free, true);
            for (row, &pivot) in reduced.rows.iter().zip(&pivots) {
                if row.get(free) {
                    vector.set(pivot, true);
                }
            }
            basis.push(vector);
        }
        basis
    }

    /// Returns true when `M v = 0`.
    pub fn annihilates(&self, vector: &BitVec) -> bool {
        self.rows.iter().all(|row| !row.dot(vector))
    }
}

/// Outcome of inserting a vector into an [`XorBasis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The vector was independent and now owns the returned pivot column.
    Independent {
        /// Pivot column claimed by the new basis entry.
        pivot: usize,
    },
    /// The vector is a sum of earlier insertions, listed by insertion tag.
    Dependent {
        /// Tags of the earlier insertions summing to the vector.
        combination: Vec<usize>,
    },
}

#[derive(Debug, Clone)]
struct BasisEntry {
    pivot: usize,
    vector: BitVec,
    combination: BitVec,
}

/// Incremental, fully reduced basis that remembers how each entry was built.
///
/// Every inserted vector receives the next tag (0, 1, 2, ...). Entries are
/// kept reduced against each other, so membership tests need one pass.
#[derive(Debug, Clone, Default)]
pub struct XorBasis {
    entries: Vec<BasisEntry>,
    inserted: usize,
}

impl XorBasis {
    /// Creates an empty basis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of independent entries.
    pub fn rank(&self) -> usize {
        self.entries.len()
    }

    /// Number of vectors inserted so far, independent or not.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Reduces a vector against the basis.
    ///
    /// Returns the residual and the tags whose sum was subtracted.
    pub fn reduce(&self, vector: &BitVec) -> (BitVec, BitVec) {
        let mut residual = vector.clone();
        let mut combination = BitVec::zeros(self.inserted);
        for entry in &self.entries {
            if residual.get(entry.pivot) {
                residual.xor_assign(&entry.vector);
                combination.xor_assign(&entry.combination);
            }
        }
        (residual, combination)
    }

    /// Returns the tags summing to `vector`, or `None` when it is outside the span.
    pub fn express(&self, vector: &BitVec) -> Option<Vec<usize>> {
        let (residual, combination) = self.reduce(vector);
        residual.is_zero().then(|| combination.ones().collect())
    }

    /// Inserts a vector under the next tag.
    pub fn insert(&mut self, vector: BitVec) -> Insertion {
        let tag = self.inserted;
        self.inserted += 1;
        let (residual, mut combination) = self.reduce(&vector);
        match residual.first_one() {
            None => Insertion::Dependent {
                combination: combination.ones().collect(),
            },
            Some(pivot) => {
                combination.flip(tag);
                for entry in &mut self.entries {
                    if entry.vector.get(pivot) {
                        entry.vector.xor_assign(&residual);
                        entry.combination.xor_assign(&combination);
                    }
                }
                self.entries.push(BasisEntry {
                    pivot,
                    vector: residual,
                    combination,
                });
                Insertion::Independent { pivot }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ones_iterates_across_words() {
        let vector = BitVec::from_indices(200, [3, 64, 130, 199]);
        assert_eq!(vector.ones().collect::<Vec<_>>(), vec![3, 64, 130, 199]);
        assert_eq!(vector.first_one(), Some(3));
    }

    #[test]
    fn nullspace_of_cycle_is_all_ones() {
        let mut matrix = BitMatrix::new(4);
        matrix.push_sparse_row([0, 1]);
        matrix.push_sparse_row([1, 2]);
        matrix.push_sparse_row([2, 3]);
        matrix.push_sparse_row([3, 0]);
        let kernel = matrix.nullspace();
        assert_eq!(kernel.len(), 1);
        assert_eq!(kernel[0].ones().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn dependent_insertion_reports_combination() {
        let mut basis = XorBasis::new();
        basis.insert(BitVec::from_indices(8, [0, 1]));
        basis.insert(BitVec::from_indices(8, [1, 2]));
        let outcome = basis.insert(BitVec::from_indices(8, [0, 2]));
        assert_eq!(
            outcome,
            Insertion::Dependent {
                combination: vec![0, 1]
            }
        );
    }
}
