use lsc_core::gf2::{BitMatrix, BitVec, Insertion, XorBasis};
use proptest::prelude::*;

fn matrix_from(cols: usize, rows: &[Vec<usize>]) -> BitMatrix {
    let mut matrix = BitMatrix::new(cols);
    for row in rows {
        matrix.push_sparse_row(row.iter().map(|idx| idx % cols));
    }
    matrix
}

proptest! {
    #[test]
    fn rank_nullity_holds(
        cols in 1usize..40,
        rows in prop::collection::vec(prop::collection::vec(0usize..64, 0..6), 0..30),
    ) {
        let matrix = matrix_from(cols, &rows);
        let kernel = matrix.nullspace();
        prop_assert_eq!(matrix.rank() + kernel.len(), cols);
        for vector in &kernel {
            prop_assert!(matrix.annihilates(vector));
        }
        let mut span = BitMatrix::new(cols);
        for vector in kernel.iter().cloned() {
            span.push_row(vector);
        }
        prop_assert_eq!(span.rank(), kernel.len());
    }

    #[test]
    fn xor_basis_matches_matrix_rank(
        cols in 1usize..40,
        rows in prop::collection::vec(prop::collection::vec(0usize..64, 0..6), 0..30),
    ) {
        let matrix = matrix_from(cols, &rows);
        let mut basis = XorBasis::new();
        for row in matrix.rows() {
            let outcome = basis.insert(row.clone());
            if let Insertion::Dependent { combination } = outcome {
                let mut sum = BitVec::zeros(cols);
                for tag in combination {
                    sum.xor_assign(&matrix.rows()[tag]);
                }
                prop_assert_eq!(sum.ones().collect::<Vec<_>>(), row.ones().collect::<Vec<_>>());
            }
        }
        prop_assert_eq!(basis.rank(), matrix.rank());
    }

    #[test]
    fn rref_is_canonical_for_a_row_space(
        cols in 1usize..24,
        rows in prop::collection::vec(prop::collection::vec(0usize..64, 1..5), 1..12),
    ) {
        let mut forward = matrix_from(cols, &rows);
        let mut reversed_rows = rows.clone();
        reversed_rows.reverse();
        let mut backward = matrix_from(cols, &reversed_rows);
        prop_assert_eq!(forward.rref(), backward.rref());
        prop_assert_eq!(forward.rows(), backward.rows());
    }
}
