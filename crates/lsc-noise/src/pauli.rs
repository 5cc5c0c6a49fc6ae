use lsc_core::{Basis, NoiseChannel, NoiseOp, QubitIndex};

/// One Pauli error a channel may apply, as single-qubit factors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PauliError {
    /// Non-identity factors, in qubit order.
    pub terms: Vec<(QubitIndex, Basis)>,
}

const PAULIS: [Basis; 3] = [Basis::X, Basis::Y, Basis::Z];

/// Every Pauli error `op` can apply with non-zero probability.
///
/// Flip channels apply the Pauli that anticommutes with the basis of their
/// reset or measurement; without a basis, Z preparation is assumed.
pub fn pauli_errors(op: &NoiseOp) -> Vec<PauliError> {
    if op.rate == 0.0 {
        return Vec::new();
    }
    match op.channel {
        NoiseChannel::Depolarize1 | NoiseChannel::Idle => op
            .qubits
            .iter()
            .flat_map(|qubit| {
                PAULIS.into_iter().map(move |pauli| PauliError {
                    terms: vec![(*qubit, pauli)],
                })
            })
            .collect(),
        NoiseChannel::Depolarize2 => op
            .qubits
            .chunks(2)
            .flat_map(|pair| match pair {
                [a, b] => two_qubit_errors(*a, *b),
                _ => Vec::new(),
            })
            .collect(),
        NoiseChannel::MeasurementFlip | NoiseChannel::ResetFlip => {
            let flip = op.basis.unwrap_or(Basis::Z).flip();
            op.qubits
                .iter()
                .map(|qubit| PauliError {
                    terms: vec![(*qubit, flip)],
                })
                .collect()
        }
    }
}

fn two_qubit_errors(a: QubitIndex, b: QubitIndex) -> Vec<PauliError> {
    let factors = |qubit: QubitIndex| {
        std::iter::once(None).chain(PAULIS.into_iter().map(move |pauli| Some((qubit, pauli))))
    };
    factors(a)
        .flat_map(|left| factors(b).map(move |right| (left, right)))
        .filter_map(|(left, right)| {
            let terms: Vec<_> = left.into_iter().chain(right).collect();
            (!terms.is_empty()).then_some(PauliError { terms })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(channel: NoiseChannel, qubits: &[u32], basis: Option<Basis>) -> NoiseOp {
        NoiseOp {
            channel,
            rate: 0.01,
            qubits: qubits.iter().copied().map(QubitIndex::from_raw).collect(),
            basis,
        }
    }

    #[test]
    fn depolarizing_sets_have_expected_sizes() {
        assert_eq!(pauli_errors(&op(NoiseChannel::Depolarize1, &[0], None)).len(), 3);
        assert_eq!(pauli_errors(&op(NoiseChannel::Depolarize2, &[0, 1], None)).len(), 15);
        assert_eq!(pauli_errors(&op(NoiseChannel::Idle, &[0, 1, 2], None)).len(), 9);
    }

    #[test]
    fn flips_anticommute_with_their_basis() {
        let errors = pauli_errors(&op(NoiseChannel::MeasurementFlip, &[4], Some(Basis::X)));
        assert_eq!(
            errors,
            vec![PauliError {
                terms: vec![(QubitIndex::from_raw(4), Basis::Z)]
            }]
        );
    }

    #[test]
    fn zero_rate_has_no_errors() {
        let mut silent = op(NoiseChannel::Depolarize1, &[0], None);
        silent.rate = 0.0;
        assert!(pauli_errors(&silent).is_empty());
    }
}
