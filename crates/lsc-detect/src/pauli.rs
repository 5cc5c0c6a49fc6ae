//! Pauli strings with phase, over a fixed qubit register.
//!
//! A string is `i^phase · ∏ X^x Z^z`, with the `X` factor left of the `Z`
//! factor on every qubit, so a `Y` factor contributes one power of `i`.

use lsc_core::{Basis, BitVec, QubitIndex};

/// Pauli operator on `n` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauliString {
    x: BitVec,
    z: BitVec,
    phase: u8,
}

impl PauliString {
    /// Identity on `n` qubits.
    pub fn identity(n: usize) -> Self {
        Self {
            x: BitVec::zeros(n),
            z: BitVec::zeros(n),
            phase: 0,
        }
    }

    /// Single-qubit Pauli of `basis` on `qubit`.
    pub fn single(n: usize, qubit: QubitIndex, basis: Basis) -> Self {
        let mut pauli = Self::identity(n);
        pauli.multiply(qubit, basis);
        pauli
    }

    /// `(x, z)` bits on `qubit`.
    pub fn component(&self, qubit: QubitIndex) -> (bool, bool) {
        (self.x.get(qubit.index()), self.z.get(qubit.index()))
    }

    /// True when no qubit carries a non-identity factor.
    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.z.is_zero()
    }

    /// True when some qubit carries an `X` or `Y` factor.
    pub fn has_x(&self) -> bool {
        !self.x.is_zero()
    }

    /// Qubits carrying an `X` or `Y` factor.
    pub fn x_support(&self) -> impl Iterator<Item = QubitIndex> + '_ {
        self.x.ones().map(QubitIndex::from_index)
    }

    /// `-1` sign of the string written over Hermitian factors; `None` when
    /// the string is not Hermitian.
    pub fn is_negative(&self) -> Option<bool> {
        let ys = self.x.ones().filter(|q| self.z.get(*q)).count();
        match (4 + self.phase as usize - ys % 4) % 4 {
            0 => Some(false),
            2 => Some(true),
            _ => None,
        }
    }

    /// Right multiplication by the single-qubit Pauli of `basis` on `qubit`.
    pub fn multiply(&mut self, qubit: QubitIndex, basis: Basis) {
        let q = qubit.index();
        let (bx, bz) = basis.bits();
        let mut phase = self.phase;
        if basis == Basis::Y {
            phase += 1;
        }
        if self.z.get(q) && bx {
            phase += 2;
        }
        self.phase = phase % 4;
        if bx {
            self.x.flip(q);
        }
        if bz {
            self.z.flip(q);
        }
    }

    /// True when the string commutes with the Pauli of `basis` on `qubit`.
    pub fn commutes_with(&self, qubit: QubitIndex, basis: Basis) -> bool {
        let (x, z) = self.component(qubit);
        let (bx, bz) = basis.bits();
        (x && bz) == (z && bx)
    }

    /// Conjugation by a Hadamard on `qubit`.
    pub fn hadamard(&mut self, qubit: QubitIndex) {
        let q = qubit.index();
        let (x, z) = (self.x.get(q), self.z.get(q));
        if x && z {
            self.phase = (self.phase + 2) % 4;
        }
        self.x.set(q, z);
        self.z.set(q, x);
    }

    /// Conjugation by a CNOT.
    pub fn cnot(&mut self, control: QubitIndex, target: QubitIndex) {
        let (c, t) = (control.index(), target.index());
        if self.x.get(c) {
            self.x.flip(t);
        }
        if self.z.get(t) {
            self.z.flip(c);
        }
    }

    /// Removes the factor on `qubit`, returning its `(x, z)` bits.
    ///
    /// The phase is adjusted so that the removed factor is the Hermitian
    /// Pauli of those bits.
    pub fn take(&mut self, qubit: QubitIndex) -> (bool, bool) {
        let bits = self.component(qubit);
        match bits {
            (true, true) => self.multiply(qubit, Basis::Y),
            (true, false) => self.multiply(qubit, Basis::X),
            (false, true) => self.multiply(qubit, Basis::Z),
            (false, false) => {}
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(index: u32) -> QubitIndex {
        QubitIndex::from_raw(index)
    }

    #[test]
    fn hadamard_swaps_and_negates_y() {
        let mut pauli = PauliString::single(1, q(0), Basis::X);
        pauli.hadamard(q(0));
        assert_eq!(pauli, PauliString::single(1, q(0), Basis::Z));

        let mut y = PauliString::single(1, q(0), Basis::Y);
        y.hadamard(q(0));
        assert_eq!(y.component(q(0)), (true, true));
        assert_eq!(y.is_negative(), Some(true));
    }

    #[test]
    fn cnot_spreads_x_forward_and_z_backward() {
        let mut x = PauliString::single(2, q(0), Basis::X);
        x.cnot(q(0), q(1));
        assert_eq!(x.component(q(1)), (true, false));

        let mut z = PauliString::single(2, q(1), Basis::Z);
        z.cnot(q(0), q(1));
        assert_eq!(z.component(q(0)), (false, true));
        assert_eq!(z.component(q(1)), (false, true));
    }

    #[test]
    fn yy_maps_to_minus_xz_under_cnot() {
        let mut yy = PauliString::single(2, q(0), Basis::Y);
        yy.multiply(q(1), Basis::Y);
        yy.cnot(q(0), q(1));
        assert_eq!(yy.component(q(0)), (true, false));
        assert_eq!(yy.component(q(1)), (false, true));
        assert_eq!(yy.is_negative(), Some(true));
    }

    #[test]
    fn multiplying_by_itself_is_identity() {
        for basis in [Basis::X, Basis::Y, Basis::Z] {
            let mut pauli = PauliString::single(3, q(2), basis);
            pauli.multiply(q(2), basis);
            assert!(pauli.is_identity());
            assert_eq!(pauli.is_negative(), Some(false), "{basis}");
        }
    }

    #[test]
    fn commutation_follows_the_symplectic_form() {
        let pauli = PauliString::single(1, q(0), Basis::X);
        assert!(pauli.commutes_with(q(0), Basis::X));
        assert!(!pauli.commutes_with(q(0), Basis::Z));
        assert!(!pauli.commutes_with(q(0), Basis::Y));
    }
}
