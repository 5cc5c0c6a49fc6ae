#![deny(missing_docs)]

//! Deterministic noise policies and their rewrite of compiled circuits.
//!
//! A [`NoiseModel`] never samples. It inserts error-channel instructions next
//! to the operations they affect, and each inserted channel can enumerate the
//! Pauli errors it may apply.

mod apply;
mod model;
mod pauli;

pub use apply::apply_circuit;
pub use model::NoiseModel;
pub use pauli::{pauli_errors, PauliError};
