#![deny(missing_docs)]

//! Detector and observable synthesis for compiled circuits.
//!
//! Every measurement is propagated backwards through the Clifford circuit
//! once, giving a linear violation vector over the circuit's check points.
//! Detectors are local sets whose vectors cancel; they are found by a
//! windowed search over spacetime neighbourhoods, re-validated by exact
//! sign-tracked propagation and pruned to a minimal family. Observables are
//! seeded from the provenance of each selected correlation surface and
//! shortened with zero-parity detectors.

mod annotated;
mod coverage;
mod observables;
mod pauli;
mod propagate;
mod radius;
mod search;
mod sensitivity;
mod synth;

pub use annotated::{AnnotatedCircuit, Detector, Observable};
pub use observables::ObservableSelection;
pub use pauli::PauliString;
pub use propagate::{propagate, Propagation};
pub use radius::{distance, RadiusPolicy};
pub use sensitivity::Sensitivity;
pub use synth::{synthesize, SynthesisOptions};
