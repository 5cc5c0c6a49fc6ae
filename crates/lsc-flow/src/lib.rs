#![deny(missing_docs)]

//! Discovery of logical observables by flow analysis over GF(2).
//!
//! A spacetime graph is projected into a ZX diagram and every spider
//! contributes parity constraints on its wires, once for Z-type and once for
//! X-type surfaces. Correlation surfaces are the null spaces of those systems.
//! The solve is a value local to one call.

mod solver;
mod surface;
mod zx;

pub use solver::{constraint_matrix, find_correlation_surfaces, solve_surfaces, SurfaceBasis};
pub use surface::{CorrelationSurface, SurfaceWire};
pub use zx::{BoundaryVertex, Phase, Spider, SpiderColor, Wire, ZxGraph};
