#![deny(missing_docs)]

//! Size-scaled circuit templates for cubes and pipes.
//!
//! Generators are pure functions of the kind, the size parameter `k` and the
//! face configuration. The kind enumeration is closed, so the dispatch in
//! [`cube_template`] and [`pipe_template`] is an exhaustive match.

mod boundary;
mod geometry;
mod library;
mod schedule;
mod template;

pub use boundary::{BoundaryConfig, FaceState, PipeConfig};
pub use geometry::{LocalPos, PatchGeometry, Plaquette, DISTANCE, ROUNDS};
pub use library::{cube_template, pipe_template};
pub use schedule::{
    cnot_order, Schedule, ROUND_STEPS, STEP_CNOT, STEP_ENTER, STEP_EXIT, STEP_MEASURE, STEP_RESET,
    X_ORDER, Z_ORDER,
};
pub use template::{Interface, Role, Round, Slot, SlotOp, Template};
