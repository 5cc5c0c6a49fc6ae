#![deny(missing_docs)]
#![doc = "Shared identifiers, error families, GF(2) algebra, scaling functions and the target instruction set of the lattice-surgery compiler."]

pub mod errors;
pub mod gf2;
pub mod ids;
pub mod instruction;
pub mod lattice;
pub mod scale;
pub mod schema;

pub use errors::{ContextExt, ErrorInfo, LscError, StructuralReport};
pub use gf2::{BitMatrix, BitVec, Insertion, XorBasis};
pub use ids::{CubeId, MeasurementIndex, PipeId, QubitIndex};
pub use instruction::{Basis, Instruction, NoiseChannel, NoiseOp, SpacetimeCoords};
pub use lattice::{Axis, CubeKind, Face, Orientation, PipeKind, Position};
pub use scale::LinearFunction;
pub use schema::SchemaVersion;
