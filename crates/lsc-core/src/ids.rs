//! Dense integer identifiers used across the pipeline arenas.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident($raw:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name($raw);

        impl $name {
            /// Creates a new identifier from its raw integer representation.
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Returns the raw integer representation of the identifier.
            pub const fn as_raw(&self) -> $raw {
                self.0
            }

            /// Returns the identifier as an arena index.
            pub const fn index(&self) -> usize {
                self.0 as usize
            }

            /// Creates an identifier from an arena index.
            pub const fn from_index(index: usize) -> Self {
                Self(index as $raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Identifier of a cube inside a spacetime graph.
    CubeId(u32),
    "c"
);
arena_id!(
    /// Identifier of a pipe inside a spacetime graph.
    PipeId(u32),
    "p"
);
arena_id!(
    /// Global index of a physical qubit in a compiled circuit.
    QubitIndex(u32),
    "q"
);
arena_id!(
    /// Position of a measurement in the measurement record of a circuit.
    MeasurementIndex(u32),
    "m"
);
