#![deny(missing_docs)]

//! Spacetime graph of cubes and pipes with exhaustive structural validation.

mod compat;
mod config;
mod generators;
mod graph;
mod hash;
mod serialization;
mod validate;

pub use compat::compatible;
pub use config::{DegreeBounds, GraphConfig};
pub use generators::{gen_memory, gen_merge_split, gen_port_memory, gen_spatial_chain, gen_unit_loop};
pub use graph::{Cube, Pipe, SpacetimeGraph};
pub use hash::canonical_hash;
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
