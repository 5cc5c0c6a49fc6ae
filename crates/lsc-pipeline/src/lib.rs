#![deny(missing_docs)]

//! End-to-end compilation of a spacetime graph from a YAML configuration.
//!
//! [`run`] validates the graph, finds its correlation surfaces, compiles it at
//! every configured size, applies the noise policy and synthesizes detectors
//! and observables. The [`PipelineReport`] carries canonical hashes of every
//! product, so two runs over the same inputs can be compared by hash.

mod config;
mod run;

pub use config::PipelineConfig;
pub use run::{run, PipelineOutput, PipelineReport, SizeReport};
