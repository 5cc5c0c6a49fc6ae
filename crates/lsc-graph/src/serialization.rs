use lsc_core::errors::{ErrorInfo, LscError};
use lsc_core::{CubeId, CubeKind, Position, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::config::{DegreeBounds, GraphConfig};
use crate::graph::SpacetimeGraph;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &SpacetimeGraph) -> Result<Vec<u8>, LscError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<SpacetimeGraph, LscError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| LscError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &SpacetimeGraph) -> Result<String, LscError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| LscError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
///
/// Cubes and pipes are replayed through `add_cube` and `add_pipe`, so every
/// construction invariant holds for the restored graph.
pub fn graph_from_json(json: &str) -> Result<SpacetimeGraph, LscError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| LscError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    schema_version: SchemaVersion,
    degree_bounds: Vec<SerializableBounds>,
    cubes: Vec<SerializableCube>,
    pipes: Vec<[u32; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableBounds {
    kind: CubeKind,
    min: u64,
    max: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableCube {
    position: Position,
    kind: CubeKind,
}

impl SerializableGraph {
    fn from_graph(graph: &SpacetimeGraph) -> Self {
        let config = graph.config();
        Self {
            schema_version: config.schema_version,
            degree_bounds: config
                .degree_bounds
                .iter()
                .map(|(kind, bounds)| SerializableBounds {
                    kind: *kind,
                    min: bounds.min as u64,
                    max: bounds.max as u64,
                })
                .collect(),
            cubes: graph
                .cubes()
                .map(|cube| SerializableCube {
                    position: cube.position,
                    kind: cube.kind,
                })
                .collect(),
            pipes: graph
                .pipes()
                .map(|pipe| [pipe.lower().as_raw(), pipe.upper().as_raw()])
                .collect(),
        }
    }

    fn into_graph(self) -> Result<SpacetimeGraph, LscError> {
        let current = GraphConfig::default().schema_version;
        if !current.reads(&self.schema_version) {
            return Err(LscError::Serde(
                ErrorInfo::new("schema-mismatch", "payload schema version is not readable")
                    .with_context("payload", format_version(self.schema_version))
                    .with_context("supported", format_version(current)),
            ));
        }
        let config = GraphConfig {
            degree_bounds: self
                .degree_bounds
                .into_iter()
                .map(|entry| {
                    (
                        entry.kind,
                        DegreeBounds::new(entry.min as usize, entry.max as usize),
                    )
                })
                .collect(),
            schema_version: self.schema_version,
        };
        let mut graph = SpacetimeGraph::with_config(config);
        for cube in self.cubes {
            graph.add_cube(cube.position, cube.kind)?;
        }
        for [lower, upper] in self.pipes {
            graph.add_pipe(CubeId::from_raw(lower), CubeId::from_raw(upper))?;
        }
        Ok(graph)
    }
}

fn format_version(version: SchemaVersion) -> String {
    format!("{}.{}.{}", version.major, version.minor, version.patch)
}
