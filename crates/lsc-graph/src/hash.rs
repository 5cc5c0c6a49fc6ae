use sha2::{Digest, Sha256};

use lsc_core::{Position, SchemaVersion};

use crate::config::GraphConfig;
use crate::graph::SpacetimeGraph;

/// Computes the canonical structural hash of the graph.
///
/// Cubes are hashed in position order and pipes in endpoint-position order, so
/// the digest does not depend on insertion order.
pub fn canonical_hash(graph: &SpacetimeGraph) -> String {
    let mut hasher = Sha256::new();
    encode_config(graph.config(), &mut hasher);

    let mut cubes: Vec<_> = graph.cubes().map(|cube| (cube.position, cube.kind)).collect();
    cubes.sort();
    hasher.update((cubes.len() as u64).to_le_bytes());
    for (position, kind) in cubes {
        update_position(position, &mut hasher);
        hasher.update(kind.label().as_bytes());
    }

    let mut pipes: Vec<(Position, Position)> = graph
        .pipes()
        .filter_map(|pipe| {
            let lower = graph.cube(pipe.lower()).ok()?.position;
            let upper = graph.cube(pipe.upper()).ok()?.position;
            Some((lower, upper))
        })
        .collect();
    pipes.sort();
    hasher.update((pipes.len() as u64).to_le_bytes());
    for (lower, upper) in pipes {
        update_position(lower, &mut hasher);
        update_position(upper, &mut hasher);
    }

    format!("{:x}", hasher.finalize())
}

fn encode_config(config: &GraphConfig, hasher: &mut Sha256) {
    hasher.update((config.degree_bounds.len() as u64).to_le_bytes());
    for (kind, bounds) in &config.degree_bounds {
        hasher.update(kind.label().as_bytes());
        hasher.update((bounds.min as u64).to_le_bytes());
        hasher.update((bounds.max as u64).to_le_bytes());
    }
    encode_schema(config.schema_version, hasher);
}

fn encode_schema(version: SchemaVersion, hasher: &mut Sha256) {
    hasher.update(version.major.to_le_bytes());
    hasher.update(version.minor.to_le_bytes());
    hasher.update(version.patch.to_le_bytes());
}

fn update_position(position: Position, hasher: &mut Sha256) {
    hasher.update(position.x.to_le_bytes());
    hasher.update(position.y.to_le_bytes());
    hasher.update(position.z.to_le_bytes());
}
