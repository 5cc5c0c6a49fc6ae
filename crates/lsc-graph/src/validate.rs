use lsc_core::{
    errors::{ErrorInfo, LscError, StructuralReport},
    CubeKind, PipeKind, Position,
};
use tracing::debug;

use crate::graph::{Cube, SpacetimeGraph};

impl SpacetimeGraph {
    /// Checks every structural invariant and reports all violations at once.
    ///
    /// Violations are ordered by cube position, then by code.
    #[tracing::instrument(skip(self), fields(cubes = self.cube_count(), pipes = self.pipe_count()))]
    pub fn validate(&self) -> Result<(), LscError> {
        if self.is_empty() {
            let report = StructuralReport::new(vec![ErrorInfo::new(
                "empty-graph",
                "graph has no cubes",
            )]);
            return Err(LscError::Structural(report));
        }

        let mut found: Vec<(Position, ErrorInfo)> = Vec::new();
        for cube in self.cubes() {
            for violation in self.cube_violations(cube) {
                found.push((cube.position, violation));
            }
        }
        found.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then_with(|| a.code.cmp(&b.code)));

        debug!(violations = found.len(), "structural validation finished");
        if found.is_empty() {
            return Ok(());
        }
        let violations = found.into_iter().map(|(_, info)| info).collect();
        Err(LscError::Structural(StructuralReport::new(violations)))
    }

    fn cube_violations(&self, cube: &Cube) -> Vec<ErrorInfo> {
        let mut violations = Vec::new();
        let pipes = self.incident(cube);
        let degree = pipes.len();

        if let Some(bounds) = self.config().bounds_for(cube.kind) {
            if !bounds.admits(degree) {
                violations.push(
                    violation(cube, "degree-violation", "cube degree is outside its bounds")
                        .with_context("degree", degree.to_string())
                        .with_context("min", bounds.min.to_string())
                        .with_context("max", bounds.max.to_string()),
                );
            }
        }
        if degree == 0 {
            violations.push(violation(cube, "isolated-cube", "cube has no pipes"));
        }

        if cube.kind == CubeKind::Boundary {
            let has_port = pipes.iter().any(|(_, other)| other.kind == CubeKind::Port);
            if !has_port {
                violations.push(
                    violation(cube, "missing-boundary-port", "boundary cube has no port neighbour")
                        .with_hint("attach a port cube or use a Z/X cube instead"),
                );
            }
        }

        if cube.kind == CubeKind::Y && pipes.iter().any(|(kind, _)| *kind != PipeKind::Temporal) {
            violations.push(violation(
                cube,
                "y-cube-orientation",
                "y cube must be joined through time only",
            ));
        }
        violations
    }

    fn incident(&self, cube: &Cube) -> Vec<(PipeKind, Cube)> {
        self.pipes_of(cube.id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| {
                let pipe = self.pipe(id).ok()?;
                let other = self.cube(pipe.other(cube.id)?).ok()?;
                Some((pipe.kind, *other))
            })
            .collect()
    }
}

fn violation(cube: &Cube, code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("cube", cube.id.to_string())
        .with_context("position", cube.position.to_string())
        .with_context("kind", cube.kind.label())
}
