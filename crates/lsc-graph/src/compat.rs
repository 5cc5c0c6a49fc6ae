//! Endpoint compatibility table for pipes.

use lsc_core::{CubeKind, PipeKind};

/// Returns true when a pipe of `pipe` kind may join cubes of kinds `a` and `b`.
///
/// The relation is symmetric in its endpoints.
pub fn compatible(a: CubeKind, b: CubeKind, pipe: PipeKind) -> bool {
    use CubeKind::*;
    let spatial = pipe.is_operation_bearing();
    match (a, b) {
        (Port, Boundary) | (Boundary, Port) => true,
        (Port, _) | (_, Port) => false,
        (Y, Z | X) | (Z | X, Y) => !spatial,
        (Y, _) | (_, Y) => false,
        _ if spatial => true,
        _ => a.basis() == b.basis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsc_core::Axis;

    #[test]
    fn table_is_symmetric() {
        let pipes = [
            PipeKind::Temporal,
            PipeKind::Spatial(Axis::X),
            PipeKind::Spatial(Axis::Y),
        ];
        for a in CubeKind::ALL {
            for b in CubeKind::ALL {
                for pipe in pipes {
                    assert_eq!(compatible(a, b, pipe), compatible(b, a, pipe), "{a} {b} {pipe}");
                }
            }
        }
    }

    #[test]
    fn temporal_pipes_preserve_basis() {
        assert!(compatible(CubeKind::Z, CubeKind::Boundary, PipeKind::Temporal));
        assert!(!compatible(CubeKind::Z, CubeKind::X, PipeKind::Temporal));
        assert!(compatible(CubeKind::Z, CubeKind::X, PipeKind::Spatial(Axis::X)));
        assert!(compatible(CubeKind::Y, CubeKind::X, PipeKind::Temporal));
        assert!(!compatible(CubeKind::Y, CubeKind::Z, PipeKind::Spatial(Axis::Y)));
        assert!(!compatible(CubeKind::Port, CubeKind::Z, PipeKind::Temporal));
    }
}
