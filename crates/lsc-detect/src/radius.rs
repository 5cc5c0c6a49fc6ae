//! Search radius policies and the spacetime metric they bound.

use std::collections::BTreeMap;

use lsc_compile::ProvenanceMap;
use lsc_core::{ContextExt, ErrorInfo, LscError, MeasurementIndex, Position, SpacetimeCoords};
use serde::{Deserialize, Serialize};

/// Radius of the neighbourhood searched around every measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RadiusPolicy {
    /// One radius for every measurement.
    Uniform {
        /// Chebyshev radius on the doubled grid and round ordinals.
        radius: u32,
    },
    /// A default radius with overrides keyed by cube or pipe position.
    PerOrigin {
        /// Radius of measurements without an override.
        default: u32,
        /// Radius of measurements whose origin touches the position.
        #[serde(default)]
        overrides: Vec<(Position, u32)>,
    },
    /// Uniform radii from `start` to `max`, stopping at the first that
    /// covers every coverable measurement.
    Adaptive {
        /// First radius tried.
        start: u32,
        /// Last radius tried.
        max: u32,
    },
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        RadiusPolicy::Uniform { radius: 2 }
    }
}

impl RadiusPolicy {
    /// Rejects zero radii and empty adaptive ranges.
    pub fn validate(&self) -> Result<(), LscError> {
        let zero = |field: &str| {
            LscError::Config(
                ErrorInfo::new("invalid-radius", "search radius must be positive")
                    .with_context("field", field),
            )
        };
        match self {
            RadiusPolicy::Uniform { radius } if *radius == 0 => Err(zero("radius")),
            RadiusPolicy::PerOrigin { default, .. } if *default == 0 => Err(zero("default")),
            RadiusPolicy::PerOrigin { overrides, .. } => {
                match overrides.iter().find(|(_, radius)| *radius == 0) {
                    Some((position, _)) => {
                        Err(zero("overrides").with_context("position", position))
                    }
                    None => Ok(()),
                }
            }
            RadiusPolicy::Adaptive { start, .. } if *start == 0 => Err(zero("start")),
            RadiusPolicy::Adaptive { start, max } if start > max => Err(LscError::Config(
                ErrorInfo::new("invalid-radius", "adaptive range is empty")
                    .with_context("start", start.to_string())
                    .with_context("max", max.to_string()),
            )),
            _ => Ok(()),
        }
    }

    /// Concrete radius assignments to try, in order.
    pub(crate) fn attempts(&self) -> Vec<Radii> {
        match self {
            RadiusPolicy::Uniform { radius } => vec![Radii::uniform(*radius)],
            RadiusPolicy::PerOrigin { default, overrides } => vec![Radii {
                default: *default,
                overrides: overrides.iter().copied().collect(),
            }],
            RadiusPolicy::Adaptive { start, max } => (*start..=*max).map(Radii::uniform).collect(),
        }
    }
}

/// Radius assignment resolved for one synthesis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Radii {
    default: u32,
    overrides: BTreeMap<Position, u32>,
}

impl Radii {
    pub(crate) fn uniform(radius: u32) -> Self {
        Self {
            default: radius,
            overrides: BTreeMap::new(),
        }
    }

    /// Largest radius in the assignment.
    pub(crate) fn max(&self) -> u32 {
        self.overrides
            .values()
            .copied()
            .fold(self.default, u32::max)
    }

    /// Radius around `measurement`; the largest override touching its
    /// origin wins.
    pub(crate) fn of(&self, provenance: &ProvenanceMap, measurement: MeasurementIndex) -> u32 {
        if self.overrides.is_empty() {
            return self.default;
        }
        provenance
            .origin_of_measurement(measurement)
            .into_iter()
            .flat_map(|origin| origin.positions.iter())
            .filter_map(|position| self.overrides.get(position).copied())
            .max()
            .unwrap_or(self.default)
    }
}

/// Chebyshev distance over `(x, y, t)`.
pub fn distance(a: &SpacetimeCoords, b: &SpacetimeCoords) -> i64 {
    (a.x - b.x)
        .abs()
        .max((a.y - b.y).abs())
        .max((a.t - b.t).abs())
}

/// Measurements within `radius` of `anchor`, excluding the anchor itself.
///
/// `coords` must be ordered by non-decreasing `t`, which holds for the
/// measurement records of a compiled circuit.
pub(crate) fn neighbourhood(
    coords: &[SpacetimeCoords],
    anchor: usize,
    radius: u32,
    earlier_only: bool,
) -> Vec<usize> {
    let center = &coords[anchor];
    let radius = i64::from(radius);
    let lo = coords.partition_point(|c| c.t < center.t - radius);
    let hi = if earlier_only {
        anchor
    } else {
        coords.partition_point(|c| c.t <= center.t + radius)
    };
    (lo..hi)
        .filter(|j| *j != anchor && distance(center, &coords[*j]) <= radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i64, y: i64, t: i64) -> SpacetimeCoords {
        SpacetimeCoords { x, y, t }
    }

    #[test]
    fn zero_radius_is_rejected() {
        let err = RadiusPolicy::Uniform { radius: 0 }.validate().unwrap_err();
        assert_eq!(err.code(), "invalid-radius");
        let err = RadiusPolicy::Adaptive { start: 3, max: 2 }
            .validate()
            .unwrap_err();
        assert!(matches!(err, LscError::Config(_)));
        let err = RadiusPolicy::PerOrigin {
            default: 2,
            overrides: vec![(Position::new(0, 0, 0), 0)],
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.info().context.get("position").map(String::as_str), Some("(0, 0, 0)"));
    }

    #[test]
    fn adaptive_tries_every_radius() {
        let attempts = RadiusPolicy::Adaptive { start: 1, max: 3 }.attempts();
        let radii: Vec<u32> = attempts.iter().map(Radii::max).collect();
        assert_eq!(radii, vec![1, 2, 3]);
    }

    #[test]
    fn neighbourhood_respects_time_order() {
        let coords = vec![at(0, 0, 0), at(2, 0, 0), at(0, 0, 1), at(4, 0, 1), at(0, 0, 3)];
        assert_eq!(neighbourhood(&coords, 2, 2, true), vec![0, 1]);
        assert_eq!(neighbourhood(&coords, 2, 2, false), vec![0, 1, 4]);
        assert_eq!(neighbourhood(&coords, 0, 1, false), vec![2]);
    }

    #[test]
    fn policies_load_from_tagged_json() {
        let policy: RadiusPolicy =
            serde_json::from_str(r#"{"type":"per-origin","default":2}"#).unwrap();
        assert_eq!(
            policy,
            RadiusPolicy::PerOrigin {
                default: 2,
                overrides: Vec::new()
            }
        );
    }
}
