//! Step schedules inside a round.

use lsc_core::{Basis, ErrorInfo, LscError};
use serde::{Deserialize, Serialize};

/// Step of ancilla resets.
pub const STEP_RESET: u32 = 0;
/// Step of the first basis change on X ancillas.
pub const STEP_ENTER: u32 = 1;
/// Steps of the four entangling layers.
pub const STEP_CNOT: [u32; 4] = [2, 3, 4, 5];
/// Step of the second basis change on X ancillas.
pub const STEP_EXIT: u32 = 6;
/// Step of ancilla measurements.
pub const STEP_MEASURE: u32 = 7;
/// Steps in a stabilizer round.
pub const ROUND_STEPS: u32 = 8;

/// Data offsets visited by an X ancilla, which acts as control.
pub const X_ORDER: [(i64, i64); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
/// Data offsets visited by a Z ancilla, which acts as target.
pub const Z_ORDER: [(i64, i64); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Interaction order of an ancilla measuring a stabilizer of type `basis`.
pub fn cnot_order(basis: Basis) -> [(i64, i64); 4] {
    match basis {
        Basis::X => X_ORDER,
        Basis::Y | Basis::Z => Z_ORDER,
    }
}

/// Strictly increasing list of non-negative steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    steps: Vec<u32>,
}

impl Schedule {
    /// Builds a schedule, rejecting steps that do not strictly increase.
    pub fn new(steps: Vec<u32>) -> Result<Self, LscError> {
        if let Some(pair) = steps.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(LscError::Template(
                ErrorInfo::new("non-increasing-schedule", "schedule steps must strictly increase")
                    .with_context("previous", pair[0].to_string())
                    .with_context("next", pair[1].to_string()),
            ));
        }
        Ok(Self { steps })
    }

    /// The eight steps of a stabilizer round.
    pub fn stabilizer_round() -> Self {
        Self {
            steps: (0..ROUND_STEPS).collect(),
        }
    }

    /// Steps in order.
    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the schedule has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// One past the last step, or zero for an empty schedule.
    pub fn end(&self) -> u32 {
        self.steps.last().map_or(0, |last| last + 1)
    }

    /// Appends `other` shifted by `offset`.
    ///
    /// The shifted steps must start after the current last step.
    pub fn append(&mut self, other: &Schedule, offset: u32) -> Result<(), LscError> {
        let shifted: Vec<u32> = other.steps.iter().map(|step| step + offset).collect();
        if let (Some(last), Some(first)) = (self.steps.last(), shifted.first()) {
            if first <= last {
                return Err(LscError::Template(
                    ErrorInfo::new("overlapping-schedule", "appended steps overlap the schedule")
                        .with_context("last", last.to_string())
                        .with_context("first", first.to_string()),
                ));
            }
        }
        self.steps.extend(shifted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_increasing_steps() {
        assert!(Schedule::new(vec![0, 2, 2]).is_err());
        assert!(Schedule::new(vec![3, 1]).is_err());
        assert_eq!(Schedule::new(vec![0, 4, 9]).unwrap().end(), 10);
    }

    #[test]
    fn append_shifts_and_checks_overlap() {
        let mut schedule = Schedule::stabilizer_round();
        schedule
            .append(&Schedule::stabilizer_round(), ROUND_STEPS)
            .unwrap();
        assert_eq!(schedule.len(), 16);
        assert_eq!(schedule.end(), 16);
        assert!(schedule.append(&Schedule::stabilizer_round(), 10).is_err());
    }

    #[test]
    fn orders_never_collide_on_shared_data() {
        // Neighbouring plaquettes of opposite type must never touch a shared
        // data qubit in the same step.
        for step in 0..4 {
            let (xdx, xdy) = X_ORDER[step];
            for (ndx, ndy) in [(2, 0), (-2, 0), (0, 2), (0, -2)] {
                let (zdx, zdy) = Z_ORDER[step];
                assert_ne!((xdx, xdy), (ndx + zdx, ndy + zdy));
            }
        }
    }
}
