//! Size-parametrised integer quantities.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LscError};

/// Affine function `slope * k + offset` of the size parameter `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearFunction {
    /// Coefficient applied to `k`.
    pub slope: i64,
    /// Constant term.
    pub offset: i64,
}

impl LinearFunction {
    /// Creates a new function.
    pub const fn new(slope: i64, offset: i64) -> Self {
        Self { slope, offset }
    }

    /// Constant function.
    pub const fn constant(offset: i64) -> Self {
        Self::new(0, offset)
    }

    /// Evaluates the function at `k`.
    pub const fn eval(&self, k: i64) -> i64 {
        self.slope * k + self.offset
    }

    /// Evaluates the function at `k` and requires a non-negative result.
    pub fn integer_eval(&self, k: u32) -> Result<u32, LscError> {
        let value = self.eval(i64::from(k));
        u32::try_from(value).map_err(|_| {
            LscError::Template(
                ErrorInfo::new("negative-extent", "scaled quantity is negative or too large")
                    .with_context("function", self.to_string())
                    .with_context("k", k.to_string())
                    .with_context("value", value.to_string()),
            )
        })
    }

    /// Divides both coefficients by `divisor`, failing unless the division is exact.
    pub fn exact_integer_div(&self, divisor: i64) -> Result<Self, LscError> {
        if divisor == 0 || self.slope % divisor != 0 || self.offset % divisor != 0 {
            return Err(LscError::Template(
                ErrorInfo::new("inexact-division", "linear function is not divisible")
                    .with_context("function", self.to_string())
                    .with_context("divisor", divisor.to_string()),
            ));
        }
        Ok(Self::new(self.slope / divisor, self.offset / divisor))
    }

    /// Value of `k` at which both functions agree, when it is an integer.
    pub fn intersection(&self, other: &Self) -> Option<i64> {
        let slope = self.slope - other.slope;
        if slope == 0 {
            return None;
        }
        let delta = other.offset - self.offset;
        (delta % slope == 0).then_some(delta / slope)
    }
}

impl Add for LinearFunction {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.slope + rhs.slope, self.offset + rhs.offset)
    }
}

impl Add<i64> for LinearFunction {
    type Output = Self;

    fn add(self, rhs: i64) -> Self {
        Self::new(self.slope, self.offset + rhs)
    }
}

impl Sub for LinearFunction {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.slope - rhs.slope, self.offset - rhs.offset)
    }
}

impl Mul<i64> for LinearFunction {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self::new(self.slope * rhs, self.offset * rhs)
    }
}

impl fmt::Display for LinearFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.slope, self.offset) {
            (0, offset) => write!(f, "{offset}"),
            (slope, 0) => write!(f, "{slope}*k"),
            (slope, offset) => write!(f, "{slope}*k + {offset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_and_composes() {
        let width = LinearFunction::new(2, 1);
        assert_eq!(width.integer_eval(3).unwrap(), 7);
        assert_eq!((width + 1).eval(3), 8);
        assert_eq!((width * 2 - LinearFunction::constant(2)).eval(1), 4);
    }

    #[test]
    fn negative_values_are_rejected() {
        let shrinking = LinearFunction::new(-1, 1);
        assert!(shrinking.integer_eval(2).is_err());
    }

    #[test]
    fn exact_division_requires_divisibility() {
        assert_eq!(
            LinearFunction::new(4, 2).exact_integer_div(2).unwrap(),
            LinearFunction::new(2, 1)
        );
        assert!(LinearFunction::new(4, 1).exact_integer_div(2).is_err());
    }

    #[test]
    fn intersection_of_parallel_lines_is_none() {
        let a = LinearFunction::new(2, 0);
        assert_eq!(a.intersection(&LinearFunction::new(2, 5)), None);
        assert_eq!(a.intersection(&LinearFunction::new(1, 3)), Some(3));
    }
}
