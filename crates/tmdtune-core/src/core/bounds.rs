use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundError {
    #[error("Invalid bound [{min}, {max}]: minimum must be strictly less than maximum")]
    Inverted { min: f64, max: f64 },
    #[error("Invalid bound [{min}, {max}]: both ends must be finite")]
    NonFinite { min: f64, max: f64 },
    #[error("Invalid bound [{min}, {max}]: the width max - min overflows")]
    RangeOverflow { min: f64, max: f64 },
}

/// A closed interval `[min, max]` constraining one dimension of the search space.
///
/// The constructor guarantees `min < max` with both ends and the width finite, so sampling,
/// clamping and patch arithmetic on a `Bound` never see an infinite span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    min: f64,
    max: f64,
}

impl Bound {
    pub fn new(min: f64, max: f64) -> Result<Self, BoundError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BoundError::NonFinite { min, max });
        }
        if min >= max {
            return Err(BoundError::Inverted { min, max });
        }
        if !(max - min).is_finite() {
            return Err(BoundError::RangeOverflow { min, max });
        }
        Ok(Self { min, max })
    }

    /// Builds a bound from ends already known to be finite and ordered.
    pub(crate) const fn from_ordered(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clips `value` into the interval. NaN is mapped to the lower end.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Draws a value uniformly from the closed interval.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

impl TryFrom<(f64, f64)> for Bound {
    type Error = BoundError;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<Bound> for (f64, f64) {
    fn from(bound: Bound) -> Self {
        (bound.min, bound.max)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
