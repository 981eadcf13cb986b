//! `PiecewiseFlatCurve`: a time-dependent coefficient that is constant
//! between breakpoints.
//!
//! Used for instantaneous rates, dividend yields and volatilities of
//! processes whose coefficients change over the life of a lattice.

use ql_core::{ensure, errors::Result, Real, Time};

/// A right-continuous step function of time.
///
/// With breakpoints `t₀ < t₁ < … < tₙ₋₁` and values `v₀ … vₙ`:
///
/// ```text
/// f(t) = v₀      for t < t₀
///        vₖ₊₁    for tₖ ≤ t < tₖ₊₁
///        vₙ      for t ≥ tₙ₋₁
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseFlatCurve {
    breakpoints: Vec<Time>,
    values: Vec<Real>,
}

impl PiecewiseFlatCurve {
    /// A curve with the same value at every time.
    pub fn flat(value: Real) -> Self {
        Self {
            breakpoints: Vec::new(),
            values: vec![value],
        }
    }

    /// Build a step function from its breakpoints and the `n + 1` values
    /// taken on the intervals they delimit.
    ///
    /// # Errors
    /// Returns an error if the lengths are inconsistent, a breakpoint is not
    /// strictly positive, the breakpoints are not strictly increasing, or a
    /// value is not finite.
    pub fn new(breakpoints: &[Time], values: &[Real]) -> Result<Self> {
        ensure!(
            values.len() == breakpoints.len() + 1,
            "{} breakpoints need {} values, got {}",
            breakpoints.len(),
            breakpoints.len() + 1,
            values.len()
        );
        ensure!(
            breakpoints.iter().all(|&t| t > 0.0),
            "breakpoints must be positive times"
        );
        ensure!(
            breakpoints.windows(2).all(|w| w[0] < w[1]),
            "breakpoints must be strictly increasing"
        );
        ensure!(
            values.iter().all(|v| v.is_finite()),
            "curve values must be finite"
        );
        Ok(Self {
            breakpoints: breakpoints.to_vec(),
            values: values.to_vec(),
        })
    }

    /// Value at time `t`.
    pub fn value(&self, t: Time) -> Real {
        let k = self.breakpoints.partition_point(|&b| b <= t);
        self.values[k]
    }

    /// Smallest value taken anywhere on the curve.
    pub fn min_value(&self) -> Real {
        self.values.iter().copied().fold(Real::INFINITY, Real::min)
    }
}
