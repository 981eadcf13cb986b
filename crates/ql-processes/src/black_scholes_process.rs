//! Black-Scholes process with time-dependent coefficients
//! (translates `ql/processes/blackscholesprocess.hpp`).
//!
//! `dS/S = (r(t) − q(t)) dt + σ(t) dW`
//!
//! The process is exposed in log space, which is what the binomial lattices
//! expect: `x0` is the spot, `drift(t, ·) = r(t) − q(t) − σ(t)²/2` and
//! `diffusion(t, ·) = σ(t)`, so that `S(t) = x0 · exp(X(t))`.

use crate::piecewise_flat_curve::PiecewiseFlatCurve;
use crate::stochastic_process::StochasticProcess1D;
use ql_core::{ensure, errors::Result, Rate, Real, Time, Volatility};

/// A Black-Scholes-Merton process whose rate, dividend yield and volatility
/// may each change over time.
///
/// Corresponds to `QuantLib::GeneralizedBlackScholesProcess`.
#[derive(Debug, Clone)]
pub struct BlackScholesProcess {
    spot: Real,
    risk_free_rate: PiecewiseFlatCurve,
    dividend_yield: PiecewiseFlatCurve,
    volatility: PiecewiseFlatCurve,
}

impl BlackScholesProcess {
    /// Create a process from instantaneous rate, yield and volatility curves.
    ///
    /// # Errors
    /// Returns an error if `spot` is not strictly positive or the volatility
    /// is negative anywhere.
    pub fn new(
        spot: Real,
        risk_free_rate: PiecewiseFlatCurve,
        dividend_yield: PiecewiseFlatCurve,
        volatility: PiecewiseFlatCurve,
    ) -> Result<Self> {
        ensure!(spot > 0.0, "spot must be positive, got {spot}");
        ensure!(
            volatility.min_value() >= 0.0,
            "volatility must be non-negative, got {}",
            volatility.min_value()
        );
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }

    /// Create a process with constant coefficients.
    pub fn flat(spot: Real, r: Rate, q: Rate, sigma: Volatility) -> Result<Self> {
        Self::new(
            spot,
            PiecewiseFlatCurve::flat(r),
            PiecewiseFlatCurve::flat(q),
            PiecewiseFlatCurve::flat(sigma),
        )
    }

    /// The spot price.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Instantaneous risk-free rate at `t`.
    pub fn risk_free_rate(&self, t: Time) -> Rate {
        self.risk_free_rate.value(t)
    }

    /// Instantaneous dividend yield at `t`.
    pub fn dividend_yield(&self, t: Time) -> Rate {
        self.dividend_yield.value(t)
    }

    /// Local volatility at `t`.
    pub fn volatility(&self, t: Time) -> Volatility {
        self.volatility.value(t)
    }
}

impl StochasticProcess1D for BlackScholesProcess {
    fn x0(&self) -> Real {
        self.spot
    }

    fn drift(&self, t: Time, _x: Real) -> Real {
        let sigma = self.volatility(t);
        self.risk_free_rate(t) - self.dividend_yield(t) - 0.5 * sigma * sigma
    }

    fn diffusion(&self, t: Time, _x: Real) -> Real {
        self.volatility(t)
    }
}
