//! `StochasticProcess1D`: the diffusion source consumed by lattices
//! (translates `ql/stochasticprocess.hpp`).
//!
//! A process `dX = μ(t,X) dt + σ(t,X) dW` is described by its drift (`μ`)
//! and diffusion (`σ`); the spread over a finite step defaults to the
//! first-order Euler approximation.

use ql_core::{Real, Time};

/// A 1-dimensional stochastic process `dX = μ(t,X) dt + σ(t,X) dW`.
///
/// Implementations must be deterministic: the same `(t, x)` always yields
/// the same drift and diffusion. Lattices borrow the process for their
/// whole lifetime and never mutate it.
///
/// Corresponds to `QuantLib::StochasticProcess1D`.
pub trait StochasticProcess1D: std::fmt::Debug + Send + Sync {
    /// Initial value of the process.
    fn x0(&self) -> Real;

    /// Drift `μ(t, x)`.
    fn drift(&self, t: Time, x: Real) -> Real;

    /// Diffusion `σ(t, x)`.
    fn diffusion(&self, t: Time, x: Real) -> Real;

    /// Standard deviation `σ(t,x) · √Δt`.
    fn std_deviation(&self, t: Time, x: Real, dt: Time) -> Real {
        self.diffusion(t, x) * dt.sqrt()
    }

    /// Variance `σ(t,x)² · Δt`.
    fn variance(&self, t: Time, x: Real, dt: Time) -> Real {
        let s = self.diffusion(t, x);
        s * s * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// dX = 0.05·dt + 0.20·dW  (constant drift & vol)
    #[derive(Debug)]
    struct ConstantProcess {
        x0: Real,
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for ConstantProcess {
        fn x0(&self) -> Real {
            self.x0
        }

        fn drift(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    fn process() -> ConstantProcess {
        ConstantProcess { x0: 100.0, mu: 0.05, sigma: 0.20 }
    }

    #[test]
    fn step_moments() {
        let p = process();
        // σ² · Δt = 0.04 · 0.25
        assert_abs_diff_eq!(p.variance(0.0, 100.0, 0.25), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(p.std_deviation(0.0, 100.0, 0.25), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn usable_as_trait_object() {
        let p = process();
        let dynamic: &dyn StochasticProcess1D = &p;
        assert_abs_diff_eq!(dynamic.x0(), 100.0);
        assert_abs_diff_eq!(dynamic.drift(0.0, 100.0), 0.05);
        // σ² · Δt = 0.04 · 2
        assert_abs_diff_eq!(dynamic.variance(0.0, 100.0, 2.0), 0.08, epsilon = 1e-15);
    }
}
