//! # ql-processes
//!
//! Diffusion sources for lattice methods.
//!
//! Translates the parts of `ql/processes/` and `ql/stochasticprocess.hpp`
//! that binomial trees consume: the one-dimensional process interface and a
//! Black-Scholes process with time-dependent coefficients.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes_process;
pub mod piecewise_flat_curve;
pub mod stochastic_process;

pub use black_scholes_process::BlackScholesProcess;
pub use piecewise_flat_curve::PiecewiseFlatCurve;
pub use stochastic_process::StochasticProcess1D;
