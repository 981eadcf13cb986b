//! # quantlib
//!
//! Time-dependent recombining binomial lattices in the style of
//! [QuantLib](https://www.quantlib.org/)'s extended binomial trees.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantlib::methods::{BinomialLattice, BinomialScheme};
//! use quantlib::processes::BlackScholesProcess;
//!
//! let process = BlackScholesProcess::flat(100.0, 0.05, 0.0, 0.20).unwrap();
//! let tree = BinomialScheme::CoxRossRubinstein
//!     .build(&process, 1.0, 100, 100.0)
//!     .unwrap();
//!
//! assert_eq!(tree.size(100), 101);
//! let pu = tree.probability(50, 25, 1).unwrap();
//! let pd = tree.probability(50, 25, 0).unwrap();
//! assert!((pu + pd - 1.0).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Binomial inversions.
pub use ql_math as math;

/// Diffusion sources.
pub use ql_processes as processes;

/// Binomial lattices.
pub use ql_methods as methods;

pub use ql_core::{Error, Result};
