//! # ql-methods
//!
//! Numerical methods: time-dependent recombining binomial lattices.
//!
//! Translates `ql/experimental/lattices/`: binomial trees whose drift and
//! local variance are re-evaluated at every time slice, in seven classical
//! parameterisations.
//!
//! # Modules
//!
//! * [`lattice`]: the lattice interface, the equal-probabilities and
//!   equal-jumps families, and the named schemes

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: time-dependent binomial trees.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    BinomialLattice, BinomialScheme, ExtendedAdditiveEqpBinomialTree, ExtendedBinomialTree,
    ExtendedCoxRossRubinstein, ExtendedEqualJumpsBinomialTree,
    ExtendedEqualProbabilitiesBinomialTree, ExtendedJarrowRudd, ExtendedJoshi4,
    ExtendedLeisenReimer, ExtendedTian, ExtendedTrigeorgis,
};
