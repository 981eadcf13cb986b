//! Time-dependent binomial lattices.
//!
//! Translates `ql/experimental/lattices/extendedbinomialtree.hpp`: the
//! recombining binomial trees whose drift (and local variance) is
//! re-evaluated at every time slice.
//!
//! # Overview
//!
//! * [`BinomialLattice`]: the four node queries a backward-induction
//!   engine needs, implemented by every scheme
//! * [`ExtendedBinomialTree`]: level sizing, descendant addressing and the
//!   time-dependent drift shared by all schemes
//! * [`ExtendedEqualProbabilitiesBinomialTree`]: `p = ½`, scheme supplies
//!   the up step (Jarrow-Rudd, additive EQP)
//! * [`ExtendedEqualJumpsBinomialTree`]: fixed jump per level, scheme
//!   supplies the jump and the up probability (CRR, Trigeorgis)
//! * [`ExtendedTian`], [`ExtendedLeisenReimer`], [`ExtendedJoshi4`]:
//!   multiplicative trees with their own node values and probabilities
//! * [`BinomialScheme`]: runtime selection among the seven schemes
//!
//! # Node layout
//!
//! Level `i` has `i + 1` nodes `j ∈ [0, i]`; node `(i, j)` moves to
//! `(i + 1, j)` on branch 0 (down) and `(i + 1, j + 1)` on branch 1 (up),
//! so a node depends only on the number of up moves taken.

pub mod equal_jumps;
pub mod equal_probabilities;
pub mod extended_binomial_tree;
pub mod scheme;
pub mod strike_centred;
pub mod tian;

pub use equal_jumps::{
    CoxRossRubinsteinJumps, EqualJumpsScheme, ExtendedCoxRossRubinstein,
    ExtendedEqualJumpsBinomialTree, ExtendedTrigeorgis, TrigeorgisJumps,
};
pub use equal_probabilities::{
    AdditiveEqpStep, EqualProbabilitiesScheme, ExtendedAdditiveEqpBinomialTree,
    ExtendedEqualProbabilitiesBinomialTree, ExtendedJarrowRudd, JarrowRuddStep,
};
pub use extended_binomial_tree::ExtendedBinomialTree;
pub use scheme::BinomialScheme;
pub use strike_centred::{ExtendedJoshi4, ExtendedLeisenReimer};
pub use tian::ExtendedTian;

use ql_core::{ensure_domain, errors::Result, Probability, Real, Size, Time};

/// A recombining binomial lattice as seen by a backward-induction engine.
///
/// All queries are pure. Node coordinates outside the lattice
/// (`index > i`, `i > steps()`, `branch > 1`) are programmer errors and
/// panic.
pub trait BinomialLattice: std::fmt::Debug + Send + Sync {
    /// Number of time steps actually used by the lattice.
    fn steps(&self) -> Size;

    /// Time increment per step.
    fn dt(&self) -> Time;

    /// Number of nodes at level `i` (always `i + 1`).
    fn size(&self, i: Size) -> Size;

    /// Index of the node reached at level `i + 1` from node `(i, index)`
    /// along `branch` (0 = down, 1 = up).
    fn descendant(&self, i: Size, index: Size, branch: Size) -> Size;

    /// Underlying value at node `(i, index)`.
    fn underlying(&self, i: Size, index: Size) -> Real;

    /// Probability of moving from `(i, index)` along `branch`.
    ///
    /// # Errors
    /// Returns `Error::Domain` if the scheme's parameters at this level
    /// produce a probability outside `[0, 1]`.
    fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability>;
}

/// Validate an up probability produced by a scheme.
pub(crate) fn checked_probability(scheme: &str, p: Real) -> Result<Probability> {
    ensure_domain!(
        (0.0..=1.0).contains(&p),
        "{scheme}: up probability {p} outside [0, 1]"
    );
    Ok(p)
}

/// Pick the up or down probability for `branch`.
#[inline]
pub(crate) fn branch_probability(branch: Size, up: Probability) -> Probability {
    if branch == 1 {
        up
    } else {
        1.0 - up
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
