//! Equal-jumps binomial trees.
//!
//! Nodes of a level are spaced by a fixed log jump and centred on `x0`;
//! the drift lives entirely in the asymmetry of the up probability:
//!
//! ```text
//! S(i, j) = x0 · exp((2j − i) · dx_step(tᵢ))
//! P(up)   = prob_up(tᵢ),   P(down) = 1 − prob_up(tᵢ)
//! ```

use std::marker::PhantomData;

use ql_core::{ensure_domain, errors::Result, Probability, Real, Size, Time};
use ql_processes::StochasticProcess1D;

use super::extended_binomial_tree::{centred_offset, ExtendedBinomialTree};
use super::{branch_probability, checked_probability, BinomialLattice};

/// The hooks an equal-jumps scheme supplies.
pub trait EqualJumpsScheme: std::fmt::Debug + Clone + Send + Sync + 'static {
    /// Scheme name used in diagnostics.
    const NAME: &'static str;

    /// Log jump over one step starting at `step_time`.
    fn dx_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real;

    /// Probability of an up move over one step starting at `step_time`.
    fn prob_up(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real;
}

/// Equal-jumps tree parameterised by its jump scheme.
///
/// Corresponds to `QuantLib::ExtendedEqualJumpsBinomialTree<T>`.
#[derive(Debug, Clone)]
pub struct ExtendedEqualJumpsBinomialTree<'a, S> {
    tree: ExtendedBinomialTree<'a>,
    dx: Real,
    pu: Probability,
    pd: Probability,
    scheme: PhantomData<S>,
}

impl<'a, S: EqualJumpsScheme> ExtendedEqualJumpsBinomialTree<'a, S> {
    /// Build the tree for `steps` steps over `[0, end]`.
    ///
    /// # Errors
    /// * `Error::Precondition` for `steps == 0` or `end <= 0`;
    /// * `Error::Domain` if the initial jump is not strictly positive or the
    ///   initial up probability lies outside `[0, 1]`.
    pub fn new(process: &'a dyn StochasticProcess1D, end: Time, steps: Size) -> Result<Self> {
        let tree = ExtendedBinomialTree::new(process, end, steps)?;
        let dx = S::dx_step(&tree, 0.0);
        ensure_domain!(
            dx.is_finite() && dx > 0.0,
            "{}: invalid jump size {dx}",
            S::NAME
        );
        let pu = checked_probability(S::NAME, S::prob_up(&tree, 0.0))?;
        let pd = 1.0 - pu;
        tracing::debug!(
            scheme = S::NAME,
            steps,
            dt = tree.dt(),
            dx,
            pu,
            "built equal-jumps binomial tree"
        );
        Ok(Self {
            tree,
            dx,
            pu,
            pd,
            scheme: PhantomData,
        })
    }

    /// The shared lattice base.
    pub fn tree(&self) -> &ExtendedBinomialTree<'a> {
        &self.tree
    }

    /// Jump at `t = 0`.
    pub fn dx(&self) -> Real {
        self.dx
    }

    /// Up probability at `t = 0`.
    pub fn pu(&self) -> Probability {
        self.pu
    }

    /// Down probability at `t = 0`.
    pub fn pd(&self) -> Probability {
        self.pd
    }

    /// Jump at `step_time`.
    pub fn dx_step(&self, step_time: Time) -> Real {
        S::dx_step(&self.tree, step_time)
    }

    /// Up probability at `step_time`, validated.
    pub fn prob_up(&self, step_time: Time) -> Result<Probability> {
        checked_probability(S::NAME, S::prob_up(&self.tree, step_time))
    }
}

impl<S: EqualJumpsScheme> BinomialLattice for ExtendedEqualJumpsBinomialTree<'_, S> {
    fn steps(&self) -> Size {
        self.tree.steps()
    }

    fn dt(&self) -> Time {
        self.tree.dt()
    }

    fn size(&self, i: Size) -> Size {
        self.tree.size(i)
    }

    fn descendant(&self, i: Size, index: Size, branch: Size) -> Size {
        self.tree.descendant(i, index, branch)
    }

    fn underlying(&self, i: Size, index: Size) -> Real {
        self.tree.check_node(i, index);
        let step_time = self.tree.step_time(i);
        let j = centred_offset(i, index);
        // every level centred on x0
        self.tree.x0() * (j * S::dx_step(&self.tree, step_time)).exp()
    }

    fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability> {
        self.tree.check_transition(i, index, branch);
        let pu = self.prob_up(self.tree.step_time(i))?;
        Ok(branch_probability(branch, pu))
    }
}

/// `½ + ½·m(t)/dx(t)`: the up probability matching the mean log move.
fn mean_matching_prob_up<S: EqualJumpsScheme>(tree: &ExtendedBinomialTree<'_>, t: Time) -> Real {
    0.5 + 0.5 * tree.drift_step(t) / S::dx_step(tree, t)
}

// ── Cox-Ross-Rubinstein ───────────────────────────────────────────────────────

/// Cox-Ross-Rubinstein jumps: `dx(t) = σ(t)·√Δt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoxRossRubinsteinJumps;

impl EqualJumpsScheme for CoxRossRubinsteinJumps {
    const NAME: &'static str = "Cox-Ross-Rubinstein";

    fn dx_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        tree.std_deviation(step_time)
    }

    fn prob_up(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        mean_matching_prob_up::<Self>(tree, step_time)
    }
}

/// Cox-Ross-Rubinstein (multiplicative) equal-jumps tree.
///
/// Corresponds to `QuantLib::ExtendedCoxRossRubinstein`.
pub type ExtendedCoxRossRubinstein<'a> =
    ExtendedEqualJumpsBinomialTree<'a, CoxRossRubinsteinJumps>;

// ── Trigeorgis ────────────────────────────────────────────────────────────────

/// Trigeorgis jumps: `dx(t) = √(σ(t)²Δt + m(t)²)`, so that the jump
/// carries the whole second moment of the step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigeorgisJumps;

impl EqualJumpsScheme for TrigeorgisJumps {
    const NAME: &'static str = "Trigeorgis";

    fn dx_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        let drift = tree.drift_step(step_time);
        (tree.variance(step_time) + drift * drift).sqrt()
    }

    fn prob_up(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        mean_matching_prob_up::<Self>(tree, step_time)
    }
}

/// Trigeorgis (additive equal-jumps) tree.
///
/// Corresponds to `QuantLib::ExtendedTrigeorgis`.
pub type ExtendedTrigeorgis<'a> = ExtendedEqualJumpsBinomialTree<'a, TrigeorgisJumps>;
