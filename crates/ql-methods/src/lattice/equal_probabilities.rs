//! Equal-probabilities binomial trees.
//!
//! Every transition has probability `½`. The lattice is centred on the
//! drifted forward of each level and spread by a scheme-specific up step:
//!
//! ```text
//! S(i, j) = x0 · exp(i · drift_step(tᵢ) + (2j − i) · up_step(tᵢ)),   tᵢ = i·Δt
//! ```

use std::marker::PhantomData;

use ql_core::{ensure_domain, errors::Result, Probability, Real, Size, Time};
use ql_processes::StochasticProcess1D;

use super::extended_binomial_tree::{centred_offset, ExtendedBinomialTree};
use super::BinomialLattice;

/// The hook an equal-probabilities scheme supplies: the log-space up move
/// at a given time.
pub trait EqualProbabilitiesScheme: std::fmt::Debug + Clone + Send + Sync + 'static {
    /// Scheme name used in diagnostics.
    const NAME: &'static str;

    /// Up move over one step starting at `step_time`.
    fn up_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real;
}

/// Equal-probabilities tree parameterised by its up-step scheme.
///
/// Corresponds to `QuantLib::ExtendedEqualProbabilitiesBinomialTree<T>`.
#[derive(Debug, Clone)]
pub struct ExtendedEqualProbabilitiesBinomialTree<'a, S> {
    tree: ExtendedBinomialTree<'a>,
    up: Real,
    scheme: PhantomData<S>,
}

impl<'a, S: EqualProbabilitiesScheme> ExtendedEqualProbabilitiesBinomialTree<'a, S> {
    /// Build the tree for `steps` steps over `[0, end]`.
    ///
    /// # Errors
    /// * `Error::Precondition` for `steps == 0` or `end <= 0`;
    /// * `Error::Domain` if the initial up step is negative or not finite.
    ///
    /// Later slices are validated by [`BinomialLattice::probability`].
    pub fn new(process: &'a dyn StochasticProcess1D, end: Time, steps: Size) -> Result<Self> {
        let tree = ExtendedBinomialTree::new(process, end, steps)?;
        let up = checked_up_step::<S>(&tree, 0.0)?;
        tracing::debug!(
            scheme = S::NAME,
            steps,
            dt = tree.dt(),
            drift_per_step = tree.drift_per_step(),
            up,
            "built equal-probabilities binomial tree"
        );
        Ok(Self {
            tree,
            up,
            scheme: PhantomData,
        })
    }

    /// The shared lattice base.
    pub fn tree(&self) -> &ExtendedBinomialTree<'a> {
        &self.tree
    }

    /// Up step at `t = 0`.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Up step at `step_time`.
    pub fn up_step(&self, step_time: Time) -> Real {
        S::up_step(&self.tree, step_time)
    }
}

impl<S: EqualProbabilitiesScheme> BinomialLattice for ExtendedEqualProbabilitiesBinomialTree<'_, S> {
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
        // centred on the drifted forward of level i
        self.tree.x0()
            * (i as Real * self.tree.drift_step(step_time) + j * S::up_step(&self.tree, step_time))
                .exp()
    }

    fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability> {
        self.tree.check_transition(i, index, branch);
        checked_up_step::<S>(&self.tree, self.tree.step_time(i))?;
        Ok(0.5)
    }
}

/// The scheme's up step at `step_time`, rejected unless finite and
/// non-negative.
fn checked_up_step<S: EqualProbabilitiesScheme>(
    tree: &ExtendedBinomialTree<'_>,
    step_time: Time,
) -> Result<Real> {
    let up = S::up_step(tree, step_time);
    ensure_domain!(
        up.is_finite() && up >= 0.0,
        "{}: invalid up step {up} at t = {step_time}",
        S::NAME
    );
    Ok(up)
}

// ── Jarrow-Rudd ───────────────────────────────────────────────────────────────

/// Jarrow-Rudd up step: the local standard deviation `σ(t)·√Δt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarrowRuddStep;

impl EqualProbabilitiesScheme for JarrowRuddStep {
    const NAME: &'static str = "Jarrow-Rudd";

    fn up_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        tree.std_deviation(step_time)
    }
}

/// Jarrow-Rudd (multiplicative) equal-probabilities tree.
///
/// Corresponds to `QuantLib::ExtendedJarrowRudd`.
pub type ExtendedJarrowRudd<'a> = ExtendedEqualProbabilitiesBinomialTree<'a, JarrowRuddStep>;

// ── Additive EQP ──────────────────────────────────────────────────────────────

/// Additive EQP up step, matching the total second moment of the step:
///
/// `u(t) = −½·m(t) + ½·√(4·v(t) − 3·m(t)²)` with `m = drift_step`,
/// `v = variance`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdditiveEqpStep;

impl EqualProbabilitiesScheme for AdditiveEqpStep {
    const NAME: &'static str = "additive EQP";

    fn up_step(tree: &ExtendedBinomialTree<'_>, step_time: Time) -> Real {
        let drift = tree.drift_step(step_time);
        -0.5 * drift + 0.5 * (4.0 * tree.variance(step_time) - 3.0 * drift * drift).sqrt()
    }
}

/// Additive equal-probabilities tree.
///
/// Corresponds to `QuantLib::ExtendedAdditiveEQPBinomialTree`.
pub type ExtendedAdditiveEqpBinomialTree<'a> =
    ExtendedEqualProbabilitiesBinomialTree<'a, AdditiveEqpStep>;
