//! Tian tree: third-moment matching, multiplicative approach.

use ql_core::{errors::Result, Probability, Real, Size, Time};
use ql_processes::StochasticProcess1D;

use super::extended_binomial_tree::ExtendedBinomialTree;
use super::{branch_probability, checked_probability, BinomialLattice};

const NAME: &str = "Tian";

/// Tian (1993) binomial tree.
///
/// Matches mean, variance and skewness of the lognormal step with
/// asymmetric multiplicative moves. The moves and the up probability of
/// level `i` are recomputed from the drift and variance at `i·Δt`; the
/// accessors report the `t = 0` values.
///
/// Corresponds to `QuantLib::ExtendedTian`.
#[derive(Debug, Clone)]
pub struct ExtendedTian<'a> {
    tree: ExtendedBinomialTree<'a>,
    up: Real,
    down: Real,
    pu: Probability,
    pd: Probability,
}

/// `(up, down, pu)` for a step with log drift `drift` and variance
/// `variance`.
fn tian_parameters(drift: Real, variance: Real) -> (Real, Real, Real) {
    let q = variance.exp();
    let r = drift.exp() * q.sqrt();
    let root = (q * q + 2.0 * q - 3.0).sqrt();
    let up = 0.5 * r * q * (q + 1.0 + root);
    let down = 0.5 * r * q * (q + 1.0 - root);
    let pu = (r - down) / (up - down);
    (up, down, pu)
}

impl<'a> ExtendedTian<'a> {
    /// Build the tree for `steps` steps over `[0, end]`.
    ///
    /// # Errors
    /// * `Error::Precondition` for `steps == 0` or `end <= 0`;
    /// * `Error::Domain` if the initial up probability is outside `[0, 1]`.
    pub fn new(process: &'a dyn StochasticProcess1D, end: Time, steps: Size) -> Result<Self> {
        let tree = ExtendedBinomialTree::new(process, end, steps)?;
        let (up, down, pu) = tian_parameters(tree.drift_per_step(), tree.variance(0.0));
        let pu = checked_probability(NAME, pu)?;
        tracing::debug!(scheme = NAME, steps, dt = tree.dt(), up, down, pu, "built Tian tree");
        Ok(Self {
            tree,
            up,
            down,
            pu,
            pd: 1.0 - pu,
        })
    }

    /// The shared lattice base.
    pub fn tree(&self) -> &ExtendedBinomialTree<'a> {
        &self.tree
    }

    /// Multiplicative up move.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Multiplicative down move.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Up probability at `t = 0`.
    pub fn pu(&self) -> Probability {
        self.pu
    }

    /// Down probability at `t = 0`.
    pub fn pd(&self) -> Probability {
        self.pd
    }
}

impl BinomialLattice for ExtendedTian<'_> {
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
        let (up, down, _) = self.slice_parameters(i);
        self.tree.x0() * down.powi((i - index) as i32) * up.powi(index as i32)
    }

    fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability> {
        self.tree.check_transition(i, index, branch);
        let (_, _, pu) = self.slice_parameters(i);
        Ok(branch_probability(branch, checked_probability(NAME, pu)?))
    }
}

impl ExtendedTian<'_> {
    /// `(up, down, pu)` of level `i`.
    fn slice_parameters(&self, i: Size) -> (Real, Real, Real) {
        let step_time = self.tree.step_time(i);
        tian_parameters(self.tree.drift_step(step_time), self.tree.variance(step_time))
    }
}
