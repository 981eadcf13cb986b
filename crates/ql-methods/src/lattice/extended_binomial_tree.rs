//! Level-indexed base shared by every time-dependent binomial scheme.

use ql_core::{ensure, errors::Result, Real, Size, Time};
use ql_processes::StochasticProcess1D;

/// Sizing, addressing and drift bookkeeping common to all schemes.
///
/// Holds a borrowed process: the lattice never owns or mutates it, and the
/// process must outlive the lattice.
///
/// Two drift terms are kept apart:
/// * [`drift_per_step`](Self::drift_per_step): `μ(0, x0)·Δt`, cached at
///   construction;
/// * [`drift_step`](Self::drift_step): `μ(t, x0)·Δt`, re-evaluated on
///   every call.
///
/// Corresponds to `QuantLib::ExtendedBinomialTree<T>`.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedBinomialTree<'a> {
    process: &'a dyn StochasticProcess1D,
    x0: Real,
    dt: Time,
    steps: Size,
    drift_per_step: Real,
}

impl<'a> ExtendedBinomialTree<'a> {
    /// Build the base for `steps` steps over `[0, end]`.
    ///
    /// # Errors
    /// Returns `Error::Precondition` if `steps == 0` or `end` is not
    /// strictly positive.
    pub fn new(process: &'a dyn StochasticProcess1D, end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "binomial tree needs at least one step");
        ensure!(end > 0.0, "end time must be positive, got {end}");
        let x0 = process.x0();
        let dt = end / steps as Real;
        let drift_per_step = process.drift(0.0, x0) * dt;
        Ok(Self {
            process,
            x0,
            dt,
            steps,
            drift_per_step,
        })
    }

    /// The diffusion source.
    pub fn process(&self) -> &'a dyn StochasticProcess1D {
        self.process
    }

    /// Initial state.
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time of level `i`.
    pub fn step_time(&self, i: Size) -> Time {
        i as Real * self.dt
    }

    /// Number of nodes at level `i`.
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Child index of `(i, index)` along `branch`.
    pub fn descendant(&self, i: Size, index: Size, branch: Size) -> Size {
        self.check_transition(i, index, branch);
        index + branch
    }

    /// Drift over one step evaluated at `t = 0`.
    pub fn drift_per_step(&self) -> Real {
        self.drift_per_step
    }

    /// Drift over one step evaluated at elapsed time `drift_time`.
    pub fn drift_step(&self, drift_time: Time) -> Real {
        self.process.drift(drift_time, self.x0) * self.dt
    }

    /// Local variance over one step starting at `t`.
    pub fn variance(&self, t: Time) -> Real {
        self.process.variance(t, self.x0, self.dt)
    }

    /// Local standard deviation over one step starting at `t`.
    pub fn std_deviation(&self, t: Time) -> Real {
        self.process.std_deviation(t, self.x0, self.dt)
    }

    /// Panic unless `(i, index)` is a node of the lattice.
    pub(crate) fn check_node(&self, i: Size, index: Size) {
        assert!(
            i <= self.steps,
            "level {i} out of range [0, {}]",
            self.steps
        );
        assert!(index <= i, "node index {index} out of range [0, {i}]");
    }

    /// Panic unless `(i, index)` has a child along `branch`.
    pub(crate) fn check_transition(&self, i: Size, index: Size, branch: Size) {
        self.check_node(i, index);
        assert!(
            i < self.steps,
            "level {i} is the last level of a {}-step lattice and has no descendants",
            self.steps
        );
        assert!(branch < 2, "branch {branch} out of range [0, 1]");
    }
}

/// Signed offset `2j − i` of node `(i, j)` from the level centre.
#[inline]
pub(crate) fn centred_offset(i: Size, index: Size) -> Real {
    (2 * index as i64 - i as i64) as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_processes::{BlackScholesProcess, PiecewiseFlatCurve};

    fn process() -> BlackScholesProcess {
        let r = PiecewiseFlatCurve::new(&[0.5], &[0.02, 0.06]).unwrap();
        BlackScholesProcess::new(
            100.0,
            r,
            PiecewiseFlatCurve::flat(0.0),
            PiecewiseFlatCurve::flat(0.2),
        )
        .unwrap()
    }

    #[test]
    fn geometry() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        assert_eq!(tree.steps(), 4);
        assert_abs_diff_eq!(tree.dt(), 0.25);
        assert_abs_diff_eq!(tree.step_time(3), 0.75);
        assert_abs_diff_eq!(tree.x0(), 100.0);
        for i in 0..=4 {
            assert_eq!(tree.size(i), i + 1);
        }
        assert_eq!(tree.descendant(2, 1, 0), 1);
        assert_eq!(tree.descendant(2, 1, 1), 2);
    }

    #[test]
    fn cached_and_live_drift_differ_after_rate_change() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        // (0.02 − 0.02) · 0.25 and (0.06 − 0.02) · 0.25
        assert_abs_diff_eq!(tree.drift_per_step(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.drift_step(0.0), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.drift_step(0.75), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.drift_per_step(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn local_moments() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        assert_abs_diff_eq!(tree.variance(0.3), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.std_deviation(0.3), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn zero_steps_rejected() {
        let p = process();
        let first = ExtendedBinomialTree::new(&p, 1.0, 0).unwrap_err();
        let second = ExtendedBinomialTree::new(&p, 1.0, 0).unwrap_err();
        assert!(first.is_precondition());
        assert_eq!(first, second);
    }

    #[test]
    fn non_positive_horizon_rejected() {
        let p = process();
        for end in [0.0, -1.0, Real::NAN] {
            assert!(ExtendedBinomialTree::new(&p, end, 10)
                .unwrap_err()
                .is_precondition());
        }
    }

    #[test]
    fn offsets_are_symmetric() {
        let offsets: Vec<Real> = (0..=4).map(|j| centred_offset(4, j)).collect();
        assert_eq!(offsets, vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
        assert_eq!(centred_offset(0, 0), 0.0);
    }

    #[test]
    #[should_panic(expected = "node index")]
    fn node_index_past_level_panics() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        tree.descendant(2, 3, 0);
    }

    #[test]
    #[should_panic(expected = "no descendants")]
    fn last_level_has_no_descendants() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        tree.descendant(4, 0, 0);
    }

    #[test]
    #[should_panic(expected = "branch")]
    fn third_branch_panics() {
        let p = process();
        let tree = ExtendedBinomialTree::new(&p, 1.0, 4).unwrap();
        tree.descendant(2, 1, 2);
    }
}
