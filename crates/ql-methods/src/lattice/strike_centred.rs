//! Strike-centred trees: Leisen-Reimer and Joshi's fourth-order variant.
//!
//! Both force an odd number of steps and choose the up probability through
//! a binomial inversion of the Black-Scholes `d₂` (and `d₁` for the
//! measure-changed probability), which puts the strike in the middle of a
//! terminal interval and removes the even/odd oscillation of naive trees:
//!
//! ```text
//! V      = σ²(t)·T
//! ermqdt = exp(m(t) + ½·V/n)
//! d₂     = (ln(x0/K) + m(t)·n) / √V
//! pu     = h(d₂),   p′ = h(d₂ + √V)
//! up     = ermqdt · p′ / pu
//! down   = (ermqdt − pu·up) / (1 − pu)
//! ```

use ql_core::{ensure, ensure_domain, errors::Result, Probability, Real, Size, Time};
use ql_math::peizer_pratt_method_2_inversion;
use ql_processes::StochasticProcess1D;

use super::extended_binomial_tree::ExtendedBinomialTree;
use super::{branch_probability, BinomialLattice};

/// The binomial inversion `h` of a strike-centred scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inversion {
    PeizerPratt,
    Joshi4,
}

impl Inversion {
    fn name(self) -> &'static str {
        match self {
            Inversion::PeizerPratt => "Leisen-Reimer",
            Inversion::Joshi4 => "Joshi4",
        }
    }

    fn up_probability(self, z: Real, odd_steps: Size) -> Result<Real> {
        match self {
            Inversion::PeizerPratt => peizer_pratt_method_2_inversion(z, odd_steps),
            Inversion::Joshi4 => Ok(ExtendedJoshi4::compute_up_prob(
                (odd_steps as Real - 1.0) / 2.0,
                z,
            )),
        }
    }
}

/// `steps` if odd, `steps + 1` otherwise.
fn odd_step_count(steps: Size) -> Size {
    if steps % 2 == 1 {
        steps
    } else {
        steps + 1
    }
}

/// Multiplicative moves and up probability of one level.
#[derive(Debug, Clone, Copy)]
struct CentredMoves {
    up: Real,
    down: Real,
    pu: Probability,
}

/// State shared by both strike-centred schemes.
#[derive(Debug, Clone)]
struct StrikeCentredTree<'a> {
    tree: ExtendedBinomialTree<'a>,
    inversion: Inversion,
    end: Time,
    odd_steps: Size,
    strike: Real,
    moves: CentredMoves,
}

impl<'a> StrikeCentredTree<'a> {
    fn new(
        inversion: Inversion,
        process: &'a dyn StochasticProcess1D,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Self> {
        ensure!(steps > 0, "binomial tree needs at least one step");
        ensure!(strike > 0.0, "strike must be positive, got {strike}");
        let odd_steps = odd_step_count(steps);
        let tree = ExtendedBinomialTree::new(process, end, odd_steps)?;
        ensure!(
            tree.x0() > 0.0,
            "{} tree needs a positive initial value, got {}",
            inversion.name(),
            tree.x0()
        );
        if odd_steps != steps {
            tracing::debug!(
                scheme = inversion.name(),
                requested = steps,
                used = odd_steps,
                "step count bumped to odd"
            );
        }
        let mut centred = Self {
            tree,
            inversion,
            end,
            odd_steps,
            strike,
            moves: CentredMoves {
                up: 0.0,
                down: 0.0,
                pu: 0.5,
            },
        };
        centred.moves = centred.moves_with_drift(centred.tree.drift_per_step(), 0.0)?;
        tracing::debug!(
            scheme = inversion.name(),
            steps = odd_steps,
            dt = centred.tree.dt(),
            strike,
            up = centred.moves.up,
            down = centred.moves.down,
            pu = centred.moves.pu,
            "built strike-centred binomial tree"
        );
        Ok(centred)
    }

    /// Moves for a level whose step drift is `drift` and whose local
    /// volatility is read at `step_time`.
    fn moves_with_drift(&self, drift: Real, step_time: Time) -> Result<CentredMoves> {
        let name = self.inversion.name();
        let x0 = self.tree.x0();
        let variance = self.tree.process().variance(step_time, x0, self.end);
        ensure_domain!(
            variance.is_finite() && variance > 0.0,
            "{name}: total variance {variance} must be positive"
        );
        let n = self.odd_steps as Real;
        let std_dev = variance.sqrt();
        let ermqdt = (drift + 0.5 * variance / n).exp();
        let d2 = ((x0 / self.strike).ln() + drift * n) / std_dev;
        let pu = self.inversion.up_probability(d2, self.odd_steps)?;
        ensure_domain!(
            pu > 0.0 && pu < 1.0,
            "{name}: up probability {pu} outside (0, 1)"
        );
        let pdash = self.inversion.up_probability(d2 + std_dev, self.odd_steps)?;
        let up = ermqdt * pdash / pu;
        let down = (ermqdt - pu * up) / (1.0 - pu);
        Ok(CentredMoves { up, down, pu })
    }

    /// Moves of level `i`, from the drift and variance at `i·Δt`.
    fn slice_moves(&self, i: Size) -> Result<CentredMoves> {
        let step_time = self.tree.step_time(i);
        self.moves_with_drift(self.tree.drift_step(step_time), step_time)
    }

    fn underlying(&self, i: Size, index: Size) -> Real {
        self.tree.check_node(i, index);
        // a degenerate slice is reported by `probability`
        match self.slice_moves(i) {
            Ok(moves) => {
                self.tree.x0() * moves.down.powi((i - index) as i32) * moves.up.powi(index as i32)
            }
            Err(_) => Real::NAN,
        }
    }

    fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability> {
        self.tree.check_transition(i, index, branch);
        Ok(branch_probability(branch, self.slice_moves(i)?.pu))
    }
}

macro_rules! strike_centred_accessors {
    ($tree:ident) => {
        impl<'a> $tree<'a> {
            /// The shared lattice base (built on the odd step count).
            pub fn tree(&self) -> &ExtendedBinomialTree<'a> {
                &self.0.tree
            }

            /// Strike the tree is centred on.
            pub fn strike(&self) -> Real {
                self.0.strike
            }

            /// Horizon of the tree.
            pub fn end(&self) -> Time {
                self.0.end
            }

            /// Effective (odd) number of steps.
            pub fn odd_steps(&self) -> Size {
                self.0.odd_steps
            }

            /// Multiplicative up move.
            pub fn up(&self) -> Real {
                self.0.moves.up
            }

            /// Multiplicative down move.
            pub fn down(&self) -> Real {
                self.0.moves.down
            }

            /// Up probability at `t = 0`.
            pub fn pu(&self) -> Probability {
                self.0.moves.pu
            }

            /// Down probability at `t = 0`.
            pub fn pd(&self) -> Probability {
                1.0 - self.0.moves.pu
            }
        }

        impl BinomialLattice for $tree<'_> {
            fn steps(&self) -> Size {
                self.0.odd_steps
            }

            fn dt(&self) -> Time {
                self.0.tree.dt()
            }

            fn size(&self, i: Size) -> Size {
                self.0.tree.size(i)
            }

            fn descendant(&self, i: Size, index: Size, branch: Size) -> Size {
                self.0.tree.descendant(i, index, branch)
            }

            fn underlying(&self, i: Size, index: Size) -> Real {
                self.0.underlying(i, index)
            }

            fn probability(&self, i: Size, index: Size, branch: Size) -> Result<Probability> {
                self.0.probability(i, index, branch)
            }
        }
    };
}

// ── Leisen-Reimer ─────────────────────────────────────────────────────────────

/// Leisen & Reimer (1996) tree: multiplicative, strike-centred through the
/// Peizer-Pratt method 2 inversion.
///
/// Corresponds to `QuantLib::ExtendedLeisenReimer`.
#[derive(Debug, Clone)]
pub struct ExtendedLeisenReimer<'a>(StrikeCentredTree<'a>);

impl<'a> ExtendedLeisenReimer<'a> {
    /// Build the tree; an even `steps` is bumped to `steps + 1`.
    ///
    /// # Errors
    /// * `Error::Precondition` for `steps == 0`, `end <= 0`, `strike <= 0`
    ///   or a non-positive initial value;
    /// * `Error::Domain` if the initial probabilities are degenerate.
    pub fn new(
        process: &'a dyn StochasticProcess1D,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Self> {
        StrikeCentredTree::new(Inversion::PeizerPratt, process, end, steps, strike).map(Self)
    }
}

strike_centred_accessors!(ExtendedLeisenReimer);

// ── Joshi4 ────────────────────────────────────────────────────────────────────

/// Joshi's fourth-order strike-centred tree.
///
/// Same construction as Leisen-Reimer with a higher-order inversion.
/// Needs at least three effective steps.
///
/// Corresponds to `QuantLib::ExtendedJoshi4`.
#[derive(Debug, Clone)]
pub struct ExtendedJoshi4<'a>(StrikeCentredTree<'a>);

impl<'a> ExtendedJoshi4<'a> {
    /// Build the tree; an even `steps` is bumped to `steps + 1`.
    ///
    /// # Errors
    /// * `Error::Precondition` for `steps == 0` or `steps == 1`, `end <= 0`,
    ///   `strike <= 0` or a non-positive initial value;
    /// * `Error::Domain` if the initial probabilities are degenerate.
    pub fn new(
        process: &'a dyn StochasticProcess1D,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Self> {
        ensure!(
            steps != 1,
            "Joshi4 tree needs at least 3 effective steps, got {steps}"
        );
        StrikeCentredTree::new(Inversion::Joshi4, process, end, steps, strike).map(Self)
    }

    /// Fourth-order up probability for `k = (n − 1)/2` and normalised
    /// moneyness `dj`.
    ///
    /// ```text
    /// p = ½ + α/√k + β/k^{3/2} + γ/k^{5/2} + δ/k^{7/2},   α = dj/√8
    /// ```
    pub fn compute_up_prob(k: Real, dj: Real) -> Real {
        let alpha = dj / (8.0_f64).sqrt();
        let alpha2 = alpha * alpha;
        let alpha3 = alpha * alpha2;
        let alpha5 = alpha3 * alpha2;
        let alpha7 = alpha5 * alpha2;
        let beta = -0.375 * alpha - alpha3;
        let gamma = (5.0 / 6.0) * alpha5 + (13.0 / 12.0) * alpha3 + (25.0 / 128.0) * alpha;
        let delta = -0.1025 * alpha - 0.9285 * alpha3 - 1.43 * alpha5 - 0.5 * alpha7;
        let rootk = k.sqrt();
        let mut p = 0.5;
        p += alpha / rootk;
        p += beta / (k * rootk);
        p += gamma / (k * k * rootk);
        p += delta / (k * k * k * rootk);
        p
    }
}

strike_centred_accessors!(ExtendedJoshi4);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_processes::{BlackScholesProcess, PiecewiseFlatCurve};

    fn process() -> BlackScholesProcess {
        BlackScholesProcess::flat(100.0, 0.03, 0.0, 0.20).unwrap()
    }

    #[test]
    fn even_steps_become_odd() {
        let p = process();
        let lr = ExtendedLeisenReimer::new(&p, 1.0, 100, 110.0).unwrap();
        assert_eq!(lr.odd_steps(), 101);
        assert_eq!(lr.steps(), 101);
        assert_abs_diff_eq!(lr.dt(), 1.0 / 101.0, epsilon = 1e-15);
        let j4 = ExtendedJoshi4::new(&p, 1.0, 51, 110.0).unwrap();
        assert_eq!(j4.odd_steps(), 51);
    }

    #[test]
    fn forward_is_matched_per_step() {
        let p = process();
        let lr = ExtendedLeisenReimer::new(&p, 1.0, 25, 95.0).unwrap();
        // E[S(Δt)]/S = exp((r − q)·Δt)
        let growth = lr.pu() * lr.up() + lr.pd() * lr.down();
        assert_abs_diff_eq!(growth, (0.03 * lr.dt()).exp(), epsilon = 1e-12);
    }

    #[test]
    fn single_step_leisen_reimer() {
        let p = process();
        let lr = ExtendedLeisenReimer::new(&p, 1.0, 1, 100.0).unwrap();
        assert_eq!(lr.size(1), 2);
        let up = lr.probability(0, 0, 1).unwrap();
        let down = lr.probability(0, 0, 0).unwrap();
        assert_abs_diff_eq!(up + down, 1.0, epsilon = 1e-15);
        assert!(lr.underlying(1, 1) > 100.0 && lr.underlying(1, 0) < 100.0);
    }

    #[test]
    fn invalid_strike_rejected() {
        let p = process();
        for strike in [0.0, -10.0] {
            assert!(ExtendedLeisenReimer::new(&p, 1.0, 11, strike)
                .unwrap_err()
                .is_precondition());
            assert!(ExtendedJoshi4::new(&p, 1.0, 11, strike)
                .unwrap_err()
                .is_precondition());
        }
    }

    #[test]
    fn zero_steps_not_masked_by_odd_bump() {
        let p = process();
        assert!(ExtendedLeisenReimer::new(&p, 1.0, 0, 100.0)
            .unwrap_err()
            .is_precondition());
        assert!(ExtendedJoshi4::new(&p, 1.0, 0, 100.0)
            .unwrap_err()
            .is_precondition());
    }

    #[test]
    fn joshi4_needs_three_steps() {
        let p = process();
        assert!(ExtendedJoshi4::new(&p, 1.0, 1, 100.0)
            .unwrap_err()
            .is_precondition());
        assert_eq!(ExtendedJoshi4::new(&p, 1.0, 2, 100.0).unwrap().odd_steps(), 3);
    }

    fn rate_jump_process() -> BlackScholesProcess {
        let r = PiecewiseFlatCurve::new(&[0.5], &[0.02, 0.08]).unwrap();
        BlackScholesProcess::new(
            100.0,
            r,
            PiecewiseFlatCurve::flat(0.0),
            PiecewiseFlatCurve::flat(0.20),
        )
        .unwrap()
    }

    /// One-step growth `pu·up + pd·down` leaving node `(i, 0)`.
    fn growth(lattice: &dyn BinomialLattice, i: Size) -> Real {
        let from = lattice.underlying(i, 0);
        let up = lattice.underlying(i + 1, 1) / from;
        let down = lattice.underlying(i + 1, 0) / from;
        lattice.probability(i, 0, 1).unwrap() * up + lattice.probability(i, 0, 0).unwrap() * down
    }

    #[test]
    fn each_slice_matches_its_own_forward() {
        let p = rate_jump_process();
        let lr = ExtendedLeisenReimer::new(&p, 1.0, 25, 100.0).unwrap();
        let j4 = ExtendedJoshi4::new(&p, 1.0, 25, 100.0).unwrap();
        // Δt = 0.04; levels 2..3 sit before the jump, 20..21 after it
        for lattice in [&lr as &dyn BinomialLattice, &j4] {
            assert_abs_diff_eq!(growth(lattice, 2), (0.02 * 0.04_f64).exp(), epsilon = 1e-12);
            assert_abs_diff_eq!(growth(lattice, 20), (0.08 * 0.04_f64).exp(), epsilon = 1e-12);
        }
        // node spacing follows the slice, not the t = 0 moves
        assert!(lr.underlying(21, 21) > 100.0 * lr.up().powi(21));
    }

    #[test]
    fn joshi4_up_prob_is_odd_around_one_half() {
        for dj in [0.1, 0.8, 1.7] {
            let up = ExtendedJoshi4::compute_up_prob(25.0, dj);
            let down = ExtendedJoshi4::compute_up_prob(25.0, -dj);
            assert_abs_diff_eq!(up + down, 1.0, epsilon = 1e-15);
        }
        assert_eq!(ExtendedJoshi4::compute_up_prob(25.0, 0.0), 0.5);
    }

    #[test]
    fn joshi4_close_to_peizer_pratt() {
        let n = 101;
        for z in [-1.2, 0.3, 0.9] {
            let pp = peizer_pratt_method_2_inversion(z, n).unwrap();
            let j4 = ExtendedJoshi4::compute_up_prob((n as Real - 1.0) / 2.0, z);
            assert_abs_diff_eq!(pp, j4, epsilon = 1e-5);
        }
    }

    #[test]
    fn zero_volatility_is_domain_error() {
        let p = BlackScholesProcess::flat(100.0, 0.03, 0.0, 0.0).unwrap();
        assert!(ExtendedLeisenReimer::new(&p, 1.0, 11, 100.0)
            .unwrap_err()
            .is_domain());
    }
}
