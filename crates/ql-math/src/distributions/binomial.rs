//! Binomial inversions (translates the free functions of
//! `ql/math/distributions/binomialdistribution.hpp`).
//!
//! The Peizer–Pratt inversion maps a normal quantile `z` to the success
//! probability `p` for which an `n`-trial binomial law puts mass `≈ Φ(z)`
//! above its median. Strike-centred binomial trees use it to place the
//! strike on a node.

use ql_core::{ensure, Real, Result};

/// Peizer–Pratt method 2 inversion.
///
/// ```text
/// h(z) = ½ + sign(z) · √(¼ · (1 − exp(−(z / (n + ⅓ + 0.1/(n+1)))² · (n + ⅙))))
/// ```
///
/// # Errors
/// Returns `Error::Precondition` if `n` is even.
pub fn peizer_pratt_method_2_inversion(z: Real, n: usize) -> Result<Real> {
    ensure!(n % 2 == 1, "n must be an odd number: {n} not allowed");
    let nf = n as Real;
    let mut result = z / (nf + 1.0 / 3.0 + 0.1 / (nf + 1.0));
    result *= result;
    result = (-result * (nf + 1.0 / 6.0)).exp();
    let sign = if z > 0.0 { 1.0 } else { -1.0 };
    Ok(0.5 + sign * (0.25 * (1.0 - result)).sqrt())
}
