//! # ql-math
//!
//! Mathematical helpers for the lattice crates: the binomial inversions
//! used to centre trees on a strike.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions and their inversions.
pub mod distributions;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::peizer_pratt_method_2_inversion;
