//! Probability distributions (translates `ql/math/distributions/`).

pub mod binomial;

pub use binomial::peizer_pratt_method_2_inversion;
