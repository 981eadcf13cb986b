//! Error types for the lattice workspace.
//!
//! Every fallible operation returns [`Result`]. Bad inputs caught at
//! construction are [`Error::Precondition`]; numbers that leave their
//! mathematical domain while a lattice is being queried are
//! [`Error::Domain`]. The `ensure!` and `ensure_domain!` macros build
//! these variants with a formatted message.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated by the caller's parameters.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A computed quantity fell outside its valid domain, e.g. a
    /// transition probability outside `[0, 1]`.
    #[error("numerical domain error: {0}")]
    Domain(String),

    /// Invalid argument, e.g. an unknown scheme name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// `true` for errors raised by parameter validation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_))
    }

    /// `true` for numerical domain violations.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain(_))
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::ensure;
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Domain(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_domain, errors::Error};
/// fn probability(p: f64) -> ql_core::errors::Result<f64> {
///     ensure_domain!((0.0..=1.0).contains(&p), "probability {p} outside [0, 1]");
///     Ok(p)
/// }
/// assert!(probability(0.3).is_ok());
/// assert!(matches!(probability(1.2), Err(Error::Domain(_))));
/// ```
#[macro_export]
macro_rules! ensure_domain {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Domain(
                format!($($msg)*)
            ));
        }
    };
}
