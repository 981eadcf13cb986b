//! Runtime selection among the seven binomial schemes.

use std::fmt;
use std::str::FromStr;

use ql_core::{errors::Error, errors::Result, Real, Size, Time};
use ql_processes::StochasticProcess1D;

use super::{
    BinomialLattice, ExtendedAdditiveEqpBinomialTree, ExtendedCoxRossRubinstein,
    ExtendedJarrowRudd, ExtendedJoshi4, ExtendedLeisenReimer, ExtendedTian, ExtendedTrigeorgis,
};

/// The named binomial schemes.
///
/// Parses from the short engine names used by QuantLib (`"jr"`, `"crr"`,
/// `"eqp"`, `"trigeorgis"`, `"tian"`, `"lr"`, `"joshi4"`) or the long forms,
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BinomialScheme {
    /// Jarrow-Rudd, equal probabilities.
    JarrowRudd,
    /// Cox-Ross-Rubinstein, equal jumps.
    CoxRossRubinstein,
    /// Additive EQP, equal probabilities.
    AdditiveEqp,
    /// Trigeorgis, additive equal jumps.
    Trigeorgis,
    /// Tian, third-moment matching.
    Tian,
    /// Leisen-Reimer, strike-centred.
    LeisenReimer,
    /// Joshi fourth order, strike-centred.
    Joshi4,
}

impl BinomialScheme {
    /// Every scheme, in declaration order.
    pub const ALL: [BinomialScheme; 7] = [
        BinomialScheme::JarrowRudd,
        BinomialScheme::CoxRossRubinstein,
        BinomialScheme::AdditiveEqp,
        BinomialScheme::Trigeorgis,
        BinomialScheme::Tian,
        BinomialScheme::LeisenReimer,
        BinomialScheme::Joshi4,
    ];

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            BinomialScheme::JarrowRudd => "jr",
            BinomialScheme::CoxRossRubinstein => "crr",
            BinomialScheme::AdditiveEqp => "eqp",
            BinomialScheme::Trigeorgis => "trigeorgis",
            BinomialScheme::Tian => "tian",
            BinomialScheme::LeisenReimer => "lr",
            BinomialScheme::Joshi4 => "joshi4",
        }
    }

    /// `true` for schemes whose transition probability is always `½`.
    pub fn is_equal_probabilities(self) -> bool {
        matches!(self, BinomialScheme::JarrowRudd | BinomialScheme::AdditiveEqp)
    }

    /// `true` for schemes that use the strike to place their nodes.
    pub fn is_strike_centred(self) -> bool {
        matches!(self, BinomialScheme::LeisenReimer | BinomialScheme::Joshi4)
    }

    /// Build the lattice for this scheme.
    ///
    /// `strike` is only read by strike-centred schemes.
    pub fn build<'a>(
        self,
        process: &'a dyn StochasticProcess1D,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Box<dyn BinomialLattice + 'a>> {
        let lattice: Box<dyn BinomialLattice + 'a> = match self {
            BinomialScheme::JarrowRudd => Box::new(ExtendedJarrowRudd::new(process, end, steps)?),
            BinomialScheme::CoxRossRubinstein => {
                Box::new(ExtendedCoxRossRubinstein::new(process, end, steps)?)
            }
            BinomialScheme::AdditiveEqp => {
                Box::new(ExtendedAdditiveEqpBinomialTree::new(process, end, steps)?)
            }
            BinomialScheme::Trigeorgis => Box::new(ExtendedTrigeorgis::new(process, end, steps)?),
            BinomialScheme::Tian => Box::new(ExtendedTian::new(process, end, steps)?),
            BinomialScheme::LeisenReimer => {
                Box::new(ExtendedLeisenReimer::new(process, end, steps, strike)?)
            }
            BinomialScheme::Joshi4 => Box::new(ExtendedJoshi4::new(process, end, steps, strike)?),
        };
        tracing::debug!(scheme = self.name(), steps = lattice.steps(), "selected binomial scheme");
        Ok(lattice)
    }
}

impl fmt::Display for BinomialScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinomialScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalised: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalised.as_str() {
            "jr" | "jarrowrudd" => Ok(BinomialScheme::JarrowRudd),
            "crr" | "coxrossrubinstein" => Ok(BinomialScheme::CoxRossRubinstein),
            "eqp" | "additiveeqp" => Ok(BinomialScheme::AdditiveEqp),
            "trigeorgis" => Ok(BinomialScheme::Trigeorgis),
            "tian" => Ok(BinomialScheme::Tian),
            "lr" | "leisenreimer" => Ok(BinomialScheme::LeisenReimer),
            "joshi4" | "joshi" => Ok(BinomialScheme::Joshi4),
            _ => Err(Error::InvalidArgument(format!(
                "unknown binomial scheme '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_processes::BlackScholesProcess;

    #[test]
    fn names_round_trip() {
        for scheme in BinomialScheme::ALL {
            assert_eq!(scheme.name().parse::<BinomialScheme>(), Ok(scheme));
            assert_eq!(scheme.to_string(), scheme.name());
        }
    }

    #[test]
    fn long_names_parse() {
        assert_eq!("Jarrow-Rudd".parse::<BinomialScheme>(), Ok(BinomialScheme::JarrowRudd));
        assert_eq!("Cox_Ross_Rubinstein".parse::<BinomialScheme>(), Ok(BinomialScheme::CoxRossRubinstein));
        assert_eq!("Additive EQP".parse::<BinomialScheme>(), Ok(BinomialScheme::AdditiveEqp));
        assert_eq!("LEISEN-REIMER".parse::<BinomialScheme>(), Ok(BinomialScheme::LeisenReimer));
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let err = "binomial".parse::<BinomialScheme>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn classification() {
        let equal: Vec<_> = BinomialScheme::ALL
            .into_iter()
            .filter(|s| s.is_equal_probabilities())
            .collect();
        assert_eq!(equal, vec![BinomialScheme::JarrowRudd, BinomialScheme::AdditiveEqp]);
        assert!(BinomialScheme::Joshi4.is_strike_centred());
        assert!(!BinomialScheme::Tian.is_strike_centred());
    }

    #[test]
    fn build_every_scheme() {
        let p = BlackScholesProcess::flat(100.0, 0.05, 0.0, 0.2).unwrap();
        for scheme in BinomialScheme::ALL {
            let lattice = scheme.build(&p, 1.0, 20, 100.0).unwrap();
            let expected = if scheme.is_strike_centred() { 21 } else { 20 };
            assert_eq!(lattice.steps(), expected, "{scheme}");
        }
    }

    #[test]
    fn build_propagates_errors() {
        let p = BlackScholesProcess::flat(100.0, 0.05, 0.0, 0.2).unwrap();
        for scheme in BinomialScheme::ALL {
            assert!(scheme.build(&p, 1.0, 0, 100.0).unwrap_err().is_precondition());
        }
        assert!(BinomialScheme::LeisenReimer
            .build(&p, 1.0, 10, -1.0)
            .unwrap_err()
            .is_precondition());
        assert!(BinomialScheme::CoxRossRubinstein.build(&p, 1.0, 10, -1.0).is_ok());
    }
}
