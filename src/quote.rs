use rust_decimal::Decimal;
use std::fmt;

use crate::errors::PriceError;
use crate::utils::format_decimal;

/// Outcome of a price lookup that keeps "unknown" apart from "zero".
#[derive(Debug)]
pub enum PriceQuote {
    Resolved(Decimal),
    Unavailable(PriceError),
}

impl PriceQuote {
    pub fn is_resolved(&self) -> bool {
        matches!(self, PriceQuote::Resolved(_))
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            PriceQuote::Resolved(value) => Some(*value),
            PriceQuote::Unavailable(_) => None,
        }
    }

    /// Value, or zero when unavailable.
    pub fn value_or_zero(&self) -> Decimal {
        self.value().unwrap_or(Decimal::ZERO)
    }

    /// Dashboard string form: unavailable prices collapse to `"0"`.
    pub fn to_price_string(&self) -> String {
        format_decimal(self.value_or_zero())
    }

    pub fn into_result(self) -> Result<Decimal, PriceError> {
        match self {
            PriceQuote::Resolved(value) => Ok(value),
            PriceQuote::Unavailable(err) => Err(err),
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            PriceQuote::Resolved(_) => "resolved",
            PriceQuote::Unavailable(err) => err.kind(),
        }
    }
}

/// A token routed against itself is at parity, every other failure is unavailable.
impl From<Result<Decimal, PriceError>> for PriceQuote {
    fn from(result: Result<Decimal, PriceError>) -> Self {
        match result {
            Ok(value) => PriceQuote::Resolved(value),
            Err(err) if err.is_identical_endpoints() => PriceQuote::Resolved(Decimal::ONE),
            Err(err) => PriceQuote::Unavailable(err),
        }
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceQuote::Resolved(value) => write!(f, "{}", format_decimal(*value)),
            PriceQuote::Unavailable(err) => write!(f, "unavailable ({})", err),
        }
    }
}
