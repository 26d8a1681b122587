use ethers::types::Address;
use thiserror::Error;

/// Failures a quote source, the resolver or a valuation can run into.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No quote source registered for token {0}")]
    UnregisteredToken(String),

    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("Pair endpoints resolve to the same token {0:?}")]
    IdenticalAddresses(Address),

    #[error("Query returned no rows: {0}")]
    EmptyResultSet(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Pair {0:?} has no reserves")]
    InsufficientReserves(Address),

    #[error("Division by zero while computing {0}")]
    DivisionByZero(&'static str),

    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),
}

impl PriceError {
    /// Route construction hit a token paired against itself.
    pub fn is_identical_endpoints(&self) -> bool {
        matches!(self, PriceError::IdenticalAddresses(_))
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PriceError::Network(_) | PriceError::Status(_) | PriceError::Timeout(_) => "network",
            PriceError::MalformedResponse(_) | PriceError::InvalidDecimal(_) => "malformed",
            PriceError::UnregisteredToken(_) | PriceError::InvalidAddress(_) => "unregistered",
            PriceError::IdenticalAddresses(_) => "identical_endpoints",
            PriceError::EmptyResultSet(_) => "empty_result",
            PriceError::Contract(_) => "contract",
            PriceError::InvalidRoute(_)
            | PriceError::InsufficientReserves(_)
            | PriceError::DivisionByZero(_) => "math",
        }
    }
}

impl From<reqwest::Error> for PriceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PriceError::Status(status.as_u16()),
            None if err.is_decode() => PriceError::MalformedResponse(err.to_string()),
            None => PriceError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        PriceError::MalformedResponse(err.to_string())
    }
}

impl From<rust_decimal::Error> for PriceError {
    fn from(err: rust_decimal::Error) -> Self {
        PriceError::InvalidDecimal(err.to_string())
    }
}
