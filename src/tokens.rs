use ethers::types::Address;
use log::error;
use std::str::FromStr;

use crate::constants::{USDC_ADDRESS, USDC_DECIMALS, WMATIC_ADDRESS, WMATIC_DECIMALS};
use crate::errors::PriceError;
use crate::registry::QuoteSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn new(address: Address, decimals: u8, symbol: &str) -> Self {
        Self {
            address,
            decimals,
            symbol: symbol.to_string(),
        }
    }

    /// Builds a token from caller-supplied metadata, accepting any address casing.
    pub fn parse(address: &str, decimals: u8, symbol: &str) -> Result<Self, PriceError> {
        Ok(Self::new(parse_address(address)?, decimals, symbol))
    }

    /// Lower-cased `0x` address, as subgraphs and the price index key tokens.
    pub fn address_key(&self) -> String {
        format!("{:#x}", self.address)
    }

    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }

    pub fn wmatic() -> Self {
        Self::new(known_address(WMATIC_ADDRESS), WMATIC_DECIMALS, "WMATIC")
    }

    pub fn usdc() -> Self {
        Self::new(known_address(USDC_ADDRESS), USDC_DECIMALS, "USDC")
    }
}

pub fn parse_address(address: &str) -> Result<Address, PriceError> {
    Address::from_str(address.trim()).map_err(|_| PriceError::InvalidAddress(address.to_string()))
}

// Only for the constants in `constants.rs`; a typo there yields the zero address
// and an error log, and `test_quote_token_constants_parse` fails
fn known_address(address: &str) -> Address {
    Address::from_str(address).unwrap_or_else(|_| {
        error!("Malformed address constant {}", address);
        Address::zero()
    })
}

/// Tokens the dashboard prices on Polygon: (address, symbol, decimals, source).
pub const POLYGON_TOKENS: &[(&str, &str, u8, QuoteSource)] = &[
    ("0xdaB35042e63E93Cc8556c9bAE482E5415B5Ac4B1", "IRIS", 18, QuoteSource::Quickswap),
    ("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619", "WETH", 18, QuoteSource::CoinGecko),
    ("0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6", "WBTC", 8, QuoteSource::CoinGecko),
    ("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270", "WMATIC", 18, QuoteSource::CoinGecko),
    ("0x831753DD7087CaC61aB5644b308642cc1c33Dc13", "QUICK", 18, QuoteSource::CoinGecko),
    ("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", "USDC", 6, QuoteSource::CoinGecko),
    ("0xc2132D05D31c914a87C6611C10748AEb04B58e8F", "USDT", 6, QuoteSource::CoinGecko),
    ("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063", "DAI", 18, QuoteSource::CoinGecko),
    ("0x5aC3ceEe2C3E6790cADD6707Deb2E87EA83b0631", "AES", 18, QuoteSource::Quickswap),
    ("0xbc7cB585346f4F59d07121Bb9Ed7358076243539", "SILVER", 18, QuoteSource::Dfyn),
    ("0x3a3Df212b7AA91Aa0402B9035b098891d276572B", "FISH", 18, QuoteSource::Quickswap),
    ("0xC4Df0E37e4ad3e5C6D1dF12d3Ca7Feb9d2B67104", "KAVIAN", 18, QuoteSource::Quickswap),
    ("0x9a33bac266b02faff8fa566c8cb5da08820e28ba", "KAVIANL2", 18, QuoteSource::Quickswap),
    ("0xf9b4dEFdDe04fe18F5ee6456607F8A2eC9fF6A75", "SAND", 18, QuoteSource::Quickswap),
    ("0x8c9aAcA6e712e2193acCCbAC1a024e09Fb226E51", "GBNT", 18, QuoteSource::Polycat),
    ("0x13748d548D95D78a3c83fe3F32604B4796CFfa23", "KOGE", 9, QuoteSource::CoinGecko),
    ("0xc168e40227e4ebd8c1cae80f7a55a4f0e6d66c97", "DFYN", 18, QuoteSource::Dfyn),
    ("0x16eccfdbb4ee1a85a33f3a9b21175cd7ae753db4", "ROUTE", 18, QuoteSource::Dfyn),
    ("0x255707b70bf90aa112006e1b07b9aea6de021424", "TETU", 18, QuoteSource::Quickswap),
    ("0x40ed0565ecfb14ebcdfe972624ff2364933a8ce3", "GPUL", 18, QuoteSource::Polycat),
    ("0x4c19ddeebaf84ca3a255730295ad9d824d4ff51f", "WISE", 18, QuoteSource::Polycat),
    ("0x8a953cfe442c5e8855cc6c61b1293fa648bae472", "POLYDOGE", 18, QuoteSource::Quickswap),
];

/// Every entry of [`POLYGON_TOKENS`] as a `Token`. Rows that do not parse are
/// logged as errors and left out.
pub fn polygon_tokens() -> Vec<Token> {
    POLYGON_TOKENS
        .iter()
        .filter_map(|(address, symbol, decimals, _)| {
            Token::parse(address, *decimals, symbol)
                .map_err(|e| error!("Dropping token table row {}: {}", symbol, e))
                .ok()
        })
        .collect()
}
