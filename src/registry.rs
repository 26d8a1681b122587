use ethers::types::Address;
use hashbrown::HashMap;

use crate::errors::PriceError;
use crate::tokens::{parse_address, POLYGON_TOKENS};

/// Backend that is authoritative for a token's USD price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteSource {
    /// CoinGecko token price index
    CoinGecko,
    /// Route through QuickSwap pairs
    Quickswap,
    /// Route through Dfyn pairs
    Dfyn,
    /// Polycat AMM subgraph
    Polycat,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::CoinGecko => "coingecko",
            QuoteSource::Quickswap => "quickswap",
            QuoteSource::Dfyn => "dfyn",
            QuoteSource::Polycat => "polycat",
        }
    }
}

impl std::fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable address -> source table. Built once and shared read-only.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: HashMap<Address, QuoteSource>,
}

impl SourceRegistry {
    /// The Polygon table the dashboard ships with. Fails on the first row whose
    /// address does not parse.
    pub fn polygon() -> Result<Self, PriceError> {
        let entries = POLYGON_TOKENS
            .iter()
            .map(|(address, _, _, source)| (*address, *source));
        Self::with_entries(entries)
    }

    pub fn with_entries<'a, I>(entries: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = (&'a str, QuoteSource)>,
    {
        let mut sources = HashMap::new();
        for (address, source) in entries {
            sources.insert(parse_address(address)?, source);
        }
        Ok(Self { sources })
    }

    /// Looks up the source for a textual address, ignoring case.
    pub fn resolve(&self, address: &str) -> Result<QuoteSource, PriceError> {
        let parsed = parse_address(address)?;
        self.sources
            .get(&parsed)
            .copied()
            .ok_or_else(|| PriceError::UnregisteredToken(address.to_string()))
    }

    pub fn source_of(&self, address: Address) -> Result<QuoteSource, PriceError> {
        self.sources
            .get(&address)
            .copied()
            .ok_or_else(|| PriceError::UnregisteredToken(format!("{:#x}", address)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &QuoteSource)> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_resolves() {
        let registry = SourceRegistry::polygon().unwrap();
        assert_eq!(registry.len(), POLYGON_TOKENS.len());

        for (address, _, _, source) in POLYGON_TOKENS {
            assert_eq!(registry.resolve(address).unwrap(), *source);
            assert_eq!(registry.resolve(&address.to_lowercase()).unwrap(), *source);
            let upper = address.to_uppercase().replace("0X", "0x");
            assert_eq!(registry.resolve(&upper).unwrap(), *source);
        }
    }

    #[test]
    fn test_known_sources() {
        let registry = SourceRegistry::polygon().unwrap();
        assert_eq!(
            registry.resolve("0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270").unwrap(),
            QuoteSource::CoinGecko
        );
        assert_eq!(
            registry.resolve("0xdab35042e63e93cc8556c9bae482e5415b5ac4b1").unwrap(),
            QuoteSource::Quickswap
        );
        assert_eq!(
            registry.resolve("0xBC7CB585346F4F59D07121BB9ED7358076243539").unwrap(),
            QuoteSource::Dfyn
        );
        assert_eq!(
            registry.resolve("0x40ed0565ecfb14ebcdfe972624ff2364933a8ce3").unwrap(),
            QuoteSource::Polycat
        );
    }

    #[test]
    fn test_unregistered_token() {
        let registry = SourceRegistry::polygon().unwrap();
        let err = registry
            .resolve("0x0000000000000000000000000000000000000001")
            .unwrap_err();
        assert!(matches!(err, PriceError::UnregisteredToken(_)));

        let err = registry.source_of(Address::repeat_byte(0xab)).unwrap_err();
        assert!(matches!(err, PriceError::UnregisteredToken(_)));
    }

    #[test]
    fn test_custom_entries() {
        let registry = SourceRegistry::with_entries(vec![(
            "0x00000000000000000000000000000000000000aa",
            QuoteSource::Polycat,
        )])
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(SourceRegistry::with_entries(vec![("nope", QuoteSource::Dfyn)]).is_err());
    }

    #[test]
    fn test_malformed_row_fails_the_table() {
        let rows = vec![
            ("0x00000000000000000000000000000000000000aa", QuoteSource::Polycat),
            ("0x00000000000000000000000000000000000000zz", QuoteSource::Dfyn),
        ];
        let err = SourceRegistry::with_entries(rows).unwrap_err();
        assert!(matches!(err, PriceError::InvalidAddress(addr) if addr.ends_with("zz")));
    }
}
