use ethers::providers::{Http, Provider};
use futures::future::join_all;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::PriceConfig;
use crate::errors::PriceError;
use crate::metrics::{record_pair_valuation, record_pool_valuation, QuoteTimer};
use crate::pools::{AmmVariant, PairReader, UniswapV2PairReader};
use crate::quote::PriceQuote;
use crate::registry::{QuoteSource, SourceRegistry};
use crate::sources::{
    BalancerSource, CoinGeckoSource, HttpJsonClient, JsonClient, PolycatSource, RouteSource,
};
use crate::tokens::Token;
use crate::utils::{format_decimal, parse_decimal};

/// Where a liquidity pair's reserves are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairSource {
    Quickswap,
    Dfyn,
    Polycat,
}

impl PairSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairSource::Quickswap => "quickswap",
            PairSource::Dfyn => "dfyn",
            PairSource::Polycat => "polycat",
        }
    }
}

impl TryFrom<QuoteSource> for PairSource {
    type Error = PriceError;

    fn try_from(source: QuoteSource) -> Result<Self, Self::Error> {
        match source {
            QuoteSource::Quickswap => Ok(PairSource::Quickswap),
            QuoteSource::Dfyn => Ok(PairSource::Dfyn),
            QuoteSource::Polycat => Ok(PairSource::Polycat),
            QuoteSource::CoinGecko => Err(PriceError::InvalidRoute(
                "the price index has no pair reserves".to_string(),
            )),
        }
    }
}

/// Resolves token, pair and pool prices against the registered sources.
pub struct PriceResolver {
    registry: Arc<SourceRegistry>,
    coingecko: CoinGeckoSource,
    quickswap: RouteSource,
    dfyn: RouteSource,
    polycat: PolycatSource,
    balancer: BalancerSource,
}

impl PriceResolver {
    pub fn new(
        registry: Arc<SourceRegistry>,
        client: Arc<dyn JsonClient>,
        quickswap: Arc<dyn PairReader>,
        dfyn: Arc<dyn PairReader>,
        config: &PriceConfig,
    ) -> Self {
        let wrapped_native = config.wrapped_native.to_token();
        let stable = config.stable.to_token();

        Self {
            registry,
            coingecko: CoinGeckoSource::new(client.clone(), &config.coingecko_url),
            quickswap: RouteSource::new(quickswap, wrapped_native.clone(), stable.clone()),
            dfyn: RouteSource::new(dfyn, wrapped_native, stable),
            polycat: PolycatSource::new(client.clone(), &config.polycat_subgraph_url),
            balancer: BalancerSource::new(client, &config.balancer_subgraph_url),
        }
    }

    /// Live resolver: JSON-RPC for pair reserves, reqwest for the HTTP sources.
    pub fn from_config(config: &PriceConfig) -> anyhow::Result<Self> {
        let provider = Arc::new(Provider::<Http>::try_from(config.rpc_url.as_str())?);
        let client: Arc<dyn JsonClient> = Arc::new(HttpJsonClient::new(config.timeout())?);

        let reader = |variant: AmmVariant| -> Arc<dyn PairReader> {
            let amm = config.amm(variant);
            Arc::new(UniswapV2PairReader::new(
                variant,
                amm.factory,
                amm.init_code_hash,
                provider.clone(),
                config.timeout(),
            ))
        };

        Ok(Self::new(
            Arc::new(SourceRegistry::polygon()?),
            client,
            reader(AmmVariant::Quickswap),
            reader(AmmVariant::Dfyn),
            config,
        ))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// USD price of one token unit, keeping failures distinct from zero.
    pub async fn quote_price(&self, token: &Token) -> PriceQuote {
        let source = match self.registry.source_of(token.address) {
            Ok(source) => source,
            Err(err) => {
                warn!("No quote source for {} ({:#x})", token.symbol, token.address);
                return PriceQuote::Unavailable(err);
            }
        };

        let timer = QuoteTimer::start(source.as_str());
        let result = match source {
            QuoteSource::CoinGecko => self.coingecko.quote(token).await,
            QuoteSource::Quickswap => self.quickswap.quote(token).await,
            QuoteSource::Dfyn => self.dfyn.quote(token).await,
            QuoteSource::Polycat => self.polycat.quote(token).await,
        };
        let quote = PriceQuote::from(result);
        timer.finish(&quote);

        if let PriceQuote::Unavailable(err) = &quote {
            warn!("{} - error getting price for {}: {}", source, token.symbol, err);
        }
        quote
    }

    /// Dashboard price string; never fails, `"0"` when the price cannot be determined.
    pub async fn get_price(&self, token: &Token) -> String {
        self.quote_price(token).await.to_price_string()
    }

    /// Prices several tokens concurrently.
    pub async fn quote_prices(&self, tokens: &[Token]) -> Vec<PriceQuote> {
        join_all(tokens.iter().map(|token| self.quote_price(token))).await
    }

    /// USD price of one pair share: reserves valued at token prices over total shares.
    /// Unrounded. Reserve lookups fail loudly, token prices fall back to zero.
    pub async fn get_pair_price(
        &self,
        token0: &Token,
        token1: &Token,
        total_shares: &str,
        source: PairSource,
    ) -> Result<String, PriceError> {
        let result = self.pair_value(token0, token1, total_shares, source, false).await;
        record_pair_valuation(source.as_str(), outcome(&result));
        result.map(format_decimal)
    }

    /// Like [`get_pair_price`](Self::get_pair_price), but an unknown token price
    /// makes the share price unavailable instead of undervalued.
    pub async fn quote_pair_price(
        &self,
        token0: &Token,
        token1: &Token,
        total_shares: &str,
        source: PairSource,
    ) -> PriceQuote {
        let result = self.pair_value(token0, token1, total_shares, source, true).await;
        record_pair_valuation(source.as_str(), outcome(&result));
        match result {
            Ok(value) => PriceQuote::Resolved(value),
            Err(err) => PriceQuote::Unavailable(err),
        }
    }

    async fn pair_value(
        &self,
        token0: &Token,
        token1: &Token,
        total_shares: &str,
        source: PairSource,
        strict: bool,
    ) -> Result<Decimal, PriceError> {
        let (quote0, quote1) = tokio::join!(self.quote_price(token0), self.quote_price(token1));
        let (price0, price1) = if strict {
            (quote0.into_result()?, quote1.into_result()?)
        } else {
            (quote0.value_or_zero(), quote1.value_or_zero())
        };

        let (reserve0, reserve1) = match source {
            PairSource::Quickswap => {
                let pair = self.quickswap.pair(token0, token1).await?;
                (pair.reserve_of(token0)?, pair.reserve_of(token1)?)
            }
            PairSource::Dfyn => {
                let pair = self.dfyn.pair(token0, token1).await?;
                (pair.reserve_of(token0)?, pair.reserve_of(token1)?)
            }
            PairSource::Polycat => self.polycat.pair_reserves(token0, token1).await?,
        };

        let overflow = || PriceError::InvalidDecimal("pair tvl overflow".to_string());
        let tvl = reserve0
            .checked_mul(price0)
            .zip(reserve1.checked_mul(price1))
            .and_then(|(total0, total1)| total0.checked_add(total1))
            .ok_or_else(overflow)?;

        let shares = parse_decimal(total_shares)?;
        if shares.is_zero() {
            return Err(PriceError::DivisionByZero("pair share price"));
        }
        let price = tvl
            .checked_div(shares)
            .ok_or(PriceError::DivisionByZero("pair share price"))?;

        info!(
            "{} {}/{} tvl {} over {} shares",
            source.as_str(),
            token0.symbol,
            token1.symbol,
            tvl,
            shares
        );
        Ok(price)
    }

    /// Balancer pool share price, `"0"` on any failure.
    pub async fn get_balancer_pool_price(&self, pool_id: &str) -> String {
        self.quote_balancer_pool_price(pool_id).await.to_price_string()
    }

    pub async fn quote_balancer_pool_price(&self, pool_id: &str) -> PriceQuote {
        let quote = match self.balancer.quote(pool_id).await {
            Ok(value) => PriceQuote::Resolved(value),
            Err(err) => {
                warn!("balancer - no price for pool {}: {}", pool_id, err);
                PriceQuote::Unavailable(err)
            }
        };
        record_pool_valuation(quote.outcome());
        quote
    }
}

fn outcome(result: &Result<Decimal, PriceError>) -> &'static str {
    match result {
        Ok(_) => "resolved",
        Err(err) => err.kind(),
    }
}
