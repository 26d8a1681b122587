use indoc::formatdoc;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::{graphql_query, JsonClient};
use crate::constants::SIGNIFICANT_DIGITS;
use crate::errors::PriceError;
use crate::quote::PriceQuote;
use crate::tokens::Token;
use crate::utils::{parse_decimal, to_significant};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenDayDatas {
    token_day_datas: Vec<TokenDayData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenDayData {
    #[serde(rename = "priceUSD")]
    price_usd: String,
}

#[derive(Debug, Deserialize)]
struct Pairs {
    pairs: Vec<PairReserves>,
}

#[derive(Debug, Deserialize)]
struct PairReserves {
    id: String,
    reserve0: String,
    reserve1: String,
}

/// Polycat AMM subgraph: daily token prices and pair reserves.
pub struct PolycatSource {
    client: Arc<dyn JsonClient>,
    url: String,
}

impl PolycatSource {
    pub fn new(client: Arc<dyn JsonClient>, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Most recent daily `priceUSD` of the token.
    pub async fn quote(&self, token: &Token) -> Result<Decimal, PriceError> {
        let query = formatdoc! {r#"
            {{
              tokenDayDatas(
                first: 1,
                orderBy: date,
                orderDirection: desc,
                where: {{ token: "{token}" }}
              ) {{
                id
                date
                priceUSD
              }}
            }}"#,
            token = token.address_key(),
        };

        let data: TokenDayDatas = graphql_query(self.client.as_ref(), &self.url, &query).await?;
        let latest = data
            .token_day_datas
            .first()
            .ok_or_else(|| {
                PriceError::EmptyResultSet(format!("no day data for {}", token.symbol))
            })?;

        let price = parse_decimal(&latest.price_usd)?;
        Ok(to_significant(price, SIGNIFICANT_DIGITS))
    }

    pub async fn resolve(&self, token: &Token) -> String {
        let quote = PriceQuote::from(self.quote(token).await);
        if let PriceQuote::Unavailable(err) = &quote {
            warn!("polycat - no price for {}: {}", token.symbol, err);
        }
        quote.to_price_string()
    }

    /// Human-unit reserves of the pair whose `token0`/`token1` match in this order.
    pub async fn pair_reserves(
        &self,
        token0: &Token,
        token1: &Token,
    ) -> Result<(Decimal, Decimal), PriceError> {
        let query = formatdoc! {r#"
            {{
              pairs(where: {{ token0: "{token0}", token1: "{token1}" }}) {{
                id
                reserve0
                reserve1
              }}
            }}"#,
            token0 = token0.address_key(),
            token1 = token1.address_key(),
        };

        let data: Pairs = graphql_query(self.client.as_ref(), &self.url, &query).await?;
        let pair = data.pairs.first().ok_or_else(|| {
            PriceError::EmptyResultSet(format!("no {}/{} pair", token0.symbol, token1.symbol))
        })?;

        debug!("polycat pair {} reserves {} / {}", pair.id, pair.reserve0, pair.reserve1);
        Ok((parse_decimal(&pair.reserve0)?, parse_decimal(&pair.reserve1)?))
    }
}
