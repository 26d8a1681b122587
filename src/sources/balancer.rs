use indoc::formatdoc;
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::{graphql_query, JsonClient};
use crate::errors::PriceError;
use crate::quote::PriceQuote;
use crate::utils::parse_decimal;

#[derive(Debug, Deserialize)]
struct PoolData {
    pool: Option<PoolLiquidity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolLiquidity {
    total_liquidity: String,
    total_shares: String,
}

/// Share price of a Balancer v2 pool: total liquidity over total shares.
pub struct BalancerSource {
    client: Arc<dyn JsonClient>,
    url: String,
}

impl BalancerSource {
    pub fn new(client: Arc<dyn JsonClient>, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Unrounded USD value of one pool share.
    pub async fn quote(&self, pool_id: &str) -> Result<Decimal, PriceError> {
        let query = formatdoc! {r#"
            {{
              pool(id: "{pool_id}") {{
                id
                totalLiquidity
                totalShares
              }}
            }}"#,
            pool_id = pool_id.to_lowercase(),
        };

        let data: PoolData = graphql_query(self.client.as_ref(), &self.url, &query).await?;
        let pool = data
            .pool
            .ok_or_else(|| PriceError::EmptyResultSet(format!("no balancer pool {}", pool_id)))?;

        let liquidity = parse_decimal(&pool.total_liquidity)?;
        let shares = parse_decimal(&pool.total_shares)?;
        if shares.is_zero() {
            return Err(PriceError::DivisionByZero("balancer share price"));
        }
        liquidity
            .checked_div(shares)
            .ok_or(PriceError::DivisionByZero("balancer share price"))
    }

    /// Share price as a string, `"0"` on any failure.
    pub async fn resolve(&self, pool_id: &str) -> String {
        let quote = PriceQuote::from(self.quote(pool_id).await);
        if let PriceQuote::Unavailable(err) = &quote {
            warn!("balancer - no price for pool {}: {}", pool_id, err);
        }
        quote.to_price_string()
    }
}
