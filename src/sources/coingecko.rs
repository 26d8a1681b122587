use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

use super::JsonClient;
use crate::constants::SIGNIFICANT_DIGITS;
use crate::errors::PriceError;
use crate::quote::PriceQuote;
use crate::tokens::Token;
use crate::utils::{parse_decimal, to_significant};

/// USD prices from the CoinGecko token price index, keyed by contract address.
pub struct CoinGeckoSource {
    client: Arc<dyn JsonClient>,
    base_url: String,
}

impl CoinGeckoSource {
    pub fn new(client: Arc<dyn JsonClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, token: &Token) -> String {
        format!(
            "{}?contract_addresses={}&vs_currencies=usd",
            self.base_url,
            token.address_key()
        )
    }

    pub async fn quote(&self, token: &Token) -> Result<Decimal, PriceError> {
        let body = self.client.get_json(&self.url_for(token)).await?;
        let price = read_usd_price(&body, &token.address_key())?;
        Ok(to_significant(price, SIGNIFICANT_DIGITS))
    }

    /// Price as a string, `"0"` on any failure.
    pub async fn resolve(&self, token: &Token) -> String {
        let quote = PriceQuote::from(self.quote(token).await);
        if let PriceQuote::Unavailable(err) = &quote {
            warn!("coingecko - no price for {}: {}", token.symbol, err);
        }
        quote.to_price_string()
    }
}

fn read_usd_price(body: &Value, key: &str) -> Result<Decimal, PriceError> {
    let entry = body
        .get(key)
        .ok_or_else(|| PriceError::EmptyResultSet(format!("no index entry for {}", key)))?;

    let price = match entry.get("usd") {
        Some(Value::Number(n)) => parse_decimal(&n.to_string())?,
        Some(Value::String(s)) => parse_decimal(s)?,
        Some(other) => {
            return Err(PriceError::MalformedResponse(format!("usd is {}", other)));
        }
        None => return Err(PriceError::MalformedResponse(format!("no usd field for {}", key))),
    };

    if price.is_sign_negative() {
        return Err(PriceError::MalformedResponse(format!("negative price {}", price)));
    }
    if price.is_zero() {
        return Err(PriceError::EmptyResultSet(format!("zero price for {}", key)));
    }
    Ok(price)
}
