use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::SIGNIFICANT_DIGITS;
use crate::errors::PriceError;
use crate::pools::{AmmVariant, Pair, PairReader};
use crate::quote::PriceQuote;
use crate::routing::{invert, Route};
use crate::tokens::Token;
use crate::utils::to_significant;

/// Prices a token by routing it to the stable quote token through the wrapped native token.
pub struct RouteSource {
    reader: Arc<dyn PairReader>,
    wrapped_native: Token,
    stable: Token,
}

impl RouteSource {
    pub fn new(reader: Arc<dyn PairReader>, wrapped_native: Token, stable: Token) -> Self {
        Self {
            reader,
            wrapped_native,
            stable,
        }
    }

    pub fn variant(&self) -> AmmVariant {
        self.reader.variant()
    }

    /// stable -> token, via wrapped native unless the token is the wrapped native itself.
    pub async fn route_for(&self, token: &Token) -> Result<Route, PriceError> {
        let pairs = if token.address == self.wrapped_native.address {
            vec![self.reader.fetch_pair(token, &self.stable).await?]
        } else {
            let native_to_stable = self
                .reader
                .fetch_pair(&self.wrapped_native, &self.stable)
                .await?;
            let token_to_native = self.reader.fetch_pair(token, &self.wrapped_native).await?;
            vec![native_to_stable, token_to_native]
        };
        Route::new(pairs, self.stable.clone())
    }

    pub async fn quote(&self, token: &Token) -> Result<Decimal, PriceError> {
        let route = self.route_for(token).await?;
        // The route quotes token per stable, the dashboard wants stable per token
        let price = invert(route.mid_price()?)?;
        Ok(to_significant(price, SIGNIFICANT_DIGITS))
    }

    /// Price as a string: `"1"` for a token routed against itself, `"0"` on any other failure.
    pub async fn resolve(&self, token: &Token) -> String {
        let quote = PriceQuote::from(self.quote(token).await);
        match &quote {
            PriceQuote::Resolved(value) if *value == Decimal::ONE => {
                debug!("{} - {} priced at parity", self.variant().as_str(), token.symbol);
            }
            PriceQuote::Unavailable(err) => {
                warn!(
                    "{} - error getting price for {}: {}",
                    self.variant().as_str(),
                    token.symbol,
                    err
                );
            }
            _ => {}
        }
        quote.to_price_string()
    }

    /// The pair of exactly these two tokens, for reserve-based valuations.
    pub async fn pair(&self, token0: &Token, token1: &Token) -> Result<Pair, PriceError> {
        self.reader.fetch_pair(token0, token1).await
    }
}
