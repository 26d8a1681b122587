use anyhow::{anyhow, Result};
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use validator::{Validate, ValidationError};

use crate::constants::*;
use crate::pools::AmmVariant;
use crate::tokens::Token;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PriceConfig {
    // Network configuration
    #[validate(custom = "validate_rpc_url")]
    pub rpc_url: String,
    #[validate(custom = "validate_chain_id")]
    pub chain_id: u64,

    // Off-chain endpoints
    #[validate(custom = "validate_http_url")]
    pub coingecko_url: String,
    #[validate(custom = "validate_http_url")]
    pub polycat_subgraph_url: String,
    #[validate(custom = "validate_http_url")]
    pub balancer_subgraph_url: String,

    // Upper bound for every network call
    #[validate(range(min = 1, max = 60000))]
    pub request_timeout_ms: u64,

    // Routing AMMs
    #[validate]
    pub quickswap: AmmConfig,
    #[validate]
    pub dfyn: AmmConfig,

    // Route quote currencies
    #[validate]
    pub wrapped_native: QuoteTokenConfig,
    #[validate]
    pub stable: QuoteTokenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AmmConfig {
    #[validate(custom = "validate_address")]
    pub factory: Address,
    pub init_code_hash: H256,
}

impl AmmConfig {
    pub fn for_variant(variant: AmmVariant) -> Self {
        Self {
            factory: Address::from_str(variant.default_factory()).unwrap_or_default(),
            init_code_hash: H256::from_str(variant.default_init_code_hash()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteTokenConfig {
    #[validate(custom = "validate_address")]
    pub address: Address,
    #[validate(range(max = 36))]
    pub decimals: u8,
    #[validate(length(min = 1, max = 16))]
    pub symbol: String,
}

impl QuoteTokenConfig {
    pub fn to_token(&self) -> Token {
        Token::new(self.address, self.decimals, &self.symbol)
    }
}

impl From<Token> for QuoteTokenConfig {
    fn from(token: Token) -> Self {
        Self {
            address: token.address,
            decimals: token.decimals,
            symbol: token.symbol,
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            chain_id: POLYGON_CHAIN_ID,
            coingecko_url: COINGECKO_URL.to_string(),
            polycat_subgraph_url: POLYCAT_SUBGRAPH_URL.to_string(),
            balancer_subgraph_url: BALANCER_SUBGRAPH_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            quickswap: AmmConfig::for_variant(AmmVariant::Quickswap),
            dfyn: AmmConfig::for_variant(AmmVariant::Dfyn),
            wrapped_native: Token::wmatic().into(),
            stable: Token::usdc().into(),
        }
    }
}

impl PriceConfig {
    /// Defaults overridden by whatever the environment sets.
    pub fn from_env(env: &Env) -> Result<Self> {
        let mut config = Self {
            rpc_url: env.rpc_url.clone(),
            coingecko_url: env.coingecko_url.clone(),
            polycat_subgraph_url: env.polycat_subgraph_url.clone(),
            balancer_subgraph_url: env.balancer_subgraph_url.clone(),
            ..Self::default()
        };
        if !env.request_timeout_ms.is_empty() {
            config.request_timeout_ms = env
                .request_timeout_ms
                .parse()
                .map_err(|e| anyhow!("REQUEST_TIMEOUT_MS is not a number: {}", e))?;
        }
        Ok(config)
    }

    pub fn validate_all(&self) -> Result<()> {
        if let Err(e) = self.validate() {
            return Err(anyhow!("Configuration validation failed: {:?}", e));
        }

        self.validate_quote_tokens()?;
        self.validate_amms()?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn amm(&self, variant: AmmVariant) -> &AmmConfig {
        match variant {
            AmmVariant::Quickswap => &self.quickswap,
            AmmVariant::Dfyn => &self.dfyn,
        }
    }

    fn validate_quote_tokens(&self) -> Result<()> {
        if self.wrapped_native.address == self.stable.address {
            return Err(anyhow!("Wrapped native and stable quote tokens must differ"));
        }
        Ok(())
    }

    fn validate_amms(&self) -> Result<()> {
        for variant in [AmmVariant::Quickswap, AmmVariant::Dfyn] {
            if self.amm(variant).init_code_hash.is_zero() {
                return Err(anyhow!("{} init code hash is not set", variant.as_str()));
            }
        }
        Ok(())
    }
}

// Custom validators
fn validate_rpc_url(url: &str) -> Result<(), ValidationError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::new("invalid_rpc_url"));
    }
    validate_http_url(url)
}

fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new("invalid_url")),
    }
}

fn validate_chain_id(chain_id: u64) -> Result<(), ValidationError> {
    match chain_id {
        137 => Ok(()),   // Polygon
        80001 => Ok(()), // Mumbai
        _ => Err(ValidationError::new("unsupported_chain")),
    }
}

fn validate_address(address: &Address) -> Result<(), ValidationError> {
    if address == &Address::zero() {
        return Err(ValidationError::new("zero_address"));
    }
    Ok(())
}
