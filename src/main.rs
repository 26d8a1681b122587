use anyhow::Result;
use log::{info, warn};

use polyprices::{
    config::PriceConfig,
    constants::Env,
    resolver::PriceResolver,
    tokens::polygon_tokens,
    utils::setup_logger,
    PriceQuote,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    dotenv::dotenv().ok();
    setup_logger()?;

    // Load and validate configuration
    let env = Env::new();
    let config = PriceConfig::from_env(&env)?;
    config.validate_all()?;

    let resolver = PriceResolver::from_config(&config)?;
    info!(
        "Pricing {} registered tokens (timeout {:?})",
        resolver.registry().len(),
        config.timeout()
    );

    let tokens = polygon_tokens();
    let quotes = resolver.quote_prices(&tokens).await;

    let mut unavailable = 0;
    for (token, quote) in tokens.iter().zip(quotes.iter()) {
        match quote {
            PriceQuote::Resolved(_) => info!("{:>10} ${}", token.symbol, quote),
            PriceQuote::Unavailable(err) => {
                unavailable += 1;
                warn!("{:>10} unavailable: {}", token.symbol, err);
            }
        }
    }
    info!("{} of {} prices resolved", tokens.len() - unavailable, tokens.len());

    // Any arguments are Balancer pool ids
    for pool_id in std::env::args().skip(1) {
        let quote = resolver.quote_balancer_pool_price(&pool_id).await;
        info!("balancer pool {}: {}", pool_id, quote);
    }

    Ok(())
}
