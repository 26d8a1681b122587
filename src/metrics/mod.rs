use metrics::{counter, histogram};
use std::time::Instant;

use crate::quote::PriceQuote;

const METRIC_PRICE_QUOTES: &str = "price_quotes_total";
const METRIC_QUOTE_DURATION: &str = "price_quote_duration_seconds";
const METRIC_PAIR_VALUATIONS: &str = "pair_valuations_total";
const METRIC_POOL_VALUATIONS: &str = "pool_valuations_total";

/// Times one lookup against a named source and records its outcome when finished.
pub struct QuoteTimer {
    source: &'static str,
    start: Instant,
}

impl QuoteTimer {
    pub fn start(source: &'static str) -> Self {
        Self {
            source,
            start: Instant::now(),
        }
    }

    pub fn finish(self, quote: &PriceQuote) {
        histogram!(
            METRIC_QUOTE_DURATION,
            self.start.elapsed().as_secs_f64(),
            "source" => self.source
        );
        counter!(
            METRIC_PRICE_QUOTES,
            1,
            "source" => self.source,
            "outcome" => quote.outcome()
        );
    }
}

pub fn record_pair_valuation(source: &'static str, outcome: &'static str) {
    counter!(METRIC_PAIR_VALUATIONS, 1, "source" => source, "outcome" => outcome);
}

pub fn record_pool_valuation(outcome: &'static str) {
    counter!(METRIC_POOL_VALUATIONS, 1, "outcome" => outcome);
}
