pub mod config;
pub mod constants;
pub mod errors;
pub mod metrics;     // Quote counters and timings
pub mod pools;
pub mod quote;
pub mod registry;
pub mod resolver;
pub mod routing;     // Route construction and mid prices
pub mod sources;
pub mod tokens;
pub mod utils;

pub use errors::PriceError;
pub use quote::PriceQuote;
pub use registry::{QuoteSource, SourceRegistry};
pub use resolver::{PairSource, PriceResolver};
pub use tokens::Token;
