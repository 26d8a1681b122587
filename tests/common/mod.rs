#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, U256};
use polyprices::{
    config::PriceConfig,
    pools::{AmmVariant, Pair, PairReader},
    sources::JsonClient,
    PriceError, PriceResolver, SourceRegistry, Token,
};
use serde_json::{json, Map, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Once,
    },
};

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Clone)]
pub enum FakeResponse {
    Json(Value),
    Status(u16),
    Garbage(&'static str),
}

/// Answers with the first response whose needle occurs in the URL or the request body.
#[derive(Default)]
pub struct FakeJsonClient {
    responses: Vec<(String, FakeResponse)>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeJsonClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, needle: &str, response: FakeResponse) -> Self {
        self.responses.push((needle.to_lowercase(), response));
        self
    }

    fn answer(&self, haystack: String) -> Result<Value, PriceError> {
        let haystack = haystack.to_lowercase();
        self.requests.lock().unwrap().push(haystack.clone());
        match self
            .responses
            .iter()
            .find(|(needle, _)| haystack.contains(needle.as_str()))
        {
            Some((_, FakeResponse::Json(value))) => Ok(value.clone()),
            Some((_, FakeResponse::Status(code))) => Err(PriceError::Status(*code)),
            Some((_, FakeResponse::Garbage(raw))) => Ok(serde_json::from_str(raw)?),
            None => Err(PriceError::Status(404)),
        }
    }
}

#[async_trait]
impl JsonClient for FakeJsonClient {
    async fn get_json(&self, url: &str) -> Result<Value, PriceError> {
        self.answer(url.to_string())
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, PriceError> {
        self.answer(format!("{} {}", url, body))
    }
}

/// In-memory pairs; `aliases` map an address onto the token it wraps.
pub struct FakePairReader {
    variant: AmmVariant,
    pairs: Vec<Pair>,
    aliases: HashMap<Address, Address>,
    pub calls: AtomicUsize,
}

impl FakePairReader {
    pub fn new(variant: AmmVariant) -> Self {
        Self {
            variant,
            pairs: Vec::new(),
            aliases: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Adds a pair holding `amount_a` and `amount_b` whole tokens.
    pub fn with_pair(mut self, a: &Token, b: &Token, amount_a: u64, amount_b: u64) -> Self {
        let pair = Pair::new(
            Address::from_low_u64_be(self.pairs.len() as u64 + 1),
            a.clone(),
            b.clone(),
            whole(amount_a, a.decimals),
            whole(amount_b, b.decimals),
        )
        .expect("distinct tokens");
        self.pairs.push(pair);
        self
    }

    pub fn with_alias(mut self, alias: &Token, target: &Token) -> Self {
        self.aliases.insert(alias.address, target.address);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canonical(&self, address: Address) -> Address {
        *self.aliases.get(&address).unwrap_or(&address)
    }
}

#[async_trait]
impl PairReader for FakePairReader {
    fn variant(&self) -> AmmVariant {
        self.variant
    }

    async fn fetch_pair(&self, token_a: &Token, token_b: &Token) -> Result<Pair, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let a = self.canonical(token_a.address);
        let b = self.canonical(token_b.address);
        if a == b {
            return Err(PriceError::IdenticalAddresses(a));
        }
        self.pairs
            .iter()
            .find(|pair| pair.involves(token_a) && pair.involves(token_b))
            .cloned()
            .ok_or_else(|| {
                let pair = format!("{}/{}", token_a.symbol, token_b.symbol);
                PriceError::Contract(format!("no pair for {}", pair))
            })
    }
}

pub fn whole(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::exp10(decimals as usize)
}

pub fn test_config() -> PriceConfig {
    PriceConfig {
        rpc_url: "http://localhost:8545".to_string(),
        coingecko_url: "https://index.test/simple/token_price/polygon-pos".to_string(),
        polycat_subgraph_url: "https://subgraph.test/polycat".to_string(),
        balancer_subgraph_url: "https://subgraph.test/balancer".to_string(),
        ..PriceConfig::default()
    }
}

pub fn resolver(
    registry: SourceRegistry,
    client: Arc<FakeJsonClient>,
    quickswap: Arc<FakePairReader>,
    dfyn: Arc<FakePairReader>,
) -> PriceResolver {
    PriceResolver::new(
        Arc::new(registry),
        client,
        quickswap,
        dfyn,
        &test_config(),
    )
}

pub fn token(address: &str, decimals: u8, symbol: &str) -> Token {
    Token::parse(address, decimals, symbol).expect("valid address")
}

pub fn iris() -> Token {
    token("0xdaB35042e63E93Cc8556c9bAE482E5415B5Ac4B1", 18, "IRIS")
}

pub fn silver() -> Token {
    token("0xbc7cB585346f4F59d07121Bb9Ed7358076243539", 18, "SILVER")
}

pub fn gbnt() -> Token {
    token("0x8c9aAcA6e712e2193acCCbAC1a024e09Fb226E51", 18, "GBNT")
}

pub fn weth() -> Token {
    token("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619", 18, "WETH")
}

/// Needle matching the index request for `token`.
pub fn index_request(token: &Token) -> String {
    format!("contract_addresses={}", token.address_key())
}

/// Index body `{"<address>": {"usd": price}}`.
pub fn index_response(token: &Token, price: Value) -> FakeResponse {
    let mut body = Map::new();
    body.insert(token.address_key(), json!({ "usd": price }));
    FakeResponse::Json(Value::Object(body))
}
