pub static PROJECT_NAME: &str = "polyprices";

pub const POLYGON_CHAIN_ID: u64 = 137;

// Quote currencies used for AMM routing on Polygon
pub const WMATIC_ADDRESS: &str = "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270";
pub const WMATIC_DECIMALS: u8 = 18;
pub const USDC_ADDRESS: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";
pub const USDC_DECIMALS: u8 = 6;

// QuickSwap (UniswapV2 fork)
pub const QUICKSWAP_FACTORY: &str = "0x5757371414417b8C6CAad45bAeF941aBc7d3Ab32";
pub const QUICKSWAP_INIT_CODE_HASH: &str =
    "0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f";

// Dfyn (UniswapV2 fork)
pub const DFYN_FACTORY: &str = "0xE7Fb3e833eFE5F9c441105EB65Ef8b261266423B";
pub const DFYN_INIT_CODE_HASH: &str =
    "0xf187ed688403aa4f7acfada758d8d53698753b998a3071b06f1b777f4330eaf3";

pub const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3/simple/token_price/polygon-pos";
pub const POLYCAT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/polycatfi/polycat-finance-amm";
pub const BALANCER_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-polygon-v2";

/// Significant digits kept on single-token prices.
pub const SIGNIFICANT_DIGITS: u32 = 6;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub fn get_env(key: &str) -> String {
    std::env::var(key).unwrap_or(String::from(""))
}

fn get_env_or(key: &str, default: &str) -> String {
    match get_env(key) {
        value if value.is_empty() => default.to_string(),
        value => value,
    }
}

#[derive(Debug, Clone)]
pub struct Env {
    pub rpc_url: String,
    pub coingecko_url: String,
    pub polycat_subgraph_url: String,
    pub balancer_subgraph_url: String,
    pub request_timeout_ms: String,
}

impl Env {
    pub fn new() -> Self {
        Env {
            rpc_url: get_env("POLYGON_RPC_URL"),
            coingecko_url: get_env_or("COINGECKO_URL", COINGECKO_URL),
            polycat_subgraph_url: get_env_or("POLYCAT_SUBGRAPH_URL", POLYCAT_SUBGRAPH_URL),
            balancer_subgraph_url: get_env_or("BALANCER_SUBGRAPH_URL", BALANCER_SUBGRAPH_URL),
            request_timeout_ms: get_env("REQUEST_TIMEOUT_MS"),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
