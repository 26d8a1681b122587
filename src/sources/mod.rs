pub mod amm;
pub mod balancer;
pub mod coingecko;
pub mod polycat;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::PriceError;

pub use amm::RouteSource;
pub use balancer::BalancerSource;
pub use coingecko::CoinGeckoSource;
pub use polycat::PolycatSource;

/// Minimal JSON transport the HTTP-backed sources share.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonClient: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, PriceError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, PriceError>;
}

/// reqwest-backed client; every request is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpJsonClient {
    client: Client,
    timeout: Duration,
}

impl HttpJsonClient {
    pub fn new(timeout: Duration) -> Result<Self, PriceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    async fn read_json(&self, request: RequestBuilder) -> Result<Value, PriceError> {
        let resp = request.send().await.map_err(|e| self.request_error(e))?;
        if !resp.status().is_success() {
            return Err(PriceError::Status(resp.status().as_u16()));
        }
        let text = resp.text().await.map_err(|e| self.request_error(e))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn request_error(&self, err: reqwest::Error) -> PriceError {
        if err.is_timeout() {
            PriceError::Timeout(self.timeout.as_millis() as u64)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl JsonClient for HttpJsonClient {
    async fn get_json(&self, url: &str) -> Result<Value, PriceError> {
        debug!("GET {}", url);
        self.read_json(self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, PriceError> {
        debug!("POST {}", url);
        self.read_json(self.client.post(url).json(body)).await
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Posts `{ "query": ... }` and decodes the `data` object into `T`.
pub async fn graphql_query<T: DeserializeOwned>(
    client: &dyn JsonClient,
    url: &str,
    query: &str,
) -> Result<T, PriceError> {
    let body = json!({ "query": query });
    let value = client.post_json(url, &body).await?;
    let resp: GraphQlResponse<T> = serde_json::from_value(value)?;

    if let Some(err) = resp.errors.first() {
        return Err(PriceError::MalformedResponse(err.message.clone()));
    }
    resp.data
        .ok_or_else(|| PriceError::MalformedResponse("response has no data".to_string()))
}
