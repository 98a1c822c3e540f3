use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::DataConfig;
use crate::data::market::MarketSnapshot;
use crate::error::FetchError;

/// Where the dispatcher gets its snapshot from
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// One read of the market data. Failures are logged here and come back as `None`.
    async fn fetch_market_data(&self) -> Option<MarketSnapshot>;
}

#[derive(Clone)]
pub struct MarketDataClient {
    client: Client,
    url: String,
}

impl MarketDataClient {
    pub fn new(config: &DataConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single GET, no retry. Non-2xx statuses are errors.
    pub async fn try_fetch(&self) -> Result<MarketSnapshot, FetchError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(MarketSnapshot::new(body, Utc::now()))
    }
}

#[async_trait]
impl MarketDataSource for MarketDataClient {
    async fn fetch_market_data(&self) -> Option<MarketSnapshot> {
        match self.try_fetch().await {
            Ok(snapshot) => {
                if !snapshot.is_array() {
                    warn!("⚠️ [DATA] Endpoint returned a non-array body; passing it through");
                } else if snapshot.is_empty() {
                    warn!("⚠️ [DATA] Endpoint returned an empty array");
                }
                info!(
                    "📈 [DATA] Market data fetched ({} records) at {}",
                    snapshot.len(),
                    snapshot.fetched_at().to_rfc3339()
                );
                Some(snapshot)
            }
            Err(e) => {
                error!("❌ [DATA] Failed to fetch market data from {}: {}", self.url, e);
                None
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
