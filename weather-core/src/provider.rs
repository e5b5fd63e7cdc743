use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{Config, FetchError, WeatherSnapshot};

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Default weatherapi.com host; the `/v1/current.json` path is appended per request.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// One request/response cycle against a weather provider.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn get(&self, query: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the weatherapi.com client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let api_key = config.resolve_api_key()?;
    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

    Ok(Arc::new(WeatherApiClient::with_base_url(api_key, base_url)))
}
