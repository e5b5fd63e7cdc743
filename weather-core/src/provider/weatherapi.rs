use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    FetchError,
    config::redact_key,
    model::{CurrentConditions, Location, WeatherSnapshot},
};

use super::{DEFAULT_BASE_URL, WeatherClient};

/// Client for the weatherapi.com `current.json` endpoint.
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("api_key", &redact_key(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get(&self, query: &str) -> Result<WeatherSnapshot, FetchError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;
        debug!(%status, bytes = body.len(), "weatherapi responded");

        if !status.is_success() {
            return Err(FetchError::ProviderRejected {
                status,
                message: rejection_message(&body),
            });
        }

        let parsed: WaResponse =
            serde_json::from_str(&body).map_err(FetchError::MalformedResponse)?;

        Ok(parsed.into())
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    uv: f64,
    precip_mm: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

/// `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    code: Option<i64>,
    message: String,
}

impl From<WaResponse> for WeatherSnapshot {
    fn from(r: WaResponse) -> Self {
        WeatherSnapshot {
            location: Location {
                name: r.location.name,
                country: r.location.country,
                local_time: r.location.localtime,
            },
            current: CurrentConditions {
                temperature_celsius: r.current.temp_c,
                humidity_percent: r.current.humidity,
                wind_kph: r.current.wind_kph,
                uv_index: r.current.uv,
                precipitation_mm: r.current.precip_mm,
                condition_text: r.current.condition.text,
                condition_icon_url: r.current.condition.icon,
            },
        }
    }
}

// The request url carries the API key.
fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.without_url())
}

fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<WaErrorEnvelope>(body) {
        Ok(WaErrorEnvelope { error: WaErrorBody { code: Some(code), message } }) => {
            format!("{message} (code {code})")
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{"location":{"name":"London","country":"UK","localtime":"2024-01-01 10:00"},"current":{"temp_c":5.0,"humidity":80,"wind_kph":10.0,"uv":1.0,"precip_mm":0.0,"condition":{"text":"Cloudy","icon":"//cdn/64x64/cloudy.png"}}}"#;

    #[test]
    fn response_maps_field_by_field() {
        let parsed: WaResponse = serde_json::from_str(LONDON).expect("fixture must parse");
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.location.country, "UK");
        assert_eq!(snapshot.location.local_time, "2024-01-01 10:00");
        assert_eq!(snapshot.current.temperature_celsius, 5.0);
        assert_eq!(snapshot.current.humidity_percent, 80);
        assert_eq!(snapshot.current.wind_kph, 10.0);
        assert_eq!(snapshot.current.uv_index, 1.0);
        assert_eq!(snapshot.current.precipitation_mm, 0.0);
        assert_eq!(snapshot.current.condition_text, "Cloudy");
        assert_eq!(snapshot.current.condition_icon_url, "//cdn/64x64/cloudy.png");
    }

    #[test]
    fn missing_field_fails_to_parse() {
        let body = r#"{"location":{"name":"London","country":"UK","localtime":"2024-01-01 10:00"},"current":{"temp_c":5.0}}"#;
        assert!(serde_json::from_str::<WaResponse>(body).is_err());
    }

    #[test]
    fn rejection_message_prefers_provider_error() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert_eq!(rejection_message(body), "No matching location found. (code 1006)");
    }

    #[test]
    fn rejection_message_falls_back_to_truncated_body() {
        let body = "x".repeat(500);
        let msg = rejection_message(&body);
        assert_eq!(msg.len(), 203);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(250);
        let msg = truncate_body(&body);
        assert_eq!(msg.chars().count(), 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = WeatherApiClient::with_base_url("k".into(), "http://localhost:8080/");
        assert_eq!(client.current_url(), "http://localhost:8080/v1/current.json");
    }
}
