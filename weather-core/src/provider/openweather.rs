use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::OpenWeatherConfig,
    error::WeatherError,
    model::{AirQualityResponse, Coord, CurrentWeather, ForecastResponse},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

/// Error body OpenWeather sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Fetch(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { api_key, base_url: base_url.into().trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &OpenWeatherConfig, api_key: String) -> Result<Self, WeatherError> {
        Self::new(api_key, config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// GET `{base_url}/{endpoint}` and decode the JSON body.
    ///
    /// Non-2xx responses become `on_error(message)`, where `message` is the
    /// provider's own text when it sent one and `fallback` otherwise. Transport
    /// and decoding failures are always [`WeatherError::Fetch`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        fallback: &str,
        on_error: fn(String) -> WeatherError,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint, error = %e, "OpenWeather request failed to send");
                WeatherError::Fetch(format!("Failed to reach OpenWeather {endpoint}: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Fetch(format!("Failed to read OpenWeather {endpoint} response body: {e}"))
        })?;

        if !status.is_success() {
            debug!(endpoint, %status, body = %truncate_body(&body), "OpenWeather returned an error");
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(on_error(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::Fetch(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

fn coord_query(coord: Coord) -> Vec<(&'static str, String)> {
    vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let query = [("q", city.to_string()), ("units", "metric".to_string())];
        self.get_json("weather", &query, "City not found", WeatherError::NotFound).await
    }

    #[instrument(skip(self), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn forecast(&self, coord: Coord) -> Result<ForecastResponse, WeatherError> {
        let mut query = coord_query(coord);
        query.push(("units", "metric".to_string()));
        self.get_json("forecast", &query, "Failed to fetch forecast", WeatherError::Fetch).await
    }

    #[instrument(skip(self), fields(lat = %coord.lat, lon = %coord.lon))]
    async fn air_quality(&self, coord: Coord) -> Result<AirQualityResponse, WeatherError> {
        let query = coord_query(coord);
        self.get_json("air_pollution", &query, "Failed to fetch air quality", WeatherError::Fetch)
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
