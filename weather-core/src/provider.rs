use crate::{
    Config,
    error::WeatherError,
    model::{AirQualityResponse, Coord, CurrentWeather, ForecastResponse},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three read-only endpoints a city load needs.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions by city name. Fails with [`WeatherError::NotFound`]
    /// when the provider does not know the city.
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    async fn forecast(&self, coord: Coord) -> Result<ForecastResponse, WeatherError>;

    async fn air_quality(&self, coord: Coord) -> Result<AirQualityResponse, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::from_config(&config.openweather, api_key)?;
    Ok(Box::new(provider))
}
