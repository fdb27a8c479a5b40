//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Forecast aggregation (day buckets, summaries, timeline slots)
//! - Sun-arc placement and the AQI / UV classifiers
//! - The OpenWeather provider and the all-or-nothing city load
//! - Configuration, including the last searched city
//!
//! Everything except the provider is synchronous and free of I/O, so the
//! `weather-cli` renderer or any other front end can reuse it.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod format;
pub mod model;
pub mod provider;
pub mod solar;

pub use classify::IconSet;
pub use config::{Config, DisplayConfig, OpenWeatherConfig};
pub use dashboard::{
    CityReport, Dashboard, DashboardOptions, RequestTracker, build_dashboard, load_city,
    load_city_tracked,
};
pub use error::WeatherError;
pub use forecast::{DayBucket, DayBuckets, DaySummary, TimeSlot};
pub use model::ForecastSample;
pub use provider::{WeatherProvider, provider_from_config};
pub use solar::{ArcGeometry, SolarPosition};
