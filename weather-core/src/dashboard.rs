//! Loading a city and turning the three provider responses into panels.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    classify::{
        IconSet, UvClass, air_quality_bar_percent, air_quality_label, classify_uv,
        estimate_uv_index, icon_for,
    },
    error::WeatherError,
    forecast::{
        TimeSlot, bucket_by_day, daily_time_slots, hottest_slot_index, select_upcoming_days,
        summarize_day,
    },
    format::{format_date_label, format_time, round_temp, visibility_km},
    model::{AirQualityResponse, CurrentWeather, ForecastResponse},
    provider::WeatherProvider,
    solar::{ArcGeometry, SolarInput, SolarPosition, solar_position},
};

/// Everything fetched for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    pub weather: CurrentWeather,
    pub forecast: ForecastResponse,
    pub air_quality: AirQualityResponse,
}

/// Fetch current weather, then forecast and air quality side by side.
///
/// Any failure fails the whole load; nothing is returned partially.
pub async fn load_city(provider: &dyn WeatherProvider, city: &str) -> Result<CityReport, WeatherError> {
    info!(city, "Loading city");

    let weather = provider.current_weather(city).await?;
    let coord = weather.coord;
    debug!(lat = coord.lat, lon = coord.lon, "Resolved city coordinates");

    let (forecast, air_quality) =
        tokio::try_join!(provider.forecast(coord), provider.air_quality(coord))?;

    info!(city, samples = forecast.list.len(), "City loaded");
    Ok(CityReport { weather, forecast, air_quality })
}

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Hands out tokens so a slow, older load cannot overwrite a newer one.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load; every earlier token becomes stale.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// [`load_city`] under a fresh token. `Ok(None)` means a newer load started
/// while this one was in flight and its result must not be shown.
pub async fn load_city_tracked(
    provider: &dyn WeatherProvider,
    tracker: &RequestTracker,
    city: &str,
) -> Result<Option<CityReport>, WeatherError> {
    let token = tracker.begin();
    let report = load_city(provider, city).await;

    if !tracker.is_current(token) {
        warn!(city, "Discarding stale city load");
        return Ok(None);
    }
    report.map(Some)
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Number of upcoming days in the forecast list.
    pub window_size: usize,
    pub slots: Vec<TimeSlot>,
    pub icon_set: IconSet,
    pub arc: ArcGeometry,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            window_size: 3,
            slots: TimeSlot::defaults(),
            icon_set: IconSet::default(),
            arc: ArcGeometry::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub temperature: i64,
    pub description: String,
    pub location: String,
    pub pressure_hpa: u32,
    pub visibility_km: Option<String>,
    pub humidity_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunPanel {
    pub location: String,
    pub temperature: i64,
    pub sunrise: String,
    pub sunset: String,
    pub current_time: String,
    /// `None` when the provider's sunrise/sunset do not form a valid day.
    pub position: Option<SolarPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvPanel {
    /// Estimated from the sky condition, not measured.
    pub index: u8,
    pub class: UvClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityPanel {
    pub aqi: u8,
    pub label: &'static str,
    pub bar_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub date: String,
    pub date_label: String,
    pub condition: String,
    pub icon: &'static str,
    pub min_temp: i64,
    pub max_temp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TomorrowPanel {
    pub city: String,
    pub max_temp: i64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub label: String,
    pub temperature: i64,
    pub icon: &'static str,
    pub active: bool,
}

/// Display-ready values for every panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub current: CurrentPanel,
    pub sun: SunPanel,
    pub uv: UvPanel,
    pub air_quality: Option<AirQualityPanel>,
    pub forecast: Vec<ForecastEntry>,
    pub tomorrow: Option<TomorrowPanel>,
    pub timeline: Vec<TimelineEntry>,
}

/// Build every panel from a loaded report. `today` is "YYYY-MM-DD".
pub fn build_dashboard(report: &CityReport, options: &DashboardOptions, today: &str) -> Dashboard {
    let weather = &report.weather;
    let condition = weather.condition();
    let condition_main = condition.map(|c| c.main.as_str()).unwrap_or("Unknown");
    let location = weather.location();
    let temperature = round_temp(weather.main.temp);

    let current = CurrentPanel {
        temperature,
        description: condition.map(|c| c.description.clone()).unwrap_or_default(),
        location: location.clone(),
        pressure_hpa: weather.main.pressure,
        visibility_km: weather.visibility.map(visibility_km),
        humidity_pct: weather.main.humidity,
    };

    let solar = SolarInput { sunrise: weather.sys.sunrise, sunset: weather.sys.sunset, now: weather.dt };
    let position = match solar_position(solar, options.arc) {
        Ok(pos) => Some(pos),
        Err(e) => {
            warn!(error = %e, "No solar position available");
            None
        }
    };

    let sun = SunPanel {
        location,
        temperature,
        sunrise: format_time(weather.sys.sunrise, weather.timezone),
        sunset: format_time(weather.sys.sunset, weather.timezone),
        current_time: format_time(weather.dt, weather.timezone),
        position,
    };

    let uv_index = estimate_uv_index(condition_main);
    let uv = UvPanel { index: uv_index, class: classify_uv(uv_index) };

    let air_quality = report.air_quality.aqi().map(|aqi| AirQualityPanel {
        aqi,
        label: air_quality_label(aqi),
        bar_percent: air_quality_bar_percent(aqi),
    });

    let buckets = bucket_by_day(report.forecast.samples());

    let forecast: Vec<ForecastEntry> = select_upcoming_days(&buckets, today, options.window_size)
        .iter()
        .filter_map(|date| buckets.get(date))
        .map(|bucket| {
            let summary = summarize_day(bucket);
            let main = summary.representative.condition_main;
            ForecastEntry {
                date_label: format_date_label(&summary.date),
                icon: icon_for(&main, options.icon_set),
                date: summary.date,
                condition: main,
                min_temp: round_temp(summary.min_temp),
                max_temp: round_temp(summary.max_temp),
            }
        })
        .collect();

    let tomorrow = forecast.first().map(|entry| TomorrowPanel {
        city: report.forecast.city.name.clone(),
        max_temp: entry.max_temp,
        condition: entry.condition.clone(),
    });

    let today_samples = buckets.get(today).map(|b| b.samples()).unwrap_or_default();
    let slots = daily_time_slots(today_samples, &options.slots);
    let hottest = hottest_slot_index(&slots);
    let timeline_icons = match options.icon_set {
        IconSet::Lucide => IconSet::LucideTimeline,
        other => other,
    };

    let timeline = slots
        .into_iter()
        .enumerate()
        .filter_map(|(idx, slot)| {
            slot.map(|slot| TimelineEntry {
                temperature: round_temp(slot.sample.temperature),
                icon: icon_for(&slot.sample.condition_main, timeline_icons),
                label: slot.label,
                active: hottest == Some(idx),
            })
        })
        .collect();

    Dashboard { current, sun, uv, air_quality, forecast, tomorrow, timeline }
}
