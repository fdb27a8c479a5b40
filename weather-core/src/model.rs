//! Provider response shapes and the forecast sample they are flattened into.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub pressure: u32,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub country: String,
    /// Missing values read as 0, which the sun arc treats as no daylight interval.
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// `GET /weather?q=<city>` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub coord: Coord,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub sys: SysInfo,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i64,
    /// Metres; absent for some stations.
    #[serde(default)]
    pub visibility: Option<u32>,
    pub dt: i64,
}

impl CurrentWeather {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// "City, CC", or just the city when the provider omits the country.
    pub fn location(&self) -> String {
        if self.sys.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.sys.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
}

/// `GET /forecast?lat=&lon=` response (5 days, 3-hour steps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

impl ForecastResponse {
    /// Flatten the provider list into samples, keeping provider order.
    pub fn samples(&self) -> Vec<ForecastSample> {
        self.list.iter().map(ForecastSample::from).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityMain {
    pub aqi: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityRecord {
    pub main: AirQualityMain,
}

/// `GET /air_pollution?lat=&lon=` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default)]
    pub list: Vec<AirQualityRecord>,
}

impl AirQualityResponse {
    pub fn aqi(&self) -> Option<u8> {
        self.list.first().map(|r| r.main.aqi)
    }
}

/// One 3-hour forecast data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// "YYYY-MM-DD HH:MM:SS" as sent by the provider.
    pub timestamp: String,
    pub temperature: f64,
    pub condition_main: String,
    pub condition_icon: String,
    pub description: String,
}

impl ForecastSample {
    pub fn new(
        timestamp: impl Into<String>,
        temperature: f64,
        condition_main: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            condition_main: condition_main.into(),
            condition_icon: String::new(),
            description: String::new(),
        }
    }

    /// Calendar date portion of the timestamp.
    pub fn date(&self) -> &str {
        self.timestamp.split(' ').next().unwrap_or_default()
    }

    /// Time-of-day portion of the timestamp, empty if there is none.
    pub fn time_of_day(&self) -> &str {
        self.timestamp.split_once(' ').map(|(_, t)| t).unwrap_or_default()
    }
}

impl From<&ForecastEntry> for ForecastSample {
    fn from(entry: &ForecastEntry) -> Self {
        let (main, icon, description) = entry
            .weather
            .first()
            .map(|w| (w.main.clone(), w.icon.clone(), w.description.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new(), String::new()));

        Self {
            timestamp: entry.dt_txt.clone(),
            temperature: entry.main.temp,
            condition_main: main,
            condition_icon: icon,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_splits_date_and_time() {
        let s = ForecastSample::new("2024-06-02 12:00:00", 20.0, "Clear");
        assert_eq!(s.date(), "2024-06-02");
        assert_eq!(s.time_of_day(), "12:00:00");
    }

    #[test]
    fn sample_without_time_has_empty_time_of_day() {
        let s = ForecastSample::new("2024-06-02", 20.0, "Clear");
        assert_eq!(s.date(), "2024-06-02");
        assert_eq!(s.time_of_day(), "");
    }

    #[test]
    fn current_weather_parses_provider_json() {
        let json = serde_json::json!({
            "coord": { "lon": 77.2167, "lat": 28.6667 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": { "temp": 31.05, "feels_like": 30.1, "pressure": 1008, "humidity": 35 },
            "visibility": 6000,
            "dt": 1717300000,
            "sys": { "country": "IN", "sunrise": 1717286000, "sunset": 1717336000 },
            "timezone": 19800,
            "name": "Delhi"
        });

        let cw: CurrentWeather = serde_json::from_value(json).expect("valid payload");
        assert_eq!(cw.location(), "Delhi, IN");
        assert_eq!(cw.main.pressure, 1008);
        assert_eq!(cw.visibility, Some(6000));
        assert_eq!(cw.condition().map(|c| c.main.as_str()), Some("Clear"));
    }

    #[test]
    fn current_weather_without_sun_times_still_parses() {
        let json = serde_json::json!({
            "coord": { "lon": 10.75, "lat": 59.91 },
            "weather": [{ "main": "Clouds", "description": "overcast clouds" }],
            "main": { "temp": 12.0 },
            "dt": 1717300000,
            "sys": { "country": "NO" },
            "name": "Oslo"
        });

        let cw: CurrentWeather = serde_json::from_value(json).expect("valid payload");
        assert_eq!((cw.sys.sunrise, cw.sys.sunset), (0, 0));
        assert_eq!(cw.location(), "Oslo, NO");
    }

    #[test]
    fn forecast_entry_without_weather_becomes_unknown_sample() {
        let entry = ForecastEntry {
            dt_txt: "2024-06-02 09:00:00".into(),
            main: ForecastMain { temp: 18.5 },
            weather: vec![],
        };

        let sample = ForecastSample::from(&entry);
        assert_eq!(sample.condition_main, "Unknown");
        assert_eq!(sample.temperature, 18.5);
    }

    #[test]
    fn air_quality_reads_first_record() {
        let aq: AirQualityResponse =
            serde_json::from_str(r#"{"list":[{"main":{"aqi":3}}]}"#).expect("valid payload");
        assert_eq!(aq.aqi(), Some(3));

        let empty: AirQualityResponse = serde_json::from_str(r#"{"list":[]}"#).expect("valid payload");
        assert_eq!(empty.aqi(), None);
    }
}
