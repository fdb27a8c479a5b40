//! Fixed lookup tables: air quality, UV estimate, condition icons.

use serde::{Deserialize, Serialize};

pub fn air_quality_label(aqi: u8) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

/// Marker position on a Good..Very Poor bar, 0 for AQI 1 and 100 for AQI 5.
pub fn air_quality_bar_percent(aqi: u8) -> f64 {
    (f64::from(aqi) - 1.0) / 4.0 * 100.0
}

/// Guess a UV index from the condition name.
///
/// The provider's free tier carries no UV data, so this is an approximation
/// keyed on the sky condition only.
pub fn estimate_uv_index(condition_main: &str) -> u8 {
    let main = condition_main.to_lowercase();

    if main.contains("clear") {
        8
    } else if main.contains("cloud") {
        4
    } else if main.contains("rain") {
        2
    } else {
        3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UvClass {
    pub level: &'static str,
    pub message: &'static str,
}

pub fn classify_uv(uv: u8) -> UvClass {
    let (level, message) = match uv {
        0..=2 => ("Low", "Low risk of UV rays"),
        3..=5 => ("Moderate", "Moderate risk of UV rays"),
        6..=7 => ("High", "High risk of UV rays"),
        _ => ("Very High", "Very high risk of UV rays"),
    };
    UvClass { level, message }
}

/// Which icon vocabulary a panel renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSet {
    /// Lucide names used by the forecast list.
    Lucide,
    /// Lucide names used by the hourly timeline (snow is a snowflake).
    LucideTimeline,
    #[default]
    Emoji,
}

impl IconSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconSet::Lucide => "lucide",
            IconSet::LucideTimeline => "lucide-timeline",
            IconSet::Emoji => "emoji",
        }
    }
}

impl std::fmt::Display for IconSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IconSet {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "lucide" => Ok(IconSet::Lucide),
            "lucide-timeline" => Ok(IconSet::LucideTimeline),
            "emoji" => Ok(IconSet::Emoji),
            _ => Err(anyhow::anyhow!(
                "Unknown icon set '{value}'. Supported icon sets: emoji, lucide, lucide-timeline."
            )),
        }
    }
}

/// Icon for an OpenWeather condition group ("Clear", "Rain", ...).
pub fn icon_for(condition_main: &str, set: IconSet) -> &'static str {
    match set {
        IconSet::Lucide | IconSet::LucideTimeline => match condition_main {
            "Clear" => "sun",
            "Clouds" => "cloud",
            "Rain" => "cloud-rain",
            "Drizzle" => "cloud-drizzle",
            "Thunderstorm" => "cloud-lightning",
            "Snow" if set == IconSet::LucideTimeline => "snowflake",
            "Snow" => "cloud-snow",
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" => "cloud-fog",
            "Squall" | "Tornado" => "wind",
            _ => "cloud",
        },
        IconSet::Emoji => match condition_main {
            "Clear" => "☀️",
            "Clouds" => "☁️",
            "Rain" => "🌧️",
            "Drizzle" => "🌦️",
            "Thunderstorm" => "⛈️",
            "Snow" => "❄️",
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" => "🌫️",
            "Squall" | "Tornado" => "🌪️",
            _ => "☁️",
        },
    }
}
