use thiserror::Error;

/// Errors produced while loading or computing a city's weather.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeatherError {
    /// City lookup failed (current-weather request returned non-2xx).
    #[error("{0}")]
    NotFound(String),

    /// Forecast or air-quality request failed, or a response could not be decoded.
    #[error("{0}")]
    Fetch(String),

    /// Sunset is not after sunrise, so no daylight interval exists.
    #[error("invalid daylight interval: sunset {sunset} is not after sunrise {sunrise}")]
    InvalidInterval { sunrise: i64, sunset: i64 },

    /// A strict caller required at least one forecast sample.
    #[error("forecast contained no samples")]
    EmptyInput,
}

impl WeatherError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotFound(msg) | WeatherError::Fetch(msg) if !msg.is_empty() => {
                msg.clone()
            }
            WeatherError::NotFound(_) | WeatherError::Fetch(_) => {
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        }
    }
}
