use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
    pub description: String,
}

impl WeatherReading {
    pub fn new(temperature: f64, humidity: f64, description: impl Into<String>) -> Self {
        Self {
            temperature,
            humidity,
            description: description.into(),
        }
    }
}

/// A reading together with where and when it was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub reading: WeatherReading,
    pub location: String,
    pub country: String,
    pub fetched_at: DateTime<Utc>,
}

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Location(String),
    Coordinates { lat: f64, lon: f64 },
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::Location(name) => write!(f, "{}", name),
            WeatherQuery::Coordinates { lat, lon } => write!(f, "({:.4}, {:.4})", lat, lon),
        }
    }
}
