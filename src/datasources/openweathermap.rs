use crate::config::WeatherConfig;
use crate::error::{AdvisorError, Result};
use crate::models::{WeatherObservation, WeatherQuery, WeatherReading};
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const CONNECTION_TEST_LOCATION: &str = "Delhi";

/// Failure classes reported by the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherErrorCode {
    InvalidApiKey,
    LocationNotFound,
    RateLimitExceeded,
    ApiError,
    NetworkError,
}

impl WeatherErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherErrorCode::InvalidApiKey => "INVALID_API_KEY",
            WeatherErrorCode::LocationNotFound => "LOCATION_NOT_FOUND",
            WeatherErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            WeatherErrorCode::ApiError => "API_ERROR",
            WeatherErrorCode::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl std::fmt::Display for WeatherErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

// OpenWeatherMap current-weather response
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl OpenWeatherMapClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch current conditions for a city or a coordinate pair.
    pub async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherObservation> {
        let query = validate_query(query)?;
        if self.config.api_key.trim().is_empty() {
            return Err(AdvisorError::Config(
                "Weather API key is not configured".into(),
            ));
        }

        let url = self.request_url(&query)?;
        tracing::debug!("Fetching current weather for {}", query);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("OpenWeatherMap request failed: {}", e);
            network_error()
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<OwmErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(status_error(status, detail));
        }

        let owm_response: OwmCurrentResponse = response.json().await.map_err(|e| {
            AdvisorError::Weather {
                code: WeatherErrorCode::ApiError,
                message: format!("Failed to parse OpenWeatherMap response: {}", e),
            }
        })?;

        convert_response(owm_response)
    }

    /// Probe the API with a fixed city.
    pub async fn test_connection(&self) -> Result<WeatherObservation> {
        self.fetch_current(&WeatherQuery::Location(CONNECTION_TEST_LOCATION.into()))
            .await
    }

    fn request_url(&self, query: &WeatherQuery) -> Result<Url> {
        let endpoint = format!("{}/weather", API_BASE_URL);
        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::Location(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("appid", self.config.api_key.clone()));
        params.push(("units", "metric".into()));

        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| AdvisorError::InvalidInput(format!("Bad weather request URL: {}", e)))
    }
}

/// Check a query before any request is made. Location names are trimmed.
pub fn validate_query(query: &WeatherQuery) -> Result<WeatherQuery> {
    match query {
        WeatherQuery::Location(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AdvisorError::InvalidInput("Location is required".into()));
            }
            Ok(WeatherQuery::Location(name.to_string()))
        }
        WeatherQuery::Coordinates { lat, lon } => {
            if !(-90.0..=90.0).contains(lat) {
                return Err(AdvisorError::InvalidInput(
                    "Latitude must be between -90 and 90".into(),
                ));
            }
            if !(-180.0..=180.0).contains(lon) {
                return Err(AdvisorError::InvalidInput(
                    "Longitude must be between -180 and 180".into(),
                ));
            }
            Ok(query.clone())
        }
    }
}

fn network_error() -> AdvisorError {
    AdvisorError::Weather {
        code: WeatherErrorCode::NetworkError,
        message: "Unable to connect to weather service. Please check your internet connection."
            .into(),
    }
}

fn status_error(status: StatusCode, detail: Option<String>) -> AdvisorError {
    let (code, message) = match status {
        StatusCode::UNAUTHORIZED => (
            WeatherErrorCode::InvalidApiKey,
            "Invalid API key. Please check your weather API configuration.".to_string(),
        ),
        StatusCode::NOT_FOUND => (
            WeatherErrorCode::LocationNotFound,
            "Location not found. Please check the city name and try again.".to_string(),
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            WeatherErrorCode::RateLimitExceeded,
            "Too many requests. Please try again later.".to_string(),
        ),
        _ => (
            WeatherErrorCode::ApiError,
            format!(
                "Weather API error: {}",
                detail.unwrap_or_else(|| format!("status {}", status))
            ),
        ),
    };
    AdvisorError::Weather { code, message }
}

fn convert_response(response: OwmCurrentResponse) -> Result<WeatherObservation> {
    let description = response
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| AdvisorError::Weather {
            code: WeatherErrorCode::ApiError,
            message: "OpenWeatherMap response has no weather description".into(),
        })?;

    Ok(WeatherObservation {
        reading: WeatherReading::new(response.main.temp.round(), response.main.humidity, description),
        location: response.name,
        country: response.sys.map(|s| s.country).unwrap_or_default(),
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenWeatherMapClient {
        OpenWeatherMapClient::new(WeatherConfig {
            api_key: "test-key".into(),
            timeout_secs: 10,
            enabled: true,
            location: None,
        })
        .unwrap()
    }

    fn code_of(err: AdvisorError) -> WeatherErrorCode {
        match err {
            AdvisorError::Weather { code, .. } => code,
            other => panic!("expected weather error, got {:?}", other),
        }
    }

    #[test]
    fn converts_current_weather_response() {
        let json = r#"{
            "main": {"temp": 31.6, "feels_like": 35.0, "humidity": 74},
            "weather": [{"id": 721, "main": "Haze", "description": "haze"}],
            "name": "Ludhiana",
            "sys": {"country": "IN"}
        }"#;
        let response: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        let observation = convert_response(response).unwrap();

        assert_eq!(observation.reading.temperature, 32.0);
        assert_eq!(observation.reading.humidity, 74.0);
        assert_eq!(observation.reading.description, "haze");
        assert_eq!(observation.location, "Ludhiana");
        assert_eq!(observation.country, "IN");
    }

    #[test]
    fn missing_description_is_an_api_error() {
        let json = r#"{"main": {"temp": 20.0, "humidity": 50}, "weather": []}"#;
        let response: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            code_of(convert_response(response).unwrap_err()),
            WeatherErrorCode::ApiError
        );
    }

    #[test]
    fn status_codes_map_to_error_codes() {
        assert_eq!(
            code_of(status_error(StatusCode::UNAUTHORIZED, None)),
            WeatherErrorCode::InvalidApiKey
        );
        assert_eq!(
            code_of(status_error(StatusCode::NOT_FOUND, None)),
            WeatherErrorCode::LocationNotFound
        );
        assert_eq!(
            code_of(status_error(StatusCode::TOO_MANY_REQUESTS, None)),
            WeatherErrorCode::RateLimitExceeded
        );

        let err = status_error(StatusCode::BAD_GATEWAY, Some("upstream down".into()));
        assert_eq!(
            err.to_string(),
            "Weather service error (API_ERROR): Weather API error: upstream down"
        );
    }

    #[test]
    fn validates_coordinates() {
        assert!(validate_query(&WeatherQuery::Coordinates { lat: 30.9, lon: 75.8 }).is_ok());
        assert!(validate_query(&WeatherQuery::Coordinates { lat: 90.0, lon: -180.0 }).is_ok());
        assert!(matches!(
            validate_query(&WeatherQuery::Coordinates { lat: 91.0, lon: 0.0 }),
            Err(AdvisorError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_query(&WeatherQuery::Coordinates { lat: 0.0, lon: 180.5 }),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn location_is_trimmed_and_required() {
        assert_eq!(
            validate_query(&WeatherQuery::Location("  New Delhi ".into())).unwrap(),
            WeatherQuery::Location("New Delhi".into())
        );
        assert!(validate_query(&WeatherQuery::Location("   ".into())).is_err());
    }

    #[test]
    fn request_url_encodes_parameters() {
        let url = client()
            .request_url(&WeatherQuery::Location("New Delhi".into()))
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.path(), "/data/2.5/weather");
        assert!(pairs.contains(&("q".into(), "New Delhi".into())));
        assert!(pairs.contains(&("appid".into(), "test-key".into())));
        assert!(pairs.contains(&("units".into(), "metric".into())));
    }

    #[test]
    fn coordinates_use_lat_lon_parameters() {
        let url = client()
            .request_url(&WeatherQuery::Coordinates { lat: 28.6, lon: 77.2 })
            .unwrap();
        let query = url.query().unwrap_or_default();
        assert!(query.contains("lat=28.6"));
        assert!(query.contains("lon=77.2"));
        assert!(!query.contains("q="));
    }

    #[tokio::test]
    async fn blank_api_key_fails_before_request() {
        let client = OpenWeatherMapClient::new(WeatherConfig {
            api_key: " ".into(),
            timeout_secs: 1,
            enabled: true,
            location: None,
        })
        .unwrap();
        let err = client
            .fetch_current(&WeatherQuery::Location("Delhi".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }
}
