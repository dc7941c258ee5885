use crate::datasources::openweathermap::WeatherErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Weather service error ({code}): {message}")]
    Weather {
        code: WeatherErrorCode,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
