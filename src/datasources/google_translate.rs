use crate::error::{AdvisorError, Result};
use crate::models::{Language, TextTranslation, TranslationMethod};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const API_CONFIDENCE: f64 = 0.9;

/// Google Cloud Translation (v2) client.
#[derive(Clone)]
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    source: Language,
}

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    q: &'a str,
    target: &'a str,
    source: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
}

impl GoogleTranslateClient {
    pub fn new(api_key: &str, source: Language, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: API_URL.to_string(),
            api_key: api_key.to_string(),
            source,
        })
    }

    /// Point the client at another endpoint.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub async fn translate(&self, text: &str, target: Language) -> Result<TextTranslation> {
        let url = Url::parse_with_params(&self.base_url, &[("key", self.api_key.as_str())])
            .map_err(|e| AdvisorError::Translation(format!("Google Translate URL: {}", e)))?;

        let body = GoogleRequest {
            q: text,
            target: target.code(),
            source: self.source.code(),
            format: "text",
        };

        let response = self.client.post(url).json(&body).send().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!("Google Translate: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Translation(format!(
                "Google Translate returned {}: {}",
                status, body
            )));
        }

        let parsed: GoogleResponse = response.json().await.map_err(|e| {
            AdvisorError::Translation(format!("Failed to parse Google Translate response: {}", e))
        })?;

        let translated_text = extract_translation(parsed)?;
        Ok(TextTranslation {
            success: true,
            original_text: text.to_string(),
            translated_text,
            confidence: API_CONFIDENCE,
            method: TranslationMethod::GoogleTranslateApi,
        })
    }
}

fn extract_translation(response: GoogleResponse) -> Result<String> {
    response
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| AdvisorError::Translation("Google Translate returned no translations".into()))
}
