use crate::error::{AdvisorError, Result};
use crate::models::{Language, TextTranslation, TranslationMethod};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_URL: &str = "https://api.cognitive.microsofttranslator.com/translate";
const API_VERSION: &str = "3.0";
const API_CONFIDENCE: f64 = 0.9;

/// Azure AI Translator (v3) client.
#[derive(Clone)]
pub struct AzureTranslatorClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    region: String,
}

#[derive(Debug, Serialize)]
struct AzureRequestItem<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AzureResponseItem {
    translations: Vec<AzureTranslation>,
}

#[derive(Debug, Deserialize)]
struct AzureTranslation {
    text: String,
}

impl AzureTranslatorClient {
    pub fn new(api_key: &str, region: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: API_URL.to_string(),
            api_key: api_key.to_string(),
            region: region.to_string(),
        })
    }

    /// Point the client at another endpoint.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub async fn translate(&self, text: &str, target: Language) -> Result<TextTranslation> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[("api-version", API_VERSION), ("to", target.code())],
        )
        .map_err(|e| AdvisorError::Translation(format!("Azure Translator URL: {}", e)))?;

        let response = self
            .client
            .post(url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&[AzureRequestItem { text }])
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("Azure Translator: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Translation(format!(
                "Azure Translator returned {}: {}",
                status, body
            )));
        }

        let parsed: Vec<AzureResponseItem> = response.json().await.map_err(|e| {
            AdvisorError::Translation(format!("Failed to parse Azure Translator response: {}", e))
        })?;

        Ok(TextTranslation {
            success: true,
            original_text: text.to_string(),
            translated_text: extract_translation(parsed)?,
            confidence: API_CONFIDENCE,
            method: TranslationMethod::AzureTranslatorApi,
        })
    }
}

fn extract_translation(items: Vec<AzureResponseItem>) -> Result<String> {
    items
        .into_iter()
        .next()
        .and_then(|item| item.translations.into_iter().next())
        .map(|t| t.text)
        .ok_or_else(|| AdvisorError::Translation("Azure Translator returned no translations".into()))
}
