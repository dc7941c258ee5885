use super::{AzureTranslatorClient, DictionaryTranslator, GoogleTranslateClient};
use crate::config::{TranslationConfig, TranslationProvider};
use crate::error::Result;
use crate::logic::Translator;
use crate::models::{BatchTranslation, Language, TextTranslation, TranslationMethod};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

const SELF_TEST_TEXT: &str = "crop advice for wheat";

enum ApiBackend {
    Google(GoogleTranslateClient),
    Azure(AzureTranslatorClient),
}

impl ApiBackend {
    fn name(&self) -> &'static str {
        match self {
            ApiBackend::Google(_) => "google",
            ApiBackend::Azure(_) => "azure",
        }
    }

    async fn translate(&self, text: &str, target: Language) -> Result<TextTranslation> {
        match self {
            ApiBackend::Google(client) => client.translate(text, target).await,
            ApiBackend::Azure(client) => client.translate(text, target).await,
        }
    }
}

struct ServiceInner {
    api: Option<ApiBackend>,
    dictionary: DictionaryTranslator,
    source: Language,
}

impl ServiceInner {
    /// API first when configured, glossary otherwise or on API failure.
    async fn translate_one(&self, text: &str, target: Language) -> TextTranslation {
        if target == self.source {
            return TextTranslation::untranslated(text, TranslationMethod::NoTranslationNeeded);
        }

        if let Some(api) = &self.api {
            match api.translate(text, target).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!("{} translation failed, using dictionary: {}", api.name(), e);
                }
            }
        }

        self.dictionary.translate(text, target)
    }
}

/// Batch translation over the configured provider, one concurrent task per text.
#[derive(Clone)]
pub struct TranslationService {
    inner: Arc<ServiceInner>,
}

impl TranslationService {
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let api = match (config.provider, config.api_key()) {
            (TranslationProvider::Dictionary, _) => None,
            (provider, None) => {
                tracing::warn!(
                    "Translation provider {} has no API key - using dictionary only",
                    provider.as_str()
                );
                None
            }
            (TranslationProvider::Google, Some(key)) => Some(ApiBackend::Google(
                GoogleTranslateClient::new(key, config.source_language, timeout)?,
            )),
            (TranslationProvider::Azure, Some(key)) => Some(ApiBackend::Azure(
                AzureTranslatorClient::new(key, &config.region, timeout)?,
            )),
        };

        Ok(Self::with_backend(api, config.source_language))
    }

    pub fn dictionary_only(source: Language) -> Self {
        Self::with_backend(None, source)
    }

    fn with_backend(api: Option<ApiBackend>, source: Language) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                api,
                dictionary: DictionaryTranslator::new(),
                source,
            }),
        }
    }

    pub fn source_language(&self) -> Language {
        self.inner.source
    }

    /// Name of the backend tried first.
    pub fn provider_name(&self) -> &'static str {
        self.inner
            .api
            .as_ref()
            .map_or(TranslationProvider::Dictionary.as_str(), ApiBackend::name)
    }

    pub async fn translate_text(&self, text: &str, target: Language) -> TextTranslation {
        self.inner.translate_one(text, target).await
    }

    /// Batch translation addressed by language code.
    pub async fn translate_texts(&self, texts: Vec<String>, language_code: &str) -> BatchTranslation {
        match Language::from_code(language_code) {
            Some(target) => self.fan_out(texts, target).await,
            None => BatchTranslation::failed(
                texts.len(),
                format!(
                    "Unsupported language: {}. Supported languages: {}",
                    language_code,
                    Language::supported_codes()
                ),
            ),
        }
    }

    /// Translate a fixed phrase into every supported language.
    pub async fn self_test(&self) -> Vec<(Language, TextTranslation)> {
        let mut results = Vec::new();
        for language in Language::ALL {
            results.push((language, self.translate_text(SELF_TEST_TEXT, language).await));
        }
        results
    }

    async fn fan_out(&self, texts: Vec<String>, target: Language) -> BatchTranslation {
        let mut set = JoinSet::new();
        for (index, text) in texts.iter().cloned().enumerate() {
            let inner = Arc::clone(&self.inner);
            set.spawn(async move { (index, inner.translate_one(&text, target).await) });
        }

        // Results land by index, not completion order.
        let mut slots: Vec<Option<TextTranslation>> = vec![None; texts.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::warn!("Translation task failed: {}", e),
            }
        }

        let results = slots
            .into_iter()
            .zip(&texts)
            .map(|(slot, text)| {
                slot.unwrap_or_else(|| {
                    TextTranslation::untranslated(text, TranslationMethod::ErrorFallback)
                })
            })
            .collect();

        BatchTranslation::from_results(results)
    }
}

impl Translator for TranslationService {
    async fn translate_batch(&self, texts: Vec<String>, target: Language) -> BatchTranslation {
        self.fan_out(texts, target).await
    }
}
