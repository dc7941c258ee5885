use super::advisory::Advisory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "pa")]
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Punjabi];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Punjabi => "pa",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Punjabi => "Punjabi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::English),
            "hi" => Some(Language::Hindi),
            "pa" => Some(Language::Punjabi),
            _ => None,
        }
    }

    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    NoTranslationNeeded,
    GoogleTranslateApi,
    AzureTranslatorApi,
    MockDictionary,
    FallbackOriginal,
    ErrorFallback,
}

impl TranslationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMethod::NoTranslationNeeded => "no_translation_needed",
            TranslationMethod::GoogleTranslateApi => "google_translate_api",
            TranslationMethod::AzureTranslatorApi => "azure_translator_api",
            TranslationMethod::MockDictionary => "mock_dictionary",
            TranslationMethod::FallbackOriginal => "fallback_original",
            TranslationMethod::ErrorFallback => "error_fallback",
        }
    }
}

impl std::fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of translating a single text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTranslation {
    pub success: bool,
    pub original_text: String,
    pub translated_text: String,
    pub confidence: f64,
    pub method: TranslationMethod,
}

impl TextTranslation {
    pub fn untranslated(text: &str, method: TranslationMethod) -> Self {
        Self {
            success: method != TranslationMethod::ErrorFallback,
            original_text: text.to_string(),
            translated_text: text.to_string(),
            confidence: match method {
                TranslationMethod::NoTranslationNeeded => 1.0,
                _ => 0.0,
            },
            method,
        }
    }
}

/// Result of a batch call. `results` is index-aligned with the submitted texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTranslation {
    pub success: bool,
    pub results: Vec<TextTranslation>,
    pub total_texts: usize,
    pub successful_translations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchTranslation {
    pub fn from_results(results: Vec<TextTranslation>) -> Self {
        let successful_translations = results.iter().filter(|r| r.success).count();
        Self {
            success: true,
            total_texts: results.len(),
            successful_translations,
            results,
            error: None,
        }
    }

    pub fn failed(total_texts: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            total_texts,
            successful_translations: 0,
            error: Some(error.into()),
        }
    }
}

/// What happened when an advisory was sent for translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationOutcome {
    /// Target is the source language; the advisory is returned as-is.
    NotNeeded { advisory: Advisory },
    Translated {
        advisory: Advisory,
        language: Language,
        total_texts: usize,
        successful_translations: usize,
    },
    /// Translation was abandoned; `original` is the untouched source advisory.
    Failed { original: Advisory, reason: String },
}

impl TranslationOutcome {
    pub fn performed(&self) -> bool {
        matches!(self, TranslationOutcome::Translated { .. })
    }

    /// The translated advisory, if translation was performed.
    pub fn translated(&self) -> Option<&Advisory> {
        match self {
            TranslationOutcome::Translated { advisory, .. } => Some(advisory),
            _ => None,
        }
    }

    /// The advisory a caller should display: translated when available, else the source.
    pub fn advisory(&self) -> &Advisory {
        match self {
            TranslationOutcome::NotNeeded { advisory } => advisory,
            TranslationOutcome::Translated { advisory, .. } => advisory,
            TranslationOutcome::Failed { original, .. } => original,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TranslationOutcome::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn method(&self) -> Option<TranslationMethod> {
        match self {
            TranslationOutcome::NotNeeded { .. } => Some(TranslationMethod::NoTranslationNeeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_code() {
        assert_eq!(Language::from_code("HI"), Some(Language::Hindi));
        assert_eq!(Language::from_code(" pa "), Some(Language::Punjabi));
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::supported_codes(), "en, hi, pa");
    }

    #[test]
    fn batch_counts_successes() {
        let batch = BatchTranslation::from_results(vec![
            TextTranslation::untranslated("a", TranslationMethod::FallbackOriginal),
            TextTranslation::untranslated("b", TranslationMethod::ErrorFallback),
        ]);
        assert!(batch.success);
        assert_eq!(batch.total_texts, 2);
        assert_eq!(batch.successful_translations, 1);
    }

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_value(TranslationMethod::NoTranslationNeeded).unwrap();
        assert_eq!(json, "no_translation_needed");
    }
}
