use crate::cli::AdviseArgs;
use crate::config::Config;
use crate::datasources::openweathermap::validate_query;
use crate::datasources::{OpenWeatherMapClient, TranslationService};
use crate::error::Result;
use crate::logic::rules::{RuleSource, RuleStore};
use crate::logic::{AdvisoryEngine, TranslationReconstructor};
use crate::models::{
    confidence_label, Advisory, AdvisoryInputs, AdvisoryRequest, BatchTranslation,
    CategoryAdvice, Language, RuleCategory, Season, SoilType, TextTranslation,
    TranslationOutcome, WeatherAdvice, WeatherObservation, WeatherQuery, COMMON_CROPS,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

pub struct App {
    config: Config,
    rule_source: RuleSource,
    engine: AdvisoryEngine,
    weather_client: Option<OpenWeatherMapClient>,
    reconstructor: TranslationReconstructor<TranslationService>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let rule_source = RuleSource::from_path(config.rules.path.clone());
        let rules = Arc::new(RuleStore::load(&rule_source));
        let engine = AdvisoryEngine::new(rules);

        // Only create the weather client if a key is configured and enabled
        let weather_client = match config.weather.as_ref().filter(|c| c.is_usable()) {
            Some(c) => Some(OpenWeatherMapClient::new(c.clone())?),
            None => {
                tracing::info!("OpenWeatherMap not configured - advisories will omit weather");
                None
            }
        };

        let translation = TranslationService::from_config(&config.translation)?;
        let reconstructor =
            TranslationReconstructor::new(translation, config.translation.source_language);

        Ok(Self {
            config,
            rule_source,
            engine,
            weather_client,
            reconstructor,
        })
    }

    /// Translate free-form texts, addressed by language code.
    pub async fn translate(&self, texts: Vec<String>, language_code: &str) -> BatchTranslation {
        self.reconstructor
            .translator()
            .translate_texts(texts, language_code)
            .await
    }

    /// Validate, fetch weather, compose and optionally translate.
    ///
    /// Only invalid input is an error. Weather and translation problems are
    /// reported inside the returned report.
    pub async fn advise(&self, args: &AdviseArgs) -> Result<AdvisoryReport> {
        let inputs =
            AdvisoryRequest::new(args.crop.as_deref(), &args.soil, &args.season).validate()?;

        let query = self.weather_query(args).map(|q| validate_query(&q)).transpose()?;
        let (weather, weather_error) = match query {
            Some(query) => match self.fetch_weather(&query).await {
                Ok(observation) => (Some(observation), None),
                Err(e) => {
                    tracing::warn!("Weather unavailable for {}: {}", query, e);
                    (None, Some(e))
                }
            },
            None => (None, None),
        };

        let advisory = self
            .engine
            .compose_inputs(&inputs, weather.as_ref().map(|w| &w.reading));

        let translation = match args.lang.as_deref() {
            Some(code) => Some(self.reconstructor.translate(&advisory, code).await),
            None => None,
        };

        Ok(AdvisoryReport {
            inputs,
            weather,
            weather_error,
            advisory,
            translation,
        })
    }

    fn weather_query(&self, args: &AdviseArgs) -> Option<WeatherQuery> {
        if args.no_weather {
            return None;
        }
        if let Some(location) = &args.location {
            return Some(WeatherQuery::Location(location.clone()));
        }
        if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
            return Some(WeatherQuery::Coordinates { lat, lon });
        }
        self.config
            .weather
            .as_ref()
            .filter(|c| c.enabled)
            .and_then(|c| c.location.clone())
            .map(WeatherQuery::Location)
    }

    async fn fetch_weather(&self, query: &WeatherQuery) -> std::result::Result<WeatherObservation, String> {
        let client = self
            .weather_client
            .as_ref()
            .ok_or_else(|| "weather service is not configured".to_string())?;
        client.fetch_current(query).await.map_err(|e| e.to_string())
    }

    pub fn rules_summary(&self) -> RulesSummary {
        let table = self.engine.rules();
        RulesSummary {
            source: self.rule_source.to_string(),
            categories: self
                .engine
                .list_resolvers()
                .into_iter()
                .map(|(category, resolver)| CategorySummary {
                    category,
                    resolver,
                    rules: table.rules(category).len(),
                })
                .collect(),
            total_rules: table.total_rules(),
            declared_total: table.metadata.total_rules,
            version: table.metadata.version.clone(),
            last_updated: table.metadata.last_updated.clone(),
            load_error: table.load_error.clone(),
        }
    }

    /// Probe every collaborator once.
    pub async fn check_connections(&self) -> ConnectionStatus {
        let weather = match &self.weather_client {
            Some(client) => match client.test_connection().await {
                Ok(observation) => ServiceStatus::Ok(format!(
                    "{}, {}: {}°C, {}% humidity, {}",
                    observation.location,
                    observation.country,
                    observation.reading.temperature,
                    observation.reading.humidity,
                    observation.reading.description
                )),
                Err(e) => ServiceStatus::Failed(e.to_string()),
            },
            None => ServiceStatus::NotConfigured,
        };

        let service = self.reconstructor.translator();
        ConnectionStatus {
            weather,
            translation_provider: service.provider_name(),
            translation_samples: service.self_test().await,
        }
    }
}

pub fn languages_text(source: Language) -> String {
    let mut out = String::from("Supported languages:\n");
    for language in Language::ALL {
        let marker = if language == source { " (source)" } else { "" };
        let _ = writeln!(out, "  {}  {}{}", language.code(), language.name(), marker);
    }
    out
}

/// Values accepted by `advise`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryOptions {
    pub soil_types: Vec<&'static str>,
    pub seasons: Vec<&'static str>,
    pub common_crops: Vec<&'static str>,
}

impl AdvisoryOptions {
    pub fn new() -> Self {
        Self {
            soil_types: SoilType::ALL.iter().map(|s| s.as_str()).collect(),
            seasons: Season::ALL.iter().map(|s| s.as_str()).collect(),
            common_crops: COMMON_CROPS.to_vec(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Soil types:   {}", self.soil_types.join(", "));
        let _ = writeln!(out, "Seasons:      {}", self.seasons.join(", "));
        let _ = writeln!(out, "Common crops: {}", self.common_crops.join(", "));
        out
    }
}

impl Default for AdvisoryOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_batch(batch: &BatchTranslation) -> String {
    let mut out = String::new();
    if let Some(error) = &batch.error {
        let _ = writeln!(out, "Translation failed: {}", error);
        return out;
    }
    for result in &batch.results {
        let _ = writeln!(
            out,
            "{}  [{}, {:.2}]",
            result.translated_text, result.method, result.confidence
        );
    }
    let _ = writeln!(
        out,
        "{}/{} translated",
        batch.successful_translations, batch.total_texts
    );
    out
}

/// Everything produced by one `advise` run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryReport {
    pub inputs: AdvisoryInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_error: Option<String>,
    pub advisory: Advisory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationOutcome>,
}

impl AdvisoryReport {
    /// The advisory to show: translated when translation succeeded.
    pub fn display_advisory(&self) -> &Advisory {
        self.translation
            .as_ref()
            .map_or(&self.advisory, TranslationOutcome::advisory)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let advisory = self.display_advisory();

        let crop = self.inputs.crop.as_deref().unwrap_or("any crop");
        let _ = writeln!(
            out,
            "Advisory for {} on {} soil, {} season",
            crop, self.inputs.soil_type, self.inputs.season
        );

        if let Some(weather) = &self.weather {
            let _ = writeln!(
                out,
                "Weather: {}, {} - {}°C, {}% humidity, {}",
                weather.location,
                weather.country,
                weather.reading.temperature,
                weather.reading.humidity,
                weather.reading.description
            );
        } else if let Some(error) = &self.weather_error {
            let _ = writeln!(out, "Weather: unavailable ({})", error);
        }
        out.push('\n');

        render_category(&mut out, "Crop suitability", &advisory.crop_advice);
        render_category(&mut out, "Fertilizer", &advisory.fertilizer_advice);
        render_category(&mut out, "Irrigation", &advisory.irrigation_advice);

        if let Some(weather) = &advisory.weather_advice {
            render_weather(&mut out, weather);
        }

        let _ = writeln!(
            out,
            "Overall confidence: {:.1}/10 ({})",
            advisory.confidence_score,
            confidence_label(advisory.confidence_score)
        );

        match &self.translation {
            Some(TranslationOutcome::Translated {
                language,
                total_texts,
                successful_translations,
                ..
            }) => {
                let _ = writeln!(
                    out,
                    "Translated to {} ({}/{} texts)",
                    language, successful_translations, total_texts
                );
            }
            Some(TranslationOutcome::Failed { reason, .. }) => {
                let _ = writeln!(out, "Translation not performed: {}", reason);
            }
            Some(TranslationOutcome::NotNeeded { .. }) | None => {}
        }

        out
    }
}

fn render_category(out: &mut String, title: &str, advice: &CategoryAdvice) {
    let _ = writeln!(
        out,
        "{} [{}, {}/10]",
        title,
        confidence_label(f64::from(advice.confidence)),
        advice.confidence
    );
    let _ = writeln!(out, "  {}", advice.recommendation);
    let _ = writeln!(out, "  {} (rule: {})", advice.explanation, advice.rule_applied);
    out.push('\n');
}

fn render_weather(out: &mut String, weather: &WeatherAdvice) {
    let _ = writeln!(
        out,
        "Weather advice [{}, {}/10]",
        confidence_label(f64::from(weather.confidence)),
        weather.confidence
    );
    for warning in &weather.warnings {
        let _ = writeln!(
            out,
            "  {} {} ({}): {}",
            warning.severity.symbol(),
            warning.warning_type,
            warning.severity,
            warning.message
        );
    }
    for recommendation in &weather.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
    let _ = writeln!(out, "  {}", weather.explanation);
    out.push('\n');
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub category: RuleCategory,
    pub resolver: &'static str,
    pub rules: usize,
}

/// Diagnostics for the loaded rule table.
#[derive(Debug, Serialize)]
pub struct RulesSummary {
    pub source: String,
    pub categories: Vec<CategorySummary>,
    pub total_rules: usize,
    pub declared_total: Option<u32>,
    pub version: Option<String>,
    pub last_updated: Option<String>,
    pub load_error: Option<String>,
}

impl RulesSummary {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Rule source: {}", self.source);
        if let Some(error) = &self.load_error {
            let _ = writeln!(out, "DEGRADED: {} (fallback advice only)", error);
        }
        for summary in &self.categories {
            let _ = writeln!(out, "  {:<20} {:>3} rules", summary.resolver, summary.rules);
        }
        let _ = writeln!(out, "  {:<20} {:>3} rules", "Total", self.total_rules);

        if let Some(declared) = self.declared_total {
            if declared as usize != self.total_rules {
                let _ = writeln!(
                    out,
                    "Note: metadata declares {} rules but {} were loaded",
                    declared, self.total_rules
                );
            }
        }
        if let Some(version) = &self.version {
            let _ = write!(out, "Version {}", version);
            if let Some(updated) = &self.last_updated {
                let _ = write!(out, ", updated {}", updated);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    NotConfigured,
    Ok(String),
    Failed(String),
}

#[derive(Debug)]
pub struct ConnectionStatus {
    pub weather: ServiceStatus,
    pub translation_provider: &'static str,
    pub translation_samples: Vec<(Language, TextTranslation)>,
}

impl ConnectionStatus {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match &self.weather {
            ServiceStatus::NotConfigured => {
                let _ = writeln!(out, "  Weather:     not configured");
            }
            ServiceStatus::Ok(detail) => {
                let _ = writeln!(out, "  Weather:     OK ({})", detail);
            }
            ServiceStatus::Failed(error) => {
                let _ = writeln!(out, "  Weather:     FAILED ({})", error);
            }
        }
        let _ = writeln!(out, "  Translation: {}", self.translation_provider);
        for (language, result) in &self.translation_samples {
            let _ = writeln!(
                out,
                "    {}: {} [{}, {:.2}]",
                language.code(),
                result.translated_text,
                result.method,
                result.confidence
            );
        }
        out
    }
}
