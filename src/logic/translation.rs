use crate::error::{AdvisorError, Result};
use crate::models::{Advisory, BatchTranslation, Language, TranslationOutcome};
use std::future::Future;

/// Batch translation backend.
///
/// Implementations must return one result per submitted text, in submission order.
pub trait Translator: Send + Sync {
    fn translate_batch(
        &self,
        texts: Vec<String>,
        target: Language,
    ) -> impl Future<Output = BatchTranslation> + Send;
}

/// Every translatable string of an advisory, in reconstruction order.
///
/// Order: crop, fertilizer and irrigation (recommendation then explanation each),
/// then for weather advice its recommendations, its explanation and each warning message.
/// Confidences, rule ids and the current-weather block are never translated.
pub fn flatten(advisory: &Advisory) -> Vec<String> {
    let mut texts = Vec::new();
    for advice in advisory.category_advice() {
        texts.push(advice.recommendation.clone());
        texts.push(advice.explanation.clone());
    }
    if let Some(weather) = &advisory.weather_advice {
        texts.extend(weather.recommendations.iter().cloned());
        texts.push(weather.explanation.clone());
        texts.extend(weather.warnings.iter().map(|w| w.message.clone()));
    }
    texts
}

/// Mutable view of the same fields `flatten` reads, in the same order.
fn text_slots(advisory: &mut Advisory) -> Vec<&mut String> {
    let mut slots: Vec<&mut String> = Vec::new();
    for advice in [
        &mut advisory.crop_advice,
        &mut advisory.fertilizer_advice,
        &mut advisory.irrigation_advice,
    ] {
        slots.push(&mut advice.recommendation);
        slots.push(&mut advice.explanation);
    }
    if let Some(weather) = advisory.weather_advice.as_mut() {
        slots.extend(weather.recommendations.iter_mut());
        slots.push(&mut weather.explanation);
        slots.extend(weather.warnings.iter_mut().map(|w| &mut w.message));
    }
    slots
}

/// Hands out translated fragments in order and checks none are missing or left over.
struct FragmentCursor {
    fragments: std::vec::IntoIter<String>,
    total: usize,
    taken: usize,
}

impl FragmentCursor {
    fn new(fragments: Vec<String>) -> Self {
        Self {
            total: fragments.len(),
            fragments: fragments.into_iter(),
            taken: 0,
        }
    }

    fn take(&mut self) -> Result<String> {
        let fragment = self.fragments.next().ok_or_else(|| {
            AdvisorError::Translation(format!(
                "ran out of translated fragments after {} of {}",
                self.taken, self.total
            ))
        })?;
        self.taken += 1;
        Ok(fragment)
    }

    fn finish(self) -> Result<()> {
        if self.taken != self.total {
            return Err(AdvisorError::Translation(format!(
                "{} translated fragments left unused",
                self.total - self.taken
            )));
        }
        Ok(())
    }
}

/// Rebuild `original` with its texts replaced by `fragments`, consumed in `flatten` order.
///
/// Fails without partial output when the fragment count differs from the text count.
pub fn reassemble(original: &Advisory, fragments: Vec<String>) -> Result<Advisory> {
    let mut rebuilt = original.clone();
    let mut cursor = FragmentCursor::new(fragments);
    for slot in text_slots(&mut rebuilt) {
        *slot = cursor.take()?;
    }
    cursor.finish()?;
    Ok(rebuilt)
}

/// Translates whole advisories through a batch [`Translator`].
pub struct TranslationReconstructor<T> {
    translator: T,
    source: Language,
}

impl<T: Translator> TranslationReconstructor<T> {
    pub fn new(translator: T, source: Language) -> Self {
        Self { translator, source }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Translate `advisory` into the language named by `language_code`.
    ///
    /// Never fails: problems are reported through [`TranslationOutcome::Failed`],
    /// which carries the untouched original.
    pub async fn translate(&self, advisory: &Advisory, language_code: &str) -> TranslationOutcome {
        let Some(target) = Language::from_code(language_code) else {
            return TranslationOutcome::Failed {
                original: advisory.clone(),
                reason: AdvisorError::UnsupportedLanguage(format!(
                    "{} (supported: {})",
                    language_code,
                    Language::supported_codes()
                ))
                .to_string(),
            };
        };

        if target == self.source {
            return TranslationOutcome::NotNeeded {
                advisory: advisory.clone(),
            };
        }

        let texts = flatten(advisory);
        let expected = texts.len();
        tracing::debug!("Translating {} advisory texts to {}", expected, target.code());

        let batch = self.translator.translate_batch(texts, target).await;

        match self.rebuild(advisory, batch, expected) {
            Ok((translated, successful_translations)) => TranslationOutcome::Translated {
                advisory: translated,
                language: target,
                total_texts: expected,
                successful_translations,
            },
            Err(e) => {
                tracing::warn!("Advisory translation to {} abandoned: {}", target.code(), e);
                TranslationOutcome::Failed {
                    original: advisory.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn rebuild(
        &self,
        advisory: &Advisory,
        batch: BatchTranslation,
        expected: usize,
    ) -> Result<(Advisory, usize)> {
        if !batch.success {
            return Err(AdvisorError::Translation(
                batch
                    .error
                    .unwrap_or_else(|| "translation service reported failure".to_string()),
            ));
        }
        if batch.results.len() != expected {
            return Err(AdvisorError::Translation(format!(
                "expected {} translated texts, got {}",
                expected,
                batch.results.len()
            )));
        }

        let successful = batch.results.iter().filter(|r| r.success).count();
        let fragments = batch
            .results
            .into_iter()
            .map(|r| r.translated_text)
            .collect();
        Ok((reassemble(advisory, fragments)?, successful))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryAdvice, CurrentWeather, Severity, TextTranslation, TranslationMethod,
        WarningType, WeatherAdvice, WeatherWarning,
    };
    use proptest::prelude::*;

    fn sample_advisory(with_weather: bool) -> Advisory {
        Advisory {
            crop_advice: CategoryAdvice::new("crop rec", 8, "crop why", "crop_validation"),
            fertilizer_advice: CategoryAdvice::new("fert rec", 6, "fert why", "fa001"),
            irrigation_advice: CategoryAdvice::new("irr rec", 10, "irr why", "ia001"),
            weather_advice: with_weather.then(|| WeatherAdvice {
                current_weather: CurrentWeather {
                    temperature: "36°C".into(),
                    humidity: "85%".into(),
                    description: "haze".into(),
                },
                warnings: vec![
                    WeatherWarning::new(WarningType::HeatStress, Severity::High, "hot"),
                    WeatherWarning::new(WarningType::FungalRisk, Severity::Medium, "damp"),
                ],
                recommendations: vec!["rec one".into(), "rec two".into()],
                confidence: 8,
                explanation: "weather why".into(),
                rule_applied: "weather_analysis".into(),
            }),
            confidence_score: 8.0,
        }
    }

    /// Prefixes each text with the language code.
    struct TaggingTranslator;

    impl Translator for TaggingTranslator {
        async fn translate_batch(&self, texts: Vec<String>, target: Language) -> BatchTranslation {
            BatchTranslation::from_results(
                texts
                    .iter()
                    .map(|t| TextTranslation {
                        success: true,
                        original_text: t.clone(),
                        translated_text: format!("[{}] {}", target.code(), t),
                        confidence: 0.9,
                        method: TranslationMethod::MockDictionary,
                    })
                    .collect(),
            )
        }
    }

    /// Loses the last result of every batch.
    struct DroppingTranslator;

    impl Translator for DroppingTranslator {
        async fn translate_batch(&self, mut texts: Vec<String>, _: Language) -> BatchTranslation {
            texts.pop();
            BatchTranslation::from_results(
                texts
                    .iter()
                    .map(|t| TextTranslation::untranslated(t, TranslationMethod::FallbackOriginal))
                    .collect(),
            )
        }
    }

    struct FailingTranslator;

    impl Translator for FailingTranslator {
        async fn translate_batch(&self, texts: Vec<String>, _: Language) -> BatchTranslation {
            BatchTranslation::failed(texts.len(), "service down")
        }
    }

    #[test]
    fn flatten_order_without_weather() {
        assert_eq!(
            flatten(&sample_advisory(false)),
            vec!["crop rec", "crop why", "fert rec", "fert why", "irr rec", "irr why"]
        );
    }

    #[test]
    fn flatten_order_with_weather() {
        let texts = flatten(&sample_advisory(true));
        assert_eq!(texts.len(), 6 + 2 + 1 + 2);
        assert_eq!(
            &texts[6..],
            &["rec one", "rec two", "weather why", "hot", "damp"]
        );
    }

    #[test]
    fn reassemble_rejects_short_and_long_inputs() {
        let advisory = sample_advisory(true);
        let mut texts = flatten(&advisory);

        let mut short = texts.clone();
        short.pop();
        assert!(matches!(
            reassemble(&advisory, short),
            Err(AdvisorError::Translation(_))
        ));

        texts.push("extra".into());
        assert!(matches!(
            reassemble(&advisory, texts),
            Err(AdvisorError::Translation(_))
        ));
    }

    #[test]
    fn reassemble_with_own_texts_is_identity() {
        let advisory = sample_advisory(true);
        let rebuilt = reassemble(&advisory, flatten(&advisory)).unwrap();
        assert_eq!(rebuilt, advisory);
    }

    #[tokio::test]
    async fn translates_every_text_in_place() {
        let advisory = sample_advisory(true);
        let reconstructor = TranslationReconstructor::new(TaggingTranslator, Language::English);

        let outcome = reconstructor.translate(&advisory, "hi").await;
        assert!(outcome.performed());

        let translated = outcome.translated().unwrap();
        assert_eq!(translated.crop_advice.recommendation, "[hi] crop rec");
        assert_eq!(translated.irrigation_advice.explanation, "[hi] irr why");
        let weather = translated.weather_advice.as_ref().unwrap();
        assert_eq!(weather.recommendations[1], "[hi] rec two");
        assert_eq!(weather.explanation, "[hi] weather why");
        assert_eq!(weather.warnings[1].message, "[hi] damp");
        assert_eq!(weather.current_weather.description, "haze");

        match outcome {
            TranslationOutcome::Translated {
                language,
                total_texts,
                successful_translations,
                ..
            } => {
                assert_eq!(language, Language::Hindi);
                assert_eq!(total_texts, 11);
                assert_eq!(successful_translations, 11);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn source_language_is_a_no_op() {
        let advisory = sample_advisory(true);
        let reconstructor = TranslationReconstructor::new(FailingTranslator, Language::English);

        let outcome = reconstructor.translate(&advisory, "EN").await;
        assert!(!outcome.performed());
        assert_eq!(outcome.advisory(), &advisory);
        assert_eq!(
            outcome.method(),
            Some(TranslationMethod::NoTranslationNeeded)
        );
        assert!(outcome.error().is_none());
    }

    #[tokio::test]
    async fn length_mismatch_abandons_translation() {
        let advisory = sample_advisory(true);
        let reconstructor = TranslationReconstructor::new(DroppingTranslator, Language::English);

        let outcome = reconstructor.translate(&advisory, "pa").await;
        assert!(!outcome.performed());
        assert!(outcome.translated().is_none());
        assert_eq!(outcome.advisory(), &advisory);
        assert!(outcome.error().unwrap().contains("expected 11"));
    }

    #[tokio::test]
    async fn batch_failure_keeps_original() {
        let advisory = sample_advisory(false);
        let reconstructor = TranslationReconstructor::new(FailingTranslator, Language::English);

        let outcome = reconstructor.translate(&advisory, "hi").await;
        assert_eq!(outcome.error(), Some("Translation failed: service down"));
        assert_eq!(outcome.advisory(), &advisory);
    }

    #[tokio::test]
    async fn unsupported_language_is_reported() {
        let advisory = sample_advisory(false);
        let reconstructor = TranslationReconstructor::new(TaggingTranslator, Language::English);

        let outcome = reconstructor.translate(&advisory, "fr").await;
        let reason = outcome.error().unwrap();
        assert!(reason.contains("fr"));
        assert!(reason.contains("en, hi, pa"));
    }

    fn category_advice() -> impl Strategy<Value = CategoryAdvice> {
        (".{0,40}", 1..=10i32, ".{0,40}", "[a-z_0-9]{1,16}").prop_map(
            |(recommendation, confidence, explanation, rule_applied)| {
                CategoryAdvice::new(recommendation, confidence, explanation, rule_applied)
            },
        )
    }

    fn warning() -> impl Strategy<Value = WeatherWarning> {
        (
            prop_oneof![
                Just(WarningType::HeatStress),
                Just(WarningType::FungalRisk),
                Just(WarningType::DiseasePressure),
                Just(WarningType::ColdStress),
            ],
            prop_oneof![Just(Severity::Medium), Just(Severity::High)],
            ".{0,40}",
        )
            .prop_map(|(t, s, m)| WeatherWarning::new(t, s, m))
    }

    fn weather_advice() -> impl Strategy<Value = WeatherAdvice> {
        (
            prop::collection::vec(warning(), 0..4),
            prop::collection::vec(".{0,40}", 0..8),
            6..=9i32,
            ".{0,40}",
        )
            .prop_map(
                |(warnings, recommendations, confidence, explanation)| WeatherAdvice {
                    current_weather: CurrentWeather {
                        temperature: "30°C".into(),
                        humidity: "60%".into(),
                        description: "clear sky".into(),
                    },
                    warnings,
                    recommendations,
                    confidence,
                    explanation,
                    rule_applied: "weather_analysis".into(),
                },
            )
    }

    fn advisory() -> impl Strategy<Value = Advisory> {
        (
            category_advice(),
            category_advice(),
            category_advice(),
            prop::option::of(weather_advice()),
            1.0..=10.0f64,
        )
            .prop_map(|(crop, fert, irr, weather, score)| Advisory {
                crop_advice: crop,
                fertilizer_advice: fert,
                irrigation_advice: irr,
                weather_advice: weather,
                confidence_score: score,
            })
    }

    fn non_text_fields(a: &Advisory) -> impl PartialEq + std::fmt::Debug {
        let categories: Vec<(i32, String)> = a
            .category_advice()
            .iter()
            .map(|c| (c.confidence, c.rule_applied.clone()))
            .collect();
        let weather = a.weather_advice.as_ref().map(|w| {
            (
                w.confidence,
                w.rule_applied.clone(),
                w.current_weather.clone(),
                w.recommendations.len(),
                w.warnings
                    .iter()
                    .map(|x| (x.warning_type, x.severity))
                    .collect::<Vec<_>>(),
            )
        });
        (categories, weather, a.confidence_score.to_bits())
    }

    proptest! {
        #[test]
        fn reassembly_preserves_structure(advisory in advisory()) {
            let texts = flatten(&advisory);
            let translated: Vec<String> = texts.iter().map(|t| format!("<{}>", t)).collect();

            let rebuilt = reassemble(&advisory, translated.clone()).unwrap();

            prop_assert_eq!(non_text_fields(&rebuilt), non_text_fields(&advisory));
            prop_assert_eq!(flatten(&rebuilt), translated);
        }

        #[test]
        fn any_count_mismatch_fails(advisory in advisory(), extra in 1usize..3, drop in any::<bool>()) {
            let mut texts = flatten(&advisory);
            if drop {
                texts.truncate(texts.len().saturating_sub(extra));
            } else {
                texts.extend((0..extra).map(|_| String::new()));
            }
            prop_assert!(reassemble(&advisory, texts).is_err());
        }
    }
}
