use crate::models::{Language, TextTranslation, TranslationMethod};
use std::collections::HashMap;

const HINDI_TERMS: &[(&str, &str)] = &[
    // Farming terms
    ("crop", "फसल"),
    ("soil", "मिट्टी"),
    ("water", "पानी"),
    ("fertilizer", "उर्वरक"),
    ("irrigation", "सिंचाई"),
    ("season", "मौसम"),
    ("temperature", "तापमान"),
    ("humidity", "नमी"),
    ("weather", "मौसम"),
    ("advice", "सलाह"),
    ("recommendation", "सिफारिश"),
    ("confidence", "विश्वास"),
    ("high", "उच्च"),
    ("medium", "मध्यम"),
    ("low", "कम"),
    ("warning", "चेतावनी"),
    ("alert", "अलर्ट"),
    // Soils
    ("sandy", "रेतीली"),
    ("clay", "चिकनी मिट्टी"),
    ("loamy", "दोमट"),
    ("black", "काली मिट्टी"),
    ("red", "लाल मिट्टी"),
    ("alluvial", "जलोढ़"),
    // Seasons
    ("kharif", "खरीफ"),
    ("rabi", "रबी"),
    ("summer", "गर्मी"),
    ("winter", "सर्दी"),
    // Crops
    ("rice", "चावल"),
    ("wheat", "गेहूं"),
    ("maize", "मक्का"),
    ("cotton", "कपास"),
    ("sugarcane", "गन्ना"),
    // Weather
    ("cloudy", "बादल"),
    ("rain", "बारिश"),
    ("storm", "तूफान"),
];

const PUNJABI_TERMS: &[(&str, &str)] = &[
    // Farming terms
    ("crop", "ਫਸਲ"),
    ("soil", "ਮਿੱਟੀ"),
    ("water", "ਪਾਣੀ"),
    ("fertilizer", "ਖਾਦ"),
    ("irrigation", "ਸਿੰਚਾਈ"),
    ("season", "ਮੌਸਮ"),
    ("temperature", "ਤਾਪਮਾਨ"),
    ("humidity", "ਨਮੀ"),
    ("weather", "ਮੌਸਮ"),
    ("advice", "ਸਲਾਹ"),
    ("recommendation", "ਸਿਫਾਰਸ਼"),
    ("confidence", "ਭਰੋਸਾ"),
    ("high", "ਉੱਚਾ"),
    ("medium", "ਮੱਧਮ"),
    ("low", "ਘੱਟ"),
    ("warning", "ਚੇਤਾਵਨੀ"),
    ("alert", "ਅਲਰਟ"),
    // Soils
    ("sandy", "ਰੇਤਲੀ"),
    ("clay", "ਚਿਕਨੀ ਮਿੱਟੀ"),
    ("loamy", "ਦੋਮਟ"),
    ("black", "ਕਾਲੀ ਮਿੱਟੀ"),
    ("red", "ਲਾਲ ਮਿੱਟੀ"),
    ("alluvial", "ਜਲੋਢ਼"),
    // Seasons
    ("kharif", "ਖਰੀਫ"),
    ("rabi", "ਰਬੀ"),
    ("summer", "ਗਰਮੀ"),
    ("winter", "ਸਰਦੀ"),
    // Crops
    ("rice", "ਚਾਵਲ"),
    ("wheat", "ਕਣਕ"),
    ("maize", "ਮੱਕੀ"),
    ("cotton", "ਕਪਾਹ"),
    ("sugarcane", "ਗੰਨਾ"),
    // Weather
    ("cloudy", "ਬੱਦਲ"),
    ("rain", "ਮੀਂਹ"),
    ("storm", "ਤੂਫਾਨ"),
];

/// Word-by-word translation from a fixed farming glossary.
///
/// Always succeeds. Unknown words are kept (lower-cased), and the confidence is the
/// share of words found in the glossary.
#[derive(Debug, Clone)]
pub struct DictionaryTranslator {
    tables: HashMap<Language, HashMap<&'static str, &'static str>>,
}

impl Default for DictionaryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryTranslator {
    pub fn new() -> Self {
        let tables = [
            (Language::Hindi, HINDI_TERMS),
            (Language::Punjabi, PUNJABI_TERMS),
        ]
        .into_iter()
        .map(|(language, terms)| (language, terms.iter().copied().collect()))
        .collect();
        Self { tables }
    }

    pub fn term_count(&self, language: Language) -> usize {
        self.tables.get(&language).map_or(0, HashMap::len)
    }

    pub fn translate(&self, text: &str, target: Language) -> TextTranslation {
        let Some(table) = self.tables.get(&target) else {
            return TextTranslation::untranslated(text, TranslationMethod::FallbackOriginal);
        };

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        let mut found = 0usize;
        let translated: Vec<&str> = words
            .iter()
            .map(|word| match table.get(lookup_key(word).as_str()) {
                Some(term) => {
                    found += 1;
                    *term
                }
                None => *word,
            })
            .collect();

        let confidence = if words.is_empty() {
            0.0
        } else {
            round_to_hundredth(found as f64 / words.len() as f64)
        };

        TextTranslation {
            success: true,
            original_text: text.to_string(),
            translated_text: translated.join(" "),
            confidence,
            method: TranslationMethod::MockDictionary,
        }
    }
}

/// Word with everything but ASCII letters, digits and underscores removed.
fn lookup_key(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn translates_known_words_and_keeps_the_rest() {
        let result = DictionaryTranslator::new().translate("Crop advice for Wheat", Language::Hindi);
        assert!(result.success);
        assert_eq!(result.method, TranslationMethod::MockDictionary);
        assert_eq!(result.translated_text, "फसल सलाह for गेहूं");
        assert_relative_eq!(result.confidence, 0.75);
        assert_eq!(result.original_text, "Crop advice for Wheat");
    }

    #[test]
    fn punctuation_is_ignored_for_lookup() {
        let result = DictionaryTranslator::new().translate("Irrigate rice, then wheat.", Language::Punjabi);
        assert_eq!(result.translated_text, "irrigate ਚਾਵਲ then ਕਣਕ");
        assert_relative_eq!(result.confidence, 0.5);
    }

    #[test]
    fn confidence_rounds_to_two_decimals() {
        let result = DictionaryTranslator::new().translate("rice is good", Language::Hindi);
        assert_relative_eq!(result.confidence, 0.33);
    }

    #[test]
    fn empty_text_has_zero_confidence() {
        let result = DictionaryTranslator::new().translate("   ", Language::Hindi);
        assert!(result.success);
        assert_eq!(result.translated_text, "");
        assert_relative_eq!(result.confidence, 0.0);
    }

    #[test]
    fn english_has_no_table() {
        let dictionary = DictionaryTranslator::new();
        assert_eq!(dictionary.term_count(Language::English), 0);
        let result = dictionary.translate("Rice", Language::English);
        assert_eq!(result.method, TranslationMethod::FallbackOriginal);
        assert_eq!(result.translated_text, "Rice");
    }

    #[test]
    fn tables_cover_the_same_terms() {
        let hindi: Vec<&str> = HINDI_TERMS.iter().map(|(k, _)| *k).collect();
        let punjabi: Vec<&str> = PUNJABI_TERMS.iter().map(|(k, _)| *k).collect();
        assert_eq!(hindi, punjabi);
        assert_eq!(DictionaryTranslator::new().term_count(Language::Hindi), hindi.len());
    }
}
