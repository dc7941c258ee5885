use crate::error::{AdvisorError, Result};
use crate::models::{Rule, RuleCategory, RuleConditions, RuleMetadata, RuleTable};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;

/// Rule table shipped with the binary.
const EMBEDDED_RULES: &str = include_str!("../../../data/advisory_rules.json");

#[derive(Debug, Clone, PartialEq)]
pub enum RuleSource {
    Embedded,
    File(PathBuf),
}

impl RuleSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(RuleSource::File).unwrap_or(RuleSource::Embedded)
    }
}

impl std::fmt::Display for RuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSource::Embedded => write!(f, "embedded rule table"),
            RuleSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleDocument {
    #[serde(default)]
    crop_suitability: Vec<serde_json::Value>,
    #[serde(default)]
    fertilizer_advice: Vec<serde_json::Value>,
    #[serde(default)]
    irrigation_advice: Vec<serde_json::Value>,
    #[serde(default)]
    metadata: RuleMetadata,
}

#[derive(Debug, Deserialize)]
struct RuleRecord {
    id: String,
    conditions: RuleConditions,
    recommendation: String,
    #[serde(deserialize_with = "any_number")]
    confidence: i32,
}

/// Accepts any JSON number; fractional weights round to the nearest integer.
fn any_number<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i32)
}

impl RuleRecord {
    fn into_rule(self, category: RuleCategory) -> Rule {
        Rule {
            id: self.id,
            category,
            conditions: self.conditions,
            recommendation: self.recommendation,
            confidence: self.confidence,
        }
    }
}

/// Converts records one at a time so a single unusable rule does not sink its siblings.
fn into_rules(records: Vec<serde_json::Value>, category: RuleCategory) -> Vec<Rule> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<RuleRecord>(value) {
                Ok(record) => Some(record.into_rule(category)),
                Err(e) => {
                    tracing::warn!("Skipping {}[{}]: {}", category.document_key(), index, e);
                    None
                }
            }
        })
        .collect()
}

/// Loads the rule table once at startup.
pub struct RuleStore;

impl RuleStore {
    /// Never fails: an unreadable or malformed source degrades to an empty table.
    pub fn load(source: &RuleSource) -> RuleTable {
        let text = match source {
            RuleSource::Embedded => Cow::Borrowed(EMBEDDED_RULES),
            RuleSource::File(path) => match std::fs::read_to_string(path) {
                Ok(text) => Cow::Owned(text),
                Err(e) => {
                    tracing::error!("Failed to read rules from {}: {}", path.display(), e);
                    return RuleTable::degraded(format!("Failed to read {}: {}", source, e));
                }
            },
        };

        let table = Self::parse(&text);
        if !table.is_degraded() {
            tracing::info!(
                "Loaded {} rules from {} (declared: {})",
                table.total_rules(),
                source,
                table
                    .metadata
                    .total_rules
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "n/a".into())
            );
        }
        table
    }

    pub fn parse(text: &str) -> RuleTable {
        match Self::try_parse(text) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("Failed to parse rule table: {}", e);
                RuleTable::degraded(e.to_string())
            }
        }
    }

    fn try_parse(text: &str) -> Result<RuleTable> {
        let document: RuleDocument = serde_json::from_str(text).map_err(AdvisorError::Json)?;

        Ok(RuleTable {
            crop_suitability: into_rules(document.crop_suitability, RuleCategory::CropSuitability),
            fertilizer_advice: into_rules(
                document.fertilizer_advice,
                RuleCategory::FertilizerAdvice,
            ),
            irrigation_advice: into_rules(
                document.irrigation_advice,
                RuleCategory::IrrigationAdvice,
            ),
            metadata: document.metadata,
            load_error: None,
        })
    }
}
