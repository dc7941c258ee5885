use serde::{Deserialize, Serialize};

/// The three advisory domains covered by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    CropSuitability,
    FertilizerAdvice,
    IrrigationAdvice,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 3] = [
        RuleCategory::CropSuitability,
        RuleCategory::FertilizerAdvice,
        RuleCategory::IrrigationAdvice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::CropSuitability => "Crop Suitability",
            RuleCategory::FertilizerAdvice => "Fertilizer Advice",
            RuleCategory::IrrigationAdvice => "Irrigation Advice",
        }
    }

    /// Key of the category's array in the rule document.
    pub fn document_key(&self) -> &'static str {
        match self {
            RuleCategory::CropSuitability => "cropSuitability",
            RuleCategory::FertilizerAdvice => "fertilizerAdvice",
            RuleCategory::IrrigationAdvice => "irrigationAdvice",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wildcard value accepted by every condition field.
pub const ANY: &str = "any";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConditions {
    pub soil: String,
    pub season: String,
    /// `None` means the rule does not discriminate by crop at all.
    #[serde(default)]
    pub crop: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: String,
    pub category: RuleCategory,
    pub conditions: RuleConditions,
    pub recommendation: String,
    /// Expected in 1..=10 but carried as loaded.
    pub confidence: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    #[serde(default)]
    pub total_rules: Option<u32>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Immutable rule table, grouped by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    pub crop_suitability: Vec<Rule>,
    pub fertilizer_advice: Vec<Rule>,
    pub irrigation_advice: Vec<Rule>,
    pub metadata: RuleMetadata,
    /// Set when the source could not be read or parsed and the table degraded to empty.
    pub load_error: Option<String>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            load_error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn rules(&self, category: RuleCategory) -> &[Rule] {
        match category {
            RuleCategory::CropSuitability => &self.crop_suitability,
            RuleCategory::FertilizerAdvice => &self.fertilizer_advice,
            RuleCategory::IrrigationAdvice => &self.irrigation_advice,
        }
    }

    pub fn total_rules(&self) -> usize {
        RuleCategory::ALL
            .iter()
            .map(|category| self.rules(*category).len())
            .sum()
    }

    pub fn is_degraded(&self) -> bool {
        self.load_error.is_some()
    }
}
