use serde::{Deserialize, Serialize};

/// Fallback-policy tags reported in `rule_applied` when no rule id applies.
pub mod tags {
    pub const CROP_VALIDATION: &str = "crop_validation";
    pub const CROP_CAUTION: &str = "crop_caution";
    pub const DEFAULT_CROP: &str = "default_crop";
    pub const DEFAULT_FERTILIZER: &str = "default_fertilizer";
    pub const DEFAULT_IRRIGATION: &str = "default_irrigation";
    pub const WEATHER_ANALYSIS: &str = "weather_analysis";
}

/// Advice for one rule category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAdvice {
    pub recommendation: String,
    pub confidence: i32,
    pub explanation: String,
    pub rule_applied: String,
}

impl CategoryAdvice {
    pub fn new(
        recommendation: impl Into<String>,
        confidence: i32,
        explanation: impl Into<String>,
        rule_applied: impl Into<String>,
    ) -> Self {
        Self {
            recommendation: recommendation.into(),
            confidence,
            explanation: explanation.into(),
            rule_applied: rule_applied.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Medium => "⚠",
            Severity::High => "!",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    HeatStress,
    FungalRisk,
    DiseasePressure,
    ColdStress,
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::HeatStress => "heat_stress",
            WarningType::FungalRisk => "fungal_risk",
            WarningType::DiseasePressure => "disease_pressure",
            WarningType::ColdStress => "cold_stress",
        }
    }
}

impl std::fmt::Display for WarningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherWarning {
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    pub severity: Severity,
    pub message: String,
}

impl WeatherWarning {
    pub fn new(warning_type: WarningType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            severity,
            message: message.into(),
        }
    }
}

/// Current conditions rendered with units for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: String,
    pub humidity: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdvice {
    pub current_weather: CurrentWeather,
    pub warnings: Vec<WeatherWarning>,
    pub recommendations: Vec<String>,
    pub confidence: i32,
    pub explanation: String,
    pub rule_applied: String,
}

/// The complete recommendation set for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub crop_advice: CategoryAdvice,
    pub fertilizer_advice: CategoryAdvice,
    pub irrigation_advice: CategoryAdvice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_advice: Option<WeatherAdvice>,
    pub confidence_score: f64,
}

impl Advisory {
    pub fn category_advice(&self) -> [&CategoryAdvice; 3] {
        [
            &self.crop_advice,
            &self.fertilizer_advice,
            &self.irrigation_advice,
        ]
    }
}

/// Human-readable band for a 1-10 confidence value.
pub fn confidence_label(confidence: f64) -> &'static str {
    if confidence >= 9.0 {
        "Very High"
    } else if confidence >= 7.0 {
        "High"
    } else if confidence >= 5.0 {
        "Medium"
    } else if confidence >= 3.0 {
        "Low"
    } else {
        "Very Low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_label_bands() {
        assert_eq!(confidence_label(9.0), "Very High");
        assert_eq!(confidence_label(8.7), "High");
        assert_eq!(confidence_label(5.0), "Medium");
        assert_eq!(confidence_label(4.9), "Low");
        assert_eq!(confidence_label(1.0), "Very Low");
    }

    #[test]
    fn advisory_serializes_camel_case_without_weather() {
        let advice = CategoryAdvice::new("Plant rice", 8, "Clay holds water", "cs002");
        let advisory = Advisory {
            crop_advice: advice.clone(),
            fertilizer_advice: advice.clone(),
            irrigation_advice: advice,
            weather_advice: None,
            confidence_score: 8.0,
        };

        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["cropAdvice"]["ruleApplied"], "cs002");
        assert_eq!(json["confidenceScore"], 8.0);
        assert!(json.get("weatherAdvice").is_none());
    }

    #[test]
    fn warning_serializes_type_and_severity() {
        let warning = WeatherWarning::new(WarningType::HeatStress, Severity::High, "Hot");
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["type"], "heat_stress");
        assert_eq!(json["severity"], "high");
    }
}
