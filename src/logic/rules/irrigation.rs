use super::{discounted, CategoryResolver, RuleMatcher};
use crate::models::{tags, AdvisoryInputs, CategoryAdvice, RuleCategory, RuleTable, ANY};

/// Irrigation resolver
///
/// Tiers:
/// 1. rule matching the crop as given (an absent crop matches every rule)
/// 2. soil/season rule for any crop, confidence -1
/// 3. static soil-keyed schedule with a seasonal note, confidence 5
pub struct IrrigationResolver;

const SOIL_SEASON_PENALTY: i32 = 1;

impl CategoryResolver for IrrigationResolver {
    fn category(&self) -> RuleCategory {
        RuleCategory::IrrigationAdvice
    }

    fn name(&self) -> &'static str {
        "Irrigation Advice"
    }

    fn resolve(&self, table: &RuleTable, inputs: &AdvisoryInputs) -> CategoryAdvice {
        let matcher = RuleMatcher::new(table);

        if let Some(rule) = matcher.best(
            RuleCategory::IrrigationAdvice,
            &inputs.soil_type,
            &inputs.season,
            inputs.crop.as_deref(),
        ) {
            tracing::debug!("Irrigation advice from rule {}", rule.id);
            return CategoryAdvice::new(
                rule.recommendation.clone(),
                rule.confidence,
                format!(
                    "Irrigation schedule for {} soil during {} season",
                    inputs.soil_type, inputs.season
                ),
                rule.id.clone(),
            );
        }

        if let Some(rule) = matcher.best(
            RuleCategory::IrrigationAdvice,
            &inputs.soil_type,
            &inputs.season,
            Some(ANY),
        ) {
            tracing::debug!("Irrigation advice from soil/season rule {}", rule.id);
            return CategoryAdvice::new(
                rule.recommendation.clone(),
                discounted(rule.confidence, SOIL_SEASON_PENALTY),
                format!(
                    "Irrigation guidance for {} soil in {} season",
                    inputs.soil_type, inputs.season
                ),
                rule.id.clone(),
            );
        }

        self.general_advice(inputs)
    }
}

impl IrrigationResolver {
    fn general_advice(&self, inputs: &AdvisoryInputs) -> CategoryAdvice {
        let base = irrigation_for_soil(&inputs.soil_type)
            .unwrap_or("Irrigate based on crop and soil requirements.");
        let season_note = season_adjustment(&inputs.season).unwrap_or("");

        CategoryAdvice::new(
            format!("{}{}", base, season_note),
            5,
            format!(
                "General irrigation guidance for {} soil in {} season",
                inputs.soil_type, inputs.season
            ),
            tags::DEFAULT_IRRIGATION,
        )
    }
}

fn irrigation_for_soil(soil_type: &str) -> Option<&'static str> {
    match soil_type.to_lowercase().as_str() {
        "sandy" => Some("Irrigate frequently with smaller amounts. Sandy soil drains quickly."),
        "clay" => Some("Irrigate less frequently but thoroughly. Clay soil retains water well."),
        "loamy" => Some("Irrigate moderately based on crop needs."),
        "black" => Some("Monitor soil moisture to prevent waterlogging."),
        "red" => Some("Maintain consistent moisture levels with regular irrigation."),
        "alluvial" => Some("Irrigate based on crop requirements and soil moisture."),
        _ => None,
    }
}

fn season_adjustment(season: &str) -> Option<&'static str> {
    match season.to_lowercase().as_str() {
        "summer" => Some(" Increase frequency during hot weather."),
        "winter" => Some(" Reduce frequency in cooler weather."),
        "kharif" => Some(" Supplement monsoon rainfall as needed."),
        "rabi" => Some(" Provide regular irrigation during dry season."),
        _ => None,
    }
}
