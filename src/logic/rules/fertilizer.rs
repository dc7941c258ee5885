use super::{discounted, CategoryResolver, RuleMatcher};
use crate::models::{tags, AdvisoryInputs, CategoryAdvice, RuleCategory, RuleTable};

/// Fertilizer resolver
///
/// Tiers:
/// 1. crop + soil + season rule, highest confidence
/// 2. first rule naming the crop in table order, confidence -2
/// 3. static soil-keyed guidance, confidence 5
///
/// Tier 2 deliberately takes the first rule rather than the most confident one.
pub struct FertilizerResolver;

const GENERIC_CROP_PENALTY: i32 = 2;

impl CategoryResolver for FertilizerResolver {
    fn category(&self) -> RuleCategory {
        RuleCategory::FertilizerAdvice
    }

    fn name(&self) -> &'static str {
        "Fertilizer Advice"
    }

    fn resolve(&self, table: &RuleTable, inputs: &AdvisoryInputs) -> CategoryAdvice {
        let Some(crop) = inputs.known_crop() else {
            return self.general_advice(inputs);
        };

        let matcher = RuleMatcher::new(table);

        if let Some(rule) = matcher.best(
            RuleCategory::FertilizerAdvice,
            &inputs.soil_type,
            &inputs.season,
            Some(crop),
        ) {
            tracing::debug!("Fertilizer advice from rule {}", rule.id);
            return CategoryAdvice::new(
                rule.recommendation.clone(),
                rule.confidence,
                format!(
                    "Fertilizer guidance for {} in {} soil",
                    crop, inputs.soil_type
                ),
                rule.id.clone(),
            );
        }

        if let Some(rule) = matcher.first_for_crop(RuleCategory::FertilizerAdvice, crop) {
            tracing::debug!("Fertilizer advice from crop-general rule {}", rule.id);
            return CategoryAdvice::new(
                rule.recommendation.clone(),
                discounted(rule.confidence, GENERIC_CROP_PENALTY),
                format!("General fertilizer advice for {}", crop),
                rule.id.clone(),
            );
        }

        self.general_advice(inputs)
    }
}

impl FertilizerResolver {
    fn general_advice(&self, inputs: &AdvisoryInputs) -> CategoryAdvice {
        let advice = general_fertilizer_for_soil(&inputs.soil_type)
            .unwrap_or("Apply balanced fertilizers based on soil testing.");

        CategoryAdvice::new(
            advice,
            5,
            format!("General fertilizer guidance for {} soil", inputs.soil_type),
            tags::DEFAULT_FERTILIZER,
        )
    }
}

fn general_fertilizer_for_soil(soil_type: &str) -> Option<&'static str> {
    match soil_type.to_lowercase().as_str() {
        "sandy" => {
            Some("Apply fertilizers in small, frequent doses. Sandy soil has low nutrient retention.")
        }
        "clay" => Some(
            "Apply fertilizers in larger doses less frequently. Clay soil retains nutrients well.",
        ),
        "loamy" => Some("Apply balanced NPK fertilizers according to crop requirements."),
        "black" => Some("Focus on maintaining soil health. Black soil is naturally fertile."),
        "red" => Some("Use phosphorus-rich fertilizers and lime to improve soil fertility."),
        "alluvial" => Some("Apply fertilizers based on soil testing results."),
        _ => None,
    }
}
