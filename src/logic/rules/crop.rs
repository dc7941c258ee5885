use super::{CategoryResolver, RuleMatcher};
use crate::models::{tags, AdvisoryInputs, CategoryAdvice, RuleCategory, RuleTable};

/// Crop suitability resolver
///
/// With a crop given, checks it against the soil/season suitability rules
/// (validation mode). Without one, recommends the best-matching rule's crops,
/// falling back to a static per-soil suggestion.
///
/// Validation is a substring test on the rule text, so a crop named inside
/// another crop's recommendation still validates.
pub struct CropResolver;

impl CategoryResolver for CropResolver {
    fn category(&self) -> RuleCategory {
        RuleCategory::CropSuitability
    }

    fn name(&self) -> &'static str {
        "Crop Suitability"
    }

    fn resolve(&self, table: &RuleTable, inputs: &AdvisoryInputs) -> CategoryAdvice {
        if let Some(crop) = inputs.known_crop() {
            return self.validate_crop(table, inputs, crop);
        }

        let matcher = RuleMatcher::new(table);
        match matcher.best(
            RuleCategory::CropSuitability,
            &inputs.soil_type,
            &inputs.season,
            None,
        ) {
            Some(rule) => {
                tracing::debug!("Crop recommendation from rule {}", rule.id);
                CategoryAdvice::new(
                    rule.recommendation.clone(),
                    rule.confidence,
                    format!(
                        "Based on {} soil and {} season analysis",
                        inputs.soil_type, inputs.season
                    ),
                    rule.id.clone(),
                )
            }
            None => self.default_advice(inputs),
        }
    }
}

impl CropResolver {
    fn validate_crop(
        &self,
        table: &RuleTable,
        inputs: &AdvisoryInputs,
        crop: &str,
    ) -> CategoryAdvice {
        let needle = crop.to_lowercase();
        let mentioned = RuleMatcher::new(table)
            .find(
                RuleCategory::CropSuitability,
                &inputs.soil_type,
                &inputs.season,
                None,
            )
            .iter()
            .any(|rule| rule.recommendation.to_lowercase().contains(&needle));

        if mentioned {
            CategoryAdvice::new(
                format!(
                    "{} is suitable for {} soil during {} season.",
                    crop, inputs.soil_type, inputs.season
                ),
                8,
                "Crop validated against soil-season suitability database",
                tags::CROP_VALIDATION,
            )
        } else {
            CategoryAdvice::new(
                format!(
                    "{} may not be optimal for {} soil during {} season. \
                     Consider local expert consultation.",
                    crop, inputs.soil_type, inputs.season
                ),
                4,
                "Crop not found in recommended list for these conditions",
                tags::CROP_CAUTION,
            )
        }
    }

    fn default_advice(&self, inputs: &AdvisoryInputs) -> CategoryAdvice {
        let advice = default_crop_for_soil(&inputs.soil_type)
            .unwrap_or("Consult local agricultural experts for crop recommendations.");

        CategoryAdvice::new(
            advice,
            5,
            format!(
                "General guidance based on {} soil characteristics",
                inputs.soil_type
            ),
            tags::DEFAULT_CROP,
        )
    }
}

fn default_crop_for_soil(soil_type: &str) -> Option<&'static str> {
    match soil_type.to_lowercase().as_str() {
        "sandy" => Some(
            "Consider drought-resistant crops like millets, groundnut, or watermelon for sandy soil.",
        ),
        "clay" => Some("Rice, wheat, and sugarcane are suitable for water-retentive clay soil."),
        "loamy" => Some("Loamy soil supports most crops including wheat, maize, and vegetables."),
        "black" => Some("Cotton, sugarcane, and cereals perform well in fertile black soil."),
        "red" => Some("Millets, pulses, and oilseeds are adapted to red soil conditions."),
        "alluvial" => {
            Some("Most crops including rice, wheat, and vegetables thrive in alluvial soil.")
        }
        _ => None,
    }
}
