use super::{
    CategoryResolver, CropResolver, FertilizerResolver, IrrigationResolver, WeatherRiskResolver,
};
use crate::logic::confidence;
use crate::models::{Advisory, AdvisoryInputs, RuleCategory, RuleTable, WeatherReading};
use std::sync::Arc;

/// Composes a full advisory from the category resolvers and optional weather.
///
/// The rule table is shared read-only, so one engine can serve concurrent requests.
pub struct AdvisoryEngine {
    rules: Arc<RuleTable>,
    crop: CropResolver,
    fertilizer: FertilizerResolver,
    irrigation: IrrigationResolver,
    weather: WeatherRiskResolver,
}

impl AdvisoryEngine {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self {
            rules,
            crop: CropResolver,
            fertilizer: FertilizerResolver,
            irrigation: IrrigationResolver,
            weather: WeatherRiskResolver,
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn resolver(&self, category: RuleCategory) -> &dyn CategoryResolver {
        match category {
            RuleCategory::CropSuitability => &self.crop,
            RuleCategory::FertilizerAdvice => &self.fertilizer,
            RuleCategory::IrrigationAdvice => &self.irrigation,
        }
    }

    pub fn list_resolvers(&self) -> Vec<(RuleCategory, &'static str)> {
        RuleCategory::ALL
            .iter()
            .map(|c| (*c, self.resolver(*c).name()))
            .collect()
    }

    /// Build an advisory. Pure and deterministic for identical arguments.
    pub fn compose(
        &self,
        crop: Option<&str>,
        soil_type: &str,
        season: &str,
        weather: Option<&WeatherReading>,
    ) -> Advisory {
        let inputs = AdvisoryInputs::normalize(crop, soil_type, season);
        self.compose_inputs(&inputs, weather)
    }

    pub fn compose_inputs(
        &self,
        inputs: &AdvisoryInputs,
        weather: Option<&WeatherReading>,
    ) -> Advisory {
        let resolve = |category| self.resolver(category).resolve(&self.rules, inputs);

        let crop_advice = resolve(RuleCategory::CropSuitability);
        let fertilizer_advice = resolve(RuleCategory::FertilizerAdvice);
        let irrigation_advice = resolve(RuleCategory::IrrigationAdvice);

        let weather_advice = weather.map(|w| self.weather.resolve(w, inputs));

        let confidence_score =
            confidence::aggregate(&[&crop_advice, &fertilizer_advice, &irrigation_advice]);

        Advisory {
            crop_advice,
            fertilizer_advice,
            irrigation_advice,
            weather_advice,
            confidence_score,
        }
    }
}
