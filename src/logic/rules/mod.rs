pub mod crop;
pub mod engine;
pub mod fertilizer;
pub mod irrigation;
pub mod matcher;
pub mod store;
pub mod weather_risk;

pub use crop::CropResolver;
pub use engine::AdvisoryEngine;
pub use fertilizer::FertilizerResolver;
pub use irrigation::IrrigationResolver;
pub use matcher::RuleMatcher;
pub use store::{RuleSource, RuleStore};
pub use weather_risk::WeatherRiskResolver;

use crate::models::{AdvisoryInputs, CategoryAdvice, RuleCategory, RuleTable};

/// Produces the advice for one rule category, falling back through
/// progressively looser tiers until something applies.
pub trait CategoryResolver: Send + Sync {
    /// Category this resolver answers for
    fn category(&self) -> RuleCategory;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Always yields advice; the last tier is a static soil-keyed table.
    fn resolve(&self, table: &RuleTable, inputs: &AdvisoryInputs) -> CategoryAdvice;
}

/// Lower a rule confidence for a looser match, never below 1.
pub fn discounted(confidence: i32, penalty: i32) -> i32 {
    (confidence - penalty).max(1)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_floors_at_one() {
        assert_eq!(discounted(8, 2), 6);
        assert_eq!(discounted(2, 2), 1);
        assert_eq!(discounted(1, 1), 1);
    }
}
