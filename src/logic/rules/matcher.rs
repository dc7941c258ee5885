use crate::models::{Rule, RuleCategory, RuleConditions, RuleTable, ANY};

/// Case-insensitive equality used for every condition comparison.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn field_matches(condition: &str, value: &str) -> bool {
    condition == ANY || eq_ignore_case(condition, value)
}

/// Finds the rules of one category that apply to a soil/season/crop combination.
pub struct RuleMatcher<'a> {
    table: &'a RuleTable,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// Matching rules, highest confidence first. Equal confidences keep table order.
    ///
    /// A `None` crop, or a rule with no crop condition, skips the crop check entirely.
    pub fn find(
        &self,
        category: RuleCategory,
        soil_type: &str,
        season: &str,
        crop: Option<&str>,
    ) -> Vec<&'a Rule> {
        let mut matches: Vec<&'a Rule> = self
            .table
            .rules(category)
            .iter()
            .filter(|rule| conditions_match(&rule.conditions, soil_type, season, crop))
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        matches
    }

    /// Highest-confidence match, if any.
    pub fn best(
        &self,
        category: RuleCategory,
        soil_type: &str,
        season: &str,
        crop: Option<&str>,
    ) -> Option<&'a Rule> {
        self.find(category, soil_type, season, crop).into_iter().next()
    }

    /// First rule in table order naming `crop`, regardless of soil and season.
    pub fn first_for_crop(&self, category: RuleCategory, crop: &str) -> Option<&'a Rule> {
        self.table.rules(category).iter().find(|rule| {
            rule.conditions
                .crop
                .as_deref()
                .is_some_and(|rule_crop| eq_ignore_case(rule_crop, crop))
        })
    }
}

fn conditions_match(
    conditions: &RuleConditions,
    soil_type: &str,
    season: &str,
    crop: Option<&str>,
) -> bool {
    let soil_match = field_matches(&conditions.soil, soil_type);
    let season_match = field_matches(&conditions.season, season);
    let crop_match = match (conditions.crop.as_deref(), crop) {
        (Some(rule_crop), Some(crop)) => field_matches(rule_crop, crop),
        _ => true,
    };

    soil_match && season_match && crop_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(id: &str, soil: &str, season: &str, crop: Option<&str>, confidence: i32) -> Rule {
        Rule {
            id: id.to_string(),
            category: RuleCategory::IrrigationAdvice,
            conditions: RuleConditions {
                soil: soil.to_string(),
                season: season.to_string(),
                crop: crop.map(str::to_string),
            },
            recommendation: format!("recommendation {}", id),
            confidence,
        }
    }

    fn table(rules: Vec<Rule>) -> RuleTable {
        RuleTable {
            irrigation_advice: rules,
            ..RuleTable::default()
        }
    }

    fn ids(rules: &[&Rule]) -> Vec<String> {
        rules.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn matches_are_case_insensitive() {
        let table = table(vec![rule("r1", "Clay", "Kharif", Some("Rice"), 8)]);
        let matcher = RuleMatcher::new(&table);
        let found = matcher.find(RuleCategory::IrrigationAdvice, "clay", "KHARIF", Some("rice"));
        assert_eq!(ids(&found), vec!["r1"]);
    }

    #[test]
    fn any_matches_every_value() {
        let table = table(vec![rule("r1", "any", "any", Some("any"), 5)]);
        let matcher = RuleMatcher::new(&table);
        assert_eq!(
            matcher
                .find(RuleCategory::IrrigationAdvice, "Red", "Winter", Some("Ragi"))
                .len(),
            1
        );
    }

    #[test]
    fn crop_is_not_discriminated_when_either_side_is_null() {
        let table = table(vec![
            rule("specific", "Clay", "Kharif", Some("Rice"), 8),
            rule("cropless", "Clay", "Kharif", None, 7),
        ]);
        let matcher = RuleMatcher::new(&table);

        let query_null = matcher.find(RuleCategory::IrrigationAdvice, "Clay", "Kharif", None);
        assert_eq!(ids(&query_null), vec!["specific", "cropless"]);

        let query_wheat =
            matcher.find(RuleCategory::IrrigationAdvice, "Clay", "Kharif", Some("Wheat"));
        assert_eq!(ids(&query_wheat), vec!["cropless"]);
    }

    #[test]
    fn sorted_by_confidence_descending_and_stable() {
        let table = table(vec![
            rule("a", "any", "any", None, 6),
            rule("b", "any", "any", None, 9),
            rule("c", "any", "any", None, 6),
            rule("d", "any", "any", None, 9),
        ]);
        let matcher = RuleMatcher::new(&table);
        let found = matcher.find(RuleCategory::IrrigationAdvice, "Clay", "Rabi", None);
        assert_eq!(ids(&found), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn empty_category_returns_nothing() {
        let table = RuleTable::empty();
        let matcher = RuleMatcher::new(&table);
        assert!(matcher
            .find(RuleCategory::FertilizerAdvice, "Clay", "Rabi", Some("Wheat"))
            .is_empty());
        assert!(matcher
            .best(RuleCategory::CropSuitability, "Clay", "Rabi", None)
            .is_none());
    }

    #[test]
    fn first_for_crop_ignores_soil_season_and_confidence() {
        let table = table(vec![
            rule("cropless", "any", "any", None, 10),
            rule("wheat-low", "Sandy", "Summer", Some("Wheat"), 3),
            rule("wheat-high", "Clay", "Rabi", Some("wheat"), 9),
        ]);
        let matcher = RuleMatcher::new(&table);
        let found = matcher
            .first_for_crop(RuleCategory::IrrigationAdvice, "WHEAT")
            .unwrap();
        assert_eq!(found.id, "wheat-low");
        assert!(matcher
            .first_for_crop(RuleCategory::IrrigationAdvice, "Rice")
            .is_none());
    }

    proptest! {
        #[test]
        fn find_is_sorted_and_stable(confidences in prop::collection::vec(1i32..=10, 0..40)) {
            let rules: Vec<Rule> = confidences
                .iter()
                .enumerate()
                .map(|(i, c)| rule(&i.to_string(), "any", "any", None, *c))
                .collect();
            let table = table(rules);
            let matcher = RuleMatcher::new(&table);
            let found = matcher.find(RuleCategory::IrrigationAdvice, "Loamy", "Rabi", None);

            prop_assert_eq!(found.len(), confidences.len());
            for pair in found.windows(2) {
                prop_assert!(pair[0].confidence >= pair[1].confidence);
                if pair[0].confidence == pair[1].confidence {
                    let first: usize = pair[0].id.parse().unwrap();
                    let second: usize = pair[1].id.parse().unwrap();
                    prop_assert!(first < second);
                }
            }
        }
    }
}
