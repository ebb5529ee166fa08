//! Recommendation rules.
//!
//! A flat, ordered list of independent predicate/advice pairs. Every rule is
//! checked; the ones that fire are emitted in list order.

use crate::model::{Priority, Recommendation, SoilType};

/// Values the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    /// Computed feasibility score.
    pub feasibility_score: u32,
    /// Roof area in square feet.
    pub roof_area: f64,
    /// Annual rainfall in millimeters.
    pub annual_rainfall: f64,
    /// Soil type as supplied.
    pub soil_type: &'a SoilType,
}

/// One predicate plus the advice it produces.
pub struct Rule {
    /// Whether the rule fires.
    pub applies: fn(&RecommendationContext<'_>) -> bool,
    /// Heading.
    pub title: &'static str,
    /// Advice text.
    pub description: &'static str,
    /// Priority.
    pub priority: Priority,
}

impl Rule {
    fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            title: self.title.to_string(),
            description: self.description.to_string(),
            priority: self.priority,
        }
    }
}

/// Rules in output order.
pub static RULES: &[Rule] = &[
    Rule {
        applies: |ctx| ctx.feasibility_score >= 80,
        title: "Excellent Potential",
        description: "Your property has excellent rainwater harvesting potential. We highly recommend installation.",
        priority: Priority::High,
    },
    Rule {
        applies: |ctx| ctx.roof_area > 200.0,
        title: "Large Roof Area",
        description: "Your large roof area can collect significant rainwater. Consider a larger storage tank.",
        priority: Priority::Medium,
    },
    Rule {
        applies: |ctx| matches!(ctx.soil_type, SoilType::Sandy | SoilType::Loamy),
        title: "Good Soil for Recharge",
        description: "Your soil type is ideal for groundwater recharge. Include a recharge pit in your system.",
        priority: Priority::High,
    },
    Rule {
        applies: |ctx| ctx.annual_rainfall < 500.0,
        title: "Low Rainfall Area",
        description: "Focus on maximizing collection efficiency with proper gutter systems and first flush diverters.",
        priority: Priority::High,
    },
];

/// Evaluates every rule against `ctx`, keeping the ones that fire in rule order.
pub fn generate_recommendations(ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(Rule::to_recommendation)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(ctx: &RecommendationContext<'_>) -> Vec<String> {
        generate_recommendations(ctx)
            .into_iter()
            .map(|r| r.title)
            .collect()
    }

    #[test]
    fn no_rule_fires_for_an_average_site() {
        let soil = SoilType::Clayey;
        let ctx = RecommendationContext {
            feasibility_score: 60,
            roof_area: 150.0,
            annual_rainfall: 800.0,
            soil_type: &soil,
        };
        assert!(generate_recommendations(&ctx).is_empty());
    }

    #[test]
    fn all_rules_fire_in_declared_order() {
        let soil = SoilType::Sandy;
        let ctx = RecommendationContext {
            feasibility_score: 85,
            roof_area: 300.0,
            annual_rainfall: 400.0,
            soil_type: &soil,
        };
        assert_eq!(
            titles(&ctx),
            vec![
                "Excellent Potential",
                "Large Roof Area",
                "Good Soil for Recharge",
                "Low Rainfall Area",
            ]
        );
    }

    #[test]
    fn boundaries_are_strict_where_stated() {
        let soil = SoilType::Loamy;
        let ctx = RecommendationContext {
            feasibility_score: 79,
            roof_area: 200.0,
            annual_rainfall: 500.0,
            soil_type: &soil,
        };
        assert_eq!(titles(&ctx), vec!["Good Soil for Recharge"]);
    }

    #[test]
    fn unrecognized_soil_is_not_good_for_recharge() {
        let soil = SoilType::from("Sandy");
        let ctx = RecommendationContext {
            feasibility_score: 50,
            roof_area: 100.0,
            annual_rainfall: 900.0,
            soil_type: &soil,
        };
        assert!(titles(&ctx).is_empty());
    }

    #[test]
    fn priorities_match_rules() {
        let priorities: Vec<Priority> = RULES.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Medium, Priority::High, Priority::High]
        );
    }
}
