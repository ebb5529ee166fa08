//! The feasibility calculator.
//!
//! A single pure pass from [`AssessmentInput`] to [`FeasibilityResult`]: harvest
//! yield, household savings, a four-part score, cost and ROI, recommendations
//! and a system sizing sketch. Each derived quantity is rounded half away
//! from zero before it feeds the next step.

use crate::model::{
    AssessmentInput, CostEstimate, FeasibilityResult, FeasibilityStatus, Roi, SystemDesign,
};
use crate::recommend::{generate_recommendations, RecommendationContext};
use crate::util::round_i64;

/// Average municipal per-capita use, liters per day.
pub const DAILY_CONSUMPTION_PER_PERSON: i64 = 135;
const DAYS_PER_YEAR: i64 = 365;
/// Share of annual household demand that harvested water is expected to cover.
pub const DEMAND_COVERAGE: f64 = 0.6;

/// Cost proxy per liter of annual harvest.
pub const COST_PER_LITER: f64 = 0.5;
const INSTALLATION_SHARE: f64 = 0.1;
const MAINTENANCE_SHARE: f64 = 0.05;
/// Municipal water price proxy per liter.
pub const WATER_COST_PER_LITER: f64 = 0.05;

const TANK_SHARE_OF_HARVEST: f64 = 0.2;
const MULTI_STAGE_FILTER_ABOVE_LITERS: i64 = 10_000;
const LARGE_ROOF_SQFT: f64 = 200.0;

/// Fixed checklist shipped with every system design.
pub const SYSTEM_COMPONENTS: [&str; 5] = [
    "Gutters",
    "First flush diverter",
    "Storage tank",
    "Filter",
    "Distribution pipes",
];

/// Computes the full feasibility result for one site.
///
/// Total over its input: unknown soil or roof types use their default
/// coefficients, and zero savings yield an ROI of 0 years.
pub fn calculate_feasibility(input: &AssessmentInput) -> FeasibilityResult {
    let runoff = input.roof_type.runoff_coefficient();
    let recharge = input.soil_type.recharge_factor();

    let potential_harvest_volume = round_i64(input.roof_area * input.annual_rainfall * runoff);
    // Only ever binds for out-of-domain (negative) areas or rainfall.
    let recharge_potential =
        round_i64(potential_harvest_volume as f64 * recharge).min(potential_harvest_volume);

    let annual_consumption =
        DAILY_CONSUMPTION_PER_PERSON * i64::from(input.number_of_people) * DAYS_PER_YEAR;
    let water_saved =
        potential_harvest_volume.min(round_i64(annual_consumption as f64 * DEMAND_COVERAGE));

    let feasibility_score =
        feasibility_score(input.roof_area, input.annual_rainfall, runoff, recharge);
    let feasibility_status = FeasibilityStatus::from_score(feasibility_score);

    let estimated_cost = estimate_cost(potential_harvest_volume);
    let roi = estimate_roi(estimated_cost.total, water_saved);

    let recommendations = generate_recommendations(&RecommendationContext {
        feasibility_score,
        roof_area: input.roof_area,
        annual_rainfall: input.annual_rainfall,
        soil_type: &input.soil_type,
    });

    let system_design = size_system(potential_harvest_volume, input.roof_area);

    FeasibilityResult {
        feasibility_score,
        feasibility_status,
        potential_harvest_volume,
        recharge_potential,
        water_saved,
        estimated_cost,
        roi,
        recommendations,
        system_design,
    }
}

/// Weighted sum of four capped components, rounded and clamped to `[0, 100]`.
///
/// Caps: roof area 20 (reached at 100 sq ft), rainfall 30 (reached at
/// 1000 mm), soil 25 x recharge factor, roof 25 x runoff coefficient.
pub fn feasibility_score(roof_area: f64, annual_rainfall: f64, runoff: f64, recharge: f64) -> u32 {
    let roof_component = (roof_area / 100.0 * 20.0).min(20.0);
    let rainfall_component = (annual_rainfall / 1000.0 * 30.0).min(30.0);
    let soil_component = recharge * 25.0;
    let roof_type_component = runoff * 25.0;

    let total = roof_component + rainfall_component + soil_component + roof_type_component;
    round_i64(total).clamp(0, 100) as u32
}

/// Linear cost model: installation is 10% of harvest volume x cost per liter,
/// maintenance is 5% of installation.
pub fn estimate_cost(potential_harvest_volume: i64) -> CostEstimate {
    let installation =
        round_i64(potential_harvest_volume as f64 * COST_PER_LITER * INSTALLATION_SHARE);
    let maintenance = round_i64(installation as f64 * MAINTENANCE_SHARE);
    CostEstimate {
        installation,
        maintenance,
        total: installation + maintenance,
    }
}

/// Years to recover `total_cost` from water savings. Zero savings means 0 years.
pub fn estimate_roi(total_cost: i64, water_saved: i64) -> Roi {
    let savings_per_year = round_i64(water_saved as f64 * WATER_COST_PER_LITER);
    let years = if savings_per_year > 0 {
        round_i64(total_cost as f64 / savings_per_year as f64)
    } else {
        0
    };
    Roi {
        years,
        savings_per_year,
    }
}

/// Tank holds 20% of the annual harvest; filter and pipe follow from tank and roof size.
pub fn size_system(potential_harvest_volume: i64, roof_area: f64) -> SystemDesign {
    let tank_capacity = round_i64(potential_harvest_volume as f64 * TANK_SHARE_OF_HARVEST);
    let filter_type = if tank_capacity > MULTI_STAGE_FILTER_ABOVE_LITERS {
        "Multi-stage filtration"
    } else {
        "Basic sand filter"
    };
    let pipe_size = if roof_area > LARGE_ROOF_SQFT {
        "4 inch"
    } else {
        "3 inch"
    };

    SystemDesign {
        tank_capacity,
        filter_type: filter_type.to_string(),
        pipe_size: pipe_size.to_string(),
        components: SYSTEM_COMPONENTS.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_components_cap_independently() {
        // Huge roof and rainfall cannot push past their caps.
        assert_eq!(feasibility_score(10_000.0, 10_000.0, 0.9, 0.7), 90);
        assert_eq!(feasibility_score(100.0, 1000.0, 0.9, 0.7), 90);
    }

    #[test]
    fn score_is_clamped_for_negative_inputs() {
        assert_eq!(feasibility_score(-10_000.0, -10_000.0, 0.6, 0.2), 0);
    }

    #[test]
    fn cost_model_is_linear_in_harvest() {
        let cost = estimate_cost(90_000);
        assert_eq!(cost.installation, 4500);
        assert_eq!(cost.maintenance, 225);
        assert_eq!(cost.total, 4725);
    }

    #[test]
    fn roi_guards_zero_savings() {
        let roi = estimate_roi(4725, 0);
        assert_eq!(roi, Roi { years: 0, savings_per_year: 0 });
    }

    #[test]
    fn roi_rounds_years() {
        let roi = estimate_roi(4725, 90_000);
        assert_eq!(roi.savings_per_year, 4500);
        assert_eq!(roi.years, 1);
    }

    #[test]
    fn filter_switches_above_ten_thousand_liters() {
        assert_eq!(size_system(50_000, 100.0).filter_type, "Basic sand filter");
        assert_eq!(size_system(50_005, 100.0).filter_type, "Multi-stage filtration");
    }

    #[test]
    fn pipe_size_switches_above_two_hundred_sqft() {
        assert_eq!(size_system(0, 200.0).pipe_size, "3 inch");
        assert_eq!(size_system(0, 200.5).pipe_size, "4 inch");
    }
}
