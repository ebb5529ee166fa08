//! Calculator input, result and the soil/roof coefficient tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Soil beneath the site, which decides how much harvested water can recharge groundwater.
///
/// Serialized as its lowercase name. Anything unrecognized is kept verbatim in
/// [`SoilType::Other`] and scored with the default recharge factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SoilType {
    /// Highly permeable.
    Sandy,
    /// Good permeability.
    Loamy,
    /// Poor permeability.
    Clayey,
    /// Very poor permeability.
    Rocky,
    /// Mixed or unknown composition.
    Mixed,
    /// Unrecognized value, as supplied.
    Other(String),
}

impl SoilType {
    /// The five recognized soil names.
    pub const KNOWN: [&'static str; 5] = ["sandy", "loamy", "clayey", "rocky", "mixed"];

    /// Fraction of harvested water suitable for groundwater recharge.
    pub fn recharge_factor(&self) -> f64 {
        match self {
            SoilType::Sandy => 0.7,
            SoilType::Loamy => 0.5,
            SoilType::Clayey => 0.3,
            SoilType::Rocky => 0.2,
            SoilType::Mixed => 0.4,
            SoilType::Other(_) => 0.4,
        }
    }

    /// True for the five recognized soils.
    pub fn is_known(&self) -> bool {
        !matches!(self, SoilType::Other(_))
    }

    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            SoilType::Sandy => "sandy",
            SoilType::Loamy => "loamy",
            SoilType::Clayey => "clayey",
            SoilType::Rocky => "rocky",
            SoilType::Mixed => "mixed",
            SoilType::Other(s) => s,
        }
    }
}

impl From<String> for SoilType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sandy" => SoilType::Sandy,
            "loamy" => SoilType::Loamy,
            "clayey" => SoilType::Clayey,
            "rocky" => SoilType::Rocky,
            "mixed" => SoilType::Mixed,
            _ => SoilType::Other(value),
        }
    }
}

impl From<&str> for SoilType {
    fn from(value: &str) -> Self {
        SoilType::from(value.to_string())
    }
}

impl From<SoilType> for String {
    fn from(value: SoilType) -> Self {
        match value {
            SoilType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roof material, which decides the runoff coefficient.
///
/// Same string encoding and fallback rules as [`SoilType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoofType {
    /// Reinforced concrete slab.
    Concrete,
    /// Clay or concrete tiles.
    Tile,
    /// Metal or asbestos sheet.
    Sheet,
    /// Thatch.
    Thatched,
    /// Unrecognized value, as supplied.
    Other(String),
}

impl RoofType {
    /// Fraction of rainfall on the roof that can be collected.
    pub fn runoff_coefficient(&self) -> f64 {
        match self {
            RoofType::Concrete => 0.9,
            RoofType::Tile => 0.85,
            RoofType::Sheet => 0.8,
            RoofType::Thatched => 0.6,
            RoofType::Other(_) => 0.8,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            RoofType::Concrete => "concrete",
            RoofType::Tile => "tile",
            RoofType::Sheet => "sheet",
            RoofType::Thatched => "thatched",
            RoofType::Other(s) => s,
        }
    }
}

impl From<String> for RoofType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "concrete" => RoofType::Concrete,
            "tile" => RoofType::Tile,
            "sheet" => RoofType::Sheet,
            "thatched" => RoofType::Thatched,
            _ => RoofType::Other(value),
        }
    }
}

impl From<&str> for RoofType {
    fn from(value: &str) -> Self {
        RoofType::from(value.to_string())
    }
}

impl From<RoofType> for String {
    fn from(value: RoofType) -> Self {
        match value {
            RoofType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site parameters for one feasibility calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    /// Roof area in square feet.
    pub roof_area: f64,
    /// Annual rainfall in millimeters.
    pub annual_rainfall: f64,
    /// Soil type.
    pub soil_type: SoilType,
    /// Roof material.
    pub roof_type: RoofType,
    /// Household occupants.
    pub number_of_people: u32,
}

/// Classification derived from the feasibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    /// Score of 80 or more.
    HighlyFeasible,
    /// Score of 60 to 79.
    Feasible,
    /// Score of 40 to 59.
    ModeratelyFeasible,
    /// Score below 40.
    NotFeasible,
}

impl FeasibilityStatus {
    /// Maps a score to its status; thresholds are checked high to low.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            FeasibilityStatus::HighlyFeasible
        } else if score >= 60 {
            FeasibilityStatus::Feasible
        } else if score >= 40 {
            FeasibilityStatus::ModeratelyFeasible
        } else {
            FeasibilityStatus::NotFeasible
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeasibilityStatus::HighlyFeasible => "highly_feasible",
            FeasibilityStatus::Feasible => "feasible",
            FeasibilityStatus::ModeratelyFeasible => "moderately_feasible",
            FeasibilityStatus::NotFeasible => "not_feasible",
        }
    }
}

impl fmt::Display for FeasibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Act on this first.
    High,
    /// Worth considering.
    Medium,
    /// Nice to have.
    Low,
}

/// A single piece of advice attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Short heading.
    pub title: String,
    /// One-sentence advice.
    pub description: String,
    /// Priority.
    pub priority: Priority,
}

/// Cost estimate in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// One-off installation cost.
    pub installation: i64,
    /// Annual maintenance cost.
    pub maintenance: i64,
    /// Installation plus maintenance.
    pub total: i64,
}

/// Break-even estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roi {
    /// Years to break even, 0 when there are no savings.
    pub years: i64,
    /// Estimated savings per year.
    pub savings_per_year: i64,
}

/// Sizing sketch for the harvesting system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDesign {
    /// Recommended storage volume in liters.
    pub tank_capacity: i64,
    /// Filter recommendation.
    pub filter_type: String,
    /// Downpipe size.
    pub pipe_size: String,
    /// Checklist of components, always the same five.
    pub components: Vec<String>,
}

/// Everything computed from an [`AssessmentInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    /// Composite score in `[0, 100]`.
    pub feasibility_score: u32,
    /// Classification of the score.
    pub feasibility_status: FeasibilityStatus,
    /// Liters per year that can be collected.
    pub potential_harvest_volume: i64,
    /// Liters per year suitable for groundwater recharge.
    pub recharge_potential: i64,
    /// Liters per year of household demand covered.
    pub water_saved: i64,
    /// Cost estimate.
    pub estimated_cost: CostEstimate,
    /// Break-even estimate.
    pub roi: Roi,
    /// Advice in rule order.
    pub recommendations: Vec<Recommendation>,
    /// Sizing sketch.
    pub system_design: SystemDesign,
}
