//! Request validation performed before the calculator runs.
//!
//! The calculator itself accepts anything; this is where the service rejects
//! requests that would produce meaningless numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::AssessmentRequest;

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `roofArea` is not a finite positive number.
    #[error("Roof area must be a positive number")]
    RoofArea,
    /// `annualRainfall` is not a finite positive number.
    #[error("Annual rainfall must be a positive number")]
    AnnualRainfall,
    /// `soilType` is not one of the known soils.
    #[error("Invalid soil type")]
    SoilType,
    /// `numberOfPeople` is zero.
    #[error("Number of people must be at least 1")]
    NumberOfPeople,
    /// `location.latitude` is not finite or outside [-90, 90].
    #[error("Latitude must be a number")]
    Latitude,
    /// `location.longitude` is not finite or outside [-180, 180].
    #[error("Longitude must be a number")]
    Longitude,
}

impl ValidationError {
    /// Request field the rule applies to, in wire naming.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::RoofArea => "roofArea",
            ValidationError::AnnualRainfall => "annualRainfall",
            ValidationError::SoilType => "soilType",
            ValidationError::NumberOfPeople => "numberOfPeople",
            ValidationError::Latitude => "location.latitude",
            ValidationError::Longitude => "location.longitude",
        }
    }
}

/// Every rule a request violated, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed {} validation rule(s)", .0.len())]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Field/message pairs for the response body.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.0.iter().map(FieldError::from).collect()
    }
}

/// Wire form of a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the offending field, dotted for nested fields.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(e: &ValidationError) -> Self {
        Self {
            field: e.field().to_string(),
            message: e.to_string(),
        }
    }
}

/// Checks an assessment request, collecting all violations rather than stopping at the first.
///
/// Roof type is not checked; unknown roofs score with the default coefficient.
pub fn validate_assessment_request(req: &AssessmentRequest) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    let input = &req.input;

    if !is_positive(input.roof_area) {
        errors.push(ValidationError::RoofArea);
    }
    if !is_positive(input.annual_rainfall) {
        errors.push(ValidationError::AnnualRainfall);
    }
    if !input.soil_type.is_known() {
        errors.push(ValidationError::SoilType);
    }
    if input.number_of_people == 0 {
        errors.push(ValidationError::NumberOfPeople);
    }
    if !in_range(req.location.latitude, 90.0) {
        errors.push(ValidationError::Latitude);
    }
    if !in_range(req.location.longitude, 180.0) {
        errors.push(ValidationError::Longitude);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn in_range(v: f64, bound: f64) -> bool {
    v.is_finite() && (-bound..=bound).contains(&v)
}
