//! Wire types shared by the daemon and its clients.
//!
//! Field names follow the service's camelCase JSON; the calculator input and
//! result are flattened into requests and records.

use serde::{Deserialize, Serialize};

use crate::model::{AssessmentInput, FeasibilityResult};
use crate::validation::FieldError;

/// Where the assessed site is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Degrees, [-90, 90].
    pub latitude: f64,
    /// Degrees, [-180, 180].
    pub longitude: f64,
    /// Free-form postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body of `POST /api/assessments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Calculator input, flattened into the top-level object.
    #[serde(flatten)]
    pub input: AssessmentInput,
    /// Site location.
    pub location: Location,
}

/// A stored assessment: the request, its computed result and who owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    /// ULID assigned at creation.
    pub id: String,
    /// Owner; only this caller may read the record.
    pub user_id: String,
    /// Input as submitted.
    #[serde(flatten)]
    pub input: AssessmentInput,
    /// Site location as submitted.
    pub location: Location,
    /// Calculator output for `input`.
    #[serde(flatten)]
    pub result: FeasibilityResult,
    /// Creation time, epoch milliseconds.
    pub created_at_ms: i64,
}

/// JSON envelope returned by every `/api` route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// False for every error response.
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data` (list endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Per-field failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
            errors: None,
        }
    }

    /// Adds a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a result count (list endpoints).
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Failed response with a message and optional per-field errors.
    pub fn failure(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            count: None,
            data: None,
            errors,
        }
    }
}
