use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, info, warn};
use varun_core::{
    api::{ApiResponse, AssessmentRecord, AssessmentRequest},
    calculate_feasibility, new_ulid, now_ms,
    validation::{validate_assessment_request, FieldError, ValidationErrors},
};

use crate::{config::DaemonConfig, store::AssessmentStore};

/// Header carrying the authenticated caller, set by the upstream auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssessmentStore>,
    pub config: DaemonConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn AssessmentStore>, config: DaemonConfig) -> Self {
        Self { store, config }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authorized, no user identity")]
    Unauthorized,
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),
    /// The body could not be read or decoded into the request type.
    #[error("Invalid request body")]
    MalformedBody {
        status: StatusCode,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Type and missing-field errors are request validation failures, not 422s.
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        let detail = rejection.body_text();
        warn!(status = %status, detail = %detail, "request body rejected");
        ApiError::MalformedBody {
            status,
            errors: vec![body_field_error(&detail)],
        }
    }
}

const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Names the offending field from a JSON rejection message where possible.
///
/// Handles `path: inner` prefixes and `missing field `name`` messages; falls
/// back to `body` when neither is present.
fn body_field_error(detail: &str) -> FieldError {
    let inner = detail.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(detail);

    let (path, message) = match inner.split_once(": ") {
        Some((path, rest))
            if !path.is_empty()
                && path
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '[' | ']')) =>
        {
            (Some(path), rest)
        }
        _ => (None, inner),
    };

    let missing = message
        .split_once("missing field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(name, _)| name);

    let field = match (path, missing) {
        (Some(path), Some(name)) => format!("{path}.{name}"),
        (Some(path), None) => path.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => "body".to_string(),
    };

    FieldError {
        field,
        message: message.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errs) => {
                ApiResponse::failure(self.to_string(), Some(errs.field_errors()))
            }
            ApiError::MalformedBody { errors, .. } => {
                ApiResponse::failure(self.to_string(), Some(errors.clone()))
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                ApiResponse::failure("Internal server error", None)
            }
            _ => ApiResponse::failure(self.to_string(), None),
        };
        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejections use the API error envelope.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Caller identity from [`USER_ID_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        Ok(CallerId(user_id.to_string()))
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// `POST /api/assessments`: validate, calculate, store.
pub async fn create_assessment(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    ApiJson(req): ApiJson<AssessmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssessmentRecord>>), ApiError> {
    if let Err(errs) = validate_assessment_request(&req) {
        warn!(user_id = %user_id, errors = %errs, "assessment rejected");
        return Err(errs.into());
    }

    let result = calculate_feasibility(&req.input);
    let record = AssessmentRecord {
        id: new_ulid().to_string(),
        user_id,
        input: req.input,
        location: req.location,
        result,
        created_at_ms: now_ms(),
    };

    state
        .store
        .insert(record.clone())
        .map_err(ApiError::internal)?;

    info!(
        assessment_id = %record.id,
        user_id = %record.user_id,
        score = record.result.feasibility_score,
        status = %record.result.feasibility_status,
        "assessment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message("Assessment created successfully")),
    ))
}

/// `GET /api/assessments`: the caller's assessments, newest first.
pub async fn list_assessments(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> Result<Json<ApiResponse<Vec<AssessmentRecord>>>, ApiError> {
    let records = state
        .store
        .list_for_user(&user_id)
        .map_err(ApiError::internal)?;
    let count = records.len();
    Ok(Json(ApiResponse::ok(records).with_count(count)))
}

/// `GET /api/assessments/{id}`: a single assessment owned by the caller.
pub async fn get_assessment(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AssessmentRecord>>, ApiError> {
    let record = state
        .store
        .get(&id)
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".into()))?;

    if record.user_id != user_id {
        warn!(assessment_id = %id, user_id = %user_id, "cross-user assessment access");
        return Err(ApiError::Forbidden(
            "Not authorized to access this assessment".into(),
        ));
    }

    Ok(Json(ApiResponse::ok(record)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_missing_top_level_field() {
        let e = body_field_error(&format!("{DESERIALIZE_PREFIX}missing field `location`"));
        assert_eq!(e.field, "location");
        assert_eq!(e.message, "missing field `location`");
    }

    #[test]
    fn names_nested_missing_field() {
        let e = body_field_error(&format!(
            "{DESERIALIZE_PREFIX}location: missing field `latitude` at line 1 column 40"
        ));
        assert_eq!(e.field, "location.latitude");
    }

    #[test]
    fn names_path_of_type_error() {
        let e = body_field_error(&format!(
            "{DESERIALIZE_PREFIX}location.latitude: invalid type: string \"x\", expected f64"
        ));
        assert_eq!(e.field, "location.latitude");
        assert!(e.message.starts_with("invalid type"));
    }

    #[test]
    fn falls_back_to_body_without_a_path() {
        let e = body_field_error(&format!(
            "{DESERIALIZE_PREFIX}invalid type: string \"abc\", expected f64 at line 1 column 17"
        ));
        assert_eq!(e.field, "body");
        assert!(e.message.contains("expected f64"));

        let e = body_field_error("Expected request with `Content-Type: application/json`");
        assert_eq!(e.field, "body");
    }
}
