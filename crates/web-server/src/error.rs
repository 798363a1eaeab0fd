use analytics::AnalyticsError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(
                err @ (AnalyticsError::InsufficientData(_) | AnalyticsError::InvalidHorizon { .. }),
            ) => {
                tracing::warn!(error = %err, "Analytics request rejected.");
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            AppError::Analytics(err @ AnalyticsError::Calculation(_)) => {
                tracing::error!(error = ?err, "Analytics calculation failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::InvalidRequest(message) => {
                tracing::warn!(error = %message, "Invalid request body.");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
