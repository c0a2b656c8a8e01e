use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tripcraft_core::FieldErrors;
use tripcraft_gateway::SubmissionFailed;
use tripcraft_session::DialogError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(FieldErrors),

    #[error(transparent)]
    Submission(SubmissionFailed),

    #[error("{0}")]
    Gone(String),

    #[error("{0}")]
    Internal(String),
}

impl From<DialogError> for AppError {
    fn from(err: DialogError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AppError::Conflict(_) => (StatusCode::CONFLICT, json!({ "error": message })),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field_errors": errors }),
            ),
            AppError::Submission(failure) => {
                tracing::warn!("Trip submission failed: {}", failure);
                (StatusCode::BAD_GATEWAY, json!({ "error": message, "failure": failure }))
            }
            AppError::Gone(_) => (StatusCode::GONE, json!({ "error": message })),
            AppError::Internal(_) => {
                tracing::error!("Internal Server Error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
