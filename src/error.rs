use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mealgen_llm::LlmError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("GEMINI_API_KEY environment variable is required")]
    MissingCredential,

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] mealgen_planner::Error),

    #[error("Failed to generate meal plan")]
    UpstreamError(#[source] LlmError),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::UpstreamError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": self.to_string() }),
            ),
            AppError::MissingCredential => {
                tracing::error!("Generation requested without a configured API key");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::ValidationError(e) => {
                (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }))
            }
            AppError::UpstreamError(e) => {
                tracing::error!("Error generating meal plan: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string(), "details": e.to_string() }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
