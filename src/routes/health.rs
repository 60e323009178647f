use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

/// GET /health - Liveness probe
/// Returns 200 OK if the process is alive
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
/// Returns 200 OK once an upstream credential is configured
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.generator.is_some() {
        (StatusCode::OK, Json(json!({"status": "ready"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "reason": "missing_api_key"
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealgen_llm::{GeminiClient, TextGenerator};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_api_key() {
        let response = ready(State(AppState::new(None))).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_with_api_key() {
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new("key"));
        let response = ready(State(AppState::new(Some(generator))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
