use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mealgen_client::GENERATE_PATH;
use mealgen_llm::{GeminiClient, TextGenerator};

pub mod generate;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        let generator = config.gemini.api_key().map(|api_key| {
            Arc::new(
                GeminiClient::new(api_key)
                    .with_model(config.gemini.model.as_str())
                    .with_base_url(config.gemini.base_url.as_str()),
            ) as Arc<dyn TextGenerator>
        });

        if generator.is_none() {
            tracing::warn!("No Gemini API key configured, generation requests will fail");
        }

        Self { generator }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            GENERATE_PATH,
            post(generate::action).fallback(generate::method_not_allowed),
        )
        .with_state(app_state)
}
